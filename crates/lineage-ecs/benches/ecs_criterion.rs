//! Engine benchmarks using criterion.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lineage_ecs::prelude::*;

#[derive(Default, Entity)]
struct Node {
    header: EntityHeader,
}

#[derive(Default, Entity)]
#[entity(extends = Node)]
struct Sprite {
    header: EntityHeader,
}

#[derive(Default, Entity)]
#[entity(extends = Sprite)]
struct Image {
    header: EntityHeader,
}

#[derive(Clone, Copy, Default)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy)]
struct Velocity {
    dx: f32,
    dy: f32,
}

impl Default for Velocity {
    fn default() -> Self {
        Self { dx: 1.0, dy: 1.0 }
    }
}

/// A world with `count` entities spread over three levels of the hierarchy.
fn populated(count: u64) -> World {
    let mut world = World::new();
    for i in 0..count {
        match i % 3 {
            0 => {
                let e = world.create::<Node>();
                e.component::<Position>().set(&mut world, Position { x: i as f32, y: 0.0 });
                e.component::<Velocity>().get_mut(&mut world);
            }
            1 => {
                let e = world.create::<Sprite>();
                e.component::<Position>().set(&mut world, Position { x: i as f32, y: 0.0 });
            }
            _ => {
                world.create::<Image>();
            }
        }
    }
    world
}

fn create_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for count in [1, 100, 1000, 10000] {
        group.throughput(Throughput::Elements(count));

        group.bench_with_input(BenchmarkId::new("bare", count), &count, |b, &count| {
            b.iter(|| {
                let mut world = World::new();
                for _ in 0..count {
                    black_box(world.create::<Node>());
                }
            });
        });

        group.bench_with_input(
            BenchmarkId::new("backfilled", count),
            &count,
            |b, &count| {
                b.iter(|| {
                    let mut world = World::new();
                    let first = world.create::<Node>();
                    first.component::<Position>().get_mut(&mut world);
                    first.component::<Velocity>().get_mut(&mut world);
                    for _ in 0..count {
                        black_box(world.create::<Image>());
                    }
                });
            },
        );
    }

    group.finish();
}

fn component_access_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("component_access");

    for count in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(count));

        let mut world = World::new();
        let entities: Vec<EntityRef<Sprite>> = (0..count)
            .map(|i| {
                let e = world.create::<Sprite>();
                e.component::<Position>().set(&mut world, Position { x: i as f32, y: 0.0 });
                e
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("get", count), &count, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                for e in &entities {
                    if let Some(p) = e.component::<Position>().get(&world) {
                        sum += p.x;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("get_mut", count), &count, |b, _| {
            b.iter(|| {
                for e in &entities {
                    e.component::<Position>().get_mut(&mut world).y += 1.0;
                }
            });
        });
    }

    group.finish();
}

fn iteration_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");

    for count in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(count));

        let mut world = populated(count);

        group.bench_with_input(BenchmarkId::new("tree", count), &count, |b, _| {
            b.iter(|| {
                let sum: f32 = world.iter::<Node, Position>().map(|p| p.x).sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("view", count), &count, |b, _| {
            b.iter(|| {
                let view = world
                    .view::<Node, (Position, Velocity)>()
                    .expect("distinct components");
                for (position, velocity) in view {
                    position.x += velocity.dx;
                    position.y += velocity.dy;
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    create_benchmarks,
    component_access_benchmarks,
    iteration_benchmarks
);
criterion_main!(benches);
