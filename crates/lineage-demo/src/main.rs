//! Lineage ECS walkthrough
//!
//! Builds two nodes and three sprites, runs the velocity and position
//! systems over all of them and checks the results.
//!
//! When `LINEAGE_DUMP_DIR` is set, a Graphviz dump of everything reachable
//! from the `Node` manager is written there after each step
//! (`node1.dot` .. `node6.dot`).

mod scene;

use std::path::PathBuf;

use eyre::{WrapErr, ensure};
use lineage_ecs::prelude::*;
use lineage_ecs_introspect::WorldSnapshot;
use scene::{Image, Node, Position, Sprite, Velocity, update_position, update_velocity};
use tracing::info;

/// Writes numbered DOT dumps, or nothing when no directory is configured.
struct Dumper {
    dir: Option<PathBuf>,
    step: usize,
}

impl Dumper {
    fn from_env() -> Self {
        let dir = std::env::var("LINEAGE_DUMP_DIR").ok().map(PathBuf::from);
        match &dir {
            Some(dir) => info!("Writing dumps to {}", dir.display()),
            None => info!("LINEAGE_DUMP_DIR not set, skipping dumps"),
        }
        Self { dir, step: 0 }
    }

    fn dump(&mut self, world: &mut World) -> eyre::Result<()> {
        self.step += 1;
        let Some(dir) = &self.dir else {
            return Ok(());
        };

        let node = world.manager_for::<Node>();
        let snapshot = WorldSnapshot::capture(world, node)?;
        let path = dir.join(format!("node{}.dot", self.step));
        snapshot
            .write_dot(&path)
            .wrap_err_with(|| format!("writing {}", path.display()))?;
        info!("Dumped {}", path.display());
        Ok(())
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lineage_demo=info".parse()?),
        )
        .init();

    let mut dumper = Dumper::from_env();
    let mut world = World::new();

    let a = world.create::<Node>();
    a.component::<Position>().set(&mut world, Position { x: 1.0, y: 2.0 });
    dumper.dump(&mut world)?;

    let b = world.create::<Node>();
    b.component::<Position>().set(&mut world, Position { x: 3.0, y: 4.0 });
    dumper.dump(&mut world)?;

    let mut sprites = Vec::new();
    for (x, y) in [(5.0, 6.0), (7.0, 8.0), (9.0, 10.0)] {
        let sprite = world.create::<Sprite>();
        sprite.component::<Position>().set(&mut world, Position { x, y });
        sprite
            .component::<Image>()
            .set(&mut world, Image::filled(4, 4, 0xffff_ffff));
        sprites.push(sprite);
        dumper.dump(&mut world)?;
    }

    info!("a.velocity = {:?}", a.component::<Velocity>().get_mut(&mut world));

    let touched = update_velocity(&mut world)?;
    dumper.dump(&mut world)?;
    info!("Velocity updated on {} entities", touched);
    info!("a.velocity = {:?}", a.component::<Velocity>().get(&world));

    let velocities: Vec<Velocity> = world.iter::<Node, Velocity>().copied().collect();
    ensure!(velocities.len() == 5, "expected 5 velocities, got {}", velocities.len());
    for velocity in &velocities {
        ensure!(
            *velocity == Velocity { dx: 2.0, dy: 2.0 },
            "unexpected velocity {:?}",
            velocity
        );
    }

    update_position(&mut world)?;
    let positions: Vec<Position> = world.iter::<Node, Position>().copied().collect();
    info!("Positions after one step: {:?}", positions);

    let expected = [(3.0, 4.0), (5.0, 6.0), (7.0, 8.0), (9.0, 10.0), (11.0, 12.0)];
    for (position, (x, y)) in positions.iter().zip(expected) {
        ensure!(
            *position == Position { x, y },
            "unexpected position {:?}",
            position
        );
    }

    for (key, (image,)) in world.view::<Sprite, (Image,)>()?.entities() {
        info!("{:?}: {}x{} image", key, image.width, image.height);
    }

    info!("Done: {} nodes, {} sprites", world.entity_count::<Node>(), sprites.len());
    Ok(())
}
