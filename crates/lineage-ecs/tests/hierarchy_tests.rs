//! Behaviour of worlds built from a three-level entity hierarchy.
//!
//! ```text
//! Node ─┬─ Sprite ── Image
//!       └─ Label
//! ```

use lineage_ecs::{EntityFlags, ManagerId, NodeId, Topology, TreeCursor, prelude::*, subtree};

#[derive(Default, Entity)]
struct Node {
    header: EntityHeader,
    depth: u8,
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

#[derive(Default, Entity)]
#[entity(extends = Node)]
struct Label {
    header: EntityHeader,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

impl Default for Velocity {
    fn default() -> Self {
        Self { dx: 1.0, dy: 1.0 }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Serial(u32);

#[test]
fn test_subtype_reads_supertype_component_as_default() {
    let mut world = World::new();
    let node = world.create::<Node>();
    node.component::<Velocity>().set(&mut world, Velocity { dx: 4.0, dy: 4.0 });

    let image = world.create::<Image>();

    assert_eq!(image.component::<Velocity>().get(&world), Some(&Velocity::default()));
}

#[test]
fn test_backfill_reaches_every_level() {
    let mut world = World::new();
    let sprite = world.create::<Sprite>();
    sprite.component::<Serial>().set(&mut world, Serial(1));
    let node = world.create::<Node>();
    node.component::<Position>().set(&mut world, Position { x: 1.0, y: 1.0 });

    let image = world.create::<Image>();

    assert_eq!(image.component::<Serial>().get(&world), Some(&Serial(0)));
    assert_eq!(image.component::<Position>().get(&world), Some(&Position::default()));
}

#[test]
fn test_ids_are_dense_per_concrete_type() {
    let mut world = World::new();

    let ids: Vec<u32> = (0..4).map(|_| world.create::<Label>().id()).collect();
    let sprite = world.create::<Sprite>();

    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert_eq!(sprite.id(), 0);
    assert_eq!(world.entity_count::<Label>(), 4);
    assert_eq!(world.entity_count::<Node>(), 0);
}

#[test]
fn test_created_flag_marks_real_records() {
    let mut world = World::new();
    let node = world.create::<Node>();

    let header = *world.record(node).unwrap().header();

    assert!(header.is_created());
    assert_eq!(header.flags(), EntityFlags::CREATED);
    world.record_mut(node).unwrap().depth = 3;
    assert_eq!(world.record(node).unwrap().depth, 3);
}

#[test]
fn test_growth_never_loses_values() {
    let mut world = World::new();
    let first = world.create::<Node>();
    first.component::<Serial>().set(&mut world, Serial(7));

    for _ in 0..100 {
        world.create::<Node>();
    }

    assert_eq!(first.component::<Serial>().get(&world), Some(&Serial(7)));
    let node = world.manager_id::<Node>().unwrap();
    let column = world.column_id::<Serial>(node).unwrap();
    assert_eq!(world.column::<Serial>(column).unwrap().len(), 101);
}

/// Create an `E` carrying the next serial number and return that number.
fn tagged<E: Entity>(world: &mut World, counter: &mut u32) -> u32 {
    let entity = world.create::<E>();
    *counter += 1;
    entity.component::<Serial>().set(world, Serial(*counter));
    *counter
}

#[test]
fn test_tree_iteration_visits_each_value_once() {
    let mut world = World::new();
    let mut counter = 0;
    let mut expected = Vec::new();

    for _ in 0..2 {
        expected.push(tagged::<Image>(&mut world, &mut counter));
    }
    for _ in 0..3 {
        expected.push(tagged::<Label>(&mut world, &mut counter));
    }
    for _ in 0..2 {
        expected.push(tagged::<Node>(&mut world, &mut counter));
    }
    expected.push(tagged::<Sprite>(&mut world, &mut counter));

    let mut seen: Vec<u32> = world.iter::<Node, Serial>().map(|s| s.0).collect();
    seen.sort_unstable();

    assert_eq!(seen, expected);
}

#[test]
fn test_tree_iteration_stays_inside_subtype() {
    let mut world = World::new();
    let mut counter = 0;
    tagged::<Node>(&mut world, &mut counter);
    let sprite = tagged::<Sprite>(&mut world, &mut counter);
    let image = tagged::<Image>(&mut world, &mut counter);
    tagged::<Label>(&mut world, &mut counter);

    let seen: Vec<u32> = world.iter::<Sprite, Serial>().map(|s| s.0).collect();

    assert_eq!(seen, vec![sprite, image]);
}

#[test]
fn test_supertype_values_come_first() {
    let mut world = World::new();
    let mut counter = 0;
    let image = tagged::<Image>(&mut world, &mut counter);
    let sprite = tagged::<Sprite>(&mut world, &mut counter);
    let node = tagged::<Node>(&mut world, &mut counter);

    let seen: Vec<u32> = world.iter::<Node, Serial>().map(|s| s.0).collect();

    assert_eq!(seen, vec![node, sprite, image]);
}

/// Managers of the nodes under `root`, in pre-order.
fn preorder(world: &World, root: NodeId) -> Vec<ManagerId> {
    let arena = world.arena();
    subtree(arena, root)
        .filter_map(|node| Topology::manager(arena, node))
        .collect()
}

#[test]
fn test_view_gives_every_tree_one_preorder() {
    let mut world = World::new();
    world.create::<Label>().component::<Serial>().get_mut(&mut world);
    world.create::<Image>().component::<Position>().get_mut(&mut world);
    world.create::<Sprite>().component::<Serial>().get_mut(&mut world);
    world.create::<Node>().component::<Position>().get_mut(&mut world);

    let node = world.manager_for::<Node>();
    let serial = world.column_id::<Serial>(node);
    assert!(serial.is_none());

    drop(world.view::<Node, (Serial, Position)>().unwrap());

    let registry = world.get_or_create_registry::<Node>();
    let serial = world.column_id::<Serial>(node).unwrap();
    let position = world.column_id::<Position>(node).unwrap();

    let expected = preorder(&world, registry);
    assert_eq!(expected.len(), 4);
    assert_eq!(preorder(&world, serial), expected);
    assert_eq!(preorder(&world, position), expected);
}

#[test]
fn test_velocity_accumulation_scenario() {
    let mut world = World::new();
    let nodes = [world.create::<Node>(), world.create::<Node>()];
    let sprites = [
        world.create::<Sprite>(),
        world.create::<Sprite>(),
        world.create::<Sprite>(),
    ];

    for (velocity,) in world.view::<Node, (Velocity,)>().unwrap() {
        velocity.dx += 1.0;
        velocity.dy += 1.0;
    }

    let two = Velocity { dx: 2.0, dy: 2.0 };
    for node in nodes {
        assert_eq!(node.component::<Velocity>().get(&world), Some(&two));
    }
    for sprite in sprites {
        assert_eq!(sprite.component::<Velocity>().get(&world), Some(&two));
    }
}

#[test]
fn test_position_velocity_join_scenario() {
    let mut world = World::new();
    let mut positions = Vec::new();
    for (i, (x, y)) in [(1.0, 2.0), (3.0, 4.0), (5.0, 6.0), (7.0, 8.0), (9.0, 10.0)]
        .into_iter()
        .enumerate()
    {
        let key = if i < 2 {
            let e = world.create::<Node>();
            e.component::<Position>().set(&mut world, Position { x, y });
            world.key_of(e)
        } else {
            let e = world.create::<Sprite>();
            e.component::<Position>().set(&mut world, Position { x, y });
            world.key_of(e)
        };
        positions.push(key.unwrap());
    }

    let moved: Vec<(EntityKey, Position)> = world
        .view::<Node, (Position, Velocity)>()
        .unwrap()
        .entities()
        .map(|(key, (position, velocity))| {
            position.x += velocity.dx;
            position.y += velocity.dy;
            (key, *position)
        })
        .collect();

    let expected = [(2.0, 3.0), (4.0, 5.0), (6.0, 7.0), (8.0, 9.0), (10.0, 11.0)];
    assert_eq!(moved.len(), expected.len());
    for ((key, position), (want_key, (x, y))) in moved.iter().zip(positions.iter().zip(expected)) {
        assert_eq!(key, want_key);
        assert_eq!(*position, Position { x, y });
    }
}

#[test]
fn test_view_rows_follow_anchor_entities() {
    let mut world = World::new();
    let mut counter = 0;
    tagged::<Image>(&mut world, &mut counter);
    tagged::<Node>(&mut world, &mut counter);
    tagged::<Label>(&mut world, &mut counter);
    tagged::<Sprite>(&mut world, &mut counter);
    tagged::<Node>(&mut world, &mut counter);

    let keys: Vec<EntityKey> = world.entities::<Node>().collect();
    let rows: Vec<(EntityKey, u32)> = world
        .view::<Node, (Serial, Position)>()
        .unwrap()
        .entities()
        .map(|(key, (serial, _))| (key, serial.0))
        .collect();

    assert_eq!(rows.iter().map(|(key, _)| *key).collect::<Vec<_>>(), keys);

    // Each serial was written through the entity's own handle, so it must
    // come back on the row of that entity.
    let mut by_serial = rows.clone();
    by_serial.sort_by_key(|(_, serial)| *serial);
    let node = world.manager_id::<Node>().unwrap();
    let image = world.manager_id::<Image>().unwrap();
    assert_eq!(by_serial[0].0, EntityKey { manager: image, id: 0 });
    assert_eq!(by_serial[1].0, EntityKey { manager: node, id: 0 });
    assert_eq!(by_serial[4].0, EntityKey { manager: node, id: 1 });
}

#[test]
fn test_view_over_late_columns() {
    let mut world = World::new();
    let image = world.create::<Image>();
    image.component::<Serial>().set(&mut world, Serial(5));
    let node = world.create::<Node>();

    let serials: Vec<u32> = world
        .view::<Node, (Serial,)>()
        .unwrap()
        .map(|(serial,)| serial.0)
        .collect();

    // Sprite has no entities, so Image follows Node directly.
    assert_eq!(serials, vec![0, 5]);
    assert_eq!(node.component::<Serial>().get(&world), Some(&Serial(0)));
}

#[test]
fn test_view_positions_compare_all_cursors() {
    let mut world = World::new();
    world.create::<Node>();
    world.create::<Label>();

    let mut first = world.view::<Node, (Serial,)>().unwrap();
    let start = first.position();
    first.next();
    first.next();
    let end = first.position();
    drop(first);

    assert_ne!(start, end);
    assert!(end.anchor.is_exhausted());
    assert!(end.components.iter().all(TreeCursor::is_exhausted));

    let again = world.view::<Node, (Serial,)>().unwrap();
    assert_eq!(again.position(), start);
}
