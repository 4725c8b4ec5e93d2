//! A struct without `extends` is a top-level entity type.

use lineage_ecs::{Entity, EntityHeader, Root, World};

#[derive(Default, Entity)]
struct Node {
    header: EntityHeader,
    visible: bool,
}

fn assert_top_level<E: Entity<Super = Root>>() {}

fn main() {
    assert_top_level::<Node>();

    let mut world = World::new();
    let node = world.create::<Node>();
    let record = world.record(node).unwrap();
    assert_eq!(record.header.id(), 0);
    assert!(!record.visible);
}
