//! Generic entity types get a generic impl.

use lineage_ecs::{Entity, EntityHeader, World};

#[derive(Default, Entity)]
struct Node {
    header: EntityHeader,
}

#[derive(Default, Entity)]
#[entity(extends = Node)]
struct Tagged<T: Default + 'static> {
    header: EntityHeader,
    tag: T,
}

fn main() {
    let mut world = World::new();
    world.create::<Tagged<u8>>();
    world.create::<Tagged<u64>>();

    let node = world.manager_id::<Node>().unwrap();
    assert_eq!(world.manager(node).unwrap().subtypes().len(), 2);
    assert_eq!(world.entities::<Node>().count(), 2);
}
