//! `extends` names the supertype, across modules too.

mod shapes {
    use lineage_ecs::{Entity, EntityHeader};

    #[derive(Default, Entity)]
    pub struct Shape {
        pub header: EntityHeader,
    }
}

use lineage_ecs::{Entity, EntityHeader, World};

#[derive(Default, Entity)]
#[entity(extends = shapes::Shape)]
struct Circle {
    header: EntityHeader,
    radius: f32,
}

#[derive(Default, Entity)]
#[entity(extends = Circle)]
struct Ring {
    header: EntityHeader,
    inner: f32,
}

fn assert_super<E: Entity<Super = S>, S>() {}

fn main() {
    assert_super::<Circle, shapes::Shape>();
    assert_super::<Ring, Circle>();

    let mut world = World::new();
    world.create::<Ring>();

    let ring = world.manager_id::<Ring>().unwrap();
    let circle = world.manager_id::<Circle>().unwrap();
    assert_eq!(world.manager(ring).unwrap().parent(), Some(circle));
}
