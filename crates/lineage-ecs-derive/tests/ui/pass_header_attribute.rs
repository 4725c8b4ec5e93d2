//! The header can live under any name when marked explicitly.

use lineage_ecs::{Entity, EntityHeader, World};

type Header = EntityHeader;

#[derive(Default, Entity)]
struct Aliased {
    #[entity(header)]
    base: Header,
    frame: u16,
}

#[derive(Default, Entity)]
struct Tuple(u8, EntityHeader);

#[derive(Default, Entity)]
struct Explicit(#[entity(header)] Header, EntityHeader);

fn main() {
    let mut world = World::new();

    let a = world.create::<Aliased>();
    let b = world.create::<Aliased>();
    assert_eq!(world.record(b).unwrap().header().id(), 1);
    assert!(world.record(a).unwrap().base.is_created());
    assert_eq!(world.record(a).unwrap().frame, 0);

    let t = world.create::<Tuple>();
    assert!(world.record(t).unwrap().1.is_created());

    let e = world.create::<Explicit>();
    let record = world.record(e).unwrap();
    assert!(record.0.is_created());
    assert!(!record.1.is_created());
}
