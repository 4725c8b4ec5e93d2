//! `extends` may only be given once.
#![allow(dead_code)]

use lineage_ecs::{Entity, EntityHeader};

#[derive(Default, Entity)]
struct Base {
    header: EntityHeader,
}

#[derive(Entity)]
#[entity(extends = Base, extends = Base)]
struct Derived {
    header: EntityHeader,
}

fn main() {}
