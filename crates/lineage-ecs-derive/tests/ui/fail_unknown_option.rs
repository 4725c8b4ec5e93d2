//! Only `extends` is accepted on the type.
#![allow(dead_code)]

use lineage_ecs::{Entity, EntityHeader};

#[derive(Entity)]
#[entity(parent = Base)]
struct Derived {
    header: EntityHeader,
}

fn main() {}
