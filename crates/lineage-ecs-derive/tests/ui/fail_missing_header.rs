//! An entity needs a header field.
#![allow(dead_code)]

use lineage_ecs::Entity;

#[derive(Entity)]
struct Orphan {
    weight: u32,
}

fn main() {}
