//! Enums cannot be entities.
#![allow(dead_code)]

use lineage_ecs::{Entity, EntityHeader};

#[derive(Entity)]
enum Shape {
    Circle(EntityHeader),
}

fn main() {}
