//! Two header-typed fields are ambiguous without a marker.
#![allow(dead_code)]

use lineage_ecs::{Entity, EntityHeader};

#[derive(Entity)]
struct Twin {
    first: EntityHeader,
    second: EntityHeader,
}

fn main() {}
