//! Entity types, components and systems of the demo scene.

use lineage_ecs::prelude::*;

#[derive(Default, Entity)]
pub struct Node {
    header: EntityHeader,
    pub visible: bool,
}

#[derive(Default, Entity)]
#[entity(extends = Node)]
pub struct Sprite {
    header: EntityHeader,
    pub layer: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

impl Default for Velocity {
    fn default() -> Self {
        Self { dx: 1.0, dy: 1.0 }
    }
}

/// Pixel data, only ever attached to sprites.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Image {
    #[must_use]
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }
}

/// Add one to both velocity axes of every node, sprites included.
pub fn update_velocity(world: &mut World) -> lineage_ecs::Result<usize> {
    let mut touched = 0;
    for (velocity,) in world.view::<Node, (Velocity,)>()? {
        velocity.dx += 1.0;
        velocity.dy += 1.0;
        touched += 1;
    }
    Ok(touched)
}

/// Move every node by its velocity.
pub fn update_position(world: &mut World) -> lineage_ecs::Result<usize> {
    let mut touched = 0;
    for (position, velocity) in world.view::<Node, (Position, Velocity)>()? {
        position.x += velocity.dx;
        position.y += velocity.dy;
        touched += 1;
    }
    Ok(touched)
}
