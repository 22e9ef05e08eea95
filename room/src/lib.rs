//! Runtime owner of one room's compiled collision generation.
//!
//! A [`RoomCollision`] is created whole at room load and dropped whole at
//! room unload; the shapes, the attribute buffer they index into, and the
//! crumbling registry never outlive each other. During a cross-fade two
//! generations simply coexist as two values.

use terrain_compiler::{compile_room, RoomLoadError, TileGrid, TileSet};
use util::{Attribute, AttributeBuffer, CollisionShape, Number, TagIndex};

mod crumble;

pub use crumble::{CrumbleEvent, CrumbleManager};

pub struct RoomCollision {
    shapes: Vec<CollisionShape>,
    attributes: AttributeBuffer,
    crumble: CrumbleManager,
}

impl RoomCollision {
    pub fn load(grid: &TileGrid, tileset: &TileSet) -> Result<Self, RoomLoadError> {
        let compiled = compile_room(grid, tileset)?;

        Ok(Self {
            shapes: compiled.shapes,
            attributes: compiled.attributes,
            crumble: CrumbleManager::new(&compiled.crumbling),
        })
    }

    /// The geometry to hand to the physics engine, in tag order.
    pub fn shapes(&self) -> &[CollisionShape] {
        &self.shapes
    }

    /// Resolves what terrain a shape represents. This is the one contract
    /// gameplay collision response relies on.
    pub fn attribute(&self, tag: TagIndex) -> Attribute {
        self.attributes.get(tag)
    }

    /// Forwarded physics notification: a qualifying dynamic body touched
    /// the shape.
    pub fn notify_contact(&mut self, shape: TagIndex, now: Number) {
        self.crumble.notify_contact(shape, now);
    }

    /// Per-tick poll. Appends the crumbling requests the caller should
    /// carry out this step.
    pub fn step(&mut self, now: Number, events: &mut Vec<CrumbleEvent>) {
        self.crumble.step(now, events);
    }
}
