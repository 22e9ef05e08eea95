#![no_std]

extern crate alloc;

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use agb_fixnum::{Num, Vector2D};

pub type Number = Num<i32, 8>;

/// Side length of one grid cell in pixels.
pub const TILE_SIZE: i32 = 16;

/// The single solid-from side of a one-way platform.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Unit vector pointing away from the solid side.
    pub fn normal(self) -> Vector2D<Number> {
        let (x, y) = match self {
            Facing::Up => (0, -1),
            Facing::Down => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        };

        Vector2D::new(Number::new(x), Number::new(y))
    }
}

/// What a collision shape means to gameplay code. Downstream collision
/// response resolves this through the shape's tag index alone.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Attribute {
    Solid,
    NoWalljump,
    Platform(Facing),
    Crumbling,
}

/// Slot in a room's [`AttributeBuffer`]. Doubles as the stable identity of
/// the shape that owns the slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct TagIndex(pub u32);

/// The one attribute array a room's shapes reference. Sized up-front to the
/// exact shape count; slots are handed out in emission order so tag
/// assignment is deterministic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AttributeBuffer {
    slots: Vec<Attribute>,
    capacity: usize,
}

impl AttributeBuffer {
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;

        Ok(Self { slots, capacity })
    }

    /// Claims the next slot. Exhausting the pre-sized buffer means a shape
    /// was emitted that the counting pass never saw, so this is fatal.
    pub fn push(&mut self, attribute: Attribute) -> TagIndex {
        assert!(
            self.slots.len() < self.capacity,
            "attribute buffer slots exhausted"
        );

        let tag = TagIndex(self.slots.len() as u32);
        self.slots.push(attribute);
        tag
    }

    pub fn get(&self, tag: TagIndex) -> Attribute {
        self.slots[tag.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ShapeKind {
    /// Thick line segment (a capsule). `a == b` degenerates to a circle.
    Segment {
        a: Vector2D<Number>,
        b: Vector2D<Number>,
        radius: Number,
    },
    Polygon { points: Vec<Vector2D<Number>> },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CollisionShape {
    pub kind: ShapeKind,
    pub tag: TagIndex,
}
