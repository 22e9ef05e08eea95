//! Compiles a room's tile grid into the minimal set of collision primitives
//! the physics engine ingests: boundary capsules and bevelled polygons for
//! auto-tiled terrain, plus independent shapes for placed props. Every
//! emitted shape carries a slot index into the room's single attribute
//! buffer; destructible props additionally seed the crumbling registry.

use std::collections::TryReserveError;

use thiserror::Error;
use tracing::debug;

use util::{AttributeBuffer, CollisionShape};

mod object_extract;
mod segment_extract;
mod shape_convert;
mod tileset;

pub use object_extract::{count_object_shapes, extract_objects, CrumblingShape};
pub use segment_extract::{
    extract_segments, Axis, BoundarySegment, Polarity, SegmentEnd,
};
pub use shape_convert::{convert_segment, segment_attribute};
pub use tileset::{
    semi_terrain, CrumbleTiming, LocalShape, PhysicalParameters, SemiTerrain,
    SingleObjectDef, TerrainDef, TileCategory, TileGrid, TileRef, TileSet, TileSetError,
};

#[derive(Debug, Error)]
pub enum RoomLoadError {
    #[error("failed to allocate the {needed}-slot attribute buffer")]
    AttributeBuffer {
        needed: usize,
        source: TryReserveError,
    },
}

/// Everything one room generation owns. The shapes, the buffer their tags
/// point into, and the dormant crumbling registry live and die together.
#[derive(Clone, Debug)]
pub struct CompiledRoom {
    pub shapes: Vec<CollisionShape>,
    pub attributes: AttributeBuffer,
    pub crumbling: Vec<CrumblingShape>,
}

/// Runs the full pipeline: both boundary passes, then the prop pass, with
/// tag slots handed out in that fixed order. Pure in its inputs; identical
/// grid and tile-set always compile to identical output.
pub fn compile_room(grid: &TileGrid, tileset: &TileSet) -> Result<CompiledRoom, RoomLoadError> {
    let horizontal = extract_segments(grid, Axis::Horizontal);
    let vertical = extract_segments(grid, Axis::Vertical);
    let object_shapes = count_object_shapes(grid, tileset);

    let needed = horizontal.len() + vertical.len() + object_shapes;
    let mut attributes = AttributeBuffer::with_capacity(needed)
        .map_err(|source| RoomLoadError::AttributeBuffer { needed, source })?;

    let mut shapes = Vec::with_capacity(needed);

    for segment in horizontal.iter().chain(&vertical) {
        let tag = attributes.push(segment_attribute(segment, tileset));
        shapes.push(convert_segment(segment, tileset, tag));
    }

    let mut crumbling = Vec::new();
    extract_objects(grid, tileset, &mut attributes, &mut shapes, &mut crumbling);

    debug_assert_eq!(attributes.len(), needed);

    debug!(
        horizontal = horizontal.len(),
        vertical = vertical.len(),
        object_shapes,
        crumbling = crumbling.len(),
        "compiled room collision"
    );

    Ok(CompiledRoom {
        shapes,
        attributes,
        crumbling,
    })
}
