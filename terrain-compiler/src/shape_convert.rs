//! Boundary runs to world-space collision geometry.
//!
//! One formula set serves both scan orientations: everything is computed in
//! (span, perpendicular) coordinates and swapped into (x, y) at the end.
//! End kinds drive the longitudinal trim so abutting runs meet exactly at
//! the rounded-corner tangent point.

use agb_fixnum::Vector2D;
use util::{Attribute, CollisionShape, Number, ShapeKind, TagIndex, TILE_SIZE};

use crate::segment_extract::{Axis, BoundarySegment, Polarity, SegmentEnd};
use crate::tileset::{semi_terrain, TileSet};

/// Thickness of the capsule a one-way platform becomes.
const PLATFORM_RADIUS: i32 = 1;

fn pt(axis: Axis, span: Number, perp: Number) -> Vector2D<Number> {
    match axis {
        Axis::Horizontal => Vector2D::new(span, perp),
        Axis::Vertical => Vector2D::new(perp, span),
    }
}

/// The attribute the segment's tag slot will carry.
pub fn segment_attribute(segment: &BoundarySegment, tileset: &TileSet) -> Attribute {
    if segment.semi {
        Attribute::Platform(semi_terrain(segment.terrain).facing)
    } else {
        tileset.terrain(segment.terrain).tag
    }
}

struct Tuning {
    /// Outset of the boundary face away from the solid side.
    perp_offset: Number,
    /// Outsets of the two faces the run's ends abut.
    start_offset: Number,
    end_offset: Number,
    corner_radius: Number,
}

fn tuning(segment: &BoundarySegment, tileset: &TileSet) -> Tuning {
    if segment.semi {
        return Tuning {
            perp_offset: Number::new(0),
            start_offset: Number::new(0),
            end_offset: Number::new(0),
            corner_radius: Number::new(0),
        };
    }

    let terrain = tileset.terrain(segment.terrain);

    match segment.axis {
        Axis::Horizontal => Tuning {
            perp_offset: match segment.polarity {
                Polarity::Positive => terrain.upper_offset,
                Polarity::Negative => terrain.lower_offset,
            },
            start_offset: terrain.left_offset,
            end_offset: terrain.right_offset,
            corner_radius: terrain.corner_radius,
        },
        Axis::Vertical => Tuning {
            perp_offset: match segment.polarity {
                Polarity::Positive => terrain.left_offset,
                Polarity::Negative => terrain.right_offset,
            },
            start_offset: terrain.upper_offset,
            end_offset: terrain.lower_offset,
            corner_radius: terrain.corner_radius,
        },
    }
}

/// World-space coordinate of the boundary face, perpendicular to the lane.
fn face_line(segment: &BoundarySegment, tuning: &Tuning) -> Number {
    if segment.semi {
        let half = if semi_terrain(segment.terrain).half_tile {
            TILE_SIZE / 2
        } else {
            0
        };

        return match segment.polarity {
            Polarity::Positive => Number::new(segment.lane * TILE_SIZE + half),
            Polarity::Negative => Number::new((segment.lane + 1) * TILE_SIZE - half),
        };
    }

    match segment.polarity {
        Polarity::Positive => Number::new(segment.lane * TILE_SIZE) - tuning.perp_offset,
        Polarity::Negative => Number::new((segment.lane + 1) * TILE_SIZE) + tuning.perp_offset,
    }
}

fn trim(end: SegmentEnd, face_offset: Number, corner_radius: Number) -> Number {
    match end {
        // extend a full tile past the room border so rooms never seam
        SegmentEnd::RoomEdge => Number::new(TILE_SIZE),
        // out to the abutting face, then back in to the rounded-corner
        // tangent point
        SegmentEnd::Corner | SegmentEnd::Ankle => face_offset - corner_radius,
        // the neighbouring terrain's run starts exactly here
        SegmentEnd::Boundary => Number::new(0),
    }
}

/// Steps `line` by `amount` perpendicular to the lane, into the solid side.
fn into_solid(line: Number, amount: Number, polarity: Polarity) -> Number {
    match polarity {
        Polarity::Positive => line + amount,
        Polarity::Negative => line - amount,
    }
}

pub fn convert_segment(
    segment: &BoundarySegment,
    tileset: &TileSet,
    tag: TagIndex,
) -> CollisionShape {
    let tuning = tuning(segment, tileset);
    let line = face_line(segment, &tuning);

    let start = Number::new(segment.span_start * TILE_SIZE)
        - trim(segment.start_kind, tuning.start_offset, tuning.corner_radius);
    let end = Number::new(segment.span_end * TILE_SIZE)
        + trim(segment.end_kind, tuning.end_offset, tuning.corner_radius);

    if segment.semi {
        let radius = Number::new(PLATFORM_RADIUS);
        let centre = into_solid(line, radius, segment.polarity);

        return CollisionShape {
            kind: ShapeKind::Segment {
                a: pt(segment.axis, start, centre),
                b: pt(segment.axis, end, centre),
                radius,
            },
            tag,
        };
    }

    let radius = tuning.corner_radius;

    // deliberate threshold: wide roundings become capsules, everything else
    // a bevelled quad
    if radius > Number::new(TILE_SIZE / 4) {
        let centre = into_solid(line, radius, segment.polarity);

        return CollisionShape {
            kind: ShapeKind::Segment {
                a: pt(segment.axis, start, centre),
                b: pt(segment.axis, end, centre),
                radius,
            },
            tag,
        };
    }

    let base = into_solid(line, Number::new(TILE_SIZE / 2), segment.polarity);
    let bevel = |end: SegmentEnd| match end {
        SegmentEnd::Corner | SegmentEnd::Ankle => radius,
        SegmentEnd::Boundary | SegmentEnd::RoomEdge => Number::new(0),
    };

    CollisionShape {
        kind: ShapeKind::Polygon {
            points: vec![
                pt(segment.axis, start, line),
                pt(segment.axis, end, line),
                pt(segment.axis, end + bevel(segment.end_kind), base),
                pt(segment.axis, start - bevel(segment.start_kind), base),
            ],
        },
        tag,
    }
}
