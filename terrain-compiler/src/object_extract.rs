//! Independent prop shapes. Single objects are never merged: every placed
//! cell instantiates its definition's whole shape list at the cell's world
//! origin.

use agb_fixnum::Vector2D;
use itertools::iproduct;
use nalgebra::Vector2;

use util::{AttributeBuffer, CollisionShape, Number, ShapeKind, TagIndex, TILE_SIZE};

use crate::tileset::{CrumbleTiming, LocalShape, TileCategory, TileGrid, TileSet};

/// A destructible shape waiting for its first contact. Created dormant at
/// extraction time, one per constituent shape rather than per cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CrumblingShape {
    pub grid: (i32, i32),
    pub shape: TagIndex,
    pub timing: CrumbleTiming,
}

fn to_vec(a: Vector2<f32>) -> Vector2D<Number> {
    (Number::from_f32(a.x), Number::from_f32(a.y)).into()
}

/// Total shape count single objects will emit, for sizing the attribute
/// buffer before anything is built.
pub fn count_object_shapes(grid: &TileGrid, tileset: &TileSet) -> usize {
    iproduct!(0..grid.height(), 0..grid.width())
        .map(|(y, x)| {
            let tile = grid.get(x, y);

            if tile.category == TileCategory::SingleObject {
                tileset.object(tile.index).shapes.len()
            } else {
                0
            }
        })
        .sum()
}

fn instantiate(local: &LocalShape, origin: Vector2<f32>) -> ShapeKind {
    match local {
        LocalShape::Rect { min, max, radius } => {
            let min = origin + min;
            let max = origin + max;
            let centre = (min + max) / 2.;

            // capsule along the longer axis, pulled in from the two short
            // sides by the radius
            let (a, b) = if max.x - min.x >= max.y - min.y {
                (
                    Vector2::new(min.x + radius, centre.y),
                    Vector2::new(max.x - radius, centre.y),
                )
            } else {
                (
                    Vector2::new(centre.x, min.y + radius),
                    Vector2::new(centre.x, max.y - radius),
                )
            };

            ShapeKind::Segment {
                a: to_vec(a),
                b: to_vec(b),
                radius: Number::from_f32(*radius),
            }
        }
        LocalShape::Circle { center, radius } => {
            let center = to_vec(origin + center);

            ShapeKind::Segment {
                a: center,
                b: center,
                radius: Number::from_f32(*radius),
            }
        }
        LocalShape::Segment { a, b, radius } => ShapeKind::Segment {
            a: to_vec(origin + a),
            b: to_vec(origin + b),
            radius: Number::from_f32(*radius),
        },
        LocalShape::Polygon { points } => ShapeKind::Polygon {
            points: points.iter().map(|p| to_vec(origin + p)).collect(),
        },
    }
}

/// Emits every placed single object's shapes in grid-scan order, claiming
/// one tag slot per shape and seeding the crumbling registry.
pub fn extract_objects(
    grid: &TileGrid,
    tileset: &TileSet,
    attributes: &mut AttributeBuffer,
    shapes: &mut Vec<CollisionShape>,
    crumbling: &mut Vec<CrumblingShape>,
) {
    for (y, x) in iproduct!(0..grid.height(), 0..grid.width()) {
        let tile = grid.get(x, y);

        if tile.category != TileCategory::SingleObject {
            continue;
        }

        let object = tileset.object(tile.index);
        let origin = Vector2::new((x * TILE_SIZE) as f32, (y * TILE_SIZE) as f32);

        for local in &object.shapes {
            let tag = attributes.push(object.tag);

            shapes.push(CollisionShape {
                kind: instantiate(local, origin),
                tag,
            });

            if let Some(timing) = object.crumble {
                crumbling.push(CrumblingShape {
                    grid: (x, y),
                    shape: tag,
                    timing,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::{SingleObjectDef, TileRef};
    use util::Attribute;

    fn crate_object() -> SingleObjectDef {
        SingleObjectDef {
            tag: Attribute::Solid,
            crumble: None,
            shapes: vec![
                LocalShape::Rect {
                    min: Vector2::new(0., 0.),
                    max: Vector2::new(16., 8.),
                    radius: 2.,
                },
                LocalShape::Circle {
                    center: Vector2::new(8., 12.),
                    radius: 4.,
                },
            ],
        }
    }

    fn crumbling_object() -> SingleObjectDef {
        SingleObjectDef {
            tag: Attribute::Crumbling,
            crumble: Some(CrumbleTiming {
                wait: Number::new(1),
                crumble: Number::new(2),
                piece_size: Number::new(4),
            }),
            shapes: vec![LocalShape::Rect {
                min: Vector2::new(0., 0.),
                max: Vector2::new(16., 16.),
                radius: 1.,
            }],
        }
    }

    fn tileset() -> TileSet {
        TileSet::new(vec![], vec![crate_object(), crumbling_object()]).unwrap()
    }

    fn extract(grid: &TileGrid) -> (Vec<CollisionShape>, AttributeBuffer, Vec<CrumblingShape>) {
        let tileset = tileset();
        let count = count_object_shapes(grid, &tileset);
        let mut attributes = AttributeBuffer::with_capacity(count).unwrap();
        let mut shapes = Vec::new();
        let mut crumbling = Vec::new();

        extract_objects(grid, &tileset, &mut attributes, &mut shapes, &mut crumbling);

        (shapes, attributes, crumbling)
    }

    #[test]
    fn adjacent_identical_objects_stay_independent() {
        let mut grid = TileGrid::new(4, 1);
        grid.set(1, 0, TileRef::new(TileCategory::SingleObject, 0));
        grid.set(2, 0, TileRef::new(TileCategory::SingleObject, 0));

        let (shapes, attributes, _) = extract(&grid);

        assert_eq!(shapes.len(), 4);
        assert_eq!(attributes.len(), 4);

        // every shape owns its own slot
        let tags: Vec<_> = shapes.iter().map(|s| s.tag).collect();
        assert_eq!(tags, vec![TagIndex(0), TagIndex(1), TagIndex(2), TagIndex(3)]);
    }

    #[test]
    fn shapes_translate_by_the_cell_origin() {
        let mut grid = TileGrid::new(4, 4);
        grid.set(2, 1, TileRef::new(TileCategory::SingleObject, 0));

        let (shapes, ..) = extract(&grid);

        let ShapeKind::Segment { a, b, .. } = &shapes[1].kind else {
            panic!("expected the circle capsule");
        };

        assert_eq!(a, b);
        assert_eq!(*a, (Number::new(40), Number::new(28)).into());
    }

    #[test]
    fn rect_capsule_runs_along_the_longer_axis() {
        let mut grid = TileGrid::new(1, 1);
        grid.set(0, 0, TileRef::new(TileCategory::SingleObject, 0));

        let (shapes, ..) = extract(&grid);

        let ShapeKind::Segment { a, b, radius } = &shapes[0].kind else {
            panic!("expected a capsule");
        };

        assert_eq!(*a, (Number::new(2), Number::new(4)).into());
        assert_eq!(*b, (Number::new(14), Number::new(4)).into());
        assert_eq!(*radius, Number::new(2));
    }

    #[test]
    fn crumbling_objects_seed_one_entry_per_shape() {
        let mut grid = TileGrid::new(3, 1);
        grid.set(0, 0, TileRef::new(TileCategory::SingleObject, 1));
        grid.set(2, 0, TileRef::new(TileCategory::SingleObject, 1));

        let (shapes, _, crumbling) = extract(&grid);

        assert_eq!(shapes.len(), 2);
        assert_eq!(crumbling.len(), 2);
        assert_eq!(crumbling[0].grid, (0, 0));
        assert_eq!(crumbling[0].shape, TagIndex(0));
        assert_eq!(crumbling[1].grid, (2, 0));
        assert_eq!(crumbling[1].shape, TagIndex(1));
    }
}
