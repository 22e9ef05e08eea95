use nalgebra::Vector2;
use thiserror::Error;
use util::{Attribute, Facing, Number};

/// Role a cell plays in the auto-tiled terrain, or what else occupies it.
///
/// The nine blob roles describe where on a solid region the tile sits; the
/// three platform roles are the caps and middle of a one-sided platform.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileCategory {
    None,
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    SemiLeft,
    SemiMid,
    SemiRight,
    SingleObject,
}

/// Per-cell reference into the tile-set's definition tables.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileRef {
    pub category: TileCategory,
    pub index: u8,
}

impl TileRef {
    pub const NONE: TileRef = TileRef {
        category: TileCategory::None,
        index: 0,
    };

    pub fn new(category: TileCategory, index: u8) -> Self {
        Self { category, index }
    }
}

/// The room's cell grid. Cells outside the grid read as [`TileRef::NONE`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TileGrid {
    width: i32,
    height: i32,
    cells: Vec<TileRef>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0);

        Self {
            width,
            height,
            cells: vec![TileRef::NONE; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> TileRef {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return TileRef::NONE;
        }

        self.cells[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: i32, y: i32, tile: TileRef) {
        assert!(x >= 0 && y >= 0 && x < self.width && y < self.height);

        self.cells[(y * self.width + x) as usize] = tile;
    }
}

/// Signed sub-tile outsets of a terrain's faces plus its corner rounding.
/// Positive values push the face away from the solid region.
#[derive(Clone, Copy, Debug)]
pub struct PhysicalParameters {
    pub upper_offset: f32,
    pub lower_offset: f32,
    pub left_offset: f32,
    pub right_offset: f32,
    pub corner_radius: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TerrainDef {
    pub tag: Attribute,
    pub upper_offset: Number,
    pub lower_offset: Number,
    pub left_offset: Number,
    pub right_offset: Number,
    pub corner_radius: Number,
}

impl TerrainDef {
    pub fn new(tag: Attribute, params: PhysicalParameters) -> Self {
        Self {
            tag,
            upper_offset: Number::from_f32(params.upper_offset),
            lower_offset: Number::from_f32(params.lower_offset),
            left_offset: Number::from_f32(params.left_offset),
            right_offset: Number::from_f32(params.right_offset),
            corner_radius: Number::from_f32(params.corner_radius),
        }
    }
}

/// One-sided platform behaviour, derived from the tile index alone.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SemiTerrain {
    pub facing: Facing,
    /// Drops the walkable surface half a tile into the cell.
    pub half_tile: bool,
}

const SEMI_TERRAINS: [SemiTerrain; 4] = [
    SemiTerrain {
        facing: Facing::Up,
        half_tile: false,
    },
    SemiTerrain {
        facing: Facing::Up,
        half_tile: true,
    },
    SemiTerrain {
        facing: Facing::Down,
        half_tile: false,
    },
    SemiTerrain {
        facing: Facing::Down,
        half_tile: true,
    },
];

pub fn semi_terrain(index: u8) -> SemiTerrain {
    SEMI_TERRAINS[index as usize % SEMI_TERRAINS.len()]
}

/// Shape descriptor local to a single object's cell, in authored pixels.
#[derive(Clone, Debug)]
pub enum LocalShape {
    /// Capsule inscribed in the rect along its longer axis: the endpoints
    /// pull in from the two short sides by `radius`.
    Rect {
        min: Vector2<f32>,
        max: Vector2<f32>,
        radius: f32,
    },
    Circle {
        center: Vector2<f32>,
        radius: f32,
    },
    Segment {
        a: Vector2<f32>,
        b: Vector2<f32>,
        radius: f32,
    },
    Polygon { points: Vec<Vector2<f32>> },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CrumbleTiming {
    /// Seconds from first contact until the tile breaks apart.
    pub wait: Number,
    /// Seconds the break-up lasts before the shape is removed.
    pub crumble: Number,
    /// Edge length of the decorative debris pieces, in pixels.
    pub piece_size: Number,
}

#[derive(Clone, Debug)]
pub struct SingleObjectDef {
    pub tag: Attribute,
    /// Present exactly when `tag` is [`Attribute::Crumbling`].
    pub crumble: Option<CrumbleTiming>,
    pub shapes: Vec<LocalShape>,
}

#[derive(Debug, Error)]
pub enum TileSetError {
    #[error("terrain {index} has tag {tag:?}, only Solid and NoWalljump are allowed")]
    TerrainTag { index: usize, tag: Attribute },
    #[error("single object {index} is tagged Crumbling but has no crumble timing")]
    MissingCrumbleTiming { index: usize },
    #[error("single object {index} has crumble timing but is tagged {tag:?}")]
    UnexpectedCrumbleTiming { index: usize, tag: Attribute },
}

/// Static description of a tile-set, shared read-only across rooms.
/// Construction rejects authoring errors before any extraction runs.
#[derive(Clone, Debug)]
pub struct TileSet {
    terrains: Vec<TerrainDef>,
    objects: Vec<SingleObjectDef>,
}

impl TileSet {
    pub fn new(
        terrains: Vec<TerrainDef>,
        objects: Vec<SingleObjectDef>,
    ) -> Result<Self, TileSetError> {
        for (index, terrain) in terrains.iter().enumerate() {
            if !matches!(terrain.tag, Attribute::Solid | Attribute::NoWalljump) {
                return Err(TileSetError::TerrainTag {
                    index,
                    tag: terrain.tag,
                });
            }
        }

        for (index, object) in objects.iter().enumerate() {
            match (object.tag, &object.crumble) {
                (Attribute::Crumbling, None) => {
                    return Err(TileSetError::MissingCrumbleTiming { index })
                }
                (tag, Some(_)) if tag != Attribute::Crumbling => {
                    return Err(TileSetError::UnexpectedCrumbleTiming { index, tag })
                }
                _ => {}
            }
        }

        Ok(Self { terrains, objects })
    }

    /// Caller contract: `index` comes from a grid authored against this
    /// tile-set. Out-of-range indices are a programmer error.
    pub fn terrain(&self, index: u8) -> &TerrainDef {
        &self.terrains[index as usize]
    }

    pub fn object(&self, index: u8) -> &SingleObjectDef {
        &self.objects[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_params() -> PhysicalParameters {
        PhysicalParameters {
            upper_offset: 0.,
            lower_offset: 0.,
            left_offset: 0.,
            right_offset: 0.,
            corner_radius: 0.,
        }
    }

    #[test]
    fn rejects_non_terrain_tags() {
        let terrain = TerrainDef::new(Attribute::Crumbling, flat_params());

        assert!(matches!(
            TileSet::new(vec![terrain], vec![]),
            Err(TileSetError::TerrainTag { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_crumbling_object_without_timing() {
        let object = SingleObjectDef {
            tag: Attribute::Crumbling,
            crumble: None,
            shapes: vec![],
        };

        assert!(matches!(
            TileSet::new(vec![], vec![object]),
            Err(TileSetError::MissingCrumbleTiming { index: 0 })
        ));
    }

    #[test]
    fn rejects_timing_on_non_crumbling_object() {
        let object = SingleObjectDef {
            tag: Attribute::Solid,
            crumble: Some(CrumbleTiming {
                wait: Number::new(1),
                crumble: Number::new(1),
                piece_size: Number::new(4),
            }),
            shapes: vec![],
        };

        assert!(matches!(
            TileSet::new(vec![], vec![object]),
            Err(TileSetError::UnexpectedCrumbleTiming { index: 0, .. })
        ));
    }

    #[test]
    fn accepts_valid_definitions() {
        let terrains = vec![
            TerrainDef::new(Attribute::Solid, flat_params()),
            TerrainDef::new(Attribute::NoWalljump, flat_params()),
        ];

        assert!(TileSet::new(terrains, vec![]).is_ok());
    }

    #[test]
    fn out_of_grid_cells_read_as_none() {
        let grid = TileGrid::new(4, 4);

        assert_eq!(grid.get(-1, 0), TileRef::NONE);
        assert_eq!(grid.get(0, 4), TileRef::NONE);
    }

    #[test]
    fn semi_terrain_lookup_wraps() {
        assert_eq!(semi_terrain(0), semi_terrain(4));
        assert_eq!(semi_terrain(0).facing, Facing::Up);
        assert!(!semi_terrain(0).half_tile);
        assert!(semi_terrain(1).half_tile);
    }
}
