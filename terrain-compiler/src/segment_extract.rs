//! Scan-line boundary extraction.
//!
//! Each pass walks the grid one lane at a time (rows for the horizontal
//! pass, columns for the vertical one) and maintains at most one open
//! boundary run per lane. Every tile feeds a transition function that
//! decides whether the run opens, continues, closes, or closes and reopens
//! in place. Close must always happen before reopen, otherwise a
//! terrain-to-terrain transition would emit a zero-length segment.

use crate::tileset::{semi_terrain, TileCategory, TileGrid, TileRef};
use util::Facing;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn lane_count(self, grid: &TileGrid) -> i32 {
        match self {
            Axis::Horizontal => grid.height(),
            Axis::Vertical => grid.width(),
        }
    }

    pub fn span_length(self, grid: &TileGrid) -> i32 {
        match self {
            Axis::Horizontal => grid.width(),
            Axis::Vertical => grid.height(),
        }
    }

    pub fn cell(self, lane: i32, pos: i32) -> (i32, i32) {
        match self {
            Axis::Horizontal => (pos, lane),
            Axis::Vertical => (lane, pos),
        }
    }
}

/// Which side of the boundary is solid, in lane-perpendicular terms:
/// `Positive` means the solid region lies toward growing perpendicular
/// coordinates (below an upper surface, right of a left wall).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Polarity {
    Positive,
    Negative,
}

/// How a boundary run terminated (or started) at one of its two ends.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SegmentEnd {
    /// A different terrain id follows immediately.
    Boundary,
    /// The same terrain continues but the blob role changes; an interior
    /// corner.
    Ankle,
    /// A rounded corner blob of the run's own terrain.
    Corner,
    /// The lane ran out at the edge of the room.
    RoomEdge,
}

/// One extracted boundary run, still in tile units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BoundarySegment {
    pub axis: Axis,
    pub lane: i32,
    /// Tile span along the lane, `start` inclusive, `end` exclusive.
    pub span_start: i32,
    pub span_end: i32,
    pub start_kind: SegmentEnd,
    pub end_kind: SegmentEnd,
    pub polarity: Polarity,
    pub semi: bool,
    pub terrain: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum TileClass {
    /// Corner blob (or platform cap) that begins a boundary along this
    /// axis. Opens unconditionally, closing any run already open.
    Open(Polarity),
    /// Edge blob that continues an open run, or starts one at a lane edge.
    Run(Polarity),
    /// Corner blob that terminates a matching run, rounding included.
    Close(Polarity),
    /// Terrain tile with no boundary along this axis (interior, or a face
    /// the other pass owns).
    Body,
    /// No terrain here.
    Empty,
}

#[derive(Clone, Copy, Debug)]
struct Classified {
    class: TileClass,
    semi: bool,
    terrain: u8,
}

fn classify(axis: Axis, tile: TileRef) -> Classified {
    use TileCategory as C;
    use TileClass::*;

    let class = match axis {
        Axis::Horizontal => match tile.category {
            C::TopLeft => Open(Polarity::Positive),
            C::Top => Run(Polarity::Positive),
            C::TopRight => Close(Polarity::Positive),
            C::BottomLeft => Open(Polarity::Negative),
            C::Bottom => Run(Polarity::Negative),
            C::BottomRight => Close(Polarity::Negative),
            C::Left | C::Center | C::Right => Body,
            C::SemiLeft | C::SemiMid | C::SemiRight => {
                let polarity = match semi_terrain(tile.index).facing {
                    Facing::Up => Polarity::Positive,
                    Facing::Down => Polarity::Negative,
                    // the built-in table never yields these
                    Facing::Left | Facing::Right => return empty(),
                };

                match tile.category {
                    C::SemiLeft => Open(polarity),
                    C::SemiMid => Run(polarity),
                    _ => Close(polarity),
                }
            }
            C::None | C::SingleObject => Empty,
        },
        Axis::Vertical => match tile.category {
            C::TopLeft => Open(Polarity::Positive),
            C::Left => Run(Polarity::Positive),
            C::BottomLeft => Close(Polarity::Positive),
            C::TopRight => Open(Polarity::Negative),
            C::Right => Run(Polarity::Negative),
            C::BottomRight => Close(Polarity::Negative),
            C::Top | C::Center | C::Bottom => Body,
            // one-way platforms only ever face up or down
            C::SemiLeft | C::SemiMid | C::SemiRight => Empty,
            C::None | C::SingleObject => Empty,
        },
    };

    Classified {
        class,
        semi: matches!(
            tile.category,
            C::SemiLeft | C::SemiMid | C::SemiRight
        ),
        terrain: tile.index,
    }
}

fn empty() -> Classified {
    Classified {
        class: TileClass::Empty,
        semi: false,
        terrain: 0,
    }
}

#[derive(Clone, Copy, Debug)]
struct Run {
    polarity: Polarity,
    semi: bool,
    terrain: u8,
    span_start: i32,
    start_kind: SegmentEnd,
}

/// What one tile does to the lane's run state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Action {
    Open(SegmentEnd),
    Continue,
    Close { kind: SegmentEnd, inclusive: bool },
    CloseAndReopen { close: SegmentEnd, reopen: SegmentEnd },
    Idle,
}

fn open_kind(pos: i32) -> SegmentEnd {
    // an edge blob with nothing open is only well formed at the lane start
    if pos == 0 {
        SegmentEnd::RoomEdge
    } else {
        SegmentEnd::Boundary
    }
}

fn close_kind(run: &Run, tile: &Classified) -> SegmentEnd {
    if tile.semi == run.semi && tile.terrain == run.terrain {
        SegmentEnd::Ankle
    } else {
        SegmentEnd::Boundary
    }
}

fn transition(run: Option<&Run>, tile: &Classified, pos: i32) -> Action {
    let Some(run) = run else {
        return match tile.class {
            TileClass::Open(_) => Action::Open(SegmentEnd::Corner),
            TileClass::Run(_) | TileClass::Close(_) => Action::Open(open_kind(pos)),
            TileClass::Body | TileClass::Empty => Action::Idle,
        };
    };

    let matches_run = |polarity| {
        polarity == run.polarity && tile.semi == run.semi && tile.terrain == run.terrain
    };

    match tile.class {
        TileClass::Run(polarity) if matches_run(polarity) => Action::Continue,
        TileClass::Close(polarity) if matches_run(polarity) => Action::Close {
            kind: SegmentEnd::Corner,
            inclusive: true,
        },
        TileClass::Open(_) => Action::CloseAndReopen {
            close: close_kind(run, tile),
            reopen: SegmentEnd::Corner,
        },
        TileClass::Run(_) | TileClass::Close(_) => {
            let close = close_kind(run, tile);

            if close == SegmentEnd::Boundary {
                // a different terrain takes over in this very tile
                Action::CloseAndReopen {
                    close,
                    reopen: SegmentEnd::Boundary,
                }
            } else {
                Action::Close {
                    kind: close,
                    inclusive: false,
                }
            }
        }
        TileClass::Body => Action::Close {
            kind: close_kind(run, tile),
            inclusive: false,
        },
        TileClass::Empty => Action::Close {
            kind: SegmentEnd::Ankle,
            inclusive: false,
        },
    }
}

fn class_polarity(class: TileClass) -> Polarity {
    match class {
        TileClass::Open(p) | TileClass::Run(p) | TileClass::Close(p) => p,
        TileClass::Body | TileClass::Empty => unreachable!("no run opens on these"),
    }
}

/// Walks every lane of `grid` along `axis` and returns the boundary runs in
/// lane-then-span order.
pub fn extract_segments(grid: &TileGrid, axis: Axis) -> Vec<BoundarySegment> {
    let mut segments = Vec::new();
    let span_length = axis.span_length(grid);

    for lane in 0..axis.lane_count(grid) {
        let mut run: Option<Run> = None;

        let mut emit = |run: Run, span_end: i32, end_kind: SegmentEnd| {
            debug_assert!(span_end > run.span_start, "zero-length boundary run");

            segments.push(BoundarySegment {
                axis,
                lane,
                span_start: run.span_start,
                span_end,
                start_kind: run.start_kind,
                end_kind,
                polarity: run.polarity,
                semi: run.semi,
                terrain: run.terrain,
            });
        };

        for pos in 0..span_length {
            let (x, y) = axis.cell(lane, pos);
            let tile = classify(axis, grid.get(x, y));

            match transition(run.as_ref(), &tile, pos) {
                Action::Idle | Action::Continue => {}
                Action::Open(start_kind) => {
                    run = Some(Run {
                        polarity: class_polarity(tile.class),
                        semi: tile.semi,
                        terrain: tile.terrain,
                        span_start: pos,
                        start_kind,
                    });
                }
                Action::Close { kind, inclusive } => {
                    let closed = run.take().expect("close without an open run");
                    emit(closed, if inclusive { pos + 1 } else { pos }, kind);
                }
                Action::CloseAndReopen { close, reopen } => {
                    let closed = run.take().expect("close without an open run");
                    emit(closed, pos, close);

                    run = Some(Run {
                        polarity: class_polarity(tile.class),
                        semi: tile.semi,
                        terrain: tile.terrain,
                        span_start: pos,
                        start_kind: reopen,
                    });
                }
            }
        }

        if let Some(open) = run.take() {
            emit(open, span_length, SegmentEnd::RoomEdge);
        }
    }

    segments
}
