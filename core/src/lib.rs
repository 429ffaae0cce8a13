#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the castle maze generator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative castle world, and pure systems. Systems emit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually happened. Rendering adapters only ever read the identifiers,
//! coordinates and records declared here.

use serde::{Deserialize, Serialize};

/// Commands that express all permissible castle mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the castle with fresh room grids, walls and candidate routes.
    ConfigureGrid {
        /// Number of lower-level room columns.
        columns: u32,
        /// Number of lower-level room rows.
        rows: u32,
        /// Seed for the random source used when anchoring features.
        placement_seed: u64,
    },
    /// Requests that a feature be allocated and finished somewhere on the grid.
    PlaceFeature {
        /// Feature to place, including its footprint.
        request: FeatureRequest,
        /// Retry budget and border margin used while searching for an anchor.
        placement: Placement,
    },
    /// Offers the routes behind the provided passages to the topology, one at a time.
    OfferPassages {
        /// Passages in the order they should be offered.
        passages: Vec<WallPassage>,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the room grids and walls were rebuilt.
    GridConfigured {
        /// Number of lower-level room columns.
        columns: u32,
        /// Number of lower-level room rows.
        rows: u32,
        /// Number of walls separating adjacent lower rooms.
        walls: u32,
    },
    /// Confirms that a feature was placed.
    FeaturePlaced {
        /// Immutable record describing the placed feature.
        record: FeatureRecord,
    },
    /// Reports that a feature could not be placed within its retry budget.
    FeatureSkipped {
        /// Kind of feature that was omitted.
        kind: FeatureKind,
    },
    /// Confirms that an offered passage was accepted into the maze.
    PassageOpened {
        /// Passage whose route became active.
        passage: WallPassage,
    },
}

/// Unique identifier assigned to a room on either floor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of the room inside dense per-room storage.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier assigned to a wall.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the wall identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Level of the castle a room belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Floor {
    /// Ground level, one room per grid cell.
    Lower,
    /// Roof walkway level, one room per grid corner.
    Upper,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the two rectangles share at least one cell.
    #[must_use]
    pub fn overlaps(&self, other: &CellRect) -> bool {
        let left = self.origin.column().max(other.origin.column());
        let top = self.origin.row().max(other.origin.row());
        let right = (self.origin.column() + self.size.width())
            .min(other.origin.column() + other.size.width());
        let bottom = (self.origin.row() + self.size.height())
            .min(other.origin.row() + other.size.height());
        left < right && top < bottom
    }

    /// Geometric centre of the rectangle in cell units.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (
            self.origin.column() as f32 + self.size.width() as f32 / 2.0,
            self.origin.row() as f32 + self.size.height() as f32 / 2.0,
        )
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Cardinal directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
    ];

    /// Unit step `(column, row)` pointing in this direction.
    #[must_use]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Axis a wall runs along, as seen from above.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum WallDimension {
    /// Wall separating rooms that differ in row; it runs along the x axis.
    X,
    /// Wall separating rooms that differ in column; it runs along the y axis.
    Y,
}

/// Visual category a wall renders as, derived from connectivity state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallCategory {
    /// Solid on both levels.
    Block,
    /// Solid below, walkable above.
    Wall,
    /// Open passage below.
    Open,
    /// Open passage below carrying a walkway above.
    Arch,
}

/// Category paired with the dimension of the wall it applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallState {
    /// Visual category of the wall.
    pub category: WallCategory,
    /// Axis the wall runs along.
    pub dimension: WallDimension,
}

impl WallState {
    /// Creates a new wall state.
    #[must_use]
    pub const fn new(category: WallCategory, dimension: WallDimension) -> Self {
        Self {
            category,
            dimension,
        }
    }

    /// Canonical lowercase name such as `archx` or `blocky`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match (self.category, self.dimension) {
            (WallCategory::Block, WallDimension::X) => "blockx",
            (WallCategory::Block, WallDimension::Y) => "blocky",
            (WallCategory::Wall, WallDimension::X) => "wallx",
            (WallCategory::Wall, WallDimension::Y) => "wally",
            (WallCategory::Open, WallDimension::X) => "openx",
            (WallCategory::Open, WallDimension::Y) => "openy",
            (WallCategory::Arch, WallDimension::X) => "archx",
            (WallCategory::Arch, WallDimension::Y) => "archy",
        }
    }
}

/// One level of a wall: the route between the two rooms it separates on a floor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WallPassage {
    /// Wall owning the route.
    pub wall: WallId,
    /// Floor the route connects rooms on.
    pub floor: Floor,
}

impl WallPassage {
    /// Creates a new passage descriptor.
    #[must_use]
    pub const fn new(wall: WallId, floor: Floor) -> Self {
        Self { wall, floor }
    }
}

/// Kinds of features that can be placed into the castle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Open-air yard; walkable below, no roof above.
    Courtyard,
    /// Solid block rising through both levels.
    Tower,
    /// Decorative 2x2 spire over a walkable base.
    Spire,
    /// Staircase joining a lower footprint to one upper room.
    Stair,
}

/// Description of a feature to place, before an anchor is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureRequest {
    /// Courtyard with the provided lower footprint.
    Courtyard {
        /// Footprint measured in lower rooms.
        size: CellRectSize,
    },
    /// Tower with the provided lower footprint.
    Tower {
        /// Footprint measured in lower rooms.
        size: CellRectSize,
    },
    /// Spire with its fixed 2x2 footprint.
    Spire,
    /// Stair climbing toward the provided direction.
    Stair {
        /// Direction the stair ascends toward.
        direction: Direction,
    },
}

impl FeatureRequest {
    /// Kind of the requested feature.
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        match self {
            Self::Courtyard { .. } => FeatureKind::Courtyard,
            Self::Tower { .. } => FeatureKind::Tower,
            Self::Spire => FeatureKind::Spire,
            Self::Stair { .. } => FeatureKind::Stair,
        }
    }

    /// Lower-level footprint of the requested feature.
    #[must_use]
    pub const fn footprint(&self) -> CellRectSize {
        match self {
            Self::Courtyard { size } | Self::Tower { size } => *size,
            Self::Spire => CellRectSize::new(2, 2),
            Self::Stair { direction } => match direction {
                Direction::North | Direction::South => CellRectSize::new(2, 1),
                Direction::East | Direction::West => CellRectSize::new(1, 2),
            },
        }
    }

    /// Whether the feature claims an upper footprint one ring wider than its base.
    #[must_use]
    pub const fn extends_upper(&self) -> bool {
        matches!(self, Self::Tower { .. })
    }
}

/// Search parameters used when anchoring a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Number of additional attempts after the first failed anchor.
    pub retries: u32,
    /// Number of cells kept free along every edge of the grid.
    pub margin: u32,
}

impl Placement {
    /// Creates a new placement descriptor.
    #[must_use]
    pub const fn new(retries: u32, margin: u32) -> Self {
        Self { retries, margin }
    }
}

/// Immutable record of a placed feature, kept for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Kind of the placed feature.
    pub kind: FeatureKind,
    /// Lower-level region anchored at the chosen cell.
    pub region: CellRect,
    /// Climbing direction, present for stairs only.
    pub direction: Option<Direction>,
}

impl FeatureRecord {
    /// Creates a new feature record.
    #[must_use]
    pub const fn new(kind: FeatureKind, region: CellRect, direction: Option<Direction>) -> Self {
        Self {
            kind,
            region,
            direction,
        }
    }
}
