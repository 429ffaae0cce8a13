//! Walls separating neighbouring rooms and the table deriving how they render.

use std::collections::BTreeMap;

use castle_maze_core::{
    CellCoord, Floor, RoomId, WallCategory, WallDimension, WallId, WallPassage, WallState,
};
use castle_maze_topology::{Route, RouteId, Topology};

use crate::rooms::RoomGrid;

/// Payload attached to every route stored in the castle topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteTag {
    /// Route owned by one level of a wall.
    Wall(WallPassage),
    /// Hyperedge spliced in by a stair, joining its lower rooms to a landing.
    Stair,
}

/// Wall between two lower rooms and the two upper rooms straddling it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wall {
    id: WallId,
    dimension: WallDimension,
    position: CellCoord,
    lower: RouteId,
    upper: RouteId,
    lower_rooms: [RoomId; 2],
    upper_rooms: [RoomId; 2],
}

impl Wall {
    /// Identifier of the wall.
    #[must_use]
    pub const fn id(&self) -> WallId {
        self.id
    }

    /// Axis the wall runs along.
    #[must_use]
    pub const fn dimension(&self) -> WallDimension {
        self.dimension
    }

    /// Grid position of the wall, expressed on the corner lattice.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Route joining the lower rooms on either side of the wall.
    #[must_use]
    pub const fn lower(&self) -> RouteId {
        self.lower
    }

    /// Route joining the upper rooms along the top of the wall.
    #[must_use]
    pub const fn upper(&self) -> RouteId {
        self.upper
    }

    /// Route owned by the provided level of the wall.
    #[must_use]
    pub const fn route(&self, floor: Floor) -> RouteId {
        match floor {
            Floor::Lower => self.lower,
            Floor::Upper => self.upper,
        }
    }

    /// Rooms joined by the route on the provided level.
    #[must_use]
    pub const fn rooms(&self, floor: Floor) -> [RoomId; 2] {
        match floor {
            Floor::Lower => self.lower_rooms,
            Floor::Upper => self.upper_rooms,
        }
    }

    pub(crate) fn state(&self, rooms: &RoomGrid, topology: &Topology<RouteTag>) -> WallState {
        let category = derive_wall_category(
            rooms.any_blocked(&self.upper_rooms),
            topology.is_active(self.lower),
            topology.is_active(self.upper),
        );
        WallState::new(category, self.dimension)
    }

    /// Passages of this wall worth offering, lower first, skipping any level
    /// that touches a blocked room.
    pub(crate) fn candidate_passages(&self, rooms: &RoomGrid) -> impl Iterator<Item = WallPassage> {
        let lower = (!rooms.any_blocked(&self.lower_rooms))
            .then_some(WallPassage::new(self.id, Floor::Lower));
        let upper = (!rooms.any_blocked(&self.upper_rooms))
            .then_some(WallPassage::new(self.id, Floor::Upper));
        lower.into_iter().chain(upper)
    }
}

/// Maps the connectivity around a wall to the category it renders as.
///
/// A blocked upper room means there is no walkway to draw, so only the lower
/// route matters.
#[must_use]
pub fn derive_wall_category(
    upper_blocked: bool,
    lower_active: bool,
    upper_active: bool,
) -> WallCategory {
    match (upper_blocked, lower_active, upper_active) {
        (true, true, _) => WallCategory::Open,
        (true, false, _) => WallCategory::Wall,
        (false, true, true) => WallCategory::Arch,
        (false, false, true) => WallCategory::Wall,
        (false, true, false) => WallCategory::Open,
        (false, false, false) => WallCategory::Block,
    }
}

/// Builds every wall of the grid and teaches its routes to the topology.
///
/// Y walls (between horizontally adjacent rooms) come first, then X walls,
/// each in column-major order, so identifiers follow a stable layout.
pub(crate) fn build_walls(
    rooms: &RoomGrid,
    topology: &mut Topology<RouteTag>,
) -> BTreeMap<WallId, Wall> {
    let (columns, rows) = (rooms.columns(), rooms.rows());
    let mut layouts = Vec::new();

    for column in 0..columns.saturating_sub(1) {
        for row in 0..rows {
            layouts.push((
                WallDimension::Y,
                CellCoord::new(column + 1, row),
                [rooms.lower(column, row), rooms.lower(column + 1, row)],
                [rooms.upper(column + 1, row), rooms.upper(column + 1, row + 1)],
            ));
        }
    }
    for column in 0..columns {
        for row in 0..rows.saturating_sub(1) {
            layouts.push((
                WallDimension::X,
                CellCoord::new(column, row + 1),
                [rooms.lower(column, row), rooms.lower(column, row + 1)],
                [rooms.upper(column, row + 1), rooms.upper(column + 1, row + 1)],
            ));
        }
    }

    let mut walls = BTreeMap::new();
    let mut taught = Vec::with_capacity(layouts.len() * 2);
    for (index, (dimension, position, lower_rooms, upper_rooms)) in layouts.into_iter().enumerate()
    {
        let id = WallId::new(u32::try_from(index).expect("wall count exceeds u32 identifiers"));
        let lower = topology.add(Route::new(
            lower_rooms,
            RouteTag::Wall(WallPassage::new(id, Floor::Lower)),
        ));
        let upper = topology.add(Route::new(
            upper_rooms,
            RouteTag::Wall(WallPassage::new(id, Floor::Upper)),
        ));
        taught.push(lower);
        taught.push(upper);

        let _ = walls.insert(
            id,
            Wall {
                id,
                dimension,
                position,
                lower,
                upper,
                lower_rooms,
                upper_rooms,
            },
        );
    }
    topology.teach(&taught);

    walls
}
