//! Feature policies run after the allocator claims a footprint.

use std::collections::{BTreeMap, BTreeSet};

use castle_maze_core::{
    CellCoord, CellRect, Direction, FeatureRecord, FeatureRequest, Floor, Placement, RoomId,
    WallId,
};
use castle_maze_topology::{Route, Topology};
use rand::Rng;
use tracing::debug;

use crate::{
    allocator::FeatureAllocator,
    rooms::RoomGrid,
    walls::{build_walls, RouteTag, Wall},
};

/// Mutable castle layout shared by the allocator and the feature policies.
#[derive(Clone, Debug)]
pub(crate) struct Site {
    pub(crate) rooms: RoomGrid,
    pub(crate) walls: BTreeMap<WallId, Wall>,
    pub(crate) topology: Topology<RouteTag>,
}

impl Site {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let rooms = RoomGrid::new(columns, rows);
        let mut topology = Topology::new(rooms.len());
        let walls = build_walls(&rooms, &mut topology);
        Self {
            rooms,
            walls,
            topology,
        }
    }

    /// Allocates the requested feature and applies its policy.
    ///
    /// Returns `None` when no free anchor was found within the retry budget.
    pub(crate) fn place<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        request: FeatureRequest,
        placement: Placement,
    ) -> Option<FeatureRecord> {
        let footprint = request.footprint();
        let Some(allocation) = FeatureAllocator::new(&mut self.rooms).allocate(
            rng,
            footprint,
            placement,
            request.extends_upper(),
        ) else {
            debug!(
                kind = ?request.kind(),
                width = footprint.width(),
                height = footprint.height(),
                retries = placement.retries,
                "feature skipped"
            );
            return None;
        };

        let mut direction = None;
        match request {
            FeatureRequest::Courtyard { .. } => {
                let _ = self.force_lower_interior(&allocation.lower);
                self.block(&allocation.upper);
            }
            FeatureRequest::Tower { .. } => {
                self.block(&allocation.lower);
                self.block(&allocation.upper);
            }
            FeatureRequest::Spire => {
                let _ = self.force_lower_interior(&allocation.lower);
            }
            FeatureRequest::Stair { direction: climb } => {
                for wall in self.force_lower_interior(&allocation.lower) {
                    let _ = self.walls.remove(&wall);
                }
                let (dx, dy) = landing_offset(climb);
                let anchor = allocation.anchor;
                let landing = self
                    .rooms
                    .upper(anchor.column() + dx, anchor.row() + dy);

                let mut rooms = Vec::with_capacity(allocation.lower.len() + 1);
                rooms.push(landing);
                rooms.extend_from_slice(&allocation.lower);
                let stair = self.topology.add(Route::new(rooms, RouteTag::Stair));
                self.topology.force(&[stair]);
                direction = Some(climb);
            }
        }

        let region = CellRect::from_origin_and_size(allocation.anchor, footprint);
        debug!(
            kind = ?request.kind(),
            column = region.origin().column(),
            row = region.origin().row(),
            width = footprint.width(),
            height = footprint.height(),
            "feature placed"
        );
        Some(FeatureRecord::new(request.kind(), region, direction))
    }

    /// Forces the lower route of every wall between adjacent footprint rooms
    /// and reports which walls were used.
    fn force_lower_interior(&mut self, lower: &[RoomId]) -> BTreeSet<WallId> {
        let mut used = BTreeSet::new();
        for (position, &first) in lower.iter().enumerate() {
            for &second in &lower[position + 1..] {
                if !self.rooms.get(first).is_adjacent(self.rooms.get(second)) {
                    continue;
                }
                for route in self.topology.routes_connecting(&[first, second]) {
                    let RouteTag::Wall(passage) = *self.topology.route(route).payload() else {
                        continue;
                    };
                    if passage.floor != Floor::Lower || !self.walls.contains_key(&passage.wall) {
                        continue;
                    }
                    if used.insert(passage.wall) {
                        self.topology.force(&[route]);
                    }
                }
            }
        }
        used
    }

    fn block(&mut self, rooms: &[RoomId]) {
        for &room in rooms {
            self.rooms.get_mut(room).block();
        }
    }

    pub(crate) fn lower_cell(&self, cell: CellCoord) -> Option<RoomId> {
        (cell.column() < self.rooms.columns() && cell.row() < self.rooms.rows())
            .then(|| self.rooms.lower(cell.column(), cell.row()))
    }

    pub(crate) fn upper_cell(&self, cell: CellCoord) -> Option<RoomId> {
        (cell.column() <= self.rooms.columns() && cell.row() <= self.rooms.rows())
            .then(|| self.rooms.upper(cell.column(), cell.row()))
    }
}

/// Offset from a stair's anchor to the upper room it lands on.
pub(crate) fn landing_offset(direction: Direction) -> (u32, u32) {
    match direction {
        Direction::South => (1, 1),
        Direction::East => (1, 1),
        Direction::North => (1, 0),
        Direction::West => (0, 1),
    }
}
