//! Retry-bounded placement of rectangular features onto the room grids.

use castle_maze_core::{CellCoord, CellRectSize, Placement, RoomId};
use rand::Rng;
use tracing::trace;

use crate::rooms::RoomGrid;

/// Rooms claimed by a successful allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Allocation {
    /// Lower cell the footprint is anchored at.
    pub(crate) anchor: CellCoord,
    /// Lower rooms of the footprint, column-major.
    pub(crate) lower: Vec<RoomId>,
    /// Upper rooms claimed alongside the footprint, column-major.
    pub(crate) upper: Vec<RoomId>,
}

/// Claims non-overlapping rectangles by marking rooms as featured.
#[derive(Debug)]
pub(crate) struct FeatureAllocator<'a> {
    rooms: &'a mut RoomGrid,
}

impl<'a> FeatureAllocator<'a> {
    pub(crate) fn new(rooms: &'a mut RoomGrid) -> Self {
        Self { rooms }
    }

    /// Attempts to claim `footprint` up to `placement.retries + 1` times.
    ///
    /// Ordinary features claim the upper corners strictly inside the
    /// footprint. With `extend_upper` the anchor range shrinks by one cell and
    /// the upper claim grows to the corners surrounding the footprint plus one
    /// further ring toward increasing coordinates.
    pub(crate) fn allocate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        footprint: CellRectSize,
        placement: Placement,
        extend_upper: bool,
    ) -> Option<Allocation> {
        let outset = u32::from(extend_upper);
        let margin = placement.margin;
        let max_column = anchor_limit(self.rooms.columns(), footprint.width(), outset, margin)?;
        let max_row = anchor_limit(self.rooms.rows(), footprint.height(), outset, margin)?;

        for attempt in 0..=placement.retries {
            let column = rng.gen_range(margin..=max_column);
            let row = rng.gen_range(margin..=max_row);

            let lower: Vec<RoomId> = (0..footprint.width())
                .flat_map(|dx| (0..footprint.height()).map(move |dy| (dx, dy)))
                .map(|(dx, dy)| self.rooms.lower(column + dx, row + dy))
                .collect();
            let upper: Vec<RoomId> = (1 - outset..footprint.width() + 2 * outset)
                .flat_map(|dx| (1 - outset..footprint.height() + 2 * outset).map(move |dy| (dx, dy)))
                .map(|(dx, dy)| self.rooms.upper(column + dx, row + dy))
                .collect();

            if self.rooms.any_featured(&lower) || self.rooms.any_featured(&upper) {
                trace!(attempt, column, row, "feature anchor overlaps an earlier feature");
                continue;
            }

            for &room in lower.iter().chain(&upper) {
                self.rooms.get_mut(room).claim();
            }
            return Some(Allocation {
                anchor: CellCoord::new(column, row),
                lower,
                upper,
            });
        }

        None
    }
}

fn anchor_limit(extent: u32, size: u32, outset: u32, margin: u32) -> Option<u32> {
    let reserved = size.checked_add(outset)?.checked_add(margin)?;
    extent
        .checked_sub(reserved)
        .filter(|&limit| limit >= margin)
}
