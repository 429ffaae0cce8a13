//! Dense storage for the rooms of both castle levels.

use castle_maze_core::{CellCoord, Floor, RoomId};

/// Single room on one floor of the castle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    floor: Floor,
    cell: CellCoord,
    blocked: bool,
    featured: bool,
}

impl Room {
    fn new(id: RoomId, floor: Floor, cell: CellCoord) -> Self {
        Self {
            id,
            floor,
            cell,
            blocked: false,
            featured: false,
        }
    }

    /// Identifier of the room.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Floor the room belongs to.
    #[must_use]
    pub const fn floor(&self) -> Floor {
        self.floor
    }

    /// Grid coordinate of the room on its floor.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Whether a feature turned the room solid.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Whether a placed feature already claims the room.
    #[must_use]
    pub const fn is_featured(&self) -> bool {
        self.featured
    }

    /// Reports whether both rooms share a floor and an edge.
    #[must_use]
    pub fn is_adjacent(&self, other: &Room) -> bool {
        self.floor == other.floor && self.cell.manhattan_distance(other.cell) == 1
    }

    pub(crate) fn block(&mut self) {
        self.blocked = true;
    }

    pub(crate) fn claim(&mut self) {
        self.featured = true;
    }
}

/// Lower rooms on a `columns x rows` grid followed by upper rooms on the
/// `(columns + 1) x (rows + 1)` corner grid, each stored column-major.
#[derive(Clone, Debug)]
pub(crate) struct RoomGrid {
    columns: u32,
    rows: u32,
    rooms: Vec<Room>,
}

impl RoomGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let lower = columns as usize * rows as usize;
        let upper = (columns as usize + 1) * (rows as usize + 1);
        let mut rooms = Vec::with_capacity(lower + upper);

        for (floor, width, height) in [
            (Floor::Lower, columns, rows),
            (Floor::Upper, columns + 1, rows + 1),
        ] {
            for column in 0..width {
                for row in 0..height {
                    let id = RoomId::new(
                        u32::try_from(rooms.len()).expect("room count exceeds u32 identifiers"),
                    );
                    rooms.push(Room::new(id, floor, CellCoord::new(column, row)));
                }
            }
        }

        Self {
            columns,
            rows,
            rooms,
        }
    }

    pub(crate) fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) fn len(&self) -> usize {
        self.rooms.len()
    }

    pub(crate) fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Lower room at the provided cell.
    ///
    /// Panics when the cell lies outside the lower grid.
    pub(crate) fn lower(&self, column: u32, row: u32) -> RoomId {
        assert!(
            column < self.columns && row < self.rows,
            "lower room ({column}, {row}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        RoomId::new(column * self.rows + row)
    }

    /// Upper room at the provided corner.
    ///
    /// Panics when the corner lies outside the upper grid.
    pub(crate) fn upper(&self, column: u32, row: u32) -> RoomId {
        assert!(
            column <= self.columns && row <= self.rows,
            "upper room ({column}, {row}) outside {}x{} corner grid",
            self.columns + 1,
            self.rows + 1
        );
        RoomId::new(self.columns * self.rows + column * (self.rows + 1) + row)
    }

    pub(crate) fn get(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: RoomId) -> &mut Room {
        &mut self.rooms[id.index()]
    }

    pub(crate) fn any_blocked(&self, rooms: &[RoomId]) -> bool {
        rooms.iter().any(|&room| self.get(room).is_blocked())
    }

    pub(crate) fn any_featured(&self, rooms: &[RoomId]) -> bool {
        rooms.iter().any(|&room| self.get(room).is_featured())
    }
}
