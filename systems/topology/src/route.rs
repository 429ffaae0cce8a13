//! Immutable hyperedges between rooms.

use castle_maze_core::RoomId;

/// Handle to a route stored inside a [`crate::Topology`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(u32);

impl RouteId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("route arena exceeds u32 handles"))
    }

    /// Retrieves the numeric representation of the route handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Candidate connection spanning two or more rooms.
///
/// `quorum` is the number of distinct spaces the rooms must currently span for
/// [`crate::Topology::offer`] to accept the route. It defaults to the number of
/// rooms, which admits the route only when it closes no cycle. A quorum above
/// the room count can never be offered successfully; such routes only become
/// active through [`crate::Topology::force`].
///
/// Rooms must be pairwise distinct. This is a caller precondition and is only
/// checked in debug builds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route<P = ()> {
    rooms: Vec<RoomId>,
    quorum: usize,
    payload: P,
}

impl<P> Route<P> {
    /// Creates a route with the default quorum.
    ///
    /// # Panics
    ///
    /// Panics when fewer than two rooms are provided.
    #[must_use]
    pub fn new(rooms: impl Into<Vec<RoomId>>, payload: P) -> Self {
        let rooms = rooms.into();
        let quorum = rooms.len();
        Self::with_quorum(rooms, quorum, payload)
    }

    /// Creates a route with an explicit quorum.
    ///
    /// # Panics
    ///
    /// Panics when fewer than two rooms are provided.
    #[must_use]
    pub fn with_quorum(rooms: impl Into<Vec<RoomId>>, quorum: usize, payload: P) -> Self {
        let rooms = rooms.into();
        assert!(
            rooms.len() >= 2,
            "a route must span at least two rooms, got {}",
            rooms.len()
        );
        debug_assert!(
            rooms
                .iter()
                .enumerate()
                .all(|(index, room)| !rooms[..index].contains(room)),
            "route rooms must be distinct: {rooms:?}"
        );
        Self {
            rooms,
            quorum,
            payload,
        }
    }

    /// Rooms joined by the route, in construction order.
    #[must_use]
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    /// Minimum number of distinct spaces required for an offer to pass.
    #[must_use]
    pub const fn quorum(&self) -> usize {
        self.quorum
    }

    /// Caller bookkeeping attached to the route.
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }
}
