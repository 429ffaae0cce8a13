#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Connectivity admission engine backing castle maze generation.
//!
//! A [`Topology`] owns one union-find cell per referenced room and an arena of
//! [`Route`] hyperedges. Routes move monotonically from candidate to known
//! ([`Topology::teach`]) to active ([`Topology::offer`] or
//! [`Topology::force`]); nothing is ever untaught or deactivated. Offering
//! single routes in random order over a room graph builds a random spanning
//! forest, generalised to hyperedges through each route's quorum.

use std::collections::{BTreeMap, BTreeSet};

use castle_maze_core::RoomId;

pub mod equivalence;
mod route;

use equivalence::{EquivalenceId, Partition};
pub use route::{Route, RouteId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RouteState {
    Candidate,
    Known,
    Active,
}

#[derive(Clone, Debug)]
struct RouteEntry<P> {
    route: Route<P>,
    state: RouteState,
}

/// Union-find backed registry of known and active routes.
#[derive(Clone, Debug)]
pub struct Topology<P = ()> {
    spaces: Vec<Option<EquivalenceId>>,
    partition: Partition,
    routes: Vec<RouteEntry<P>>,
    room_routes: BTreeMap<(RoomId, RoomId), BTreeSet<RouteId>>,
    known_count: usize,
    active_count: usize,
}

impl<P> Topology<P> {
    /// Creates an empty topology over rooms `0..room_count`.
    #[must_use]
    pub fn new(room_count: usize) -> Self {
        Self {
            spaces: vec![None; room_count],
            partition: Partition::new(),
            routes: Vec::new(),
            room_routes: BTreeMap::new(),
            known_count: 0,
            active_count: 0,
        }
    }

    /// Number of rooms the topology was created for.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.spaces.len()
    }

    /// Stores a constructed route and hands out its identity.
    ///
    /// The route is not taught; it only becomes known once passed to
    /// [`Self::teach`], [`Self::offer`] or [`Self::force`].
    ///
    /// # Panics
    ///
    /// Panics when the route references a room outside this topology's grid.
    pub fn add(&mut self, route: Route<P>) -> RouteId {
        for room in route.rooms() {
            assert!(
                room.index() < self.spaces.len(),
                "room {} is outside a topology of {} rooms",
                room.get(),
                self.spaces.len()
            );
        }

        let id = RouteId::from_index(self.routes.len());
        self.routes.push(RouteEntry {
            route,
            state: RouteState::Candidate,
        });
        id
    }

    /// Retrieves a stored route.
    #[must_use]
    pub fn route(&self, id: RouteId) -> &Route<P> {
        &self.routes[id.index()].route
    }

    /// Registers each route that is not yet known and indexes it by room pair.
    pub fn teach(&mut self, routes: &[RouteId]) {
        for &id in routes {
            let entry = &mut self.routes[id.index()];
            if entry.state != RouteState::Candidate {
                continue;
            }
            entry.state = RouteState::Known;
            self.known_count += 1;

            let rooms = entry.route.rooms();
            for (position, &first) in rooms.iter().enumerate() {
                for &second in &rooms[position + 1..] {
                    let _ = self
                        .room_routes
                        .entry(pair_key(first, second))
                        .or_default()
                        .insert(id);
                }
            }
        }
    }

    /// Activates the whole batch if every route is individually admissible.
    ///
    /// Each route is checked against the current partition without assuming
    /// the rest of the batch went first. A route is admissible when it is not
    /// yet active and its rooms span at least `quorum` distinct spaces. On
    /// success the routes are forced and returned; otherwise nothing changes
    /// beyond teaching and an empty vector is returned.
    pub fn offer(&mut self, routes: &[RouteId]) -> Vec<RouteId> {
        self.teach(routes);
        if routes.iter().all(|&id| self.admits(id)) {
            self.force(routes);
            routes.to_vec()
        } else {
            Vec::new()
        }
    }

    /// Activates every route and joins all of its rooms, regardless of quorum.
    pub fn force(&mut self, routes: &[RouteId]) {
        self.teach(routes);
        for &id in routes {
            let entry = &mut self.routes[id.index()];
            if entry.state == RouteState::Active {
                continue;
            }
            entry.state = RouteState::Active;
            self.active_count += 1;

            let entry = &self.routes[id.index()];
            let mut rooms = entry.route.rooms().iter();
            let Some(&first) = rooms.next() else {
                continue;
            };
            let anchor = space_of(&mut self.spaces, &mut self.partition, first);
            for &room in rooms {
                let space = space_of(&mut self.spaces, &mut self.partition, room);
                let _ = self.partition.join(anchor, space);
            }
        }
    }

    /// Reports whether the route was selected into the maze.
    #[must_use]
    pub fn is_active(&self, id: RouteId) -> bool {
        self.routes[id.index()].state == RouteState::Active
    }

    /// Reports whether the route was taught.
    #[must_use]
    pub fn is_known(&self, id: RouteId) -> bool {
        self.routes[id.index()].state != RouteState::Candidate
    }

    /// Every known route whose rooms include at least two of `rooms`.
    #[must_use]
    pub fn routes_connecting(&self, rooms: &[RoomId]) -> Vec<RouteId> {
        let mut found = BTreeSet::new();
        for (position, &first) in rooms.iter().enumerate() {
            for &second in &rooms[position + 1..] {
                if let Some(routes) = self.room_routes.get(&pair_key(first, second)) {
                    found.extend(routes.iter().copied());
                }
            }
        }
        found.into_iter().collect()
    }

    /// First active route whose rooms include at least two of `rooms`.
    #[must_use]
    pub fn any_active_route_connecting(&self, rooms: &[RoomId]) -> Option<RouteId> {
        self.routes_connecting(rooms)
            .into_iter()
            .find(|&id| self.is_active(id))
    }

    /// Reports whether two rooms currently share a space.
    pub fn same_space(&mut self, first: RoomId, second: RoomId) -> bool {
        let first = space_of(&mut self.spaces, &mut self.partition, first);
        let second = space_of(&mut self.spaces, &mut self.partition, second);
        first == second
    }

    /// Number of distinct spaces spanned by `rooms`.
    pub fn space_count(&mut self, rooms: &[RoomId]) -> usize {
        count_spaces(&mut self.spaces, &mut self.partition, rooms)
    }

    /// Rooms sharing a space with `room`, in merge order.
    pub fn space_members(&mut self, room: RoomId) -> &[RoomId] {
        let space = space_of(&mut self.spaces, &mut self.partition, room);
        self.partition.members(space)
    }

    /// Number of routes taught so far.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known_count
    }

    /// Number of routes activated so far.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Active routes in ascending identifier order.
    pub fn active_routes(&self) -> impl Iterator<Item = RouteId> + '_ {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state == RouteState::Active)
            .map(|(index, _)| RouteId::from_index(index))
    }

    fn admits(&mut self, id: RouteId) -> bool {
        let entry = &self.routes[id.index()];
        if entry.state == RouteState::Active {
            return false;
        }
        count_spaces(&mut self.spaces, &mut self.partition, entry.route.rooms())
            >= entry.route.quorum()
    }
}

fn pair_key(first: RoomId, second: RoomId) -> (RoomId, RoomId) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

fn space_of(
    spaces: &mut [Option<EquivalenceId>],
    partition: &mut Partition,
    room: RoomId,
) -> EquivalenceId {
    let slot = &mut spaces[room.index()];
    let cell = match *slot {
        Some(cell) => cell,
        None => {
            let cell = partition.create(room);
            *slot = Some(cell);
            cell
        }
    };
    partition.canon(cell)
}

fn count_spaces(
    spaces: &mut [Option<EquivalenceId>],
    partition: &mut Partition,
    rooms: &[RoomId],
) -> usize {
    let mut seen: Vec<EquivalenceId> = Vec::with_capacity(rooms.len());
    for &room in rooms {
        let space = space_of(spaces, partition, room);
        if !seen.contains(&space) {
            seen.push(space);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(value: u32) -> RoomId {
        RoomId::new(value)
    }

    fn pair(topology: &mut Topology, first: u32, second: u32) -> RouteId {
        topology.add(Route::new(vec![room(first), room(second)], ()))
    }

    #[test]
    fn added_routes_start_unknown() {
        let mut topology = Topology::new(2);
        let route = pair(&mut topology, 0, 1);

        assert!(!topology.is_known(route));
        assert!(!topology.is_active(route));
        assert!(topology.routes_connecting(&[room(0), room(1)]).is_empty());
    }

    #[test]
    fn teach_is_idempotent() {
        let mut topology = Topology::new(3);
        let route = topology.add(Route::new(vec![room(0), room(1), room(2)], ()));

        topology.teach(&[route]);
        topology.teach(&[route, route]);

        assert_eq!(topology.known_count(), 1);
        assert_eq!(topology.room_routes.len(), 3);
        assert!(topology
            .room_routes
            .values()
            .all(|routes| routes.len() == 1));
        assert_eq!(topology.active_count(), 0);
        assert!(!topology.same_space(room(0), room(1)));
    }

    #[test]
    fn offer_accepts_routes_between_distinct_spaces() {
        let mut topology = Topology::new(2);
        let route = pair(&mut topology, 0, 1);

        assert_eq!(topology.offer(&[route]), vec![route]);
        assert!(topology.is_active(route));
        assert!(topology.same_space(room(0), room(1)));
    }

    #[test]
    fn offer_rejects_cycles_without_side_effects() {
        let mut topology = Topology::new(3);
        let first = pair(&mut topology, 0, 1);
        let second = pair(&mut topology, 1, 2);
        let closing = pair(&mut topology, 0, 2);
        let _ = topology.offer(&[first]);
        let _ = topology.offer(&[second]);

        assert!(topology.offer(&[closing]).is_empty());
        assert!(!topology.is_active(closing));
        assert!(topology.is_known(closing));
        assert_eq!(topology.active_count(), 2);
    }

    #[test]
    fn offer_rejects_already_active_routes() {
        let mut topology = Topology::new(2);
        let route = pair(&mut topology, 0, 1);
        topology.force(&[route]);

        assert!(topology.offer(&[route]).is_empty());
        assert_eq!(topology.active_count(), 1);
    }

    #[test]
    fn batch_is_rejected_when_any_route_fails() {
        let mut topology = Topology::new(4);
        let joined = pair(&mut topology, 0, 1);
        topology.force(&[joined]);
        let fresh = pair(&mut topology, 2, 3);
        let cycle = pair(&mut topology, 1, 0);

        assert!(topology.offer(&[fresh, cycle]).is_empty());
        assert!(!topology.is_active(fresh));
        assert!(!topology.same_space(room(2), room(3)));
    }

    #[test]
    fn batch_checks_each_route_against_the_current_partition() {
        let mut topology = Topology::new(3);
        let first = pair(&mut topology, 0, 1);
        let second = pair(&mut topology, 1, 2);
        let third = pair(&mut topology, 0, 2);

        let accepted = topology.offer(&[first, second, third]);

        assert_eq!(accepted, vec![first, second, third]);
        assert_eq!(topology.space_count(&[room(0), room(1), room(2)]), 1);
    }

    #[test]
    fn force_ignores_quorum() {
        let mut topology = Topology::new(2);
        let route = topology.add(Route::with_quorum(vec![room(0), room(1)], 3, ()));

        assert!(topology.offer(&[route]).is_empty());
        topology.force(&[route]);
        topology.force(&[route]);

        assert!(topology.is_active(route));
        assert_eq!(topology.active_count(), 1);
    }

    #[test]
    fn routes_connecting_finds_hyperedges_through_any_pair() {
        let mut topology = Topology::new(5);
        let lower = pair(&mut topology, 0, 1);
        let stair = topology.add(Route::new(vec![room(2), room(3), room(4)], ()));
        topology.teach(&[lower, stair]);

        assert_eq!(topology.routes_connecting(&[room(4), room(2)]), vec![stair]);
        assert_eq!(
            topology.routes_connecting(&[room(0), room(1), room(3), room(4)]),
            vec![lower, stair]
        );
        assert!(topology.routes_connecting(&[room(1), room(2)]).is_empty());
        assert_eq!(topology.any_active_route_connecting(&[room(2), room(3)]), None);

        topology.force(&[stair]);

        assert_eq!(
            topology.any_active_route_connecting(&[room(2), room(3)]),
            Some(stair)
        );
    }

    #[test]
    fn space_members_lists_the_whole_class() {
        let mut topology = Topology::new(4);
        let first = pair(&mut topology, 0, 1);
        let second = pair(&mut topology, 2, 1);
        topology.force(&[first, second]);

        let mut members = topology.space_members(room(2)).to_vec();
        members.sort();

        assert_eq!(members, vec![room(0), room(1), room(2)]);
        assert_eq!(topology.space_members(room(3)), &[room(3)]);
    }

    #[test]
    #[should_panic(expected = "outside a topology")]
    fn routes_over_unknown_rooms_are_rejected() {
        let mut topology = Topology::new(2);
        let _ = pair(&mut topology, 0, 2);
    }
}
