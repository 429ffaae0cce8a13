//! Arena-backed union-find cells tracking which rooms share a connected space.

use castle_maze_core::RoomId;

/// Handle to a single equivalence cell stored in a [`Partition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquivalenceId(u32);

impl EquivalenceId {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One cell of the partition.
///
/// A canonical cell owns the member rooms of its class. Once a cell loses a
/// join it forwards to the winner and its member list stays empty forever.
#[derive(Clone, Debug, Default)]
struct Equivalence {
    forward: Option<EquivalenceId>,
    members: Vec<RoomId>,
}

/// Disjoint-set forest over rooms with path compression.
#[derive(Clone, Debug, Default)]
pub struct Partition {
    cells: Vec<Equivalence>,
}

impl Partition {
    /// Creates an empty partition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new singleton class containing only `room`.
    pub fn create(&mut self, room: RoomId) -> EquivalenceId {
        let id = EquivalenceId(
            u32::try_from(self.cells.len()).expect("equivalence arena exceeds u32 handles"),
        );
        self.cells.push(Equivalence {
            forward: None,
            members: vec![room],
        });
        id
    }

    /// Resolves the canonical cell of `id`, flattening the forwarding chain.
    pub fn canon(&mut self, id: EquivalenceId) -> EquivalenceId {
        let mut root = id;
        while let Some(next) = self.cells[root.index()].forward {
            root = next;
        }

        let mut current = id;
        while let Some(next) = self.cells[current.index()].forward {
            self.cells[current.index()].forward = Some(root);
            current = next;
        }

        root
    }

    /// Merges the classes of `a` and `b`, returning the surviving canon.
    ///
    /// The canon of `b` always survives; the members of the canon of `a` move
    /// over to it.
    pub fn join(&mut self, a: EquivalenceId, b: EquivalenceId) -> EquivalenceId {
        let loser = self.canon(a);
        let winner = self.canon(b);
        if loser == winner {
            return winner;
        }

        let members = std::mem::take(&mut self.cells[loser.index()].members);
        self.cells[winner.index()].members.extend(members);
        self.cells[loser.index()].forward = Some(winner);
        winner
    }

    /// Reports whether both handles belong to the same class.
    pub fn same_class(&mut self, a: EquivalenceId, b: EquivalenceId) -> bool {
        self.canon(a) == self.canon(b)
    }

    /// Rooms belonging to the class of `id`.
    pub fn members(&mut self, id: EquivalenceId) -> &[RoomId] {
        let canon = self.canon(id);
        &self.cells[canon.index()].members
    }

    #[cfg(test)]
    fn is_canonical(&self, id: EquivalenceId) -> bool {
        self.cells[id.index()].forward.is_none()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    fn class_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.forward.is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singletons(partition: &mut Partition, count: u32) -> Vec<EquivalenceId> {
        (0..count)
            .map(|room| partition.create(RoomId::new(room)))
            .collect()
    }

    #[test]
    fn fresh_cells_are_their_own_canon() {
        let mut partition = Partition::new();
        let cells = singletons(&mut partition, 3);

        for &cell in &cells {
            assert_eq!(partition.canon(cell), cell);
            assert!(partition.is_canonical(cell));
        }
        assert_eq!(partition.class_count(), 3);
    }

    #[test]
    fn join_moves_members_to_the_second_canon() {
        let mut partition = Partition::new();
        let cells = singletons(&mut partition, 2);

        let winner = partition.join(cells[0], cells[1]);

        assert_eq!(winner, cells[1]);
        assert!(!partition.is_canonical(cells[0]));
        assert_eq!(partition.cells[cells[0].index()].members, Vec::new());
        assert_eq!(
            partition.members(cells[0]),
            &[RoomId::new(1), RoomId::new(0)]
        );
    }

    #[test]
    fn joining_the_same_class_is_a_no_op() {
        let mut partition = Partition::new();
        let cells = singletons(&mut partition, 2);
        let _ = partition.join(cells[0], cells[1]);

        let again = partition.join(cells[1], cells[0]);

        assert_eq!(again, cells[1]);
        assert_eq!(partition.members(cells[1]).len(), 2);
        assert_eq!(partition.class_count(), 1);
    }

    #[test]
    fn canon_compresses_forwarding_chains() {
        let mut partition = Partition::new();
        let cells = singletons(&mut partition, 4);
        let _ = partition.join(cells[0], cells[1]);
        let _ = partition.join(cells[1], cells[2]);
        let _ = partition.join(cells[2], cells[3]);
        assert_eq!(partition.cells[cells[0].index()].forward, Some(cells[1]));

        assert_eq!(partition.canon(cells[0]), cells[3]);
        assert_eq!(partition.cells[cells[0].index()].forward, Some(cells[3]));
        assert_eq!(partition.cells[cells[1].index()].forward, Some(cells[3]));
        assert_eq!(partition.cells[cells[2].index()].forward, Some(cells[3]));
    }

    #[test]
    fn every_member_maps_to_exactly_one_canon() {
        let mut partition = Partition::new();
        let cells = singletons(&mut partition, 6);
        let _ = partition.join(cells[0], cells[1]);
        let _ = partition.join(cells[4], cells[5]);
        let _ = partition.join(cells[1], cells[5]);

        let total: usize = (0..partition.len())
            .filter(|&index| partition.cells[index].forward.is_none())
            .map(|index| partition.cells[index].members.len())
            .sum();

        assert_eq!(total, 6);
        assert_eq!(partition.class_count(), 3);
        assert!(partition.same_class(cells[0], cells[4]));
        assert!(!partition.same_class(cells[0], cells[2]));
    }
}
