#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative castle state for the maze generator.
//!
//! The world owns both room grids, the walls between them, the connectivity
//! [`castle_maze_topology::Topology`] and the records of every placed
//! feature. It only changes in response to [`Command`] values passed to
//! [`apply`]; adapters read it back through [`query`].

mod allocator;
mod features;
mod rooms;
mod walls;

use castle_maze_core::{Command, Event, FeatureRecord};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use features::Site;

pub use rooms::Room;
pub use walls::{derive_wall_category, RouteTag, Wall};

const DEFAULT_GRID_COLUMNS: u32 = 10;
const DEFAULT_GRID_ROWS: u32 = 10;
const DEFAULT_PLACEMENT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Represents one generated two-level castle.
#[derive(Debug)]
pub struct World {
    site: Site,
    features: Vec<FeatureRecord>,
    placement_rng: ChaCha8Rng,
}

impl World {
    /// Creates an empty castle on the default grid with every wall closed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            site: Site::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS),
            features: Vec::new(),
            placement_rng: ChaCha8Rng::seed_from_u64(DEFAULT_PLACEMENT_SEED),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            placement_seed,
        } => {
            world.site = Site::new(columns, rows);
            world.features.clear();
            world.placement_rng = ChaCha8Rng::seed_from_u64(placement_seed);

            let walls = u32::try_from(world.site.walls.len()).unwrap_or(u32::MAX);
            debug!(columns, rows, walls, "castle grid configured");
            out_events.push(Event::GridConfigured {
                columns,
                rows,
                walls,
            });
        }
        Command::PlaceFeature { request, placement } => {
            match world
                .site
                .place(&mut world.placement_rng, request, placement)
            {
                Some(record) => {
                    world.features.push(record);
                    out_events.push(Event::FeaturePlaced { record });
                }
                None => out_events.push(Event::FeatureSkipped {
                    kind: request.kind(),
                }),
            }
        }
        Command::OfferPassages { passages } => {
            for passage in passages {
                let Some(wall) = world.site.walls.get(&passage.wall) else {
                    continue;
                };
                let route = wall.route(passage.floor);
                if !world.site.topology.offer(&[route]).is_empty() {
                    out_events.push(Event::PassageOpened { passage });
                }
            }
        }
    }
}

/// Receives the renderable parts of a castle in drawing order.
pub trait CastleVisitor {
    /// Called once per placed feature, in placement order.
    fn visit_feature(&mut self, record: &FeatureRecord);

    /// Called once per remaining wall, in identifier order.
    fn visit_wall(&mut self, wall: &query::WallSnapshot);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use castle_maze_core::{
        CellCoord, FeatureRecord, RoomId, WallDimension, WallId, WallPassage, WallState,
    };
    use castle_maze_topology::Topology;

    use super::{CastleVisitor, Room, RouteTag, Wall, World};

    /// Number of lower-level `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.site.rooms.columns(), world.site.rooms.rows())
    }

    /// Every room of both floors, lower rooms first.
    #[must_use]
    pub fn rooms(world: &World) -> &[Room] {
        world.site.rooms.rooms()
    }

    /// Looks up a single room.
    #[must_use]
    pub fn room(world: &World, id: RoomId) -> Option<&Room> {
        world.site.rooms.rooms().get(id.index())
    }

    /// Lower room occupying the provided cell, if it lies on the grid.
    #[must_use]
    pub fn lower_room(world: &World, cell: CellCoord) -> Option<RoomId> {
        world.site.lower_cell(cell)
    }

    /// Upper room sitting on the provided grid corner, if it exists.
    #[must_use]
    pub fn upper_room(world: &World, cell: CellCoord) -> Option<RoomId> {
        world.site.upper_cell(cell)
    }

    /// Looks up a wall that has not been removed.
    #[must_use]
    pub fn wall(world: &World, id: WallId) -> Option<&Wall> {
        world.site.walls.get(&id)
    }

    /// Derives the render state of a wall from the current connectivity.
    #[must_use]
    pub fn wall_state(world: &World, id: WallId) -> Option<WallState> {
        world
            .site
            .walls
            .get(&id)
            .map(|wall| wall.state(&world.site.rooms, &world.site.topology))
    }

    /// Captures every remaining wall with its derived state, in identifier order.
    #[must_use]
    pub fn walls(world: &World) -> Vec<WallSnapshot> {
        world
            .site
            .walls
            .values()
            .map(|wall| WallSnapshot {
                id: wall.id(),
                dimension: wall.dimension(),
                position: wall.position(),
                state: wall.state(&world.site.rooms, &world.site.topology),
            })
            .collect()
    }

    /// Records of every placed feature, in placement order.
    #[must_use]
    pub fn features(world: &World) -> &[FeatureRecord] {
        &world.features
    }

    /// Provides read-only access to the connectivity state.
    #[must_use]
    pub fn topology(world: &World) -> &Topology<RouteTag> {
        &world.site.topology
    }

    /// Passages that may still be offered, lower level first within each wall.
    ///
    /// A passage touching a blocked room is never a candidate.
    #[must_use]
    pub fn candidate_passages(world: &World) -> Vec<WallPassage> {
        world
            .site
            .walls
            .values()
            .flat_map(|wall| wall.candidate_passages(&world.site.rooms))
            .collect()
    }

    /// Drives the visitor with every feature, then every wall.
    pub fn visit<V: CastleVisitor + ?Sized>(world: &World, visitor: &mut V) {
        for record in &world.features {
            visitor.visit_feature(record);
        }
        for wall in walls(world) {
            visitor.visit_wall(&wall);
        }
    }

    /// Immutable representation of a wall used for rendering.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WallSnapshot {
        /// Identifier of the wall.
        pub id: WallId,
        /// Axis the wall runs along.
        pub dimension: WallDimension,
        /// Position of the wall on the corner lattice.
        pub position: CellCoord,
        /// Render state derived from connectivity and blocking.
        pub state: WallState,
    }
}
