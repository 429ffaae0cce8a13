#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for castle maze adapters.
//!
//! Renderers implement [`Illustrator`] and receive every placed feature and
//! then every wall, positioned relative to the centre of the grid so the
//! castle sits around the origin of whatever scene it is dropped into.

use castle_maze_core::{FeatureKind, FeatureRecord, WallCategory, WallDimension, WallState};
use castle_maze_world::{query, CastleVisitor, World};
use glam::Vec2;

mod parts;
mod plan;

pub use parts::{SceneBlock, ScenePart, SceneParts};
pub use plan::AsciiPlan;

/// Receives the drawable pieces of a castle in centred scene coordinates.
pub trait Illustrator {
    /// Draws one wall in the provided state at its corner-lattice position.
    fn draw_wall(&mut self, state: WallState, position: Vec2);

    /// Draws a courtyard spanning `size` cells from `origin`.
    fn draw_courtyard(&mut self, origin: Vec2, size: Vec2);

    /// Draws a tower spanning `size` cells from `origin`.
    fn draw_tower(&mut self, origin: Vec2, size: Vec2);

    /// Draws a spire centred on `center`.
    fn draw_spire(&mut self, center: Vec2);

    /// Draws a stair centred on `center`, climbing along `direction`.
    fn draw_stair(&mut self, center: Vec2, direction: Vec2);
}

/// Drives `illustrator` with every feature of the castle, then every wall.
pub fn render<I: Illustrator + ?Sized>(world: &World, illustrator: &mut I) {
    let (columns, rows) = query::dimensions(world);
    let mut adapter = IllustratorVisitor {
        offset: Vec2::new(columns as f32, rows as f32) / 2.0,
        illustrator,
    };
    query::visit(world, &mut adapter);
}

/// Name of the scene macro that builds a wall in the provided state.
#[must_use]
pub const fn wall_macro(state: WallState) -> &'static str {
    match (state.category, state.dimension) {
        (WallCategory::Block, WallDimension::X) => "MakeBlockX",
        (WallCategory::Block, WallDimension::Y) => "MakeBlockY",
        (WallCategory::Wall, WallDimension::X) => "MakeWallX",
        (WallCategory::Wall, WallDimension::Y) => "MakeWallY",
        (WallCategory::Open, WallDimension::X) => "MakeOpenX",
        (WallCategory::Open, WallDimension::Y) => "MakeOpenY",
        (WallCategory::Arch, WallDimension::X) => "MakeArchX",
        (WallCategory::Arch, WallDimension::Y) => "MakeArchY",
    }
}

struct IllustratorVisitor<'a, I: ?Sized> {
    offset: Vec2,
    illustrator: &'a mut I,
}

impl<I: Illustrator + ?Sized> CastleVisitor for IllustratorVisitor<'_, I> {
    fn visit_feature(&mut self, record: &FeatureRecord) {
        let origin = record.region.origin();
        let size = record.region.size();
        let origin = Vec2::new(origin.column() as f32, origin.row() as f32) - self.offset;
        let extent = Vec2::new(size.width() as f32, size.height() as f32);
        let center = Vec2::from(record.region.center()) - self.offset;

        match record.kind {
            FeatureKind::Courtyard => self.illustrator.draw_courtyard(origin, extent),
            FeatureKind::Tower => self.illustrator.draw_tower(origin, extent),
            FeatureKind::Spire => self.illustrator.draw_spire(center),
            FeatureKind::Stair => {
                let (dx, dy) = record.direction.map_or((0, 0), |direction| direction.vector());
                self.illustrator
                    .draw_stair(center, Vec2::new(dx as f32, dy as f32));
            }
        }
    }

    fn visit_wall(&mut self, wall: &query::WallSnapshot) {
        let position = Vec2::new(
            wall.position.column() as f32,
            wall.position.row() as f32,
        ) - self.offset;
        self.illustrator.draw_wall(wall.state, position);
    }
}
