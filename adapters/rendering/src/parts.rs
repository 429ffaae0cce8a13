//! Flat scene description consumed by external level builders.

use std::io::Write;

use anyhow::Context;
use castle_maze_core::WallState;
use glam::Vec2;
use serde::Serialize;

use crate::{wall_macro, Illustrator};

/// Single macro instantiation positioned on the castle floor plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenePart {
    /// Name of the macro that builds the part.
    pub macro_name: &'static str,
    /// Centred floor-plan position.
    pub position: [f32; 2],
}

/// Macro instantiation covering an area of the floor plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneBlock {
    /// Name of the macro that builds the block.
    pub macro_name: &'static str,
    /// Origin corner for courtyards and towers, centre for stairs.
    pub position: [f32; 2],
    /// Extent in cells. Zero for stairs.
    pub extent: [f32; 2],
    /// Unit vector a stair climbs along. Zero for everything else.
    pub heading: [f32; 2],
}

/// Collected parts and blocks of one rendered castle.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneParts {
    /// Walls and spires in draw order.
    pub parts: Vec<ScenePart>,
    /// Courtyards, towers and stairs in draw order.
    pub blocks: Vec<SceneBlock>,
}

impl SceneParts {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line per block and then one line per part.
    ///
    /// Each line holds the macro name followed by its numeric arguments.
    pub fn write_listing<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        for block in &self.blocks {
            writeln!(
                out,
                "{} {} {} {} {} {} {}",
                block.macro_name,
                block.position[0],
                block.position[1],
                block.extent[0],
                block.extent[1],
                block.heading[0],
                block.heading[1],
            )
            .with_context(|| format!("failed to write {}", block.macro_name))?;
        }
        for part in &self.parts {
            writeln!(
                out,
                "{} {} {}",
                part.macro_name, part.position[0], part.position[1]
            )
            .with_context(|| format!("failed to write {}", part.macro_name))?;
        }
        Ok(())
    }

    fn push_block(&mut self, macro_name: &'static str, position: Vec2, extent: Vec2, heading: Vec2) {
        self.blocks.push(SceneBlock {
            macro_name,
            position: position.to_array(),
            extent: extent.to_array(),
            heading: heading.to_array(),
        });
    }
}

impl Illustrator for SceneParts {
    fn draw_wall(&mut self, state: WallState, position: Vec2) {
        self.parts.push(ScenePart {
            macro_name: wall_macro(state),
            position: position.to_array(),
        });
    }

    fn draw_courtyard(&mut self, origin: Vec2, size: Vec2) {
        self.push_block("MakeCourtyard", origin, size, Vec2::ZERO);
    }

    fn draw_tower(&mut self, origin: Vec2, size: Vec2) {
        self.push_block("MakeTower", origin, size, Vec2::ZERO);
    }

    fn draw_spire(&mut self, center: Vec2) {
        self.parts.push(ScenePart {
            macro_name: "MakeSpire",
            position: center.to_array(),
        });
    }

    fn draw_stair(&mut self, center: Vec2, direction: Vec2) {
        self.push_block("MakeStair", center, Vec2::ZERO, direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castle_maze_core::{WallCategory, WallDimension};

    #[test]
    fn listing_puts_blocks_before_parts() {
        let mut scene = SceneParts::new();
        scene.draw_wall(
            WallState::new(WallCategory::Arch, WallDimension::Y),
            Vec2::new(1.0, -0.5),
        );
        scene.draw_tower(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 3.0));
        scene.draw_stair(Vec2::new(0.5, 1.0), Vec2::new(0.0, -1.0));

        let mut out = Vec::new();
        scene.write_listing(&mut out).expect("writing to memory succeeds");

        assert_eq!(
            String::from_utf8(out).expect("listing is utf-8"),
            "MakeTower -2 -1 2 3 0 0\nMakeStair 0.5 1 0 0 0 -1\nMakeArchY 1 -0.5\n"
        );
    }

    #[test]
    fn spires_are_parts() {
        let mut scene = SceneParts::new();
        scene.draw_spire(Vec2::new(3.0, 4.0));

        assert!(scene.blocks.is_empty());
        assert_eq!(
            scene.parts,
            vec![ScenePart {
                macro_name: "MakeSpire",
                position: [3.0, 4.0],
            }]
        );
    }
}
