//! Character floor plans for terminals and logs.

use std::fmt;

use castle_maze_core::{Direction, FeatureKind, FeatureRecord, WallCategory, WallDimension};
use castle_maze_world::{query, CastleVisitor, World};

/// Top-down character drawing of the lower level of a castle.
///
/// Rooms sit on odd character coordinates and walls between them on the
/// even ones, so a grid of `c` by `r` rooms takes `2c + 1` by `2r + 1`
/// characters including the outer rampart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiPlan {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
}

impl AsciiPlan {
    /// Draws the provided castle.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let (columns, rows) = query::dimensions(world);
        let width = 2 * columns as usize + 1;
        let height = 2 * rows as usize + 1;
        let mut plan = Self {
            width,
            height,
            glyphs: vec![' '; width * height],
        };

        for y in 0..height {
            for x in 0..width {
                let glyph = if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    '#'
                } else if x % 2 == 0 && y % 2 == 0 {
                    '+'
                } else {
                    continue;
                };
                plan.set(x, y, glyph);
            }
        }

        query::visit(world, &mut plan);
        plan
    }

    /// Character drawn at the provided coordinate, if inside the plan.
    #[must_use]
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.glyphs[y * self.width + x])
    }

    fn set(&mut self, x: usize, y: usize, glyph: char) {
        self.glyphs[y * self.width + x] = glyph;
    }
}

impl CastleVisitor for AsciiPlan {
    fn visit_feature(&mut self, record: &FeatureRecord) {
        let glyph = match (record.kind, record.direction) {
            (FeatureKind::Courtyard, _) => ',',
            (FeatureKind::Tower, _) => 'T',
            (FeatureKind::Spire, _) => 'o',
            (FeatureKind::Stair, Some(Direction::North)) => '^',
            (FeatureKind::Stair, Some(Direction::East)) => '>',
            (FeatureKind::Stair, Some(Direction::South)) => 'v',
            (FeatureKind::Stair, Some(Direction::West)) => '<',
            (FeatureKind::Stair, None) => 's',
        };

        let origin = record.region.origin();
        let size = record.region.size();
        for column in origin.column()..origin.column() + size.width() {
            for row in origin.row()..origin.row() + size.height() {
                self.set(2 * column as usize + 1, 2 * row as usize + 1, glyph);
            }
        }
    }

    fn visit_wall(&mut self, wall: &query::WallSnapshot) {
        let column = wall.position.column() as usize;
        let row = wall.position.row() as usize;
        let (x, y) = match wall.dimension {
            WallDimension::Y => (2 * column, 2 * row + 1),
            WallDimension::X => (2 * column + 1, 2 * row),
        };
        let glyph = match (wall.state.category, wall.dimension) {
            (WallCategory::Block, _) => '#',
            (WallCategory::Wall, WallDimension::Y) => '|',
            (WallCategory::Wall, WallDimension::X) => '-',
            (WallCategory::Open, _) => ' ',
            (WallCategory::Arch, _) => '.',
        };
        self.set(x, y, glyph);
    }
}

impl fmt::Display for AsciiPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.glyphs.chunks(self.width).enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for glyph in line {
                write!(f, "{glyph}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castle_maze_core::{Command, Event, FeatureRequest, Floor, Placement, WallId, WallPassage};
    use castle_maze_world as world;

    fn configured(columns: u32, rows: u32) -> World {
        let mut world = World::new();
        let mut events: Vec<Event> = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns,
                rows,
                placement_seed: 3,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn uncarved_castle_is_solid() {
        let plan = AsciiPlan::from_world(&configured(2, 1));
        assert_eq!(plan.to_string(), "#####\n# # #\n#####");
    }

    #[test]
    fn opened_walls_leave_gaps() {
        let mut world = configured(2, 1);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::OfferPassages {
                passages: vec![WallPassage::new(WallId::new(0), Floor::Lower)],
            },
            &mut events,
        );

        let plan = AsciiPlan::from_world(&world);

        assert_eq!(plan.glyph(2, 1), Some(' '), "opened wall is drawn as a gap");
        assert_eq!(plan.to_string(), "#####\n#   #\n#####");
    }

    #[test]
    fn spires_fill_their_footprint() {
        let mut world = configured(2, 2);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceFeature {
                request: FeatureRequest::Spire,
                placement: Placement::new(0, 0),
            },
            &mut events,
        );

        let plan = AsciiPlan::from_world(&world);

        assert_eq!(plan.to_string(), "#####\n#o o#\n# + #\n#o o#\n#####");
        assert_eq!(plan.glyph(5, 0), None);
    }
}
