#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system turning feature densities into placement commands.
//!
//! Features are requested largest first (courtyards, towers, spires, then
//! stairs) so the big footprints claim space before the small ones fill the
//! gaps.

use castle_maze_core::{CellRectSize, Command, Direction, Event, FeatureRequest, Placement};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Inclusive range of footprint lengths measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    /// Smallest length that may be drawn.
    pub min: u32,
    /// Largest length that may be drawn.
    pub max: u32,
}

impl SizeRange {
    /// Creates a new inclusive size range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Reports whether at least one length can be drawn from the range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min > self.max
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Tuning for features whose footprint is drawn per placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizedFeatureTuning {
    /// Expected features per lower cell.
    pub density: f64,
    /// Range the footprint width is drawn from.
    pub width: SizeRange,
    /// Range the footprint length is drawn from.
    pub length: SizeRange,
    /// Retry budget and border margin used while anchoring.
    pub placement: Placement,
}

/// Tuning for features with a footprint fixed by their kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedFeatureTuning {
    /// Expected features per lower cell.
    pub density: f64,
    /// Retry budget and border margin used while anchoring.
    pub placement: Placement,
}

/// Densities, sizes and placement parameters for every feature kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureTuning {
    /// Open-air courtyards.
    pub courtyards: SizedFeatureTuning,
    /// Solid towers.
    pub towers: SizedFeatureTuning,
    /// Decorative 2x2 spires.
    pub spires: FixedFeatureTuning,
    /// Stairs between the two levels.
    pub stairs: FixedFeatureTuning,
}

impl Default for FeatureTuning {
    fn default() -> Self {
        Self {
            courtyards: SizedFeatureTuning {
                density: 0.012,
                width: SizeRange::new(2, 5),
                length: SizeRange::new(2, 5),
                placement: Placement::new(2, 0),
            },
            towers: SizedFeatureTuning {
                density: 0.007,
                width: SizeRange::new(1, 3),
                length: SizeRange::new(1, 3),
                placement: Placement::new(2, 0),
            },
            spires: FixedFeatureTuning {
                density: 0.01,
                placement: Placement::new(1, 0),
            },
            stairs: FixedFeatureTuning {
                density: 0.05,
                placement: Placement::new(2, 1),
            },
        }
    }
}

impl FeatureTuning {
    /// Tuning that requests no features at all.
    #[must_use]
    pub fn disabled() -> Self {
        let mut tuning = Self::default();
        for density in tuning.densities_mut() {
            *density = 0.0;
        }
        tuning
    }

    /// Scales every density by `4 * u * v` with `u` and `v` uniform in
    /// `[0, 1)`, which keeps the expected value while varying castles a lot.
    #[must_use]
    pub fn jittered<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut tuning = *self;
        for density in tuning.densities_mut() {
            *density *= 4.0 * rng.gen::<f64>() * rng.gen::<f64>();
        }
        tuning
    }

    /// Densities in planning order.
    #[must_use]
    pub fn densities(&self) -> [f64; 4] {
        [
            self.courtyards.density,
            self.towers.density,
            self.spires.density,
            self.stairs.density,
        ]
    }

    fn densities_mut(&mut self) -> [&mut f64; 4] {
        [
            &mut self.courtyards.density,
            &mut self.towers.density,
            &mut self.spires.density,
            &mut self.stairs.density,
        ]
    }
}

/// Number of features a density asks for on a `columns x rows` grid.
///
/// Every feature claims at least one lower room, so the count never exceeds
/// the number of lower rooms.
#[must_use]
pub fn feature_count(columns: u32, rows: u32, density: f64) -> usize {
    let cells = f64::from(columns) * f64::from(rows);
    let expected = cells * density;
    if expected.is_finite() && expected > 0.0 {
        expected.floor().min(cells) as usize
    } else {
        0
    }
}

/// Pure system emitting [`Command::PlaceFeature`] requests for a fresh grid.
#[derive(Debug)]
pub struct FeaturePlanner {
    tuning: FeatureTuning,
}

impl FeaturePlanner {
    /// Creates a planner using the provided tuning.
    ///
    /// Sized kinds whose width or length range is empty are skipped while
    /// planning.
    #[must_use]
    pub const fn new(tuning: FeatureTuning) -> Self {
        Self { tuning }
    }

    /// Tuning the planner was created with.
    #[must_use]
    pub const fn tuning(&self) -> &FeatureTuning {
        &self.tuning
    }

    /// Plans features for every grid announced through [`Event::GridConfigured`].
    pub fn handle<R: Rng + ?Sized>(&self, events: &[Event], rng: &mut R, out: &mut Vec<Command>) {
        for event in events {
            if let Event::GridConfigured { columns, rows, .. } = event {
                self.plan(*columns, *rows, rng, out);
            }
        }
    }

    /// Emits placement requests for a `columns x rows` grid, largest kinds first.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        columns: u32,
        rows: u32,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        let tuning = &self.tuning;

        let courtyards = sized_count("courtyard", &tuning.courtyards, columns, rows);
        for _ in 0..courtyards {
            let size = sample_size(&tuning.courtyards, rng);
            out.push(Command::PlaceFeature {
                request: FeatureRequest::Courtyard { size },
                placement: tuning.courtyards.placement,
            });
        }

        let towers = sized_count("tower", &tuning.towers, columns, rows);
        for _ in 0..towers {
            let size = sample_size(&tuning.towers, rng);
            out.push(Command::PlaceFeature {
                request: FeatureRequest::Tower { size },
                placement: tuning.towers.placement,
            });
        }

        let spires = feature_count(columns, rows, tuning.spires.density);
        out.extend((0..spires).map(|_| Command::PlaceFeature {
            request: FeatureRequest::Spire,
            placement: tuning.spires.placement,
        }));

        let stairs = feature_count(columns, rows, tuning.stairs.density);
        for _ in 0..stairs {
            let direction = *Direction::ALL.choose(rng).unwrap_or(&Direction::South);
            out.push(Command::PlaceFeature {
                request: FeatureRequest::Stair { direction },
                placement: tuning.stairs.placement,
            });
        }

        debug!(
            columns,
            rows,
            courtyards,
            towers,
            spires,
            stairs,
            "planned castle features"
        );
    }
}

fn sized_count(kind: &str, tuning: &SizedFeatureTuning, columns: u32, rows: u32) -> usize {
    let count = feature_count(columns, rows, tuning.density);
    if count > 0 && (tuning.width.is_empty() || tuning.length.is_empty()) {
        warn!(kind, count, "empty size range, skipping feature kind");
        return 0;
    }
    count
}

fn sample_size<R: Rng + ?Sized>(tuning: &SizedFeatureTuning, rng: &mut R) -> CellRectSize {
    let width = tuning.width.sample(rng);
    let length = tuning.length.sample(rng);
    CellRectSize::new(width, length)
}
