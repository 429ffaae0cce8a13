#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generation pipeline wiring the castle world to its pure systems.
//!
//! A single master seed fans out into independent random streams (density
//! jitter, feature planning, feature placement and carving) so changing one
//! stage never shifts the randomness seen by another.

use castle_maze_core::{Command, Event, Placement};
use castle_maze_system_carving::Carving;
use castle_maze_system_features::{FeaturePlanner, FeatureTuning, SizeRange};
use castle_maze_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

const RNG_STREAM_JITTER: &str = "castle.features.jitter";
const RNG_STREAM_PLANNING: &str = "castle.features.plan";
const RNG_STREAM_PLACEMENT: &str = "castle.features.place";
const RNG_STREAM_CARVING: &str = "castle.carving";

/// Largest supported number of columns or rows.
pub const MAX_GRID_EXTENT: u32 = 4096;

/// Largest number of extra anchor attempts allowed per feature.
pub const MAX_PLACEMENT_RETRIES: u32 = 1024;

/// Parameters describing one castle to generate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of lower-level room columns.
    pub columns: u32,
    /// Number of lower-level room rows.
    pub rows: u32,
    /// Master seed every random stream is derived from.
    pub seed: u64,
    /// Whether feature densities are randomly scaled before planning.
    pub jitter_densities: bool,
    /// Densities, sizes and placement parameters per feature kind.
    pub features: FeatureTuning,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            columns: 30,
            rows: 20,
            seed: 0,
            jitter_densities: true,
            features: FeatureTuning::default(),
        }
    }
}

impl GenerationConfig {
    /// Checks that the configuration describes a castle that can be generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.columns > MAX_GRID_EXTENT || self.rows > MAX_GRID_EXTENT {
            return Err(ConfigError::GridTooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        }

        let tuning = &self.features;
        for (feature, density) in [
            ("courtyard", tuning.courtyards.density),
            ("tower", tuning.towers.density),
            ("spire", tuning.spires.density),
            ("stair", tuning.stairs.density),
        ] {
            if !density.is_finite() || density < 0.0 {
                return Err(ConfigError::InvalidDensity { feature, density });
            }
        }

        for (feature, axis, range) in [
            ("courtyard", "width", tuning.courtyards.width),
            ("courtyard", "length", tuning.courtyards.length),
            ("tower", "width", tuning.towers.width),
            ("tower", "length", tuning.towers.length),
        ] {
            check_size_range(feature, axis, range)?;
        }

        for (feature, placement) in [
            ("courtyard", tuning.courtyards.placement),
            ("tower", tuning.towers.placement),
            ("spire", tuning.spires.placement),
            ("stair", tuning.stairs.placement),
        ] {
            check_placement(feature, placement)?;
        }

        Ok(())
    }
}

fn check_placement(feature: &'static str, placement: Placement) -> Result<(), ConfigError> {
    if placement.margin > MAX_GRID_EXTENT {
        return Err(ConfigError::MarginTooLarge {
            feature,
            margin: placement.margin,
        });
    }
    if placement.retries > MAX_PLACEMENT_RETRIES {
        return Err(ConfigError::TooManyRetries {
            feature,
            retries: placement.retries,
        });
    }
    Ok(())
}

fn check_size_range(
    feature: &'static str,
    axis: &'static str,
    range: SizeRange,
) -> Result<(), ConfigError> {
    if range.min == 0 {
        return Err(ConfigError::ZeroSize { feature, axis });
    }
    if range.is_empty() {
        return Err(ConfigError::EmptySizeRange {
            feature,
            axis,
            min: range.min,
            max: range.max,
        });
    }
    if range.max > MAX_GRID_EXTENT {
        return Err(ConfigError::SizeTooLarge {
            feature,
            axis,
            max: range.max,
        });
    }
    Ok(())
}

/// Reasons a [`GenerationConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no rooms.
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid {
        /// Requested columns.
        columns: u32,
        /// Requested rows.
        rows: u32,
    },
    /// The grid exceeds [`MAX_GRID_EXTENT`] along an axis.
    #[error("grid of {columns}x{rows} exceeds {max} cells along an axis", max = MAX_GRID_EXTENT)]
    GridTooLarge {
        /// Requested columns.
        columns: u32,
        /// Requested rows.
        rows: u32,
    },
    /// A density is negative, infinite or not a number.
    #[error("{feature} density must be a finite non-negative number, got {density}")]
    InvalidDensity {
        /// Feature kind the density belongs to.
        feature: &'static str,
        /// Offending density.
        density: f64,
    },
    /// A size range admits footprints with no extent.
    #[error("{feature} {axis} must be at least one cell")]
    ZeroSize {
        /// Feature kind the range belongs to.
        feature: &'static str,
        /// Footprint axis the range applies to.
        axis: &'static str,
    },
    /// A size range has its bounds reversed.
    #[error("{feature} {axis} range {min}..={max} is empty")]
    EmptySizeRange {
        /// Feature kind the range belongs to.
        feature: &'static str,
        /// Footprint axis the range applies to.
        axis: &'static str,
        /// Lower bound of the range.
        min: u32,
        /// Upper bound of the range.
        max: u32,
    },
    /// A size range reaches beyond [`MAX_GRID_EXTENT`].
    #[error("{feature} {axis} of up to {max} cells exceeds {limit}", limit = MAX_GRID_EXTENT)]
    SizeTooLarge {
        /// Feature kind the range belongs to.
        feature: &'static str,
        /// Footprint axis the range applies to.
        axis: &'static str,
        /// Upper bound of the range.
        max: u32,
    },
    /// A border margin reaches beyond [`MAX_GRID_EXTENT`].
    #[error("{feature} margin of {margin} cells exceeds {limit}", limit = MAX_GRID_EXTENT)]
    MarginTooLarge {
        /// Feature kind the placement belongs to.
        feature: &'static str,
        /// Offending margin.
        margin: u32,
    },
    /// A retry budget exceeds [`MAX_PLACEMENT_RETRIES`].
    #[error("{feature} retries of {retries} exceed {limit}", limit = MAX_PLACEMENT_RETRIES)]
    TooManyRetries {
        /// Feature kind the placement belongs to.
        feature: &'static str,
        /// Offending retry budget.
        retries: u32,
    },
}

/// Finished castle together with every event produced while generating it.
#[derive(Debug)]
pub struct Generation {
    world: World,
    events: Vec<Event>,
}

impl Generation {
    /// Generated castle.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events in the order the world reported them.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the generation, yielding the castle.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }
}

/// Drives a castle through configuration, feature placement and carving.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Generates the castle described by `config`.
    pub fn generate(&self, config: &GenerationConfig) -> Result<World, ConfigError> {
        self.generate_with_events(config).map(Generation::into_world)
    }

    /// Generates the castle described by `config`, keeping the event log.
    pub fn generate_with_events(
        &self,
        config: &GenerationConfig,
    ) -> Result<Generation, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns: config.columns,
                rows: config.rows,
                placement_seed: derive_labeled_seed(config.seed, RNG_STREAM_PLACEMENT),
            },
            &mut events,
        );

        let tuning = if config.jitter_densities {
            let mut jitter_rng = stream(config.seed, RNG_STREAM_JITTER);
            config.features.jittered(&mut jitter_rng)
        } else {
            config.features
        };

        let mut commands = Vec::new();
        FeaturePlanner::new(tuning).handle(
            &events,
            &mut stream(config.seed, RNG_STREAM_PLANNING),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }

        Carving::new().handle(
            &query::candidate_passages(&world),
            &mut stream(config.seed, RNG_STREAM_CARVING),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }

        let topology = query::topology(&world);
        info!(
            columns = config.columns,
            rows = config.rows,
            seed = config.seed,
            rooms = query::rooms(&world).len(),
            walls = query::walls(&world).len(),
            features = query::features(&world).len(),
            active_routes = topology.active_count(),
            "castle generated"
        );

        Ok(Generation { world, events })
    }
}

fn stream(seed: u64, label: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_labeled_seed(seed, label))
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_seeds_are_stable_and_distinct() {
        let placement = derive_labeled_seed(7, RNG_STREAM_PLACEMENT);
        assert_eq!(placement, derive_labeled_seed(7, RNG_STREAM_PLACEMENT));
        assert_ne!(placement, derive_labeled_seed(7, RNG_STREAM_CARVING));
        assert_ne!(placement, derive_labeled_seed(8, RNG_STREAM_PLACEMENT));
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GenerationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = GenerationConfig {
            rows: 0,
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                columns: 30,
                rows: 0
            })
        );
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let config = GenerationConfig {
            columns: MAX_GRID_EXTENT + 1,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn negative_and_nan_densities_are_rejected() {
        let mut config = GenerationConfig::default();
        config.features.spires.density = -0.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDensity {
                feature: "spire",
                density: -0.5
            })
        );

        config.features.spires.density = 0.0;
        config.features.stairs.density = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDensity {
                feature: "stair",
                ..
            })
        ));
    }

    #[test]
    fn broken_size_ranges_are_rejected() {
        let mut config = GenerationConfig::default();
        config.features.towers.length = SizeRange::new(3, 1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptySizeRange {
                feature: "tower",
                axis: "length",
                min: 3,
                max: 1
            })
        );

        config.features.towers.length = SizeRange::new(1, 3);
        config.features.courtyards.width = SizeRange::new(0, 2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroSize {
                feature: "courtyard",
                axis: "width"
            })
        );
    }

    #[test]
    fn oversized_ranges_are_rejected() {
        let mut config = GenerationConfig::default();
        config.features.towers.width = SizeRange::new(u32::MAX, u32::MAX);
        assert_eq!(
            config.validate(),
            Err(ConfigError::SizeTooLarge {
                feature: "tower",
                axis: "width",
                max: u32::MAX
            })
        );
        assert!(Bootstrap.generate(&config).is_err());
    }

    #[test]
    fn oversized_margins_and_retry_budgets_are_rejected() {
        let mut config = GenerationConfig::default();
        config.features.stairs.placement.margin = u32::MAX;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MarginTooLarge {
                feature: "stair",
                margin: u32::MAX
            })
        );

        config.features.stairs.placement.margin = 1;
        config.features.spires.placement.retries = MAX_PLACEMENT_RETRIES + 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyRetries {
                feature: "spire",
                retries: MAX_PLACEMENT_RETRIES + 1
            })
        );
    }

    #[test]
    fn huge_densities_stay_bounded() {
        let mut config = GenerationConfig {
            columns: 8,
            rows: 6,
            jitter_densities: false,
            features: FeatureTuning::disabled(),
            ..GenerationConfig::default()
        };
        config.features.spires.density = 1e30;

        let generation = Bootstrap
            .generate_with_events(&config)
            .expect("finite densities are accepted");

        let requested = generation
            .events()
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::FeaturePlaced { .. } | Event::FeatureSkipped { .. }
                )
            })
            .count();
        assert_eq!(requested, 8 * 6, "one request per lower room at most");
    }

    #[test]
    fn margins_as_wide_as_the_grid_place_nothing() {
        let mut config = GenerationConfig {
            columns: 10,
            rows: 10,
            jitter_densities: false,
            features: FeatureTuning::disabled(),
            ..GenerationConfig::default()
        };
        config.features.stairs.density = 0.1;
        config.features.stairs.placement.margin = MAX_GRID_EXTENT;

        let world = Bootstrap.generate(&config).expect("margin is within bounds");

        assert!(query::features(&world).is_empty());
    }

    #[test]
    fn errors_render_readable_messages() {
        let error = ConfigError::EmptySizeRange {
            feature: "tower",
            axis: "width",
            min: 4,
            max: 2,
        };
        assert_eq!(error.to_string(), "tower width range 4..=2 is empty");
    }

    #[test]
    fn invalid_config_generates_nothing() {
        let config = GenerationConfig {
            columns: 0,
            ..GenerationConfig::default()
        };
        assert!(Bootstrap.generate(&config).is_err());
    }
}
