use castle_maze_system_bootstrap::{Bootstrap, ConfigError, GenerationConfig};
use castle_maze_system_features::{FeatureTuning, SizeRange};

#[test]
fn partial_toml_falls_back_to_defaults() {
    let config: GenerationConfig = toml::from_str(
        r#"
            columns = 12
            seed = 77
        "#,
    )
    .expect("partial config parses");

    assert_eq!(config.columns, 12);
    assert_eq!(config.seed, 77);
    assert_eq!(config.rows, GenerationConfig::default().rows);
    assert_eq!(config.features, FeatureTuning::default());
    assert!(config.jitter_densities);
}

#[test]
fn feature_tables_override_tuning() {
    let config: GenerationConfig = toml::from_str(
        r#"
            jitter_densities = false

            [features.towers]
            density = 0.02
            width = { min = 2, max = 2 }
            length = { min = 1, max = 4 }
            placement = { retries = 5, margin = 1 }
        "#,
    )
    .expect("feature table parses");

    let towers = config.features.towers;
    assert_eq!(towers.density, 0.02);
    assert_eq!(towers.width, SizeRange::new(2, 2));
    assert_eq!(towers.placement.retries, 5);
    assert_eq!(
        config.features.courtyards,
        FeatureTuning::default().courtyards,
        "untouched kinds keep their defaults",
    );
}

#[test]
fn invalid_toml_values_are_rejected_before_generation() {
    let config: GenerationConfig = toml::from_str(
        r#"
            [features.courtyards]
            density = 0.01
            width = { min = 5, max = 2 }
            length = { min = 2, max = 5 }
            placement = { retries = 2, margin = 0 }
        "#,
    )
    .expect("structurally valid config parses");

    assert_eq!(
        Bootstrap.generate(&config).map(|_| ()),
        Err(ConfigError::EmptySizeRange {
            feature: "courtyard",
            axis: "width",
            min: 5,
            max: 2,
        })
    );
}

#[test]
fn configs_round_trip_through_toml() {
    let config = GenerationConfig {
        columns: 9,
        rows: 7,
        seed: 3,
        jitter_densities: false,
        features: FeatureTuning::disabled(),
    };
    let text = toml::to_string(&config).expect("serialize");
    let parsed: GenerationConfig = toml::from_str(&text).expect("parse");
    assert_eq!(parsed, config);
}
