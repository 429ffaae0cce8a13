//! Single-line codes that reproduce a castle from its generation parameters.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use castle_maze_system_bootstrap::GenerationConfig;
use castle_maze_system_features::FeatureTuning;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CODE_DOMAIN: &str = "castle";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the grid dimensions and payload.
const CODE_HEADER: &str = "castle:v1";
const FIELD_DELIMITER: char = ':';

#[derive(Serialize, Deserialize)]
struct CodePayload {
    seed: u64,
    jitter_densities: bool,
    features: FeatureTuning,
}

/// Encodes the configuration as `castle:v1:<columns>x<rows>:<payload>`.
pub(crate) fn encode(config: &GenerationConfig) -> Result<String, serde_json::Error> {
    let payload = CodePayload {
        seed: config.seed,
        jitter_densities: config.jitter_densities,
        features: config.features,
    };
    let json = serde_json::to_vec(&payload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{CODE_HEADER}:{}x{}:{encoded}",
        config.columns, config.rows
    ))
}

/// Decodes a configuration from a castle code.
pub(crate) fn decode(value: &str) -> Result<GenerationConfig, CastleCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CastleCodeError::Empty);
    }

    let fields: Vec<&str> = trimmed.split(FIELD_DELIMITER).collect();
    let (domain, version, dimensions, payload) = match fields.as_slice() {
        [domain, version, dimensions, payload] => (*domain, *version, *dimensions, *payload),
        [_] => return Err(CastleCodeError::MissingVersion),
        [_, _] => return Err(CastleCodeError::MissingDimensions),
        [_, _, _] => return Err(CastleCodeError::MissingPayload),
        _ => return Err(CastleCodeError::TrailingFields(fields.len().saturating_sub(4))),
    };

    if domain != CODE_DOMAIN {
        return Err(CastleCodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != CODE_VERSION {
        return Err(CastleCodeError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let payload: CodePayload = serde_json::from_slice(&bytes)?;

    Ok(GenerationConfig {
        columns,
        rows,
        seed: payload.seed,
        jitter_densities: payload.jitter_densities,
        features: payload.features,
    })
}

/// Reasons a castle code cannot be decoded.
#[derive(Debug, Error)]
pub(crate) enum CastleCodeError {
    #[error("castle code is empty")]
    Empty,
    #[error("castle code is missing the version")]
    MissingVersion,
    #[error("castle code is missing the grid dimensions")]
    MissingDimensions,
    #[error("castle code is missing the payload")]
    MissingPayload,
    #[error("castle code has {0} unexpected trailing field(s)")]
    TrailingFields(usize),
    #[error("castle code prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("castle code version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    #[error("could not decode castle code payload")]
    InvalidEncoding(#[from] base64::DecodeError),
    #[error("could not parse castle code payload")]
    InvalidPayload(#[from] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), CastleCodeError> {
    let invalid = || CastleCodeError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}
