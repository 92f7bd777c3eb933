//! Host settings
//!
//! Gameplay constants are fixed (see [`crate::consts`]); these settings only
//! control how a host drives the simulation.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::REFERENCE_FRAME_MS;

/// How per-frame probabilities (toast onset, hand spawn) relate to elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FramePacing {
    /// One roll per frame regardless of frame length (classic behaviour)
    #[default]
    PerFrame,
    /// Rolls scaled so the rate per elapsed millisecond matches a frame of
    /// `reference_frame_ms`
    Normalized { reference_frame_ms: f32 },
}

impl FramePacing {
    /// Effective probability for a frame of `dt_ms`, given a per-frame chance
    pub fn scale_chance(&self, chance: f32, dt_ms: f32) -> f32 {
        match *self {
            FramePacing::PerFrame => chance,
            FramePacing::Normalized { reference_frame_ms } => {
                if dt_ms <= 0.0 {
                    return 0.0;
                }
                let frames = dt_ms / reference_frame_ms;
                1.0 - (1.0 - chance).powf(frames)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (None = derive from the clock)
    pub seed: Option<u64>,
    /// Frame pacing for per-frame probabilities
    pub pacing: FramePacing,
    /// Longest frame the simulation will accept, in ms (longer frames are clamped)
    pub max_frame_ms: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            pacing: FramePacing::PerFrame,
            max_frame_ms: 250.0,
        }
    }
}

impl Settings {
    /// Settings with per-millisecond pacing at the nominal 60 Hz frame
    pub fn normalized() -> Self {
        Self {
            pacing: FramePacing::Normalized {
                reference_frame_ms: REFERENCE_FRAME_MS,
            },
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&contents)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.max_frame_ms > 0.0) {
            return Err(SettingsError::Invalid {
                field: "max_frame_ms",
                reason: "must be positive",
            });
        }
        if let FramePacing::Normalized { reference_frame_ms } = self.pacing {
            if !(reference_frame_ms > 0.0) {
                return Err(SettingsError::Invalid {
                    field: "pacing.reference_frame_ms",
                    reason: "must be positive",
                });
            }
        }
        Ok(())
    }

    /// The configured seed, or one derived from the system clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x5eed)
        })
    }
}
