//! Seeding and propagation configuration (spec §6). Both are plain,
//! `serde`-(de)serializable value types so a run can be described in a
//! JSON launch-config file and loaded without the core ever touching
//! a file path directly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampComparison {
    Disabled,
    PreferNewer,
    PreferOlder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebrakingMethod {
    Random,
    PreferLowestAsn,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeedingConfig {
    pub origin_only: bool,
    pub timestamp_comparison: TimestampComparison,
    pub tiebraking_method: TiebrakingMethod,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        SeedingConfig {
            origin_only: false,
            timestamp_comparison: TimestampComparison::PreferNewer,
            tiebraking_method: TiebrakingMethod::PreferLowestAsn,
        }
    }
}

/// Propagation reuses the same tie-break vocabulary (spec §4.5 step 6
/// names "the same options as §4.4"); kept as a distinct type from
/// `SeedingConfig` since `origin_only` has no meaning during
/// propagation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PropagationConfig {
    pub timestamp_comparison: TimestampComparison,
    pub tiebraking_method: TiebrakingMethod,
    /// Seed for the deterministic tie-break RNG (spec §5, §9: owned by
    /// the propagator, not a process-wide singleton).
    pub rng_seed: u64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        PropagationConfig {
            timestamp_comparison: TimestampComparison::Disabled,
            tiebraking_method: TiebrakingMethod::PreferLowestAsn,
            rng_seed: 0,
        }
    }
}

/// Bundles everything a run needs beyond the parsed records
/// themselves: whether to elide stubs, the seeding/propagation
/// behavior, and the three file paths a CLI run reads/writes. Loadable
/// from a JSON launch-config file via `serde_json`, per spec.md §1's
/// "JSON launch-config loading" (an external collaborator of the
/// core, homed here per `SPEC_FULL.md` §2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub stub_elision: bool,
    pub seeding: SeedingConfig,
    pub propagation: PropagationConfig,
    pub relationships_path: PathBuf,
    pub announcements_path: PathBuf,
    pub results_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            stub_elision: false,
            seeding: SeedingConfig::default(),
            propagation: PropagationConfig::default(),
            relationships_path: PathBuf::from("relationships.tsv"),
            announcements_path: PathBuf::from("announcements.tsv"),
            results_path: PathBuf::from("results.tsv"),
        }
    }
}

impl RunConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }
}

impl From<PropagationConfig> for crate::policy::TieBreakConfig {
    fn from(cfg: PropagationConfig) -> Self {
        crate::policy::TieBreakConfig {
            timestamp_comparison: match cfg.timestamp_comparison {
                TimestampComparison::Disabled => crate::policy::TimestampComparison::Disabled,
                TimestampComparison::PreferNewer => crate::policy::TimestampComparison::PreferNewer,
                TimestampComparison::PreferOlder => crate::policy::TimestampComparison::PreferOlder,
            },
            method: match cfg.tiebraking_method {
                TiebrakingMethod::Random => crate::policy::TieBreakMethod::Random,
                TiebrakingMethod::PreferLowestAsn => crate::policy::TieBreakMethod::LowestAsn,
            },
        }
    }
}
