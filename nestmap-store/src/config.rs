use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

///
/// Knobs for building stores, loadable from a TOML file:
///
/// ```toml
/// lenient = true
/// infer_lengths = false
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct BuildOptions {
    /// Skip malformed input instead of failing the build.
    pub lenient: bool,
    /// Take the largest forward end as the sequence length when none is declared.
    pub infer_lengths: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            lenient: false,
            infer_lengths: true,
        }
    }
}

impl BuildOptions {
    pub fn lenient() -> Self {
        BuildOptions {
            lenient: true,
            ..Default::default()
        }
    }
}

impl TryFrom<&Path> for BuildOptions {
    type Error = StoreError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
