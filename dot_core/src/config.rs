//! Per-call protocol settings.

use crate::{crypto::hash_scheme::HashScheme, dot::inheritance::InheritanceMap};
use serde::{Deserialize, Serialize};

/// Settings for minting envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotConfig {
    /// Scheme declared on new envelopes and used for their identity.
    pub hash_scheme: HashScheme,

    /// Applied when a DOT arrives with an empty inheritance map.
    pub default_inheritance: InheritanceMap,
}

impl Default for DotConfig {
    fn default() -> Self {
        DotConfig {
            hash_scheme: HashScheme::Keccak256,
            default_inheritance: InheritanceMap::new(),
        }
    }
}
