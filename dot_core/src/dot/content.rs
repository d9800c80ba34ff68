use crate::entity::EntityId;
use serde::{Deserialize, Serialize};

/// The secret part of a DOT: who grants what to whom.
///
/// `uri` and `permissions` are opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DotContent {
    pub src: EntityId,
    pub dst: EntityId,
    pub uri: String,
    pub permissions: Vec<String>,
}

impl DotContent {
    pub fn new(
        src: EntityId,
        dst: EntityId,
        uri: impl Into<String>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        DotContent {
            src,
            dst,
            uri: uri.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}
