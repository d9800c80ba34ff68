use crate::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Routing metadata left in the clear so recipients can find DOTs addressed to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaintextHeader {
    pub dst: EntityId,
}
