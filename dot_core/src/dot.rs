//! Delegations Of Trust and their encrypted envelopes.

pub mod content;
pub mod decrypt;
pub mod delegate;
pub mod encrypt;
pub mod envelope;
pub mod error;
pub mod header;
pub mod inheritance;

mod sealed;

pub use content::DotContent;
pub use decrypt::decrypt_dot;
pub use delegate::delegation_key_for;
pub use encrypt::encrypt_dot;
pub use envelope::{Envelope, EnvelopeError, Extension};
pub use error::{DecryptError, DelegationError, EncryptError, TamperReason};
pub use header::PlaintextHeader;
pub use inheritance::{DisclosedLabel, DisclosedSlot, Disclosure, InheritanceMap};

use crate::partition::PartitionLabel;
use serde::{Deserialize, Serialize};

/// A plaintext DOT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dot {
    pub content: DotContent,
    pub header: PlaintextHeader,
    pub partition_label: PartitionLabel,
    pub inheritance: InheritanceMap,
}

impl Dot {
    /// A DOT addressed to `content.dst`, with every slot revealed to prefix holders.
    pub fn new(content: DotContent, partition_label: PartitionLabel) -> Self {
        Dot {
            header: PlaintextHeader { dst: content.dst },
            content,
            partition_label,
            inheritance: InheritanceMap::new(),
        }
    }

    pub fn with_inheritance(mut self, inheritance: InheritanceMap) -> Self {
        self.inheritance = inheritance;
        self
    }
}
