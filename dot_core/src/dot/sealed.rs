use super::{content::DotContent, inheritance::InheritanceMap};
use crate::{crypto::signed::Signed, partition::PartitionLabel};
use serde::{Deserialize, Serialize};

/// The plaintext behind an envelope's content ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SealedDot {
    pub(crate) content: Signed<DotContent>,
    pub(crate) partition_label: PartitionLabel,
    pub(crate) inheritance: InheritanceMap,
}
