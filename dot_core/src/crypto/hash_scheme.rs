//! Pluggable digest algorithms, addressed by object identifier.
//!
//! Envelopes declare which [`HashScheme`] binds them to their content-addressed
//! identity, and other records carry digests in their tagged external form
//! ([`TaggedDigest`]). Schemes this build doesn't know resolve to
//! [`HashScheme::Unsupported`] (or [`HashSchemeInstance::Unsupported`]) rather than
//! failing to parse, so new algorithms can be rolled out without breaking readers that
//! only touch them incidentally.

use serde::{Deserialize, Serialize};
use sha3::Digest as _;
use std::fmt;
use thiserror::Error;

/// Length in bytes of every digest produced by a supported scheme.
pub const DIGEST_LEN: usize = 32;

/// Object identifier arcs for SHA3-256 (NIST hash algorithm registry).
pub const SHA3_256_ARCS: &[u64] = &[2, 16, 840, 1, 101, 3, 4, 2, 8];

/// Object identifier arcs for the original (pre-standard) Keccak-256.
pub const KECCAK_256_ARCS: &[u64] = &[1, 3, 6, 1, 4, 1, 51157, 11, 1];

/// An object identifier naming an algorithm.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemeId(Vec<u64>);

impl SchemeId {
    pub fn new(arcs: impl Into<Vec<u64>>) -> Self {
        SchemeId(arcs.into())
    }

    pub fn sha3_256() -> Self {
        SchemeId(SHA3_256_ARCS.to_vec())
    }

    pub fn keccak_256() -> Self {
        SchemeId(KECCAK_256_ARCS.to_vec())
    }

    pub fn arcs(&self) -> &[u64] {
        &self.0
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.0.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{first}")?;
        }
        arcs.try_for_each(|arc| write!(f, ".{arc}"))
    }
}

impl fmt::Debug for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemeId({self})")
    }
}

/// A digest in its external, self-describing wire form.
///
/// This is the only representation that crosses a serialization boundary; the
/// payload is not interpreted until [`HashSchemeInstance::from_tagged`] is called.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaggedDigest {
    pub scheme: SchemeId,

    #[serde(with = "serde_bytes")]
    pub content: Vec<u8>,
}

/// The digest algorithms this build knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashScheme {
    Sha3_256,
    Keccak256,

    /// Any identifier not recognised above.
    Unsupported,
}

impl HashScheme {
    /// Resolve an identifier. Never fails: unknown identifiers are [`HashScheme::Unsupported`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use dot_core::crypto::hash_scheme::{HashScheme, SchemeId};
    /// assert_eq!(HashScheme::for_id(&SchemeId::sha3_256()), HashScheme::Sha3_256);
    /// assert!(!HashScheme::for_id(&SchemeId::new(vec![1, 2, 3])).is_supported());
    /// ```
    pub fn for_id(id: &SchemeId) -> Self {
        match id.arcs() {
            arcs if arcs == SHA3_256_ARCS => HashScheme::Sha3_256,
            arcs if arcs == KECCAK_256_ARCS => HashScheme::Keccak256,
            _ => HashScheme::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, HashScheme::Unsupported)
    }

    /// The identifier of this scheme, or `None` if it is [`HashScheme::Unsupported`].
    pub fn id(&self) -> Option<SchemeId> {
        match self {
            HashScheme::Sha3_256 => Some(SchemeId::sha3_256()),
            HashScheme::Keccak256 => Some(SchemeId::keccak_256()),
            HashScheme::Unsupported => None,
        }
    }

    /// Digest arbitrary bytes.
    pub fn digest(&self, input: &[u8]) -> Result<HashSchemeInstance, UnsupportedScheme> {
        match self {
            HashScheme::Sha3_256 => Ok(HashSchemeInstance::Sha3_256(
                sha3::Sha3_256::digest(input).into(),
            )),
            HashScheme::Keccak256 => Ok(HashSchemeInstance::Keccak256(
                sha3::Keccak256::digest(input).into(),
            )),
            HashScheme::Unsupported => Err(UnsupportedScheme),
        }
    }
}

/// A concrete digest value under a particular [`HashScheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashSchemeInstance {
    Sha3_256([u8; DIGEST_LEN]),
    Keccak256([u8; DIGEST_LEN]),

    /// A digest whose scheme is unknown, or whose payload was malformed for its scheme.
    Unsupported,
}

impl HashSchemeInstance {
    /// Interpret a tagged digest.
    ///
    /// Unknown identifiers, and payloads that are not exactly [`DIGEST_LEN`] bytes for a
    /// known identifier, produce [`HashSchemeInstance::Unsupported`].
    pub fn from_tagged(tagged: &TaggedDigest) -> Self {
        let Ok(value) = <[u8; DIGEST_LEN]>::try_from(tagged.content.as_slice()) else {
            return HashSchemeInstance::Unsupported;
        };

        match HashScheme::for_id(&tagged.scheme) {
            HashScheme::Sha3_256 => HashSchemeInstance::Sha3_256(value),
            HashScheme::Keccak256 => HashSchemeInstance::Keccak256(value),
            HashScheme::Unsupported => HashSchemeInstance::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, HashSchemeInstance::Unsupported)
    }

    pub fn scheme(&self) -> HashScheme {
        match self {
            HashSchemeInstance::Sha3_256(_) => HashScheme::Sha3_256,
            HashSchemeInstance::Keccak256(_) => HashScheme::Keccak256,
            HashSchemeInstance::Unsupported => HashScheme::Unsupported,
        }
    }

    pub fn id(&self) -> Option<SchemeId> {
        self.scheme().id()
    }

    /// The raw digest bytes.
    ///
    /// # Panics
    ///
    /// Panics on [`HashSchemeInstance::Unsupported`]. Check [`is_supported`][Self::is_supported] first.
    pub fn value(&self) -> &[u8] {
        match self {
            HashSchemeInstance::Sha3_256(value) | HashSchemeInstance::Keccak256(value) => value,
            HashSchemeInstance::Unsupported => {
                panic!("value() called on an unsupported hash scheme instance")
            }
        }
    }

    /// Lower back into the tagged external form.
    pub fn canonical_form(&self) -> Result<TaggedDigest, UnsupportedScheme> {
        match self {
            HashSchemeInstance::Sha3_256(value) => Ok(TaggedDigest {
                scheme: SchemeId::sha3_256(),
                content: value.to_vec(),
            }),
            HashSchemeInstance::Keccak256(value) => Ok(TaggedDigest {
                scheme: SchemeId::keccak_256(),
                content: value.to_vec(),
            }),
            HashSchemeInstance::Unsupported => Err(UnsupportedScheme),
        }
    }
}

impl fmt::Display for HashSchemeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashSchemeInstance::Sha3_256(value) => {
                write!(f, "sha3-256:")?;
                crate::util::hex::bytes_as_hex(value.iter(), f)
            }
            HashSchemeInstance::Keccak256(value) => {
                write!(f, "keccak-256:")?;
                crate::util::hex::bytes_as_hex(value.iter(), f)
            }
            HashSchemeInstance::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unsupported hash scheme")]
pub struct UnsupportedScheme;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHA3_EMPTY: &str = "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a";
    const KECCAK_EMPTY: &str = "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";

    #[test]
    fn test_known_digests() {
        let sha3 = HashScheme::Sha3_256.digest(b"").unwrap();
        assert_eq!(hex::encode(sha3.value()), SHA3_EMPTY);

        let keccak = HashScheme::Keccak256.digest(b"").unwrap();
        assert_eq!(hex::encode(keccak.value()), KECCAK_EMPTY);
    }

    #[test]
    fn test_tagged_round_trip() {
        let instance = HashScheme::Keccak256.digest(b"hello").unwrap();
        let tagged = instance.canonical_form().unwrap();
        assert_eq!(tagged.scheme, SchemeId::keccak_256());
        assert_eq!(HashSchemeInstance::from_tagged(&tagged), instance);
    }

    #[test]
    fn test_unknown_identifier_is_unsupported() {
        let tagged = TaggedDigest {
            scheme: SchemeId::new(vec![1, 2, 840, 999]),
            content: vec![0; DIGEST_LEN],
        };

        let instance = HashSchemeInstance::from_tagged(&tagged);
        assert!(!instance.is_supported());
        assert_eq!(instance.id(), None);
        assert_eq!(instance.canonical_form(), Err(UnsupportedScheme));
        assert_eq!(HashScheme::for_id(&tagged.scheme).digest(b"x"), Err(UnsupportedScheme));
    }

    #[test]
    fn test_wrong_length_is_unsupported() {
        let tagged = TaggedDigest {
            scheme: SchemeId::sha3_256(),
            content: vec![0; DIGEST_LEN - 1],
        };
        assert_eq!(
            HashSchemeInstance::from_tagged(&tagged),
            HashSchemeInstance::Unsupported
        );
    }

    #[test]
    fn test_unknown_scheme_survives_deserialization() {
        #[derive(Serialize, Deserialize)]
        struct Record {
            name: String,
            digest: TaggedDigest,
        }

        let bytes = bincode::serialize(&Record {
            name: "unrelated".to_string(),
            digest: TaggedDigest {
                scheme: SchemeId::new(vec![9, 9, 9]),
                content: vec![1, 2, 3],
            },
        })
        .unwrap();

        let record: Record = bincode::deserialize(&bytes).unwrap();
        assert_eq!(record.name, "unrelated");
        assert!(!HashSchemeInstance::from_tagged(&record.digest).is_supported());
    }

    #[test]
    #[should_panic(expected = "unsupported hash scheme instance")]
    fn test_value_on_unsupported_panics() {
        HashSchemeInstance::Unsupported.value();
    }

    #[test]
    fn test_scheme_id_display() {
        assert_eq!(SchemeId::sha3_256().to_string(), "2.16.840.1.101.3.4.2.8");
        assert_eq!(SchemeId::new(Vec::new()).to_string(), "");
    }
}
