//! Constants for domain separation

/// The domain separator string for DOT encryption: `/dot/`.
pub const SEPARATOR_STR: &str = "/dot/";

/// The same separator as in [`SEPARATOR_STR`], represented as bytes.
pub const SEPARATOR: &[u8] = SEPARATOR_STR.as_bytes();

/// BLAKE3 key-derivation context for mapping slot values to attribute scalars.
pub(crate) const ATTRIBUTE_CONTEXT: &str = "/dot/abe/attribute/";

/// BLAKE3 key-derivation context for turning a KEM shared secret into a [`SymmetricKey`].
///
/// [`SymmetricKey`]: super::symmetric_key::SymmetricKey
pub(crate) const KEM_CONTEXT: &str = "/dot/abe/kem/";
