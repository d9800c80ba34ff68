//! Trait for types that are derivable but domain-separated.

use super::domain_separator::SEPARATOR_STR;

/// A trait for types that get domain-separated.
pub trait Separable: Sized {
    /// Directly lift a `[u8; 32]` array into a `Self`.
    ///
    /// <div class="warning">
    ///
    /// This method should only be implemented, but not used directly.
    /// Use [`derive_from_bytes`][`Self::derive_from_bytes`] instead.
    ///
    /// </div>
    ///
    /// # Examples
    ///
    /// ```
    /// # use dot_core::crypto::{
    /// #    separable::Separable,
    /// #    symmetric_key::SymmetricKey
    /// # };
    ///
    /// let key = SymmetricKey::directly_from_32_bytes([0; 32]);
    /// assert_eq!(key.as_slice(), &[0; 32]); // NOTE unchanged!
    /// ```
    fn directly_from_32_bytes(array: [u8; 32]) -> Self;

    /// Derive a `Self` from a byte slice and the [`SEPARATOR_STR`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use dot_core::crypto::{
    /// #    separable::Separable,
    /// #    symmetric_key::SymmetricKey
    /// # };
    ///
    /// let key = SymmetricKey::derive_from_bytes(&[0; 32]);
    /// assert_ne!(key.as_slice(), &[0; 32]);
    /// assert_eq!(key, SymmetricKey::derive_from_bytes(&[0; 32]));
    /// ```
    fn derive_from_bytes(bytes: &[u8]) -> Self {
        Self::directly_from_32_bytes(blake3::derive_key(SEPARATOR_STR, bytes))
    }

    /// Like [`derive_from_bytes`][`Self::derive_from_bytes`], but under an explicit context string.
    fn derive_in_context(context: &str, bytes: &[u8]) -> Self {
        Self::directly_from_32_bytes(blake3::derive_key(context, bytes))
    }
}
