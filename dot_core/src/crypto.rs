//! Cryptographic primitives, wrappers, and utilities.

pub mod domain_separator;
pub mod hash_scheme;
pub mod separable;
pub mod signed;
pub mod siv;
pub mod symmetric_key;
