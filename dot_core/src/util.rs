//! Helper utilities.

pub(crate) mod hex;
