#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_debug_implementations,
    future_incompatible,
    let_underscore,
//     missing_docs,
    rust_2021_compatibility,
    nonstandard_style
)]
#![deny(unreachable_pub)]

pub mod abe;
pub mod config;
pub mod context;
pub mod crypto;
pub mod dot;
pub mod entity;
pub mod keyring;
pub mod partition;
pub mod store;
pub mod util;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
