//! Shared cryptographic helpers for the blog workspace.
//!
//! - `jwt`: RS256 bearer token issuing and validation

pub mod jwt;
