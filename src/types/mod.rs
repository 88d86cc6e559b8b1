//! Shared types

pub mod error;

pub use error::{PledgeError, Result};
