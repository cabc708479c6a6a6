//! Common types used throughout the storage client.
//!
//! This module defines enums, request/response types, and data structures
//! used across object operations.

mod common;
mod requests;
mod responses;

pub use common::*;
pub use requests::*;
pub use responses::*;
