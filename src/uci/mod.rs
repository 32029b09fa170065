//! UCI (Universal Chess Interface) Protocol
//!
//! Minimal UCI front end: fixed-depth `go`, no clocks, no pondering.

pub mod protocol;

pub use protocol::{UCI, UciError};
