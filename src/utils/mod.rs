//! Shared request utilities.

pub mod extract;
