//! Adapter implementations of the board's ports.

pub mod memory;
