//! Task board state core.
//!
//! This module implements the board's single source of truth and the
//! machinery around it: fractional-rank ordering within status lanes,
//! a bounded undo/redo history over every mutation, optimistic reorders
//! confirmed asynchronously with per-operation rollback, and a simulated
//! external actor whose concurrent edits are merged last-write-wins. The
//! module follows hexagonal architecture:
//!
//! - Domain types and pure algorithms in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
