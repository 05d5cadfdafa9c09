//! Pegboard: an in-process task board state core.
//!
//! This crate maintains an ordered collection of task records grouped
//! into status lanes and provides stable fractional-rank reordering, a
//! bounded undo/redo history over all mutations, optimistic local
//! mutation with asynchronous confirmation and rollback, and merge of
//! conflicting concurrent edits from a simulated external actor.
//!
//! # Architecture
//!
//! Pegboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task state, ordering, and history logic with no
//!   infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the confirmation,
//!   notification, and persistence collaborators
//! - **Adapters**: In-process implementations of the ports

pub mod board;
