// RouteWatch - core/mod.rs
//
// Core business logic layer: tokenizing, rule matching, and state tracking.
// Must NOT depend on: app or platform, and never performs I/O.

pub mod classifier;
pub mod model;
pub mod rules;
pub mod state;
pub mod tokenizer;
