// RouteWatch - platform/mod.rs
//
// Platform abstraction layer: config file location and output streams.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
