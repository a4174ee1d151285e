// RouteWatch - app/mod.rs
//
// Application layer: the streaming loop and notification encoding.
// Dependencies: core layer.

pub mod notify;
pub mod pipeline;
