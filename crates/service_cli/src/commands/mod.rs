//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod normalize;
pub mod overview;
pub mod project;
pub mod rolling;
pub mod scenario;
pub mod scenarios;
