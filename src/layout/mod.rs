//! Layout module orchestrator.
//!
//! Downstream crates import layout types from here while the implementation
//! details live in the private `core` and `config` modules.

mod config;
mod core;

pub use config::{LayoutConfig, LayoutOptions};
pub use self::core::{Layout, Square};
