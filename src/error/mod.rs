//! Error taxonomy shared by every module.

mod types;

pub use types::{LayoutError, Result};
