use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::Logger;

/// Behavioural switches for a [`Layout`](crate::Layout).
///
/// Deserializes from `{"autoShrink": bool, "overlap": bool}`; missing keys
/// keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LayoutOptions {
    /// Recompute tight bounds after every change. When false, bounds only
    /// grow until the layout is emptied.
    pub auto_shrink: bool,
    /// Allow sections to share cells.
    pub overlap: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            auto_shrink: true,
            overlap: false,
        }
    }
}

impl LayoutOptions {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_auto_shrink(mut self, enabled: bool) -> Self {
        self.auto_shrink = enabled;
        self
    }

    pub fn with_overlap(mut self, enabled: bool) -> Self {
        self.overlap = enabled;
        self
    }
}

/// Options plus the ambient hooks a layout reports through.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub options: LayoutOptions,
    /// Optional structured logger used by the layout.
    pub logger: Option<Logger>,
    /// Target field used on every emitted log event.
    pub log_target: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            options: LayoutOptions::default(),
            logger: None,
            log_target: "room_plan::layout".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }
}
