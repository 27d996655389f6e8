use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters describing how a layout has been mutated over its lifetime.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    sections_added: u64,
    sections_removed: u64,
    rejected: u64,
    bounds_updates: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_added(&mut self) {
        self.sections_added = self.sections_added.saturating_add(1);
    }

    pub fn record_removed(&mut self, count: usize) {
        if count > 0 {
            self.sections_removed = self.sections_removed.saturating_add(count as u64);
        }
    }

    pub fn record_rejected(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    pub fn record_bounds_update(&mut self) {
        self.bounds_updates = self.bounds_updates.saturating_add(1);
    }

    pub fn sections_added(&self) -> u64 {
        self.sections_added
    }

    pub fn sections_removed(&self) -> u64 {
        self.sections_removed
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn bounds_updates(&self) -> u64 {
        self.bounds_updates
    }

    pub fn snapshot(&self, section_count: usize, size: u64) -> MetricSnapshot {
        MetricSnapshot {
            sections: section_count as u64,
            size,
            sections_added: self.sections_added,
            sections_removed: self.sections_removed,
            rejected: self.rejected,
            bounds_updates: self.bounds_updates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub sections: u64,
    pub size: u64,
    pub sections_added: u64,
    pub sections_removed: u64,
    pub rejected: u64,
    pub bounds_updates: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("sections".to_string(), json!(self.sections));
        map.insert("size".to_string(), json!(self.size));
        map.insert("sections_added".to_string(), json!(self.sections_added));
        map.insert("sections_removed".to_string(), json!(self.sections_removed));
        map.insert("rejected".to_string(), json!(self.rejected));
        map.insert("bounds_updates".to_string(), json!(self.bounds_updates));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = LayoutMetrics::new();
        metrics.record_added();
        metrics.record_added();
        metrics.record_removed(0);
        metrics.record_removed(1);
        metrics.record_rejected();

        let snapshot = metrics.snapshot(1, 9);
        assert_eq!(snapshot.sections, 1);
        assert_eq!(snapshot.sections_added, 2);
        assert_eq!(snapshot.sections_removed, 1);
        assert_eq!(snapshot.rejected, 1);

        let event = snapshot.to_log_event("room_plan::metrics");
        assert_eq!(event.message, "layout_metrics");
        assert_eq!(event.field("size"), Some(&json!(9)));
    }
}
