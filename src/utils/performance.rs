//! Operation timing
//!
//! Collects durations of named operations (currently the export pipeline) so
//! hosts can inspect them from the console.

use std::collections::HashMap;

/// Performance monitor for measuring operation times
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    measurements: HashMap<String, Vec<f32>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_measurement(&mut self, operation: &str, duration_ms: f32) {
        self.measurements
            .entry(operation.to_string())
            .or_default()
            .push(duration_ms);
    }

    pub fn get_average_time(&self, operation: &str) -> Option<f32> {
        let times = self.measurements.get(operation)?;
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<f32>() / times.len() as f32)
    }

    pub fn count(&self, operation: &str) -> usize {
        self.measurements.get(operation).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_and_count() {
        let mut monitor = PerformanceMonitor::new();
        assert_eq!(monitor.get_average_time("export"), None);
        monitor.record_measurement("export", 100.0);
        monitor.record_measurement("export", 300.0);
        assert_eq!(monitor.get_average_time("export"), Some(200.0));
        assert_eq!(monitor.count("export"), 2);
        assert_eq!(monitor.count("print"), 0);
    }
}
