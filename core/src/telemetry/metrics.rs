use std::sync::Mutex;

/// Counters for the scoreboard pipeline: frames pushed to the display,
/// export calls, and export failures.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    presented: usize,
    exported: usize,
    export_errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                presented: 0,
                exported: 0,
                export_errors: 0,
            }),
        }
    }

    pub fn record_presented(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.presented += 1;
        }
    }

    pub fn record_exported(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.exported += 1;
        }
    }

    pub fn record_export_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.export_errors += 1;
        }
    }

    pub fn presented(&self) -> usize {
        self.inner.lock().map(|metrics| metrics.presented).unwrap_or(0)
    }

    pub fn export_counts(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.exported, metrics.export_errors)
        } else {
            (0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = MetricsRecorder::new();
        metrics.record_presented();
        metrics.record_presented();
        metrics.record_exported();
        metrics.record_export_error();
        assert_eq!(metrics.presented(), 2);
        assert_eq!(metrics.export_counts(), (1, 1));
    }
}
