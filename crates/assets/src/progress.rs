/// Bytes read so far for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    /// Unknown when the source size could not be determined.
    pub total: Option<u64>,
}

impl LoadProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(100.0),
            Some(total) => Some(self.loaded as f64 / total as f64 * 100.0),
            None => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|t| self.loaded >= t)
    }
}

/// Side channel for load progress. Purely informational.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: LoadProgress);
}

impl<F: FnMut(LoadProgress)> ProgressObserver for F {
    fn on_progress(&mut self, progress: LoadProgress) {
        self(progress)
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: LoadProgress) {}
}

/// Logs `<label>: <n>% loaded` at debug level.
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, progress: LoadProgress) {
        match progress.percent() {
            Some(pct) => tracing::debug!("{}: {:.0}% loaded", self.label, pct),
            None => tracing::debug!("{}: {} bytes loaded", self.label, progress.loaded),
        }
    }
}
