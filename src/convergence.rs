//! Convergence Tracker (C3): window-based trend detection over the
//! per-round consensus-percentage history.
//!
//! Purely diagnostic — the orchestrator's termination decision is driven
//! by `FULL_CONSENSUS` or round-budget exhaustion, never by this tracker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Converging,
    Diverging,
    Stable,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    history: Vec<f64>,
    window_size: usize,
    tolerance: f64,
}

impl Default for ConvergenceTracker {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            window_size: 3,
            tolerance: 0.05,
        }
    }
}

impl ConvergenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(window_size: usize, tolerance: f64) -> Self {
        Self {
            history: Vec::new(),
            window_size,
            tolerance,
        }
    }

    pub fn record(&mut self, consensus_percentage: f64) {
        self.history.push(consensus_percentage);
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    fn window(&self) -> Option<&[f64]> {
        if self.history.len() < self.window_size || self.window_size == 0 {
            return None;
        }
        Some(&self.history[self.history.len() - self.window_size..])
    }

    /// The last `window_size` scores are strictly monotonically increasing.
    pub fn converging(&self) -> bool {
        self.window()
            .map(|w| w.windows(2).all(|pair| pair[1] > pair[0]))
            .unwrap_or(false)
    }

    /// The last `window_size` scores are strictly monotonically decreasing.
    pub fn diverging(&self) -> bool {
        self.window()
            .map(|w| w.windows(2).all(|pair| pair[1] < pair[0]))
            .unwrap_or(false)
    }

    /// Max deviation from the window mean is within `tolerance`.
    pub fn stable(&self) -> bool {
        self.window()
            .map(|w| {
                let mean = w.iter().sum::<f64>() / w.len() as f64;
                w.iter().all(|v| (v - mean).abs() <= self.tolerance)
            })
            .unwrap_or(false)
    }

    /// First of {CONVERGING, DIVERGING, STABLE, UNKNOWN} that applies.
    pub fn trend(&self) -> Trend {
        if self.converging() {
            Trend::Converging
        } else if self.diverging() {
            Trend::Diverging
        } else if self.stable() {
            Trend::Stable
        } else {
            Trend::Unknown
        }
    }
}
