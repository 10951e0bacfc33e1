use std::time::{Duration, Instant};

use tracing::debug;

/// Records named timing measurements for the phases of one table's analysis.
#[derive(Debug, Default, Clone)]
pub struct Profiler {
    phases: Vec<PhaseTiming>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_phase<F, T>(&mut self, name: &'static str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let output = f();
        self.push_phase(name, start.elapsed());
        output
    }

    pub fn push_phase(&mut self, name: &'static str, duration: Duration) {
        debug!(phase = name, elapsed_us = duration.as_micros(), "phase finished");
        self.phases.push(PhaseTiming { name, duration });
    }

    pub fn phases(&self) -> &[PhaseTiming] {
        &self.phases
    }

    pub fn total(&self) -> Duration {
        self.phases.iter().map(|phase| phase.duration).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTiming {
    pub name: &'static str,
    pub duration: Duration,
}
