/// Adaptive worker-count controller.
///
/// A bang-bang controller with a hysteresis band: one sample of the disk
/// queue per batch boundary, one step up or down at most. The state lives in
/// a `ThroughputController` value owned by a single scan invocation and is
/// only touched by the orchestrator thread between batches.
use tracing::debug;

/// Step `current` one worker towards the band `[low, high]` on the queue.
///
/// Above `high` sheds a worker, below `low` adds one, inside keeps the count.
/// The result is always within `[min, max]`.
pub fn adjust(
    current: usize,
    observed_queue: f64,
    min: usize,
    max: usize,
    queue_high: f64,
    queue_low: f64,
) -> usize {
    let next = if observed_queue > queue_high {
        current.saturating_sub(1).max(min)
    } else if observed_queue < queue_low {
        current.saturating_add(1).min(max)
    } else {
        current
    };
    next.clamp(min, max)
}

/// Worker count carried from one batch to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    pub current_threads: usize,
}

#[derive(Debug, Clone)]
pub struct ThroughputController {
    state: ControllerState,
    min_threads: usize,
    max_threads: usize,
    queue_high: f64,
    queue_low: f64,
}

impl ThroughputController {
    /// Build a controller; `initial` is clamped into the bounds.
    pub fn new(
        min_threads: usize,
        max_threads: usize,
        initial: usize,
        queue_high: f64,
        queue_low: f64,
    ) -> Self {
        Self {
            state: ControllerState {
                current_threads: initial.clamp(min_threads, max_threads),
            },
            min_threads,
            max_threads,
            queue_high,
            queue_low,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Fold one reading into the state and return the next batch's worker count.
    ///
    /// `None` means the signal was unavailable and leaves the count unchanged.
    pub fn next_workers(&mut self, reading: Option<f64>) -> usize {
        let before = self.state.current_threads;
        if let Some(queue) = reading {
            self.state.current_threads = adjust(
                before,
                queue,
                self.min_threads,
                self.max_threads,
                self.queue_high,
                self.queue_low,
            );
        }
        let after = self.state.current_threads;
        if after != before {
            debug!("queue {:?}: workers {} -> {}", reading, before, after);
        }
        after
    }
}
