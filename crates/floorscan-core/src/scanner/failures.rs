/// Append-only accumulator for access failures.
///
/// Workers of the same batch record into one shared log; the orchestrator
/// drains it at each batch boundary to forward the new failures as
/// progress events.
use crate::model::AccessFailure;
use parking_lot::Mutex;
use tracing::trace;

#[derive(Debug, Default)]
pub struct FailureLog {
    inner: Mutex<FailureLogInner>,
}

#[derive(Debug, Default)]
struct FailureLogInner {
    entries: Vec<AccessFailure>,
    /// Index of the first failure not yet returned by `take_new`.
    reported: usize,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, failure: AccessFailure) {
        trace!("access failure on {}: {}", failure.path.display(), failure.message);
        self.inner.lock().entries.push(failure);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Failures recorded since the previous call.
    pub fn take_new(&self) -> Vec<AccessFailure> {
        let mut inner = self.inner.lock();
        let start = inner.reported;
        inner.reported = inner.entries.len();
        inner.entries[start..].to_vec()
    }

    pub fn into_vec(self) -> Vec<AccessFailure> {
        self.inner.into_inner().entries
    }
}
