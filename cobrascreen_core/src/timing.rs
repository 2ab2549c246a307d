//! Wall clock timing of screens and other long running operations
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::info;

use crate::metabolic_model::model::Model;

/// Run `op`, returning its result along with how long it took
pub fn timed<T, F: FnOnce() -> T>(op: F) -> (T, Duration) {
    let start = Instant::now();
    let result = op();
    (result, start.elapsed())
}

/// Run a screening function on a model, returning its result and the elapsed seconds
///
/// The elapsed time is reported whatever the screen returns, including an `Err`.
pub fn time_screen<T, F>(screen_fn: F, model: &mut Model) -> (T, f64)
where
    F: FnOnce(&mut Model) -> T,
{
    let (result, elapsed) = timed(|| screen_fn(model));
    (result, elapsed.as_secs_f64())
}

/// Elapsed seconds of named operations, in the order they were first recorded
#[derive(Clone, Debug, Default)]
pub struct TimingLog {
    entries: IndexMap<String, f64>,
}

impl TimingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time `op` under `name`
    ///
    /// The entry is recorded when `op` finishes, whether it returns normally or unwinds. A
    /// second operation with the same name replaces the earlier time.
    pub fn time<T, F: FnOnce() -> T>(&mut self, name: &str, op: F) -> T {
        let _guard = TimingGuard {
            log: self,
            name: name.to_string(),
            start: Instant::now(),
        };
        op()
    }

    /// Record an externally measured time
    pub fn record(&mut self, name: &str, seconds: f64) {
        info!("{}: {}s", name, seconds);
        self.entries.insert(name.to_string(), seconds);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, secs)| (name.as_str(), *secs))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Records the elapsed time into the log when dropped
struct TimingGuard<'a> {
    log: &'a mut TimingLog,
    name: String,
    start: Instant,
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        let seconds = self.start.elapsed().as_secs_f64();
        self.log.record(&self.name, seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essentiality::screen;
    use crate::test_models::transcription_model;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn time_screen_reports_elapsed() {
        let mut model = transcription_model();
        let (results, seconds) = time_screen(screen, &mut model);
        assert_eq!(results.len(), 2);
        assert!(seconds >= 0.);

        let (failed, seconds): (Result<(), String>, f64) =
            time_screen(|_| Err("solver exploded".to_string()), &mut model);
        assert!(failed.is_err());
        assert!(seconds >= 0.);
    }

    #[test]
    fn log_records_in_order() {
        let mut log = TimingLog::new();
        let value = log.time("first", || 1 + 1);
        assert_eq!(value, 2);
        log.time("second", || std::thread::sleep(Duration::from_millis(5)));
        assert_eq!(
            log.entries().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
        assert!(log.get("second").unwrap() >= 0.005);
        log.record("first", 3.);
        assert_eq!(log.len(), 2);
        assert_eq!(log.get("first"), Some(3.));
    }

    #[test]
    fn log_records_when_operation_panics() {
        let mut log = TimingLog::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            log.time("boom", || panic!("screen failed"))
        }));
        assert!(result.is_err());
        assert!(log.get("boom").unwrap() >= 0.);
    }
}
