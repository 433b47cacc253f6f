//! Elapsed-time instrumentation for inventory operations.

use std::time::{Duration, Instant};

/// Log target for timing events, so hosts can route them separately.
pub const TIMING_TARGET: &str = "rental_inventory::timing";

/// The value produced by an operation together with how long it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timed<T> {
    /// Operation result.
    pub value: T,
    /// Wall-clock time spent producing `value`.
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Discard the measurement and keep the value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Run `operation`, measure it, and emit an `info` event on
/// [`TIMING_TARGET`].
///
/// The event is emitted whether the operation returned a success or an
/// error value.
///
/// # Examples
///
/// ```
/// use rental_core::timed;
///
/// let timed = timed("sum", || (1..=4).sum::<u32>());
/// assert_eq!(timed.value, 10);
/// ```
#[must_use]
pub fn timed<T, F>(name: &'static str, operation: F) -> Timed<T>
where
    F: FnOnce() -> T,
{
    let started_at = Instant::now();
    let value = operation();
    let elapsed = started_at.elapsed();
    log::info!(
        target: TIMING_TARGET,
        "{name} took {:.5} seconds",
        elapsed.as_secs_f64()
    );
    Timed { value, elapsed }
}
