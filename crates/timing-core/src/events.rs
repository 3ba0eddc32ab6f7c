//! Diagnostic events emitted while timing, and the sinks that receive them.

use model::{CrossingPoint, LapRecord};
use tracing::{debug, info, warn};

use crate::error::InterpolationError;

#[derive(Clone, Debug, PartialEq)]
pub enum TimingEvent {
    /// A fix came within the threshold of the line.
    Armed { timestamp_ms: u64, distance_m: f64 },
    /// A fix was stored; `index` is the next slot to be written.
    Buffered { index: usize, full: bool },
    Resolved(CrossingPoint),
    Unresolved(InterpolationError),
    RaceStarted(CrossingPoint),
    LapCompleted { lap: LapRecord, new_best: bool },
}

/// Receives every [`TimingEvent`]. Must not fail; the timer ignores what it does.
pub trait TimingObserver {
    fn on_event(&mut self, event: &TimingEvent);
}

impl<F> TimingObserver for F
where
    F: FnMut(&TimingEvent),
{
    fn on_event(&mut self, event: &TimingEvent) {
        self(event)
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TimingObserver for NoopObserver {
    fn on_event(&mut self, _event: &TimingEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl TimingObserver for TracingObserver {
    fn on_event(&mut self, event: &TimingEvent) {
        match event {
            TimingEvent::Armed { timestamp_ms, distance_m } => {
                debug!(timestamp_ms, distance_m, "possibly crossing");
            }
            TimingEvent::Buffered { index, full } => {
                debug!(index, full, "crossing fix buffered");
            }
            TimingEvent::Resolved(c) => {
                debug!(
                    lat = c.lat,
                    lng = c.lng,
                    timestamp_ms = c.timestamp_ms,
                    odometer_m = c.odometer_m,
                    "crossing interpolated"
                );
            }
            TimingEvent::Unresolved(err) => {
                warn!(error = %err, "crossing discarded");
            }
            TimingEvent::RaceStarted(c) => {
                info!(timestamp_ms = c.timestamp_ms, "race started");
            }
            TimingEvent::LapCompleted { lap, new_best } => {
                info!(
                    lap = lap.lap_number,
                    time_ms = lap.time_ms,
                    distance_m = lap.distance_m,
                    new_best,
                    "lap finished"
                );
            }
        }
    }
}
