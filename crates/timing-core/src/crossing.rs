//! Per-fix start/finish crossing detection.
//!
//! A fix closer to the line than the threshold arms the detector. While armed,
//! every fix inside the threshold band is buffered. The first fix outside the
//! band confirms the crossing, which is then reconstructed from the buffer.

use geodesy::gated_line_distance;
use model::{CrossingPoint, Fix, StartFinishLine};

use crate::buffer::CrossingBuffer;
use crate::config::{InterpolationStrategy, TimerConfig};
use crate::error::InterpolationError;
use crate::events::{TimingEvent, TimingObserver};
use crate::interpolate::interpolate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrossingState {
    /// Away from the line
    #[default]
    Idle,
    /// Within the threshold, buffering fixes
    Armed,
}

#[derive(Clone, Debug)]
pub struct CrossingDetector {
    state: CrossingState,
    buffer: CrossingBuffer,
    threshold_m: f64,
    strategy: InterpolationStrategy,
    fallback_to_linear: bool,
}

impl CrossingDetector {
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            state: CrossingState::Idle,
            buffer: CrossingBuffer::new(config.effective_capacity()),
            threshold_m: config.crossing_threshold_m,
            strategy: config.strategy,
            fallback_to_linear: config.fallback_to_linear,
        }
    }

    pub fn state(&self) -> CrossingState {
        self.state
    }

    pub fn is_crossing(&self) -> bool {
        self.state == CrossingState::Armed
    }

    pub fn buffer(&self) -> &CrossingBuffer {
        &self.buffer
    }

    /// Advance the state machine by one fix. Returns the crossing instant when a
    /// departure from the line is confirmed and could be reconstructed.
    pub fn update<O: TimingObserver>(
        &mut self,
        fix: Fix,
        line: &StartFinishLine,
        observer: &mut O,
    ) -> Option<CrossingPoint> {
        let dist = gated_line_distance(fix.position(), line);

        match self.state {
            CrossingState::Idle => {
                if dist < self.threshold_m {
                    // the arming fix itself is not buffered
                    self.state = CrossingState::Armed;
                    observer.on_event(&TimingEvent::Armed {
                        timestamp_ms: fix.timestamp_ms,
                        distance_m: dist,
                    });
                }
                None
            }
            CrossingState::Armed if dist > self.threshold_m => {
                let result = self.resolve(line);
                self.state = CrossingState::Idle;
                self.buffer.clear();
                match result {
                    Ok(crossing) => {
                        observer.on_event(&TimingEvent::Resolved(crossing));
                        Some(crossing)
                    }
                    Err(err) => {
                        observer.on_event(&TimingEvent::Unresolved(err));
                        None
                    }
                }
            }
            CrossingState::Armed => {
                self.buffer.push(fix);
                observer.on_event(&TimingEvent::Buffered {
                    index: self.buffer.index(),
                    full: self.buffer.is_full(),
                });
                None
            }
        }
    }

    fn resolve(&self, line: &StartFinishLine) -> Result<CrossingPoint, InterpolationError> {
        match interpolate(&self.buffer, line, self.strategy) {
            Err(InterpolationError::MissingControlPoints { .. }) if self.fallback_to_linear => {
                interpolate(&self.buffer, line, InterpolationStrategy::Linear)
            }
            other => other,
        }
    }

    pub fn reset(&mut self) {
        self.state = CrossingState::Idle;
        self.buffer.clear();
    }
}
