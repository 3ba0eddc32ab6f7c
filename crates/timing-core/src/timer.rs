//! Start/finish lap timer fed one fix at a time.
//!
//! For every new fix the caller should update the odometer, the clock and the
//! speed first, then hand the position to [`LapTimer::check_start_finish`]. The
//! [`LapTimer::feed`] shortcut does exactly that for a complete [`Fix`].
//!
//! ```rust,ignore
//! use model::StartFinishLine;
//! use timing_core::{LapTimer, TimerConfig, CrossingOutcome};
//!
//! let mut timer = LapTimer::new(TimerConfig::default());
//! timer.set_start_finish_line(StartFinishLine::new(lat_a, lng_a, lat_b, lng_b));
//!
//! for fix in gps {
//!     if let Some(CrossingOutcome::LapCompleted { lap, .. }) = timer.feed(&fix) {
//!         println!("lap {} in {} ms", lap.lap_number, lap.time_ms);
//!     }
//! }
//! ```

use model::{CrossingPoint, Fix, GeoPoint, StartFinishLine};

use crate::config::TimerConfig;
use crate::crossing::CrossingDetector;
use crate::events::{TimingEvent, TimingObserver, TracingObserver};
use crate::ledger::{CrossingOutcome, LapLedger};
use crate::odometer::Odometer;

pub struct LapTimer<O: TimingObserver = TracingObserver> {
    config: TimerConfig,
    line: Option<StartFinishLine>,
    detector: CrossingDetector,
    odometer: Odometer,
    ledger: LapLedger,
    now_ms: u64,
    speed_kmh: f64,
    observer: O,
}

impl LapTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self::with_observer(config, TracingObserver)
    }
}

impl Default for LapTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl<O: TimingObserver> LapTimer<O> {
    pub fn with_observer(config: TimerConfig, observer: O) -> Self {
        Self {
            detector: CrossingDetector::new(&config),
            config,
            line: None,
            odometer: Odometer::default(),
            ledger: LapLedger::default(),
            now_ms: 0,
            speed_kmh: 0.0,
            observer,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Replace the line from the next fix on. An in-progress crossing is kept;
    /// call [`LapTimer::reset`] when moving the line mid-session.
    pub fn set_start_finish_line(&mut self, line: StartFinishLine) {
        self.line = Some(line);
    }

    pub fn start_finish_line(&self) -> Option<&StartFinishLine> {
        self.line.as_ref()
    }

    pub fn update_odometer(&mut self, lat: f64, lng: f64, altitude_m: f64) {
        self.odometer.update(GeoPoint::new(lat, lng), Some(altitude_m));
    }

    /// Monotonic milliseconds; there is no midnight rollover handling.
    pub fn update_time(&mut self, timestamp_ms: u64) {
        self.now_ms = timestamp_ms;
    }

    pub fn update_speed_kmh(&mut self, speed_kmh: f64) {
        self.speed_kmh = speed_kmh;
    }

    /// Run the crossing state machine for the latest position.
    pub fn check_start_finish(&mut self, lat: f64, lng: f64) -> Option<CrossingOutcome> {
        let line = self.line?;
        let fix = Fix {
            lat,
            lng,
            altitude_m: None,
            timestamp_ms: self.now_ms,
            odometer_m: self.odometer.total_m(),
            speed_kmh: self.speed_kmh,
        };

        let crossing = self.detector.update(fix, &line, &mut self.observer)?;
        let outcome = self.ledger.record_crossing(crossing);
        let event = match &outcome {
            CrossingOutcome::RaceStarted(start) => TimingEvent::RaceStarted(*start),
            CrossingOutcome::LapCompleted { lap, new_best } => TimingEvent::LapCompleted {
                lap: lap.clone(),
                new_best: *new_best,
            },
        };
        self.observer.on_event(&event);
        Some(outcome)
    }

    /// Odometer, clock, speed, then position, in that order. A fix without altitude
    /// extends the odometer horizontally.
    pub fn feed(&mut self, fix: &Fix) -> Option<CrossingOutcome> {
        self.odometer.update(fix.position(), fix.altitude_m);
        self.update_time(fix.timestamp_ms);
        self.update_speed_kmh(fix.speed_kmh);
        self.check_start_finish(fix.lat, fix.lng)
    }

    /// Back to the post-construction state. The line, clock and speed are inputs and
    /// are kept.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.odometer.reset();
        self.detector.reset();
    }

    pub fn race_started(&self) -> bool {
        self.ledger.race_started()
    }

    pub fn crossing(&self) -> bool {
        self.detector.is_crossing()
    }

    pub fn laps(&self) -> u32 {
        self.ledger.laps()
    }

    pub fn current_lap_start_time(&self) -> u64 {
        self.ledger.current_lap_start_time()
    }

    pub fn current_lap_time(&self) -> u64 {
        self.ledger.current_lap_time(self.now_ms)
    }

    pub fn last_lap_time(&self) -> u64 {
        self.ledger.last_lap_time()
    }

    pub fn best_lap_time(&self) -> u64 {
        self.ledger.best_lap_time()
    }

    pub fn current_lap_odometer_start(&self) -> f64 {
        self.ledger.current_lap_odometer_start()
    }

    pub fn current_lap_distance(&self) -> f64 {
        self.ledger.current_lap_distance(self.odometer.total_m())
    }

    pub fn last_lap_distance(&self) -> f64 {
        self.ledger.last_lap_distance()
    }

    pub fn best_lap_distance(&self) -> f64 {
        self.ledger.best_lap_distance()
    }

    pub fn total_distance(&self) -> f64 {
        self.odometer.total_m()
    }

    pub fn best_lap_number(&self) -> u32 {
        self.ledger.best_lap_number()
    }

    /// See [`LapLedger::pace_difference`].
    pub fn pace_difference(&self) -> f64 {
        self.ledger.pace_difference(self.now_ms, self.odometer.total_m())
    }

    /// Most recent confirmed crossing, i.e. the start of the lap in progress.
    pub fn last_crossing(&self) -> Option<&CrossingPoint> {
        self.ledger.lap_start()
    }

    pub fn ledger(&self) -> &LapLedger {
        &self.ledger
    }
}
