//! Lap bookkeeping driven by confirmed crossings.

use model::{CrossingPoint, LapRecord};

/// What a confirmed crossing meant for the race.
#[derive(Clone, Debug, PartialEq)]
pub enum CrossingOutcome {
    /// First crossing since reset; lap 1 starts here.
    RaceStarted(CrossingPoint),
    /// A lap was closed and the next one started.
    LapCompleted { lap: LapRecord, new_best: bool },
}

#[derive(Clone, Debug, Default)]
pub struct LapLedger {
    laps: u32,
    lap_start: Option<CrossingPoint>,
    last_lap: Option<LapRecord>,
    best_lap: Option<LapRecord>,
}

impl LapLedger {
    pub fn record_crossing(&mut self, crossing: CrossingPoint) -> CrossingOutcome {
        let Some(start) = self.lap_start.replace(crossing) else {
            return CrossingOutcome::RaceStarted(crossing);
        };

        self.laps += 1;
        let lap = LapRecord::new(self.laps, start, crossing);
        let new_best = self.best_lap.as_ref().is_none_or(|best| lap.time_ms < best.time_ms);
        if new_best {
            self.best_lap = Some(lap.clone());
        }
        self.last_lap = Some(lap.clone());
        CrossingOutcome::LapCompleted { lap, new_best }
    }

    pub fn race_started(&self) -> bool {
        self.lap_start.is_some()
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Crossing that opened the lap in progress.
    pub fn lap_start(&self) -> Option<&CrossingPoint> {
        self.lap_start.as_ref()
    }

    pub fn last_lap(&self) -> Option<&LapRecord> {
        self.last_lap.as_ref()
    }

    pub fn best_lap(&self) -> Option<&LapRecord> {
        self.best_lap.as_ref()
    }

    pub fn current_lap_start_time(&self) -> u64 {
        self.lap_start.map_or(0, |s| s.timestamp_ms)
    }

    pub fn current_lap_odometer_start(&self) -> f64 {
        self.lap_start.map_or(0.0, |s| s.odometer_m)
    }

    /// Elapsed time of the lap in progress, 0 before the race starts.
    pub fn current_lap_time(&self, now_ms: u64) -> u64 {
        self.lap_start.map_or(0, |s| now_ms.saturating_sub(s.timestamp_ms))
    }

    pub fn current_lap_distance(&self, odometer_m: f64) -> f64 {
        self.lap_start.map_or(0.0, |s| odometer_m - s.odometer_m)
    }

    pub fn last_lap_time(&self) -> u64 {
        self.last_lap.as_ref().map_or(0, |l| l.time_ms)
    }

    pub fn last_lap_distance(&self) -> f64 {
        self.last_lap.as_ref().map_or(0.0, |l| l.distance_m)
    }

    pub fn best_lap_time(&self) -> u64 {
        self.best_lap.as_ref().map_or(0, |l| l.time_ms)
    }

    pub fn best_lap_distance(&self) -> f64 {
        self.best_lap.as_ref().map_or(0.0, |l| l.distance_m)
    }

    pub fn best_lap_number(&self) -> u32 {
        self.best_lap.as_ref().map_or(0, |l| l.lap_number)
    }

    /// Current lap pace minus best lap pace, in milliseconds per meter. Positive means
    /// slower than the best lap; 0 when either lap has no distance yet.
    pub fn pace_difference(&self, now_ms: u64, odometer_m: f64) -> f64 {
        let current_distance = self.current_lap_distance(odometer_m);
        let best_distance = self.best_lap_distance();
        if current_distance == 0.0 || best_distance == 0.0 {
            return 0.0;
        }
        let current_pace = self.current_lap_time(now_ms) as f64 / current_distance;
        let best_pace = self.best_lap_time() as f64 / best_distance;
        current_pace - best_pace
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
