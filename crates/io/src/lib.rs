//! Recorded fix traces and timer configuration on disk, and trace replay.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufRead, path::Path};
use model::*;
use timing_core::{CrossingOutcome, LapTimer, TimerConfig, TimingEvent};

/// Reads a CSV trace with a `lat,lng,altitude_m,timestamp_ms,speed_kmh` header.
/// `altitude_m` may be left empty.
pub fn import_csv(path: &Path) -> Result<Vec<Fix>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("open trace {}", path.display()))?;
    let mut fixes = Vec::new();
    for (line, rec) in rdr.deserialize().enumerate() {
        let r: CsvRow = rec.with_context(|| format!("{} row {}", path.display(), line + 1))?;
        fixes.push(Fix {
            lat: r.lat,
            lng: r.lng,
            altitude_m: r.altitude_m,
            timestamp_ms: r.timestamp_ms,
            odometer_m: 0.0,
            speed_kmh: r.speed_kmh,
        });
    }
    Ok(fixes)
}

/// One JSON `Fix` per line; blank lines are skipped.
pub fn import_ndjson(path: &Path) -> Result<Vec<Fix>> {
    let f = File::open(path).with_context(|| format!("open trace {}", path.display()))?;
    let rdr = std::io::BufReader::new(f);
    let mut fixes = vec![];
    for (n, line) in rdr.lines().enumerate() {
        let s = line?;
        if s.trim().is_empty() {
            continue;
        }
        let fix: Fix = serde_json::from_str(&s)
            .with_context(|| format!("{} line {}", path.display(), n + 1))?;
        fixes.push(fix);
    }
    Ok(fixes)
}

/// Picks the reader from the file extension (`.csv`, otherwise NDJSON).
pub fn import_trace(path: &Path) -> Result<Vec<Fix>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => import_csv(path),
        _ => import_ndjson(path),
    }
}

pub fn load_config(path: &Path) -> Result<TimerConfig> {
    let f = File::open(path).with_context(|| format!("open config {}", path.display()))?;
    let cfg = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// What a trace produced when run through a fresh timer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub race_start: Option<CrossingPoint>,
    pub laps: Vec<LapRecord>,
    pub best_lap_number: u32,
    /// Confirmed departures that could not be interpolated
    pub unresolved: usize,
    pub total_distance_m: f64,
}

impl ReplayReport {
    pub fn best_lap(&self) -> Option<&LapRecord> {
        self.laps.iter().find(|l| l.lap_number == self.best_lap_number)
    }
}

pub fn replay(fixes: &[Fix], line: StartFinishLine, config: TimerConfig) -> ReplayReport {
    let mut unresolved = 0;
    let mut report = ReplayReport::default();
    {
        let mut timer = LapTimer::with_observer(config, |e: &TimingEvent| {
            if let TimingEvent::Unresolved(_) = e {
                unresolved += 1;
            }
        });
        timer.set_start_finish_line(line);
        for fix in fixes {
            match timer.feed(fix) {
                Some(CrossingOutcome::RaceStarted(start)) => report.race_start = Some(start),
                Some(CrossingOutcome::LapCompleted { lap, .. }) => report.laps.push(lap),
                None => {}
            }
        }
        report.best_lap_number = timer.best_lap_number();
        report.total_distance_m = timer.total_distance();
    }
    report.unresolved = unresolved;
    report
}

pub fn replay_file(path: &Path, line: StartFinishLine, config: TimerConfig) -> Result<ReplayReport> {
    let fixes = import_trace(path)?;
    Ok(replay(&fixes, line, config))
}

#[derive(Serialize, Deserialize)]
struct CsvRow {
    lat: f64, lng: f64,
    #[serde(default)]
    altitude_m: Option<f64>,
    timestamp_ms: u64, speed_kmh: f64,
}
