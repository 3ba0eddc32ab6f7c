//! Plain data types shared by the lap timing crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One positioning sample as produced by the caller each update tick.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Fix {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub altitude_m: Option<f64>,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub odometer_m: f64,
    pub speed_kmh: f64,
}

impl Fix {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// The virtual start/finish line, a segment between two geographic points.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct StartFinishLine {
    pub a: GeoPoint,
    pub b: GeoPoint,
}

impl StartFinishLine {
    pub fn new(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> Self {
        Self {
            a: GeoPoint::new(lat_a, lng_a),
            b: GeoPoint::new(lat_b, lng_b),
        }
    }
}

/// Reconstructed crossing instant between two buffered fixes.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct CrossingPoint {
    pub lat: f64,
    pub lng: f64,
    pub timestamp_ms: u64,
    pub odometer_m: f64,
}

/// A completed lap, bounded by two consecutive crossings.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct LapRecord {
    #[serde(with = "uuid::serde::simple")]
    pub id: Uuid,
    pub lap_number: u32,
    pub time_ms: u64,
    pub distance_m: f64,
    pub start: CrossingPoint,
    pub finish: CrossingPoint,
}

impl LapRecord {
    pub fn new(lap_number: u32, start: CrossingPoint, finish: CrossingPoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            lap_number,
            time_ms: finish.timestamp_ms.saturating_sub(start.timestamp_ms),
            distance_m: finish.odometer_m - start.odometer_m,
            start,
            finish,
        }
    }
}
