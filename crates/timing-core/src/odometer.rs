use geodesy::distance_3d;
use model::GeoPoint;

/// Running 3-D distance over every fix since the last reset.
#[derive(Clone, Debug, Default)]
pub struct Odometer {
    total_m: f64,
    prev: Option<(GeoPoint, Option<f64>)>,
}

impl Odometer {
    /// Add the leg from the previous fix. The first fix only sets the baseline.
    ///
    /// A fix without altitude keeps the last known one, so its legs are horizontal.
    pub fn update(&mut self, position: GeoPoint, altitude_m: Option<f64>) -> f64 {
        let Some((prev, prev_alt)) = self.prev else {
            self.prev = Some((position, altitude_m));
            return 0.0;
        };

        let altitude_m = altitude_m.or(prev_alt);
        let step = match (prev_alt, altitude_m) {
            (Some(from), Some(to)) => distance_3d(prev, from, position, to),
            _ => distance_3d(prev, 0.0, position, 0.0),
        };
        self.total_m += step;
        self.prev = Some((position, altitude_m));
        step
    }

    pub fn total_m(&self) -> f64 {
        self.total_m
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
