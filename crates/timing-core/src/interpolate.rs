//! Sub-sample reconstruction of the crossing instant from buffered fixes.

use geodesy::{point_to_segment_distance, side_of_line};
use model::{CrossingPoint, Fix, StartFinishLine};
use tracing::trace;

use crate::buffer::CrossingBuffer;
use crate::config::InterpolationStrategy;
use crate::error::InterpolationError;

/// Below this speed a fix is treated as stationary and the weight ignores speed.
pub const MIN_WEIGHT_SPEED_KMH: f64 = 0.1;

/// Chronological position `i` of the first buffered pair (`i`, `i + 1`) whose fixes lie
/// on different sides of the line.
pub fn find_bracketing_pair(
    buffer: &CrossingBuffer,
    line: &StartFinishLine,
) -> Result<usize, InterpolationError> {
    let available = buffer.len();
    if available < 2 {
        return Err(InterpolationError::NotEnoughSamples { available });
    }

    let mut prev_side: Option<i8> = None;
    for (i, fix) in buffer.iter().enumerate() {
        let side = side_of_line(fix.position(), line.a, line.b);
        trace!(index = i, side, "bracket scan");
        if let Some(prev) = prev_side {
            if prev != side {
                return Ok(i - 1);
            }
        }
        prev_side = Some(side);
    }

    Err(InterpolationError::NoBracketingPair { scanned: available })
}

/// Fraction of the way from fix A to fix B at which the line is crossed, weighting each
/// fix's distance by the time needed to cover it at its recorded speed.
pub fn interpolate_weight(dist_a: f64, dist_b: f64, speed_a: f64, speed_b: f64) -> f64 {
    let (wa, wb) = if speed_a < MIN_WEIGHT_SPEED_KMH || speed_b < MIN_WEIGHT_SPEED_KMH {
        (dist_a, dist_b)
    } else {
        (dist_a / speed_a, dist_b / speed_b)
    };

    let sum = wa + wb;
    if sum <= 0.0 || !sum.is_finite() {
        return 0.0;
    }
    (wa / sum).clamp(0.0, 1.0)
}

/// Uniform Catmull-Rom spline between `p1` and `p2`.
pub fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn to_millis(t: f64) -> u64 {
    t.round().max(0.0) as u64
}

fn weight_between(a: &Fix, b: &Fix, line: &StartFinishLine) -> f64 {
    let dist_a = point_to_segment_distance(a.position(), line.a, line.b);
    let dist_b = point_to_segment_distance(b.position(), line.a, line.b);
    interpolate_weight(dist_a, dist_b, a.speed_kmh, b.speed_kmh)
}

/// Estimate where and when the buffered path crossed `line`.
///
/// Reads the buffer only; a failure leaves it untouched for a retry with another
/// strategy.
pub fn interpolate(
    buffer: &CrossingBuffer,
    line: &StartFinishLine,
    strategy: InterpolationStrategy,
) -> Result<CrossingPoint, InterpolationError> {
    let i = find_bracketing_pair(buffer, line)?;
    let missing = InterpolationError::MissingControlPoints { index: i };

    match strategy {
        InterpolationStrategy::Linear => {
            let (Some(a), Some(b)) = (buffer.get(i), buffer.get(i + 1)) else {
                return Err(missing);
            };
            let t = weight_between(a, b, line);
            Ok(CrossingPoint {
                lat: lerp(a.lat, b.lat, t),
                lng: lerp(a.lng, b.lng, t),
                timestamp_ms: to_millis(lerp(a.timestamp_ms as f64, b.timestamp_ms as f64, t)),
                odometer_m: lerp(a.odometer_m, b.odometer_m, t),
            })
        }
        InterpolationStrategy::CatmullRom => {
            let Some(before) = i.checked_sub(1) else {
                return Err(missing);
            };
            let (Some(p0), Some(p1), Some(p2), Some(p3)) = (
                buffer.get(before),
                buffer.get(i),
                buffer.get(i + 1),
                buffer.get(i + 2),
            ) else {
                return Err(missing);
            };
            let t = weight_between(p1, p2, line);
            let spline = |f: fn(&Fix) -> f64| catmull_rom(f(p0), f(p1), f(p2), f(p3), t);
            Ok(CrossingPoint {
                lat: spline(|f| f.lat),
                lng: spline(|f| f.lng),
                timestamp_ms: to_millis(spline(|f| f.timestamp_ms as f64)),
                odometer_m: spline(|f| f.odometer_m),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // line along the equator, 111 m long; north of it is side -1
    fn line() -> StartFinishLine {
        StartFinishLine::new(0.0, 0.0, 0.0, 0.001)
    }

    fn fix(lat: f64, t: u64, speed_kmh: f64) -> Fix {
        Fix {
            lat,
            lng: 0.0005,
            altitude_m: None,
            timestamp_ms: t,
            odometer_m: t as f64 / 100.0,
            speed_kmh,
        }
    }

    fn buffer_of(lats: &[f64], capacity: usize) -> CrossingBuffer {
        let mut b = CrossingBuffer::new(capacity);
        for (k, lat) in lats.iter().enumerate() {
            b.push(fix(*lat, 1000 * k as u64, 20.0));
        }
        b
    }

    #[test]
    fn test_weight_equal_speeds_symmetric_distances() {
        assert!((interpolate_weight(4.0, 4.0, 50.0, 50.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_weight_accounts_for_speed() {
        // A is as far from the line as B but twice as fast, so it reaches it sooner
        let t = interpolate_weight(5.0, 5.0, 100.0, 50.0);
        assert!((t - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weight_stationary_fix_falls_back_to_distance_ratio() {
        let t = interpolate_weight(3.0, 1.0, 0.0, 40.0);
        assert!((t - 0.75).abs() < 1e-12);
        assert!(t.is_finite());
    }

    #[test]
    fn test_weight_both_on_line() {
        assert_eq!(interpolate_weight(0.0, 0.0, 30.0, 30.0), 0.0);
    }

    #[test]
    fn test_catmull_rom_passes_through_inner_points() {
        assert_eq!(catmull_rom(1.0, 2.0, 5.0, 3.0, 0.0), 2.0);
        assert_eq!(catmull_rom(1.0, 2.0, 5.0, 3.0, 1.0), 5.0);
        // collinear control points reduce to linear
        assert!((catmull_rom(0.0, 1.0, 2.0, 3.0, 0.25) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_bracket_first_side_change_wins() {
        let b = buffer_of(&[-0.00005, -0.00001, 0.00003, -0.00002, 0.00004], 10);
        assert_eq!(find_bracketing_pair(&b, &line()), Ok(1));
    }

    #[test]
    fn test_bracket_missing_reports_error() {
        let b = buffer_of(&[0.00001, 0.00003, 0.00005], 10);
        assert_eq!(
            find_bracketing_pair(&b, &line()),
            Err(InterpolationError::NoBracketingPair { scanned: 3 })
        );
        let one = buffer_of(&[0.00001], 10);
        assert_eq!(
            interpolate(&one, &line(), InterpolationStrategy::Linear),
            Err(InterpolationError::NotEnoughSamples { available: 1 })
        );
    }

    #[test]
    fn test_linear_crossing() {
        let b = buffer_of(&[-0.00003, 0.00002], 10);
        let c = interpolate(&b, &line(), InterpolationStrategy::Linear).unwrap();
        assert!(c.lat.abs() < 1e-9, "lat {}", c.lat);
        assert!((c.lng - 0.0005).abs() < 1e-12);
        assert_eq!(c.timestamp_ms, 600);
        assert!((c.odometer_m - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_catmull_rom_crossing() {
        let b = buffer_of(&[-0.00005, -0.00003, -0.00001, 0.00001, 0.00003], 10);
        let c = interpolate(&b, &line(), InterpolationStrategy::CatmullRom).unwrap();
        assert!(c.lat.abs() < 1e-9, "lat {}", c.lat);
        assert_eq!(c.timestamp_ms, 2500);
        assert!((c.odometer_m - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_catmull_rom_needs_neighbours() {
        let b = buffer_of(&[-0.00003, 0.00002, 0.00007], 10);
        assert_eq!(
            interpolate(&b, &line(), InterpolationStrategy::CatmullRom),
            Err(InterpolationError::MissingControlPoints { index: 0 })
        );
        let tail = buffer_of(&[-0.00007, -0.00003, 0.00002], 10);
        assert_eq!(
            interpolate(&tail, &line(), InterpolationStrategy::CatmullRom),
            Err(InterpolationError::MissingControlPoints { index: 1 })
        );
    }

    #[test]
    fn test_wrapped_buffer_scanned_oldest_first() {
        // six fixes through a ring of four; physically the newest two sit in front
        let b = buffer_of(&[-0.00009, -0.00007, -0.00005, -0.00003, -0.00001, 0.00001], 4);
        assert!(b.is_full());
        assert_eq!(find_bracketing_pair(&b, &line()), Ok(2));

        let c = interpolate(&b, &line(), InterpolationStrategy::Linear).unwrap();
        assert!(c.lat.abs() < 1e-9);
        assert_eq!(c.timestamp_ms, 4500);
    }
}
