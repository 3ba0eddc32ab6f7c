//! Spherical-earth helpers for start/finish line geometry.
//!
//! Distances are great-circle (haversine) meters. Projection onto the line and the
//! side-of-line test work in raw lat/lng degree space, which is only accurate for
//! short segments such as a timing line a few meters wide.

use model::{GeoPoint, StartFinishLine};

/// Mean earth radius used by every distance in this crate.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points.
pub fn distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (p2.lng - p1.lng).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Haversine distance combined with the altitude delta.
///
/// A previous position of exactly (0, 0) means "no previous fix" and yields 0.
pub fn distance_3d(prev: GeoPoint, prev_alt_m: f64, cur: GeoPoint, cur_alt_m: f64) -> f64 {
    if prev.lat == 0.0 && prev.lng == 0.0 {
        return 0.0;
    }
    let horizontal = distance(prev, cur);
    let climb = cur_alt_m - prev_alt_m;
    (horizontal * horizontal + climb * climb).sqrt()
}

/// Distance in meters from `p` to the segment `a`-`b`.
pub fn point_to_segment_distance(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let dx = b.lat - a.lat;
    let dy = b.lng - a.lng;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return distance(p, a);
    }

    let t = ((p.lat - a.lat) * dx + (p.lng - a.lng) * dy) / len_sq;
    if t < 0.0 {
        distance(p, a)
    } else if t > 1.0 {
        distance(p, b)
    } else {
        let projected = GeoPoint::new(a.lat + t * dx, a.lng + t * dy);
        distance(p, projected)
    }
}

/// Which side of the directed line `a`->`b` the point lies on: `1`, `-1`, or `0` when
/// collinear.
pub fn side_of_line(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> i8 {
    let cross = (b.lat - a.lat) * (p.lng - a.lng) - (b.lng - a.lng) * (p.lat - a.lat);
    if cross > 0.0 {
        1
    } else if cross < 0.0 {
        -1
    } else {
        0
    }
}

/// True when the triangle `p`, `a`, `b` has three acute angles, i.e. `p` sits
/// between the endpoints rather than off beyond one of them.
pub fn is_acute_triangle(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> bool {
    let pa = distance(p, a);
    let pb = distance(p, b);
    let ab = distance(a, b);

    let (pa2, pb2, ab2) = (pa * pa, pb * pb, ab * ab);
    pa2 + pb2 > ab2 && pa2 + ab2 > pb2 && pb2 + ab2 > pa2
}

/// True when neither angle at a line endpoint is obtuse, so `p` projects onto the
/// segment instead of beyond `a` or `b`. The endpoints themselves are inside.
pub fn is_within_line_span(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> bool {
    let pa = distance(p, a);
    let pb = distance(p, b);
    let ab = distance(a, b);

    let (pa2, pb2, ab2) = (pa * pa, pb * pb, ab * ab);
    pa2 + ab2 >= pb2 && pb2 + ab2 >= pa2
}

/// Older proximity gate: both endpoints closer to `p` than the line is long.
pub fn is_near_line(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> bool {
    let length = distance(a, b);
    distance(p, a) < length && distance(p, b) < length
}

/// Angle in degrees between two planar vectors. Zero-length input gives 0.
pub fn angle_between_vectors(v1: (f64, f64), v2: (f64, f64)) -> f64 {
    let m1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let m2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if m1 == 0.0 || m2 == 0.0 {
        return 0.0;
    }
    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (m1 * m2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Distance from `p` to the line, or infinity when `p` lies outside the line span.
/// A fix exactly on `a` or `b` is inside and measures 0.
///
/// Only the endpoint angles are tested: near a line longer than twice the crossing
/// threshold the angle at `p` itself is always obtuse.
pub fn gated_line_distance(p: GeoPoint, line: &StartFinishLine) -> f64 {
    if is_within_line_span(p, line.a, line.b) {
        point_to_segment_distance(p, line.a, line.b)
    } else {
        f64::INFINITY
    }
}
