// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shortest-distance queries between points and finite 3D segments.
//!
//! [`segment_segment_distance`] is the workhorse of joint inference: it
//! decides whether two members meet, and where. The implementation solves the
//! 2x2 linear system for the infinite-line closest approach, clamps both
//! parameters to `[0, 1]`, and re-derives. Parallel and zero-length inputs
//! take explicit fallback branches instead of dividing by a vanishing
//! denominator.

use nalgebra::Point3;

/// Squared-length threshold below which a direction is treated as degenerate.
const DEGENERATE_EPS: f64 = 1e-12;

/// Closest-approach result between two finite segments.
#[derive(Debug, Clone, Copy)]
pub struct SegmentDistance {
    /// Shortest distance between the two segments.
    pub distance: f64,
    /// Point on the first segment realizing the distance.
    pub point_on_first: Point3<f64>,
    /// Point on the second segment realizing the distance.
    pub point_on_second: Point3<f64>,
}

impl SegmentDistance {
    /// Midpoint of the closest-approach pair. Used as the candidate location
    /// when two members are close enough to share a joint.
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.point_on_first, &self.point_on_second)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b - a).norm()
}

/// Linear interpolation between two points; `t = 0` gives `a`, `t = 1` gives `b`.
pub fn lerp(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    a + (b - a) * t
}

/// Shortest distance from a point to the finite segment `[a, b]`.
///
/// Returns the distance and the closest point on the segment. A zero-length
/// segment degrades to plain point-to-point distance.
pub fn point_segment_distance(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> (f64, Point3<f64>) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < DEGENERATE_EPS {
        return (distance(p, a), *a);
    }

    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    ((p - closest).norm(), closest)
}

/// Shortest distance between the finite segments `[p0, p1]` and `[q0, q1]`.
///
/// Closed-form parametric solution with both parameters clamped to `[0, 1]`.
/// When the segments are parallel (singular system) or either segment has
/// (near-)zero length, the minimum is attained at an endpoint projection, so
/// those branches fall back to the four endpoint-to-segment comparisons.
pub fn segment_segment_distance(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    q0: &Point3<f64>,
    q1: &Point3<f64>,
) -> SegmentDistance {
    let d1 = p1 - p0;
    let d2 = q1 - q0;
    let r = p0 - q0;

    let a = d1.norm_squared();
    let e = d2.norm_squared();

    // Degenerate inputs collapse to point queries.
    if a < DEGENERATE_EPS && e < DEGENERATE_EPS {
        return SegmentDistance {
            distance: r.norm(),
            point_on_first: *p0,
            point_on_second: *q0,
        };
    }
    if a < DEGENERATE_EPS {
        let (dist, on_second) = point_segment_distance(p0, q0, q1);
        return SegmentDistance {
            distance: dist,
            point_on_first: *p0,
            point_on_second: on_second,
        };
    }
    if e < DEGENERATE_EPS {
        let (dist, on_first) = point_segment_distance(q0, p0, p1);
        return SegmentDistance {
            distance: dist,
            point_on_first: on_first,
            point_on_second: *q0,
        };
    }

    let b = d1.dot(&d2);
    let c = d1.dot(&r);
    let f = d2.dot(&r);
    let denom = a * e - b * b;

    // Parallel segments make the system singular. The minimum then lies at
    // one of the four endpoint projections.
    if denom <= DEGENERATE_EPS * a * e {
        return endpoint_fallback(p0, p1, q0, q1);
    }

    let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);

    // Re-derive t for the clamped s, then clamp t and re-derive s once more.
    let t = (b * s + f) / e;
    let t = if t < 0.0 {
        s = (-c / a).clamp(0.0, 1.0);
        0.0
    } else if t > 1.0 {
        s = ((b - c) / a).clamp(0.0, 1.0);
        1.0
    } else {
        t
    };

    let point_on_first = p0 + d1 * s;
    let point_on_second = q0 + d2 * t;
    SegmentDistance {
        distance: (point_on_second - point_on_first).norm(),
        point_on_first,
        point_on_second,
    }
}

/// Minimum over the four endpoint-to-opposite-segment projections.
fn endpoint_fallback(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    q0: &Point3<f64>,
    q1: &Point3<f64>,
) -> SegmentDistance {
    let mut best = {
        let (dist, on_second) = point_segment_distance(p0, q0, q1);
        SegmentDistance {
            distance: dist,
            point_on_first: *p0,
            point_on_second: on_second,
        }
    };

    let (dist, on_second) = point_segment_distance(p1, q0, q1);
    if dist < best.distance {
        best = SegmentDistance {
            distance: dist,
            point_on_first: *p1,
            point_on_second: on_second,
        };
    }

    let (dist, on_first) = point_segment_distance(q0, p0, p1);
    if dist < best.distance {
        best = SegmentDistance {
            distance: dist,
            point_on_first: on_first,
            point_on_second: *q0,
        };
    }

    let (dist, on_first) = point_segment_distance(q1, p0, p1);
    if dist < best.distance {
        best = SegmentDistance {
            distance: dist,
            point_on_first: on_first,
            point_on_second: *q1,
        };
    }

    best
}
