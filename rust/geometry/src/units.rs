// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length-unit conversion at the crate boundary.
//!
//! The kernel is meters-only; fabrication data is conventionally millimeters.
//! Convert once, here, and keep everything downstream in meters.

use nalgebra::Point3;

/// Millimeters per meter.
pub const MM_PER_M: f64 = 1000.0;

/// Converts a millimeter length to meters.
pub fn mm_to_m(value: f64) -> f64 {
    value / MM_PER_M
}

/// Converts a meter length to millimeters.
pub fn m_to_mm(value: f64) -> f64 {
    value * MM_PER_M
}

/// Converts a millimeter point to meters, componentwise.
pub fn mm_to_m_point(p: &Point3<f64>) -> Point3<f64> {
    Point3::new(mm_to_m(p.x), mm_to_m(p.y), mm_to_m(p.z))
}
