// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes.
//!
//! Used as the broad phase for the pairwise member scan: two segments whose
//! inflated boxes do not overlap cannot be within tolerance of each other,
//! so the exact (and more expensive) segment distance is skipped.

use nalgebra::Point3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// An inverted box that any point expands.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Tight box around a set of points. Empty input yields [`Aabb::empty`].
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(p);
        }
        bbox
    }

    /// Tight box around a segment's two endpoints.
    pub fn from_segment(a: &Point3<f64>, b: &Point3<f64>) -> Self {
        Self::from_points(&[*a, *b])
    }

    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// True if the boxes come within `clearance` of each other on every axis.
    pub fn overlaps(&self, other: &Aabb, clearance: f64) -> bool {
        self.min.x <= other.max.x + clearance
            && other.min.x <= self.max.x + clearance
            && self.min.y <= other.max.y + clearance
            && other.min.y <= self.max.y + clearance
            && self.min.z <= other.max.z + clearance
            && other.min.z <= self.max.z + clearance
    }

    /// True if `point` lies inside the box inflated by `tolerance`.
    pub fn contains(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
            && point.z >= self.min.z - tolerance
            && point.z <= self.max.z + tolerance
    }
}
