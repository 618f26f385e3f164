// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FrameCheck Geometry
//!
//! Segment-based computational geometry for structural models: shortest
//! distance between finite 3D segments, point-to-segment projection, and
//! clearance-aware axis-aligned bounding boxes.
//!
//! ## Unit contract
//!
//! Every function in this crate operates in **meters**. Callers holding
//! millimeter data (the usual fabrication convention) must convert at the
//! boundary with [`mm_to_m`] / [`mm_to_m_point`] before anything else touches
//! the numbers. Mixing units here is the classic source of phantom clashes,
//! so the conversion helpers are the only sanctioned entry for mm values.

pub mod bbox;
pub mod segment;
pub mod units;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use bbox::Aabb;
pub use segment::{
    distance, lerp, point_segment_distance, segment_segment_distance, SegmentDistance,
};
pub use units::{m_to_mm, mm_to_m, mm_to_m_point};
