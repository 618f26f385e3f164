// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural elements: members, joints, plates, bolts.
//!
//! Members are immutable once constructed. Joints, plates, and bolts are
//! mutated in place by corrections (re-centering, snapping, resizing) but
//! never deleted during a run. All coordinates are meters.

use std::collections::BTreeSet;

use framecheck_geometry::{distance, Point3, Vector3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::ids::{BoltId, JointId, MemberId, PlateId};

/// Kind of a line-segment structural member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Beam,
    Column,
    Brace,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Beam => "Beam",
            MemberKind::Column => "Column",
            MemberKind::Brace => "Brace",
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A straight structural member between two 3D points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub kind: MemberKind,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    pub profile: String,
    pub material: String,
}

impl Member {
    pub fn length(&self) -> f64 {
        distance(&self.start, &self.end)
    }

    pub fn endpoints(&self) -> [Point3<f64>; 2] {
        [self.start, self.end]
    }

    /// The endpoint nearest to `p`.
    pub fn nearest_endpoint(&self, p: &Point3<f64>) -> Point3<f64> {
        if distance(&self.start, p) <= distance(&self.end, p) {
            self.start
        } else {
            self.end
        }
    }

    /// Distance from `p` to the nearest endpoint.
    pub fn endpoint_distance(&self, p: &Point3<f64>) -> f64 {
        distance(&self.start, p).min(distance(&self.end, p))
    }
}

/// Connection category, classified from the kinds of the joined members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointCategory {
    BeamToColumn,
    BeamToBeam,
    BraceEnd,
    ColumnSplice,
    General,
}

impl JointCategory {
    /// Classifies a joint from the kinds of its members. Braces dominate
    /// (a brace end is detailed as a gusset connection regardless of what it
    /// lands on), then beam/column combinations.
    pub fn classify(kinds: impl IntoIterator<Item = MemberKind>) -> Self {
        let mut beams = 0usize;
        let mut columns = 0usize;
        let mut braces = 0usize;
        for kind in kinds {
            match kind {
                MemberKind::Beam => beams += 1,
                MemberKind::Column => columns += 1,
                MemberKind::Brace => braces += 1,
            }
        }

        if braces > 0 {
            JointCategory::BraceEnd
        } else if beams > 0 && columns > 0 {
            JointCategory::BeamToColumn
        } else if columns >= 2 {
            JointCategory::ColumnSplice
        } else if beams >= 2 {
            JointCategory::BeamToBeam
        } else {
            JointCategory::General
        }
    }
}

/// An inferred 3D point where two or more members meet.
///
/// `location` is maintained as the intersection/centroid of the referenced
/// members' nearest endpoints; corrections may re-center it, nothing deletes
/// it mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joint {
    pub id: JointId,
    pub location: Point3<f64>,
    /// Members meeting at this joint, in deterministic order.
    pub member_ids: BTreeSet<MemberId>,
    pub category: JointCategory,
}

/// Rectangular plate outline, meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlateOutline {
    pub width: f64,
    pub height: f64,
}

/// How a plate was bound to its owning joint, recorded so downstream stages
/// can distinguish a confident binding from a last resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingStrategy {
    /// Largest member-set overlap between plate and joint.
    MemberOverlap,
    /// Explicit plate-id to joint-id table supplied with the input.
    ExplicitTable,
    /// Joint reference embedded on the plate record itself.
    DirectReference,
    /// Nearest joint by Euclidean distance.
    NearestJoint,
    /// First joint in id order. Terminates the cascade but is never treated
    /// as authoritative; plates bound this way are reported as orphans.
    FirstJoint,
}

impl BindingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingStrategy::MemberOverlap => "member-overlap",
            BindingStrategy::ExplicitTable => "explicit-table",
            BindingStrategy::DirectReference => "direct-reference",
            BindingStrategy::NearestJoint => "nearest-joint",
            BindingStrategy::FirstJoint => "first-joint",
        }
    }
}

impl std::fmt::Display for BindingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An axis-aligned rectangular fabrication plate.
///
/// Local frame: width spans x, height spans z, thickness spans y, with the
/// origin at the lower-left corner `position - (width/2, 0, height/2)`.
/// Bolt positions are expressed in the same global frame and checked against
/// this footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plate {
    pub id: PlateId,
    pub position: Point3<f64>,
    pub outline: PlateOutline,
    pub thickness: f64,
    /// Fillet weld leg size, meters. Zero means no weld recorded.
    pub weld_size: f64,
    /// Members this plate connects, when the extractor supplied them.
    pub connected_members: SmallVec<[MemberId; 4]>,
    pub owning_joint: Option<JointId>,
    pub binding: Option<BindingStrategy>,
}

impl Plate {
    /// Lower-left corner of the footprint (local origin).
    pub fn corner(&self) -> Point3<f64> {
        Point3::new(
            self.position.x - self.outline.width / 2.0,
            self.position.y,
            self.position.z - self.outline.height / 2.0,
        )
    }

    /// Coordinates of `p` in the plate's local frame.
    pub fn local_coords(&self, p: &Point3<f64>) -> Vector3<f64> {
        p - self.corner()
    }

    /// True if `p` projects into the footprint rectangle within `tolerance`.
    pub fn footprint_contains(&self, p: &Point3<f64>, tolerance: f64) -> bool {
        let local = self.local_coords(p);
        local.x >= -tolerance
            && local.x <= self.outline.width + tolerance
            && local.z >= -tolerance
            && local.z <= self.outline.height + tolerance
    }

    /// Clamps `p` into the footprint, keeping `margin` from each edge where
    /// the outline allows it. The local y offset is preserved.
    pub fn clamp_to_footprint(&self, p: &Point3<f64>, margin: f64) -> Point3<f64> {
        let local = self.local_coords(p);
        let mx = margin.min(self.outline.width / 2.0);
        let mz = margin.min(self.outline.height / 2.0);
        let clamped = Vector3::new(
            local.x.clamp(mx, self.outline.width - mx),
            local.y,
            local.z.clamp(mz, self.outline.height - mz),
        );
        self.corner() + clamped
    }
}

/// A bolt fastened through a plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bolt {
    pub id: BoltId,
    pub position: Point3<f64>,
    /// Nominal diameter, meters.
    pub diameter: f64,
    pub parent_plate: PlateId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plate_at(x: f64, y: f64, z: f64) -> Plate {
        Plate {
            id: PlateId::new("p1"),
            position: Point3::new(x, y, z),
            outline: PlateOutline {
                width: 0.4,
                height: 0.2,
            },
            thickness: 0.012,
            weld_size: 0.006,
            connected_members: SmallVec::new(),
            owning_joint: None,
            binding: None,
        }
    }

    #[test]
    fn member_length_and_nearest_endpoint() {
        let m = Member {
            id: MemberId::new("m1"),
            kind: MemberKind::Beam,
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(0.0, 0.0, 5.0),
            profile: "IPE200".into(),
            material: "S355".into(),
        };
        assert_relative_eq!(m.length(), 5.0);
        assert_eq!(
            m.nearest_endpoint(&Point3::new(0.0, 0.0, 4.0)),
            Point3::new(0.0, 0.0, 5.0)
        );
        assert_relative_eq!(m.endpoint_distance(&Point3::new(0.0, 0.0, 4.0)), 1.0);
    }

    #[test]
    fn joint_category_classification() {
        use MemberKind::*;
        assert_eq!(
            JointCategory::classify([Beam, Column]),
            JointCategory::BeamToColumn
        );
        assert_eq!(
            JointCategory::classify([Beam, Beam]),
            JointCategory::BeamToBeam
        );
        assert_eq!(
            JointCategory::classify([Column, Column]),
            JointCategory::ColumnSplice
        );
        assert_eq!(
            JointCategory::classify([Beam, Column, Brace]),
            JointCategory::BraceEnd
        );
        assert_eq!(JointCategory::classify([Beam]), JointCategory::General);
    }

    #[test]
    fn plate_local_frame() {
        let plate = plate_at(1.0, 2.0, 3.0);
        // Corner at (0.8, 2.0, 2.9)
        let local = plate.local_coords(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(local.x, 0.2);
        assert_relative_eq!(local.z, 0.1);
    }

    #[test]
    fn footprint_containment() {
        let plate = plate_at(0.0, 0.0, 0.0);
        assert!(plate.footprint_contains(&Point3::new(0.0, 0.0, 0.0), 0.0));
        assert!(plate.footprint_contains(&Point3::new(0.19, 0.0, 0.09), 0.0));
        assert!(!plate.footprint_contains(&Point3::new(0.25, 0.0, 0.0), 0.0));
        assert!(plate.footprint_contains(&Point3::new(0.25, 0.0, 0.0), 0.06));
    }

    #[test]
    fn clamp_keeps_margin_from_edges() {
        let plate = plate_at(0.0, 0.0, 0.0);
        let clamped = plate.clamp_to_footprint(&Point3::new(5.0, 0.0, -5.0), 0.03);
        let local = plate.local_coords(&clamped);
        assert_relative_eq!(local.x, 0.4 - 0.03);
        assert_relative_eq!(local.z, 0.03);
    }

    #[test]
    fn clamp_margin_capped_by_small_outline() {
        let mut plate = plate_at(0.0, 0.0, 0.0);
        plate.outline = PlateOutline {
            width: 0.04,
            height: 0.04,
        };
        let clamped = plate.clamp_to_footprint(&Point3::new(5.0, 0.0, 5.0), 0.05);
        let local = plate.local_coords(&clamped);
        assert_relative_eq!(local.x, 0.02);
        assert_relative_eq!(local.z, 0.02);
    }
}
