// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The clash taxonomy.
//!
//! Categories form a closed set so the detector and corrector dispatch
//! exhaustively; adding a category without a handler is a compile error, not
//! a silently ignored finding. Clashes are produced fresh each detection
//! pass and never mutated, only superseded by the next pass.

use framecheck_geometry::Point3;
use framecheck_model::{BoltId, ClashId, JointId, MemberId, PlateId};
use serde::Serialize;

/// Severity of a clash. Declaration order is ranking order, so sorting
/// ascending puts the structurally dangerous findings first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Critical,
    Major,
    Moderate,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Major => "Major",
            Severity::Moderate => "Moderate",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject grouping for a clash category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClashGroup {
    Member,
    Joint,
    Plate,
    Bolt,
    Connection,
    Boundary,
}

/// Every kind of inconsistency the detector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClashCategory {
    /// Two members occupy (nearly) the same segment.
    OverlappingMembers,
    /// A member with coincident endpoints.
    ZeroLengthMember,
    /// Two members within intersection tolerance with no joint recording it.
    UnjointedIntersection,
    /// Joint elevation disagrees with its members' endpoint consensus.
    JointElevationMismatch,
    /// A joint referencing fewer than two members.
    UndersizedJoint,
    /// Plate position away from its owning joint.
    PlateOffsetFromJoint,
    /// Plate outline below the standards minimum.
    UndersizedPlate,
    /// Plate with no resolvable owning joint.
    OrphanPlate,
    /// Bolt outside its parent plate's footprint.
    BoltOutsidePlate,
    /// Bolt diameter not in the standards table.
    NonStandardBoltDiameter,
    /// Bolt with a (slightly) negative local coordinate.
    NegativeBoltCoordinate,
    /// Weld missing or below the minimum for the plate thickness.
    UndersizedWeld,
    /// Bolt pair closer than the minimum spacing.
    BoltSpacingViolation,
    /// Bolt closer to a plate edge than the minimum edge distance.
    BoltEdgeDistance,
    /// A coordinate beyond the model-extent sanity bound.
    CoordinateOutOfBounds,
}

impl ClashCategory {
    /// Subject grouping for reporting.
    pub fn group(&self) -> ClashGroup {
        use ClashCategory::*;
        match self {
            OverlappingMembers | ZeroLengthMember | UnjointedIntersection => ClashGroup::Member,
            JointElevationMismatch | UndersizedJoint => ClashGroup::Joint,
            PlateOffsetFromJoint | UndersizedPlate | OrphanPlate => ClashGroup::Plate,
            BoltOutsidePlate | NonStandardBoltDiameter | NegativeBoltCoordinate => {
                ClashGroup::Bolt
            }
            UndersizedWeld | BoltSpacingViolation | BoltEdgeDistance => ClashGroup::Connection,
            CoordinateOutOfBounds => ClashGroup::Boundary,
        }
    }

    /// Fixed severity mapping. Structural-safety findings are Critical,
    /// sizing and spacing findings are Major, tolerance-edge findings are
    /// Moderate.
    pub fn severity(&self) -> Severity {
        use ClashCategory::*;
        match self {
            JointElevationMismatch | UndersizedWeld | CoordinateOutOfBounds
            | ZeroLengthMember => Severity::Critical,
            OverlappingMembers | UnjointedIntersection | UndersizedJoint | UndersizedPlate
            | OrphanPlate | BoltOutsidePlate | NonStandardBoltDiameter
            | BoltSpacingViolation | BoltEdgeDistance => Severity::Major,
            PlateOffsetFromJoint | NegativeBoltCoordinate => Severity::Moderate,
        }
    }

    /// Detector confidence for this category: 1.0 for deterministic
    /// geometric violations, lower for standards-driven sizing findings.
    pub fn confidence(&self) -> f64 {
        use ClashCategory::*;
        match self {
            UndersizedPlate | NonStandardBoltDiameter | UndersizedWeld
            | BoltSpacingViolation | BoltEdgeDistance => 0.9,
            _ => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use ClashCategory::*;
        match self {
            OverlappingMembers => "overlapping-members",
            ZeroLengthMember => "zero-length-member",
            UnjointedIntersection => "unjointed-intersection",
            JointElevationMismatch => "joint-elevation-mismatch",
            UndersizedJoint => "undersized-joint",
            PlateOffsetFromJoint => "plate-offset-from-joint",
            UndersizedPlate => "undersized-plate",
            OrphanPlate => "orphan-plate",
            BoltOutsidePlate => "bolt-outside-plate",
            NonStandardBoltDiameter => "non-standard-bolt-diameter",
            NegativeBoltCoordinate => "negative-bolt-coordinate",
            UndersizedWeld => "undersized-weld",
            BoltSpacingViolation => "bolt-spacing-violation",
            BoltEdgeDistance => "bolt-edge-distance",
            CoordinateOutOfBounds => "coordinate-out-of-bounds",
        }
    }
}

impl std::fmt::Display for ClashCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to the element a clash is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ElementRef {
    Member(MemberId),
    Joint(JointId),
    Plate(PlateId),
    Bolt(BoltId),
}

impl ElementRef {
    pub fn as_member(&self) -> Option<&MemberId> {
        match self {
            ElementRef::Member(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_joint(&self) -> Option<&JointId> {
        match self {
            ElementRef::Joint(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_plate(&self) -> Option<&PlateId> {
        match self {
            ElementRef::Plate(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_bolt(&self) -> Option<&BoltId> {
        match self {
            ElementRef::Bolt(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementRef::Member(id) => write!(f, "member {id}"),
            ElementRef::Joint(id) => write!(f, "joint {id}"),
            ElementRef::Plate(id) => write!(f, "plate {id}"),
            ElementRef::Bolt(id) => write!(f, "bolt {id}"),
        }
    }
}

/// Observed/expected value attached to a clash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ClashValue {
    Scalar(f64),
    Pair(f64, f64),
    Point(Point3<f64>),
}

/// One detected inconsistency.
#[derive(Debug, Clone, Serialize)]
pub struct Clash {
    /// Unique within one detection pass.
    pub id: ClashId,
    pub category: ClashCategory,
    pub severity: Severity,
    /// The element this clash is about.
    pub subject: ElementRef,
    /// Other elements involved (the second member of a pair, etc.).
    pub related: Vec<ElementRef>,
    pub current: Option<ClashValue>,
    pub expected: Option<ClashValue>,
    pub location: Point3<f64>,
    /// In `[0, 1]`; 1.0 for deterministic geometric violations.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ranking() {
        assert!(Severity::Critical < Severity::Major);
        assert!(Severity::Major < Severity::Moderate);
    }

    #[test]
    fn fixed_severity_mapping() {
        assert_eq!(
            ClashCategory::JointElevationMismatch.severity(),
            Severity::Critical
        );
        assert_eq!(ClashCategory::UndersizedWeld.severity(), Severity::Critical);
        assert_eq!(
            ClashCategory::CoordinateOutOfBounds.severity(),
            Severity::Critical
        );
        assert_eq!(ClashCategory::UndersizedPlate.severity(), Severity::Major);
        assert_eq!(ClashCategory::OrphanPlate.severity(), Severity::Major);
        assert_eq!(
            ClashCategory::PlateOffsetFromJoint.severity(),
            Severity::Moderate
        );
    }

    #[test]
    fn groups_cover_all_subjects() {
        assert_eq!(
            ClashCategory::UnjointedIntersection.group(),
            ClashGroup::Member
        );
        assert_eq!(ClashCategory::UndersizedJoint.group(), ClashGroup::Joint);
        assert_eq!(ClashCategory::OrphanPlate.group(), ClashGroup::Plate);
        assert_eq!(ClashCategory::BoltOutsidePlate.group(), ClashGroup::Bolt);
        assert_eq!(
            ClashCategory::BoltSpacingViolation.group(),
            ClashGroup::Connection
        );
        assert_eq!(
            ClashCategory::CoordinateOutOfBounds.group(),
            ClashGroup::Boundary
        );
    }

    #[test]
    fn sizing_confidence_is_reduced() {
        assert_eq!(ClashCategory::UnjointedIntersection.confidence(), 1.0);
        assert!(ClashCategory::UndersizedWeld.confidence() < 1.0);
    }
}
