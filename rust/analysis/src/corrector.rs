// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clash correction.
//!
//! One handler per clash category. Position and elevation mismatches snap to
//! the authoritative value; sizes below minimum are raised to the nearest
//! standards-table value, consulting the sizing oracle first and re-validating
//! its suggestion before acceptance. Findings that would require inventing
//! topology are handed back for review, and boundary violations are surfaced
//! as failures, never clamped.
//!
//! All corrections are applied to a working copy of the model; the caller's
//! model is never touched, and every handler checks its preconditions before
//! its first mutation.

use framecheck_geometry::Vector3;
use framecheck_model::providers::{
    is_standard_value, min_weld_for_thickness, nearest_value_at_least, resolve_scalar,
    resolve_table, resolve_tolerance, SizingOracle, StandardsProvider, ToleranceProvider,
    BOLT_DIAMETERS_M, BOLT_EDGE_FACTOR, MIN_PLATE_HEIGHT_M, MIN_PLATE_WIDTH_M, MODEL_EXTENT_M,
};
use framecheck_model::{ClashId, StructuralModel};
use serde::Serialize;

use crate::clash::{Clash, ClashCategory, ClashValue};

/// What happened to one clash during a correction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrectionOutcome {
    /// The model was repaired deterministically.
    AutoFixed,
    /// The finding needs a human decision; the model was not changed.
    ReviewRequired,
    /// The finding indicates an upstream bug that cannot be safely patched.
    Failed,
}

impl CorrectionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionOutcome::AutoFixed => "auto-fixed",
            CorrectionOutcome::ReviewRequired => "review-required",
            CorrectionOutcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CorrectionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry for one clash.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionRecord {
    pub clash_id: ClashId,
    pub category: ClashCategory,
    pub outcome: CorrectionOutcome,
    pub before: Option<ClashValue>,
    pub after: Option<ClashValue>,
}

type Correction = (CorrectionOutcome, Option<ClashValue>, Option<ClashValue>);

fn review(clash: &Clash) -> Correction {
    (CorrectionOutcome::ReviewRequired, clash.current, None)
}

/// Applies per-category repairs to a working copy of the model.
pub struct ClashCorrector<'a> {
    tolerances: Option<&'a dyn ToleranceProvider>,
    standards: Option<&'a dyn StandardsProvider>,
    oracle: Option<&'a dyn SizingOracle>,
}

impl<'a> ClashCorrector<'a> {
    pub fn new(
        tolerances: Option<&'a dyn ToleranceProvider>,
        standards: Option<&'a dyn StandardsProvider>,
        oracle: Option<&'a dyn SizingOracle>,
    ) -> Self {
        Self {
            tolerances,
            standards,
            oracle,
        }
    }

    /// Handles every clash against a clone of `model` and returns the
    /// mutated copy plus the ledger, one record per clash in order.
    pub fn apply(
        &self,
        clashes: &[Clash],
        model: &StructuralModel,
    ) -> (StructuralModel, Vec<CorrectionRecord>) {
        let mut working = model.clone();
        let mut records = Vec::with_capacity(clashes.len());

        for clash in clashes {
            let (outcome, before, after) = self.apply_one(clash, &mut working);
            tracing::debug!(
                clash = %clash.id,
                category = %clash.category,
                outcome = %outcome,
                "correction handled"
            );
            records.push(CorrectionRecord {
                clash_id: clash.id.clone(),
                category: clash.category,
                outcome,
                before,
                after,
            });
        }

        (working, records)
    }

    fn apply_one(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        use ClashCategory::*;
        match clash.category {
            PlateOffsetFromJoint => self.snap_plate_to_joint(clash, model),
            JointElevationMismatch => self.snap_joint_elevation(clash, model),
            BoltOutsidePlate => self.clamp_bolt_into_footprint(clash, model),
            NegativeBoltCoordinate => self.clamp_bolt_nonnegative(clash, model),
            NonStandardBoltDiameter => self.fix_bolt_diameter(clash, model),
            UndersizedPlate => self.fix_plate_outline(clash, model),
            UndersizedWeld => self.fix_weld_size(clash, model),

            // Repairing these would mean inventing topology or layout; they
            // are surfaced for review instead.
            OverlappingMembers | ZeroLengthMember | UnjointedIntersection | UndersizedJoint
            | OrphanPlate | BoltSpacingViolation | BoltEdgeDistance => review(clash),

            // Out-of-bounds coordinates are upstream unit/extraction bugs;
            // clamping them would hide the real defect.
            CoordinateOutOfBounds => {
                tracing::warn!(
                    clash = %clash.id,
                    subject = %clash.subject,
                    extent = resolve_tolerance(self.tolerances, MODEL_EXTENT_M),
                    "coordinate outside model extent, refusing to repair"
                );
                (CorrectionOutcome::Failed, clash.current, None)
            }
        }
    }

    fn snap_plate_to_joint(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        let plate_id = match clash.subject.as_plate() {
            Some(id) => id.clone(),
            None => return review(clash),
        };
        let target = match model
            .plate(&plate_id)
            .and_then(|p| p.owning_joint.clone())
            .and_then(|jid| model.joint(&jid))
            .map(|j| j.location)
        {
            Some(location) => location,
            None => return review(clash),
        };

        match model.plate_mut(&plate_id) {
            Some(plate) => {
                let before = plate.position;
                plate.position = target;
                (
                    CorrectionOutcome::AutoFixed,
                    Some(ClashValue::Point(before)),
                    Some(ClashValue::Point(target)),
                )
            }
            None => review(clash),
        }
    }

    fn snap_joint_elevation(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        let joint_id = match clash.subject.as_joint() {
            Some(id) => id.clone(),
            None => return review(clash),
        };
        let expected = match clash.expected {
            Some(ClashValue::Scalar(z)) => z,
            _ => return review(clash),
        };

        match model.joint_mut(&joint_id) {
            Some(joint) => {
                let before = joint.location.z;
                joint.location.z = expected;
                (
                    CorrectionOutcome::AutoFixed,
                    Some(ClashValue::Scalar(before)),
                    Some(ClashValue::Scalar(expected)),
                )
            }
            None => review(clash),
        }
    }

    fn clamp_bolt_into_footprint(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        let bolt_id = match clash.subject.as_bolt() {
            Some(id) => id.clone(),
            None => return review(clash),
        };
        let edge_factor = resolve_scalar(self.standards, BOLT_EDGE_FACTOR).unwrap_or(0.0);

        let target = {
            let bolt = match model.bolt(&bolt_id) {
                Some(b) => b,
                None => return review(clash),
            };
            let plate = match model.plate(&bolt.parent_plate) {
                Some(p) => p,
                None => return review(clash),
            };
            plate.clamp_to_footprint(&bolt.position, edge_factor * bolt.diameter)
        };

        match model.bolt_mut(&bolt_id) {
            Some(bolt) => {
                let before = bolt.position;
                bolt.position = target;
                (
                    CorrectionOutcome::AutoFixed,
                    Some(ClashValue::Point(before)),
                    Some(ClashValue::Point(target)),
                )
            }
            None => review(clash),
        }
    }

    fn clamp_bolt_nonnegative(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        let bolt_id = match clash.subject.as_bolt() {
            Some(id) => id.clone(),
            None => return review(clash),
        };

        let target = {
            let bolt = match model.bolt(&bolt_id) {
                Some(b) => b,
                None => return review(clash),
            };
            let plate = match model.plate(&bolt.parent_plate) {
                Some(p) => p,
                None => return review(clash),
            };
            let local = plate.local_coords(&bolt.position);
            plate.corner() + Vector3::new(local.x.max(0.0), local.y, local.z.max(0.0))
        };

        match model.bolt_mut(&bolt_id) {
            Some(bolt) => {
                let before = bolt.position;
                bolt.position = target;
                (
                    CorrectionOutcome::AutoFixed,
                    Some(ClashValue::Point(before)),
                    Some(ClashValue::Point(target)),
                )
            }
            None => review(clash),
        }
    }

    fn fix_bolt_diameter(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        let bolt_id = match clash.subject.as_bolt() {
            Some(id) => id.clone(),
            None => return review(clash),
        };
        let table = match resolve_table(self.standards, BOLT_DIAMETERS_M) {
            Some(t) => t,
            None => return review(clash),
        };

        let (current, thickness) = {
            let bolt = match model.bolt(&bolt_id) {
                Some(b) => b,
                None => return review(clash),
            };
            let thickness = model
                .plate(&bolt.parent_plate)
                .map(|p| p.thickness)
                .unwrap_or(0.0);
            (bolt.diameter, thickness)
        };

        let suggestion = self
            .oracle
            .and_then(|o| o.suggest_bolt_diameter(thickness))
            .and_then(|s| {
                if is_standard_value(table, s, 1e-6) && s + 1e-9 >= current {
                    Some(s)
                } else {
                    tracing::warn!(
                        suggestion = s,
                        "oracle bolt diameter rejected by standards table"
                    );
                    None
                }
            });

        let target = suggestion.or_else(|| nearest_value_at_least(table, current));
        match target {
            Some(diameter) => match model.bolt_mut(&bolt_id) {
                Some(bolt) => {
                    bolt.diameter = diameter;
                    (
                        CorrectionOutcome::AutoFixed,
                        Some(ClashValue::Scalar(current)),
                        Some(ClashValue::Scalar(diameter)),
                    )
                }
                None => review(clash),
            },
            // Larger than every legal diameter: not something to guess at.
            None => (
                CorrectionOutcome::ReviewRequired,
                Some(ClashValue::Scalar(current)),
                None,
            ),
        }
    }

    fn fix_plate_outline(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        let plate_id = match clash.subject.as_plate() {
            Some(id) => id.clone(),
            None => return review(clash),
        };
        let min_width = match resolve_scalar(self.standards, MIN_PLATE_WIDTH_M) {
            Some(v) => v,
            None => return review(clash),
        };
        let min_height = match resolve_scalar(self.standards, MIN_PLATE_HEIGHT_M) {
            Some(v) => v,
            None => return review(clash),
        };

        let (current, member_count) = {
            let plate = match model.plate(&plate_id) {
                Some(p) => p,
                None => return review(clash),
            };
            let count = plate
                .owning_joint
                .as_ref()
                .and_then(|jid| model.joint(jid))
                .map(|j| j.member_ids.len())
                .unwrap_or(plate.connected_members.len());
            ((plate.outline.width, plate.outline.height), count)
        };

        let suggestion = self
            .oracle
            .and_then(|o| o.suggest_plate_outline(member_count))
            .and_then(|(w, h)| {
                if w.is_finite() && h.is_finite() && w >= min_width && h >= min_height {
                    Some((w, h))
                } else {
                    tracing::warn!(
                        width = w,
                        height = h,
                        "oracle plate outline rejected by standards minimums"
                    );
                    None
                }
            });

        let (width, height) =
            suggestion.unwrap_or((current.0.max(min_width), current.1.max(min_height)));

        match model.plate_mut(&plate_id) {
            Some(plate) => {
                plate.outline.width = width;
                plate.outline.height = height;
                (
                    CorrectionOutcome::AutoFixed,
                    Some(ClashValue::Pair(current.0, current.1)),
                    Some(ClashValue::Pair(width, height)),
                )
            }
            None => review(clash),
        }
    }

    fn fix_weld_size(&self, clash: &Clash, model: &mut StructuralModel) -> Correction {
        let plate_id = match clash.subject.as_plate() {
            Some(id) => id.clone(),
            None => return review(clash),
        };
        let (current, thickness) = match model.plate(&plate_id) {
            Some(p) => (p.weld_size, p.thickness),
            None => return review(clash),
        };

        let min_weld = min_weld_for_thickness(self.standards, thickness);
        if min_weld <= 0.0 {
            return review(clash);
        }

        // A fillet leg larger than the plate thickness is physically wrong,
        // so the oracle is bounded on both sides.
        let suggestion = self
            .oracle
            .and_then(|o| o.suggest_weld_size(thickness))
            .and_then(|s| {
                if s.is_finite() && s >= min_weld && s <= thickness {
                    Some(s)
                } else {
                    tracing::warn!(suggestion = s, "oracle weld size rejected");
                    None
                }
            });

        let target = suggestion.unwrap_or(min_weld);
        match model.plate_mut(&plate_id) {
            Some(plate) => {
                plate.weld_size = target;
                (
                    CorrectionOutcome::AutoFixed,
                    Some(ClashValue::Scalar(current)),
                    Some(ClashValue::Scalar(target)),
                )
            }
            None => review(clash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ClashDetector;
    use crate::mapper::assign_plates;
    use approx::assert_relative_eq;
    use framecheck_geometry::Point3;
    use framecheck_model::{
        BoltId, BoltRecord, Joint, JointCategory, JointId, MemberId, MemberKind, MemberRecord,
        ModelInput, OutlineRecord, PlateId, PlateRecord,
    };
    use std::collections::BTreeSet;

    fn beam(id: &str, start: [f64; 3], end: [f64; 3]) -> MemberRecord {
        MemberRecord {
            id: id.into(),
            kind: MemberKind::Beam,
            start,
            end,
            profile: None,
            material: None,
        }
    }

    fn joint(id: &str, location: [f64; 3], members: &[&str]) -> Joint {
        Joint {
            id: JointId::new(id),
            location: Point3::new(location[0], location[1], location[2]),
            member_ids: members
                .iter()
                .map(|m| MemberId::new(*m))
                .collect::<BTreeSet<_>>(),
            category: JointCategory::General,
        }
    }

    fn l_frame_with_plate(plate: PlateRecord, bolts: Vec<BoltRecord>) -> StructuralModel {
        let input = ModelInput {
            members: vec![
                beam("m1", [0.0, 0.0, 0.0], [0.0, 0.0, 5.0]),
                beam("m2", [0.0, 0.0, 5.0], [6.0, 0.0, 5.0]),
            ],
            plates: vec![plate],
            bolts,
            ..Default::default()
        };
        let mut model = StructuralModel::from_input(&input).unwrap();
        model.set_joints(vec![joint("J1", [0.0, 0.0, 5.0], &["m1", "m2"])]);
        assign_plates(&mut model, None);
        model
    }

    fn plate_record(id: &str) -> PlateRecord {
        PlateRecord {
            id: id.into(),
            position: [0.0, 0.0, 5.0],
            outline: OutlineRecord {
                width: 0.3,
                height: 0.3,
            },
            thickness: 0.012,
            weld_size: Some(0.005),
            connected_members: Some(vec!["m1".into(), "m2".into()]),
            owning_joint: None,
        }
    }

    struct MockOracle {
        bolt: Option<f64>,
        weld: Option<f64>,
        outline: Option<(f64, f64)>,
    }

    impl SizingOracle for MockOracle {
        fn suggest_bolt_diameter(&self, _plate_thickness: f64) -> Option<f64> {
            self.bolt
        }
        fn suggest_weld_size(&self, _plate_thickness: f64) -> Option<f64> {
            self.weld
        }
        fn suggest_plate_outline(&self, _member_count: usize) -> Option<(f64, f64)> {
            self.outline
        }
    }

    fn run(model: &StructuralModel, oracle: Option<&dyn SizingOracle>) -> (StructuralModel, Vec<CorrectionRecord>) {
        let clashes = ClashDetector::new(None, None).detect(model);
        ClashCorrector::new(None, None, oracle).apply(&clashes, model)
    }

    #[test]
    fn plate_snapped_to_owning_joint() {
        let mut record = plate_record("p1");
        record.position = [0.0, 0.0, 0.0];
        let model = l_frame_with_plate(record, Vec::new());

        let (fixed, ledger) = run(&model, None);

        let plate = fixed.plate(&PlateId::new("p1")).unwrap();
        assert_eq!(plate.position, Point3::new(0.0, 0.0, 5.0));
        assert!(ledger
            .iter()
            .any(|r| r.category == ClashCategory::PlateOffsetFromJoint
                && r.outcome == CorrectionOutcome::AutoFixed));
        // The input model is untouched.
        assert_eq!(
            model.plate(&PlateId::new("p1")).unwrap().position,
            Point3::new(0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn joint_elevation_snapped_to_member_consensus() {
        let mut model = l_frame_with_plate(plate_record("p1"), Vec::new());
        model.joint_mut(&JointId::new("J1")).unwrap().location.z = 4.0;

        let (fixed, ledger) = run(&model, None);

        assert_relative_eq!(
            fixed.joint(&JointId::new("J1")).unwrap().location.z,
            5.0,
            epsilon = 1e-9
        );
        assert!(ledger
            .iter()
            .any(|r| r.category == ClashCategory::JointElevationMismatch
                && r.outcome == CorrectionOutcome::AutoFixed));
    }

    #[test]
    fn nonstandard_diameter_raised_to_table() {
        let bolt = BoltRecord {
            id: "b1".into(),
            position: [0.0, 0.0, 5.0],
            diameter: 0.021,
            parent_plate: "p1".into(),
        };
        let model = l_frame_with_plate(plate_record("p1"), vec![bolt]);

        let (fixed, _) = run(&model, None);
        assert_relative_eq!(fixed.bolt(&BoltId::new("b1")).unwrap().diameter, 0.024);
    }

    #[test]
    fn valid_oracle_suggestion_wins_over_table() {
        let bolt = BoltRecord {
            id: "b1".into(),
            position: [0.0, 0.0, 5.0],
            diameter: 0.021,
            parent_plate: "p1".into(),
        };
        let model = l_frame_with_plate(plate_record("p1"), vec![bolt]);
        let oracle = MockOracle {
            bolt: Some(0.030),
            weld: None,
            outline: None,
        };

        let (fixed, _) = run(&model, Some(&oracle));
        assert_relative_eq!(fixed.bolt(&BoltId::new("b1")).unwrap().diameter, 0.030);
    }

    #[test]
    fn invalid_oracle_suggestion_falls_back_to_table() {
        let bolt = BoltRecord {
            id: "b1".into(),
            position: [0.0, 0.0, 5.0],
            diameter: 0.021,
            parent_plate: "p1".into(),
        };
        let model = l_frame_with_plate(plate_record("p1"), vec![bolt]);
        // 13mm is not a standard diameter and is below the current one.
        let oracle = MockOracle {
            bolt: Some(0.013),
            weld: None,
            outline: None,
        };

        let (fixed, _) = run(&model, Some(&oracle));
        assert_relative_eq!(fixed.bolt(&BoltId::new("b1")).unwrap().diameter, 0.024);
    }

    #[test]
    fn oversize_diameter_needs_review() {
        let bolt = BoltRecord {
            id: "b1".into(),
            position: [0.0, 0.0, 5.0],
            diameter: 0.050,
            parent_plate: "p1".into(),
        };
        let model = l_frame_with_plate(plate_record("p1"), vec![bolt]);

        let (fixed, ledger) = run(&model, None);
        assert_relative_eq!(fixed.bolt(&BoltId::new("b1")).unwrap().diameter, 0.050);
        assert!(ledger
            .iter()
            .any(|r| r.category == ClashCategory::NonStandardBoltDiameter
                && r.outcome == CorrectionOutcome::ReviewRequired));
    }

    #[test]
    fn missing_weld_raised_to_minimum() {
        let mut record = plate_record("p1");
        record.weld_size = None;
        let model = l_frame_with_plate(record, Vec::new());

        let (fixed, _) = run(&model, None);
        assert_relative_eq!(
            fixed.plate(&PlateId::new("p1")).unwrap().weld_size,
            0.005
        );
    }

    #[test]
    fn oversized_weld_suggestion_rejected() {
        let mut record = plate_record("p1");
        record.weld_size = None;
        let model = l_frame_with_plate(record, Vec::new());
        // Thicker than the plate itself: physically wrong, must be rejected.
        let oracle = MockOracle {
            bolt: None,
            weld: Some(0.050),
            outline: None,
        };

        let (fixed, _) = run(&model, Some(&oracle));
        assert_relative_eq!(
            fixed.plate(&PlateId::new("p1")).unwrap().weld_size,
            0.005
        );
    }

    #[test]
    fn undersized_plate_raised_to_minimums() {
        let mut record = plate_record("p1");
        record.outline = OutlineRecord {
            width: 0.05,
            height: 0.3,
        };
        let model = l_frame_with_plate(record, Vec::new());

        let (fixed, _) = run(&model, None);
        let outline = fixed.plate(&PlateId::new("p1")).unwrap().outline;
        assert_relative_eq!(outline.width, 0.08);
        assert_relative_eq!(outline.height, 0.3);
    }

    #[test]
    fn bolt_clamped_into_footprint() {
        let bolt = BoltRecord {
            id: "b1".into(),
            position: [1.0, 0.0, 5.0],
            diameter: 0.020,
            parent_plate: "p1".into(),
        };
        let model = l_frame_with_plate(plate_record("p1"), vec![bolt]);

        let (fixed, _) = run(&model, None);
        let bolt = fixed.bolt(&BoltId::new("b1")).unwrap();
        let plate = fixed.plate(&PlateId::new("p1")).unwrap();
        assert!(plate.footprint_contains(&bolt.position, 0.0));
        // Clamped with the edge-distance margin, not onto the edge itself.
        let local = plate.local_coords(&bolt.position);
        assert_relative_eq!(local.x, 0.3 - 1.25 * 0.020);
    }

    #[test]
    fn negative_bolt_coordinate_clamped_to_zero() {
        let bolt = BoltRecord {
            id: "b1".into(),
            position: [-0.153, 0.0, 5.0],
            diameter: 0.020,
            parent_plate: "p1".into(),
        };
        let model = l_frame_with_plate(plate_record("p1"), vec![bolt]);

        let (fixed, ledger) = run(&model, None);
        assert!(ledger
            .iter()
            .any(|r| r.category == ClashCategory::NegativeBoltCoordinate
                && r.outcome == CorrectionOutcome::AutoFixed));

        // Local x snaps to the plate edge, the other coordinates stay put.
        let bolt = fixed.bolt(&BoltId::new("b1")).unwrap();
        assert_relative_eq!(bolt.position.x, -0.15, epsilon = 1e-9);
        assert_relative_eq!(bolt.position.z, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn orphan_plate_requires_review_and_is_not_moved() {
        let mut record = plate_record("p1");
        record.connected_members = Some(vec!["m1".into()]);
        let input = ModelInput {
            members: vec![beam("m1", [0.0, 0.0, 0.0], [0.0, 0.0, 5.0])],
            plates: vec![record],
            ..Default::default()
        };
        let mut model = StructuralModel::from_input(&input).unwrap();
        model.set_joints(Vec::new());
        assign_plates(&mut model, None);

        let (fixed, ledger) = run(&model, None);
        assert!(ledger
            .iter()
            .any(|r| r.category == ClashCategory::OrphanPlate
                && r.outcome == CorrectionOutcome::ReviewRequired));
        assert_eq!(
            fixed.plate(&PlateId::new("p1")).unwrap().position,
            Point3::new(0.0, 0.0, 5.0)
        );
    }

    #[test]
    fn boundary_violation_fails_and_is_not_clamped() {
        let input = ModelInput {
            members: vec![
                beam("m1", [0.0, 0.0, 0.0], [1e9, 0.0, 0.0]),
                beam("m2", [0.0, 0.0, 0.0], [0.0, 0.0, 5.0]),
            ],
            ..Default::default()
        };
        let mut model = StructuralModel::from_input(&input).unwrap();
        model.set_joints(vec![joint("J1", [0.0, 0.0, 0.0], &["m1", "m2"])]);

        let (fixed, ledger) = run(&model, None);
        let boundary: Vec<_> = ledger
            .iter()
            .filter(|r| r.category == ClashCategory::CoordinateOutOfBounds)
            .collect();
        assert_eq!(boundary.len(), 1);
        assert_eq!(boundary[0].outcome, CorrectionOutcome::Failed);
        assert_eq!(
            fixed.member(&MemberId::new("m1")).unwrap().end,
            Point3::new(1e9, 0.0, 0.0)
        );
    }
}
