// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clash detection.
//!
//! One full read-only pass over the resolved model per fixpoint iteration.
//! The detector is a pure function of (model, tolerances, standards); the
//! clash list is rebuilt from scratch every pass so no stale finding can
//! survive a correction. Scans iterate in sorted-id order, which makes the
//! clash ids and ordering deterministic for a given model.

use framecheck_geometry::{distance, lerp, segment_segment_distance, Aabb, Point3};
use framecheck_model::providers::{
    is_standard_value, min_weld_for_thickness, nearest_value_at_least, resolve_scalar,
    resolve_table, resolve_tolerance, StandardsProvider, ToleranceProvider, BOLT_DIAMETERS_M,
    BOLT_EDGE_FACTOR, BOLT_FOOTPRINT_TOL_M, BOLT_NEGATIVE_TOL_M, BOLT_SPACING_FACTOR,
    JOINT_ELEVATION_TOL_M, MEMBER_DUPLICATE_TOL_M, MIN_PLATE_HEIGHT_M, MIN_PLATE_WIDTH_M,
    MODEL_EXTENT_M, PLATE_POSITION_TOL_M, SEGMENT_INTERSECT_TOL_M, ZERO_LENGTH_TOL_M,
};
use framecheck_model::{BindingStrategy, ClashId, MemberId, StructuralModel};
use rustc_hash::FxHashSet;

use crate::clash::{Clash, ClashCategory, ClashValue, ElementRef};

/// Comparison slack so exact-minimum sizes are not flagged.
const SIZE_EPS: f64 = 1e-9;

/// Detects clashes in a resolved model. Never mutates.
pub struct ClashDetector<'a> {
    tolerances: Option<&'a dyn ToleranceProvider>,
    standards: Option<&'a dyn StandardsProvider>,
}

struct Pass {
    clashes: Vec<Clash>,
    next: usize,
}

impl Pass {
    fn new() -> Self {
        Self {
            clashes: Vec::new(),
            next: 1,
        }
    }

    fn push(
        &mut self,
        category: ClashCategory,
        subject: ElementRef,
        related: Vec<ElementRef>,
        current: Option<ClashValue>,
        expected: Option<ClashValue>,
        location: Point3<f64>,
    ) {
        let id = ClashId::new(format!("C{}", self.next));
        self.next += 1;
        self.clashes.push(Clash {
            id,
            category,
            severity: category.severity(),
            subject,
            related,
            current,
            expected,
            location,
            confidence: category.confidence(),
        });
    }
}

impl<'a> ClashDetector<'a> {
    pub fn new(
        tolerances: Option<&'a dyn ToleranceProvider>,
        standards: Option<&'a dyn StandardsProvider>,
    ) -> Self {
        Self {
            tolerances,
            standards,
        }
    }

    /// Scans the model once and returns every finding, in scan order:
    /// members, joints, plates, bolts, connections, bounds.
    pub fn detect(&self, model: &StructuralModel) -> Vec<Clash> {
        let mut pass = Pass::new();

        self.scan_members(model, &mut pass);
        self.scan_joints(model, &mut pass);
        self.scan_plates(model, &mut pass);
        self.scan_bolts(model, &mut pass);
        self.scan_connections(model, &mut pass);
        self.scan_bounds(model, &mut pass);

        pass.clashes
    }

    fn scan_members(&self, model: &StructuralModel, pass: &mut Pass) {
        let intersect_tol = resolve_tolerance(self.tolerances, SEGMENT_INTERSECT_TOL_M);
        let duplicate_tol = resolve_tolerance(self.tolerances, MEMBER_DUPLICATE_TOL_M);
        let zero_tol = resolve_tolerance(self.tolerances, ZERO_LENGTH_TOL_M);

        let ids = model.sorted_member_ids();
        let members: Vec<_> = ids.iter().filter_map(|id| model.member(id)).collect();

        for member in &members {
            if member.length() < zero_tol {
                pass.push(
                    ClashCategory::ZeroLengthMember,
                    ElementRef::Member(member.id.clone()),
                    Vec::new(),
                    Some(ClashValue::Scalar(member.length())),
                    None,
                    member.start,
                );
            }
        }

        // Member pairs already recorded by some joint.
        let mut jointed: FxHashSet<(MemberId, MemberId)> = FxHashSet::default();
        for joint in model.joints() {
            let ids: Vec<_> = joint.member_ids.iter().cloned().collect();
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    jointed.insert((ids[i].clone(), ids[j].clone()));
                }
            }
        }

        let boxes: Vec<Aabb> = members
            .iter()
            .map(|m| Aabb::from_segment(&m.start, &m.end))
            .collect();
        let clearance = intersect_tol.max(duplicate_tol);

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                if !boxes[i].overlaps(&boxes[j], clearance) {
                    continue;
                }
                let a = members[i];
                let b = members[j];

                let same_direction = distance(&a.start, &b.start) <= duplicate_tol
                    && distance(&a.end, &b.end) <= duplicate_tol;
                let swapped = distance(&a.start, &b.end) <= duplicate_tol
                    && distance(&a.end, &b.start) <= duplicate_tol;
                if same_direction || swapped {
                    pass.push(
                        ClashCategory::OverlappingMembers,
                        ElementRef::Member(a.id.clone()),
                        vec![ElementRef::Member(b.id.clone())],
                        None,
                        None,
                        lerp(&a.start, &a.end, 0.5),
                    );
                    continue;
                }

                let hit = segment_segment_distance(&a.start, &a.end, &b.start, &b.end);
                if hit.distance <= intersect_tol {
                    let key = if a.id < b.id {
                        (a.id.clone(), b.id.clone())
                    } else {
                        (b.id.clone(), a.id.clone())
                    };
                    if !jointed.contains(&key) {
                        pass.push(
                            ClashCategory::UnjointedIntersection,
                            ElementRef::Member(a.id.clone()),
                            vec![ElementRef::Member(b.id.clone())],
                            Some(ClashValue::Scalar(hit.distance)),
                            None,
                            hit.midpoint(),
                        );
                    }
                }
            }
        }
    }

    fn scan_joints(&self, model: &StructuralModel, pass: &mut Pass) {
        let elevation_tol = resolve_tolerance(self.tolerances, JOINT_ELEVATION_TOL_M);

        for id in model.sorted_joint_ids() {
            let joint = match model.joint(&id) {
                Some(j) => j,
                None => continue,
            };

            if joint.member_ids.len() < 2 {
                pass.push(
                    ClashCategory::UndersizedJoint,
                    ElementRef::Joint(id.clone()),
                    Vec::new(),
                    Some(ClashValue::Scalar(joint.member_ids.len() as f64)),
                    Some(ClashValue::Scalar(2.0)),
                    joint.location,
                );
            }

            let members: Vec<_> = joint
                .member_ids
                .iter()
                .filter_map(|m| model.member(m))
                .collect();
            if members.is_empty() {
                continue;
            }

            let expected_z = members
                .iter()
                .map(|m| m.nearest_endpoint(&joint.location).z)
                .sum::<f64>()
                / members.len() as f64;

            if (joint.location.z - expected_z).abs() > elevation_tol {
                pass.push(
                    ClashCategory::JointElevationMismatch,
                    ElementRef::Joint(id.clone()),
                    Vec::new(),
                    Some(ClashValue::Scalar(joint.location.z)),
                    Some(ClashValue::Scalar(expected_z)),
                    joint.location,
                );
            }
        }
    }

    fn scan_plates(&self, model: &StructuralModel, pass: &mut Pass) {
        let position_tol = resolve_tolerance(self.tolerances, PLATE_POSITION_TOL_M);
        let min_width = resolve_scalar(self.standards, MIN_PLATE_WIDTH_M).unwrap_or(0.0);
        let min_height = resolve_scalar(self.standards, MIN_PLATE_HEIGHT_M).unwrap_or(0.0);

        for id in model.sorted_plate_ids() {
            let plate = match model.plate(&id) {
                Some(p) => p,
                None => continue,
            };

            let fallback_bound = plate.binding == Some(BindingStrategy::FirstJoint);
            let owning = plate
                .owning_joint
                .as_ref()
                .and_then(|jid| model.joint(jid).map(|j| (jid.clone(), j.location)));

            match (&owning, fallback_bound) {
                (Some((joint_id, location)), false) => {
                    let offset = distance(&plate.position, location);
                    if offset > position_tol {
                        pass.push(
                            ClashCategory::PlateOffsetFromJoint,
                            ElementRef::Plate(id.clone()),
                            vec![ElementRef::Joint(joint_id.clone())],
                            Some(ClashValue::Point(plate.position)),
                            Some(ClashValue::Point(*location)),
                            plate.position,
                        );
                    }
                }
                // Fallback-bound plates are orphans in all but name; the
                // binding is recorded, not trusted.
                _ => {
                    pass.push(
                        ClashCategory::OrphanPlate,
                        ElementRef::Plate(id.clone()),
                        Vec::new(),
                        None,
                        None,
                        plate.position,
                    );
                }
            }

            if plate.outline.width < min_width - SIZE_EPS
                || plate.outline.height < min_height - SIZE_EPS
            {
                pass.push(
                    ClashCategory::UndersizedPlate,
                    ElementRef::Plate(id.clone()),
                    Vec::new(),
                    Some(ClashValue::Pair(plate.outline.width, plate.outline.height)),
                    Some(ClashValue::Pair(
                        plate.outline.width.max(min_width),
                        plate.outline.height.max(min_height),
                    )),
                    plate.position,
                );
            }
        }
    }

    fn scan_bolts(&self, model: &StructuralModel, pass: &mut Pass) {
        let footprint_tol = resolve_tolerance(self.tolerances, BOLT_FOOTPRINT_TOL_M);
        let negative_tol = resolve_tolerance(self.tolerances, BOLT_NEGATIVE_TOL_M);
        let diameters = resolve_table(self.standards, BOLT_DIAMETERS_M);

        for id in model.sorted_bolt_ids() {
            let bolt = match model.bolt(&id) {
                Some(b) => b,
                None => continue,
            };
            let plate = match model.plate(&bolt.parent_plate) {
                Some(p) => p,
                None => continue,
            };

            let local = plate.local_coords(&bolt.position);
            if !plate.footprint_contains(&bolt.position, footprint_tol) {
                pass.push(
                    ClashCategory::BoltOutsidePlate,
                    ElementRef::Bolt(id.clone()),
                    vec![ElementRef::Plate(plate.id.clone())],
                    Some(ClashValue::Point(bolt.position)),
                    None,
                    bolt.position,
                );
            } else if local.x < -negative_tol || local.z < -negative_tol {
                // Within footprint slack but more negative than fabrication
                // conventions allow.
                pass.push(
                    ClashCategory::NegativeBoltCoordinate,
                    ElementRef::Bolt(id.clone()),
                    vec![ElementRef::Plate(plate.id.clone())],
                    Some(ClashValue::Pair(local.x, local.z)),
                    Some(ClashValue::Pair(local.x.max(0.0), local.z.max(0.0))),
                    bolt.position,
                );
            }

            if let Some(table) = diameters {
                if !is_standard_value(table, bolt.diameter, 1e-6) {
                    let expected = nearest_value_at_least(table, bolt.diameter)
                        .or_else(|| table.last().copied());
                    pass.push(
                        ClashCategory::NonStandardBoltDiameter,
                        ElementRef::Bolt(id.clone()),
                        Vec::new(),
                        Some(ClashValue::Scalar(bolt.diameter)),
                        expected.map(ClashValue::Scalar),
                        bolt.position,
                    );
                }
            }
        }
    }

    fn scan_connections(&self, model: &StructuralModel, pass: &mut Pass) {
        let footprint_tol = resolve_tolerance(self.tolerances, BOLT_FOOTPRINT_TOL_M);
        let spacing_factor =
            resolve_scalar(self.standards, BOLT_SPACING_FACTOR).unwrap_or(0.0);
        let edge_factor = resolve_scalar(self.standards, BOLT_EDGE_FACTOR).unwrap_or(0.0);

        for plate_id in model.sorted_plate_ids() {
            let plate = match model.plate(&plate_id) {
                Some(p) => p,
                None => continue,
            };

            let min_weld = min_weld_for_thickness(self.standards, plate.thickness);
            if plate.weld_size < min_weld - SIZE_EPS {
                pass.push(
                    ClashCategory::UndersizedWeld,
                    ElementRef::Plate(plate_id.clone()),
                    Vec::new(),
                    Some(ClashValue::Scalar(plate.weld_size)),
                    Some(ClashValue::Scalar(min_weld)),
                    plate.position,
                );
            }

            let bolts = model.bolts_on_plate(&plate_id);

            for i in 0..bolts.len() {
                for j in (i + 1)..bolts.len() {
                    let min_spacing = spacing_factor * bolts[i].diameter.max(bolts[j].diameter);
                    let actual = distance(&bolts[i].position, &bolts[j].position);
                    if actual < min_spacing - SIZE_EPS {
                        pass.push(
                            ClashCategory::BoltSpacingViolation,
                            ElementRef::Bolt(bolts[i].id.clone()),
                            vec![ElementRef::Bolt(bolts[j].id.clone())],
                            Some(ClashValue::Scalar(actual)),
                            Some(ClashValue::Scalar(min_spacing)),
                            bolts[i].position,
                        );
                    }
                }
            }

            for bolt in &bolts {
                if !plate.footprint_contains(&bolt.position, footprint_tol) {
                    // Already reported as outside the footprint.
                    continue;
                }
                let local = plate.local_coords(&bolt.position);
                let edge_distance = local
                    .x
                    .min(plate.outline.width - local.x)
                    .min(local.z)
                    .min(plate.outline.height - local.z);
                let min_edge = edge_factor * bolt.diameter;
                if edge_distance < min_edge - SIZE_EPS {
                    pass.push(
                        ClashCategory::BoltEdgeDistance,
                        ElementRef::Bolt(bolt.id.clone()),
                        vec![ElementRef::Plate(plate_id.clone())],
                        Some(ClashValue::Scalar(edge_distance)),
                        Some(ClashValue::Scalar(min_edge)),
                        bolt.position,
                    );
                }
            }
        }
    }

    /// Coordinate sanity bound. One clash per offending element, reported
    /// `Failed` by the corrector: these are upstream unit/extraction bugs.
    fn scan_bounds(&self, model: &StructuralModel, pass: &mut Pass) {
        let extent = resolve_tolerance(self.tolerances, MODEL_EXTENT_M);

        let out = |p: &Point3<f64>| {
            p.x.abs() > extent || p.y.abs() > extent || p.z.abs() > extent
        };
        let worst = |p: &Point3<f64>| p.x.abs().max(p.y.abs()).max(p.z.abs());

        for id in model.sorted_member_ids() {
            if let Some(member) = model.member(&id) {
                if out(&member.start) || out(&member.end) {
                    let offending = if out(&member.start) {
                        member.start
                    } else {
                        member.end
                    };
                    pass.push(
                        ClashCategory::CoordinateOutOfBounds,
                        ElementRef::Member(id.clone()),
                        Vec::new(),
                        Some(ClashValue::Scalar(worst(&offending))),
                        Some(ClashValue::Scalar(extent)),
                        offending,
                    );
                }
            }
        }

        for id in model.sorted_joint_ids() {
            if let Some(joint) = model.joint(&id) {
                if out(&joint.location) {
                    pass.push(
                        ClashCategory::CoordinateOutOfBounds,
                        ElementRef::Joint(id.clone()),
                        Vec::new(),
                        Some(ClashValue::Scalar(worst(&joint.location))),
                        Some(ClashValue::Scalar(extent)),
                        joint.location,
                    );
                }
            }
        }

        for id in model.sorted_plate_ids() {
            if let Some(plate) = model.plate(&id) {
                if out(&plate.position) {
                    pass.push(
                        ClashCategory::CoordinateOutOfBounds,
                        ElementRef::Plate(id.clone()),
                        Vec::new(),
                        Some(ClashValue::Scalar(worst(&plate.position))),
                        Some(ClashValue::Scalar(extent)),
                        plate.position,
                    );
                }
            }
        }

        for id in model.sorted_bolt_ids() {
            if let Some(bolt) = model.bolt(&id) {
                if out(&bolt.position) {
                    pass.push(
                        ClashCategory::CoordinateOutOfBounds,
                        ElementRef::Bolt(id.clone()),
                        Vec::new(),
                        Some(ClashValue::Scalar(worst(&bolt.position))),
                        Some(ClashValue::Scalar(extent)),
                        bolt.position,
                    );
                }
            }
        }
    }
}
