// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element-to-joint mapping.
//!
//! Assigns every plate to the joint it physically belongs to (bolts inherit
//! through their parent plate). Strategies run in priority order and the
//! first success wins:
//!
//! 1. largest member-set overlap (ties to the smaller joint id),
//! 2. explicit plate-to-joint table,
//! 3. joint reference embedded on the plate record,
//! 4. nearest joint by distance,
//! 5. first joint in id order — logged and reported, never authoritative.
//!
//! A plate that reaches strategy 5, or for which no joints exist, is an
//! orphan; the detector reports it instead of silently positioning it.

use std::collections::BTreeSet;

use framecheck_geometry::{distance, Point3};
use framecheck_model::{BindingStrategy, JointId, MemberId, PlateId, StructuralModel};
use rustc_hash::FxHashMap;

/// Outcome of mapping one plate.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PlateAssignment {
    pub plate: PlateId,
    pub joint: Option<JointId>,
    pub strategy: Option<BindingStrategy>,
    /// True when no confident binding exists (strategy 5 or no joints).
    pub orphan: bool,
}

/// Maps every plate to a joint, writing `owning_joint` and `binding` onto
/// the plates. Returns one assignment record per plate, in plate-id order.
pub fn assign_plates(
    model: &mut StructuralModel,
    explicit: Option<&FxHashMap<String, String>>,
) -> Vec<PlateAssignment> {
    // Joint snapshot in id order; tie-breaks fall out of iteration order.
    let joint_ids = model.sorted_joint_ids();
    let joints: Vec<(JointId, Point3<f64>, BTreeSet<MemberId>)> = joint_ids
        .iter()
        .filter_map(|id| {
            model
                .joint(id)
                .map(|j| (id.clone(), j.location, j.member_ids.clone()))
        })
        .collect();

    let mut assignments = Vec::new();

    for plate_id in model.sorted_plate_ids() {
        let (connected, position, embedded) = match model.plate(&plate_id) {
            Some(plate) => (
                plate.connected_members.iter().cloned().collect::<BTreeSet<_>>(),
                plate.position,
                plate.owning_joint.clone(),
            ),
            None => continue,
        };

        let decision = decide(&plate_id, &connected, &position, embedded, &joints, explicit);

        let (joint, strategy) = match &decision {
            Some((joint, strategy)) => (Some(joint.clone()), Some(*strategy)),
            None => (None, None),
        };
        let orphan = matches!(strategy, None | Some(BindingStrategy::FirstJoint));

        if let Some(plate) = model.plate_mut(&plate_id) {
            plate.owning_joint = joint.clone();
            plate.binding = strategy;
        }

        assignments.push(PlateAssignment {
            plate: plate_id,
            joint,
            strategy,
            orphan,
        });
    }

    assignments
}

fn decide(
    plate_id: &PlateId,
    connected: &BTreeSet<MemberId>,
    position: &Point3<f64>,
    embedded: Option<JointId>,
    joints: &[(JointId, Point3<f64>, BTreeSet<MemberId>)],
    explicit: Option<&FxHashMap<String, String>>,
) -> Option<(JointId, BindingStrategy)> {
    if joints.is_empty() {
        return None;
    }

    // 1. Member-overlap scoring.
    if !connected.is_empty() {
        let mut best: Option<(&JointId, usize)> = None;
        for (id, _, member_ids) in joints {
            let overlap = member_ids.intersection(connected).count();
            if overlap > 0 && best.map_or(true, |(_, b)| overlap > b) {
                best = Some((id, overlap));
            }
        }
        if let Some((id, _)) = best {
            return Some((id.clone(), BindingStrategy::MemberOverlap));
        }
    }

    // 2. Explicit relationship table.
    if let Some(table) = explicit {
        if let Some(target) = table.get(plate_id.as_str()) {
            let target = JointId::new(target);
            if joints.iter().any(|(id, _, _)| *id == target) {
                return Some((target, BindingStrategy::ExplicitTable));
            }
        }
    }

    // 3. Direct reference embedded on the plate.
    if let Some(target) = embedded {
        if joints.iter().any(|(id, _, _)| *id == target) {
            return Some((target, BindingStrategy::DirectReference));
        }
    }

    // 4. Nearest joint by distance.
    let mut nearest: Option<(&JointId, f64)> = None;
    for (id, location, _) in joints {
        let d = distance(position, location);
        if nearest.map_or(true, |(_, b)| d < b) {
            nearest = Some((id, d));
        }
    }
    if let Some((id, _)) = nearest {
        return Some((id.clone(), BindingStrategy::NearestJoint));
    }

    // 5. Last resort: first joint in id order.
    let (id, _, _) = &joints[0];
    tracing::warn!(
        plate = %plate_id,
        joint = %id,
        "no mapping strategy matched, falling back to first joint"
    );
    Some((id.clone(), BindingStrategy::FirstJoint))
}
