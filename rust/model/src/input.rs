// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire-facing input records.
//!
//! The core accepts data, not files: whatever extracted the model (IFC, DXF,
//! a test fixture) hands over these serde records with coordinates as
//! `[x, y, z]` arrays **in meters**. Millimeter sources must convert with
//! `framecheck_geometry::mm_to_m` before building records.

use framecheck_geometry::Point3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::elements::{Bolt, Member, MemberKind, Plate, PlateOutline};
use crate::ids::{BoltId, MemberId, PlateId};
use crate::model::StructuralModel;
use crate::validate::{validate_input, ModelError, Result};

/// One structural member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub kind: MemberKind,
    pub start: [f64; 3],
    pub end: [f64; 3],
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
}

/// One externally supplied joint. May be degenerate (placeholder location
/// with an intact member list); the joint resolver decides how to use it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointRecord {
    pub id: String,
    pub location: [f64; 3],
    pub member_ids: Vec<String>,
}

/// Plate outline dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub width: f64,
    pub height: f64,
}

/// One fabrication plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateRecord {
    pub id: String,
    pub position: [f64; 3],
    pub outline: OutlineRecord,
    pub thickness: f64,
    /// Fillet weld leg size; absent means no weld recorded.
    #[serde(default)]
    pub weld_size: Option<f64>,
    #[serde(default)]
    pub connected_members: Option<Vec<String>>,
    /// Joint reference embedded on the plate itself, if the extractor had one.
    #[serde(default)]
    pub owning_joint: Option<String>,
}

/// One bolt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoltRecord {
    pub id: String,
    pub position: [f64; 3],
    pub diameter: f64,
    pub parent_plate: String,
}

/// Complete input for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInput {
    pub members: Vec<MemberRecord>,
    /// Absent, trustworthy, or degenerate; see the joint resolver.
    #[serde(default)]
    pub joints: Option<Vec<JointRecord>>,
    #[serde(default)]
    pub plates: Vec<PlateRecord>,
    #[serde(default)]
    pub bolts: Vec<BoltRecord>,
    /// Optional explicit plate-id to joint-id mapping.
    #[serde(default)]
    pub plate_joint_map: Option<FxHashMap<String, String>>,
}

pub(crate) fn point(coords: [f64; 3]) -> Point3<f64> {
    Point3::new(coords[0], coords[1], coords[2])
}

impl StructuralModel {
    /// Builds the arena from input records, rejecting invalid input with the
    /// full structured error list before any geometry runs.
    ///
    /// Joints are deliberately left out: the joint resolver owns the joint
    /// set and receives the raw records separately.
    pub fn from_input(input: &ModelInput) -> Result<StructuralModel> {
        let errors = validate_input(input);
        if !errors.is_empty() {
            return Err(ModelError::Invalid(errors));
        }

        let mut model = StructuralModel::new();

        for record in &input.members {
            model.insert_member(Member {
                id: MemberId::new(&record.id),
                kind: record.kind,
                start: point(record.start),
                end: point(record.end),
                profile: record.profile.clone().unwrap_or_default(),
                material: record.material.clone().unwrap_or_default(),
            });
        }

        for record in &input.plates {
            let connected: SmallVec<[MemberId; 4]> = record
                .connected_members
                .iter()
                .flatten()
                .map(|id| MemberId::new(id))
                .collect();
            model.insert_plate(Plate {
                id: PlateId::new(&record.id),
                position: point(record.position),
                outline: PlateOutline {
                    width: record.outline.width,
                    height: record.outline.height,
                },
                thickness: record.thickness,
                weld_size: record.weld_size.unwrap_or(0.0),
                connected_members: connected,
                owning_joint: record.owning_joint.as_deref().map(Into::into),
                binding: None,
            });
        }

        for record in &input.bolts {
            model.insert_bolt(Bolt {
                id: BoltId::new(&record.id),
                position: point(record.position),
                diameter: record.diameter,
                parent_plate: PlateId::new(&record.parent_plate),
            });
        }

        Ok(model)
    }
}
