// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction-time input validation.
//!
//! Runs before any geometry: malformed references, duplicate ids, degenerate
//! members, and non-finite coordinates are all collected and reported
//! together, never silently defaulted deep in the algorithm.

use rustc_hash::FxHashSet;

use crate::ids::{BoltId, MemberId, PlateId};
use crate::input::ModelInput;

/// Result type alias for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Fatal model-construction error.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The input failed validation; every finding is listed.
    #[error("model input rejected with {} validity error(s)", .0.len())]
    Invalid(Vec<ValidityError>),
}

/// One input validity finding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidityError {
    #[error("member {0} has zero length")]
    ZeroLengthMember(MemberId),

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{owner} references unknown member {member}")]
    UnknownMember { owner: String, member: MemberId },

    #[error("bolt {bolt} references unknown plate {plate}")]
    UnknownParentPlate { bolt: BoltId, plate: PlateId },

    #[error("{element} has a non-finite coordinate")]
    NonFiniteCoordinate { element: String },

    #[error("{element} has a non-positive {dimension}")]
    NonPositiveDimension {
        element: String,
        dimension: &'static str,
    },
}

fn finite(coords: &[f64; 3]) -> bool {
    coords.iter().all(|c| c.is_finite())
}

fn squared_length(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// Validates input records, returning every finding (empty = valid).
pub fn validate_input(input: &ModelInput) -> Vec<ValidityError> {
    let mut errors = Vec::new();

    let mut member_ids: FxHashSet<&str> = FxHashSet::default();
    for record in &input.members {
        if !member_ids.insert(record.id.as_str()) {
            errors.push(ValidityError::DuplicateId {
                kind: "member",
                id: record.id.clone(),
            });
        }
        if !finite(&record.start) || !finite(&record.end) {
            errors.push(ValidityError::NonFiniteCoordinate {
                element: format!("member {}", record.id),
            });
            continue;
        }
        if squared_length(&record.start, &record.end) < 1e-18 {
            errors.push(ValidityError::ZeroLengthMember(MemberId::new(&record.id)));
        }
    }

    if let Some(joints) = &input.joints {
        let mut joint_ids: FxHashSet<&str> = FxHashSet::default();
        for record in joints {
            if !joint_ids.insert(record.id.as_str()) {
                errors.push(ValidityError::DuplicateId {
                    kind: "joint",
                    id: record.id.clone(),
                });
            }
            if !finite(&record.location) {
                errors.push(ValidityError::NonFiniteCoordinate {
                    element: format!("joint {}", record.id),
                });
            }
            for member in &record.member_ids {
                if !member_ids.contains(member.as_str()) {
                    errors.push(ValidityError::UnknownMember {
                        owner: format!("joint {}", record.id),
                        member: MemberId::new(member),
                    });
                }
            }
        }
    }

    let mut plate_ids: FxHashSet<&str> = FxHashSet::default();
    for record in &input.plates {
        if !plate_ids.insert(record.id.as_str()) {
            errors.push(ValidityError::DuplicateId {
                kind: "plate",
                id: record.id.clone(),
            });
        }
        if !finite(&record.position) {
            errors.push(ValidityError::NonFiniteCoordinate {
                element: format!("plate {}", record.id),
            });
        }
        if record.outline.width <= 0.0 {
            errors.push(ValidityError::NonPositiveDimension {
                element: format!("plate {}", record.id),
                dimension: "width",
            });
        }
        if record.outline.height <= 0.0 {
            errors.push(ValidityError::NonPositiveDimension {
                element: format!("plate {}", record.id),
                dimension: "height",
            });
        }
        if record.thickness <= 0.0 {
            errors.push(ValidityError::NonPositiveDimension {
                element: format!("plate {}", record.id),
                dimension: "thickness",
            });
        }
        for member in record.connected_members.iter().flatten() {
            if !member_ids.contains(member.as_str()) {
                errors.push(ValidityError::UnknownMember {
                    owner: format!("plate {}", record.id),
                    member: MemberId::new(member),
                });
            }
        }
    }

    let mut bolt_ids: FxHashSet<&str> = FxHashSet::default();
    for record in &input.bolts {
        if !bolt_ids.insert(record.id.as_str()) {
            errors.push(ValidityError::DuplicateId {
                kind: "bolt",
                id: record.id.clone(),
            });
        }
        if !finite(&record.position) {
            errors.push(ValidityError::NonFiniteCoordinate {
                element: format!("bolt {}", record.id),
            });
        }
        if record.diameter <= 0.0 {
            errors.push(ValidityError::NonPositiveDimension {
                element: format!("bolt {}", record.id),
                dimension: "diameter",
            });
        }
        if !plate_ids.contains(record.parent_plate.as_str()) {
            errors.push(ValidityError::UnknownParentPlate {
                bolt: BoltId::new(&record.id),
                plate: PlateId::new(&record.parent_plate),
            });
        }
    }

    errors
}
