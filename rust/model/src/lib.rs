// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FrameCheck Model
//!
//! The typed structural model that clash analysis operates on: members
//! (beams, columns, braces), inferred joints, fabrication plates and bolts,
//! all owned by an id-indexed arena ([`StructuralModel`]). Cross-references
//! between elements are string-backed typed ids only — no pointers, no
//! cycles.
//!
//! Input arrives as plain serde records ([`input::ModelInput`], coordinates
//! in meters) and is validated at construction time: malformed references and
//! degenerate members are rejected with the full error list before any
//! geometry runs.
//!
//! Tolerances and standards tables are consulted through the provider traits
//! in [`providers`], with built-in fallback tables, so embedding applications
//! can override values without the core owning any configuration.

pub mod elements;
pub mod ids;
pub mod input;
pub mod model;
pub mod providers;
pub mod validate;

pub use elements::{
    BindingStrategy, Bolt, Joint, JointCategory, Member, MemberKind, Plate, PlateOutline,
};
pub use ids::{BoltId, ClashId, JointId, MemberId, PlateId};
pub use input::{BoltRecord, JointRecord, MemberRecord, ModelInput, OutlineRecord, PlateRecord};
pub use model::StructuralModel;
pub use providers::{
    SizingOracle, StandardsProvider, ToleranceProvider, DEFAULT_STANDARDS, DEFAULT_TOLERANCES,
};
pub use validate::{ModelError, Result, ValidityError};
