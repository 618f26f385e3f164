// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Id-indexed arena storage for one model run.
//!
//! [`StructuralModel`] is the central owner of all elements. One run holds
//! one immutable member set and a mutable joint/plate/bolt graph that the
//! corrector patches across fixpoint iterations. The arena is `Clone` so the
//! corrector can work on a copy and never partially mutate shared state.
//!
//! Map iteration order is arbitrary, so every scan that must be
//! deterministic goes through the `sorted_*_ids` accessors.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::elements::{Bolt, Joint, Member, Plate};
use crate::ids::{BoltId, JointId, MemberId, PlateId};

/// The resolved structural model: members plus the derived joint, plate, and
/// bolt graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StructuralModel {
    members: FxHashMap<MemberId, Member>,
    joints: FxHashMap<JointId, Joint>,
    plates: FxHashMap<PlateId, Plate>,
    bolts: FxHashMap<BoltId, Bolt>,
}

impl StructuralModel {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Members ---

    pub fn insert_member(&mut self, member: Member) {
        self.members.insert(member.id.clone(), member);
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Member ids in deterministic (lexicographic) order.
    pub fn sorted_member_ids(&self) -> Vec<MemberId> {
        let mut ids: Vec<_> = self.members.keys().cloned().collect();
        ids.sort();
        ids
    }

    // --- Joints ---

    /// Replaces the joint set. Called once per run by the joint resolver.
    pub fn set_joints(&mut self, joints: Vec<Joint>) {
        self.joints = joints
            .into_iter()
            .map(|j| (j.id.clone(), j))
            .collect();
    }

    pub fn insert_joint(&mut self, joint: Joint) {
        self.joints.insert(joint.id.clone(), joint);
    }

    pub fn joint(&self, id: &JointId) -> Option<&Joint> {
        self.joints.get(id)
    }

    pub fn joint_mut(&mut self, id: &JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.values()
    }

    pub fn sorted_joint_ids(&self) -> Vec<JointId> {
        let mut ids: Vec<_> = self.joints.keys().cloned().collect();
        ids.sort();
        ids
    }

    // --- Plates ---

    pub fn insert_plate(&mut self, plate: Plate) {
        self.plates.insert(plate.id.clone(), plate);
    }

    pub fn plate(&self, id: &PlateId) -> Option<&Plate> {
        self.plates.get(id)
    }

    pub fn plate_mut(&mut self, id: &PlateId) -> Option<&mut Plate> {
        self.plates.get_mut(id)
    }

    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    pub fn plates(&self) -> impl Iterator<Item = &Plate> {
        self.plates.values()
    }

    pub fn sorted_plate_ids(&self) -> Vec<PlateId> {
        let mut ids: Vec<_> = self.plates.keys().cloned().collect();
        ids.sort();
        ids
    }

    // --- Bolts ---

    pub fn insert_bolt(&mut self, bolt: Bolt) {
        self.bolts.insert(bolt.id.clone(), bolt);
    }

    pub fn bolt(&self, id: &BoltId) -> Option<&Bolt> {
        self.bolts.get(id)
    }

    pub fn bolt_mut(&mut self, id: &BoltId) -> Option<&mut Bolt> {
        self.bolts.get_mut(id)
    }

    pub fn bolt_count(&self) -> usize {
        self.bolts.len()
    }

    pub fn bolts(&self) -> impl Iterator<Item = &Bolt> {
        self.bolts.values()
    }

    pub fn sorted_bolt_ids(&self) -> Vec<BoltId> {
        let mut ids: Vec<_> = self.bolts.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Bolts fastened through the given plate, in id order.
    pub fn bolts_on_plate(&self, plate: &PlateId) -> Vec<&Bolt> {
        let mut bolts: Vec<_> = self
            .bolts
            .values()
            .filter(|b| &b.parent_plate == plate)
            .collect();
        bolts.sort_by(|a, b| a.id.cmp(&b.id));
        bolts
    }
}
