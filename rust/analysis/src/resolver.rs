// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Joint resolution.
//!
//! Builds the joint set from whichever channel survived extraction:
//!
//! 1. **Trusted path** — supplied joints with real locations are used
//!    verbatim.
//! 2. **Degenerate path** — supplied joints that all sit on the placeholder
//!    location (the origin) still carry authoritative member lists, so each
//!    location is recomputed from the referenced members' endpoints.
//!    Topology survives re-export bugs better than raw coordinates.
//! 3. **Geometric path** — no joints at all: every member pair is tested for
//!    proximity and the resulting candidates are clustered into joints.
//!
//! A model with zero resolvable joints yields an empty set, not an error;
//! single members and disconnected geometry are legitimate inputs.

use std::collections::BTreeSet;

use framecheck_geometry::{distance, segment_segment_distance, Aabb, Point3, Vector3};
use framecheck_model::providers::{
    resolve_tolerance, ToleranceProvider, ENDPOINT_RECOVERY_MAX_SPREAD_M, JOINT_CLUSTER_TOL_M,
    PLACEHOLDER_RADIUS_M, SEGMENT_INTERSECT_TOL_M,
};
use framecheck_model::{
    Joint, JointCategory, JointId, JointRecord, Member, MemberId, StructuralModel,
};
use rayon::prelude::*;

/// Resolves the joint set for one run.
pub struct JointResolver<'a> {
    tolerances: Option<&'a dyn ToleranceProvider>,
}

/// A proximity hit between two members, before clustering.
struct JointCandidate {
    location: Point3<f64>,
    approach: f64,
    members: [usize; 2],
}

struct Cluster {
    /// Location of the smallest-approach candidate seen so far.
    location: Point3<f64>,
    members: BTreeSet<usize>,
}

impl<'a> JointResolver<'a> {
    pub fn new(tolerances: Option<&'a dyn ToleranceProvider>) -> Self {
        Self { tolerances }
    }

    /// Builds the joint set. `supplied` carries the raw joint records from
    /// the input, if any.
    pub fn resolve(
        &self,
        model: &StructuralModel,
        supplied: Option<&[JointRecord]>,
    ) -> Vec<Joint> {
        match supplied {
            Some(records) if !records.is_empty() => {
                let placeholder = resolve_tolerance(self.tolerances, PLACEHOLDER_RADIUS_M);
                let all_placeholder = records
                    .iter()
                    .all(|r| Vector3::new(r.location[0], r.location[1], r.location[2]).norm()
                        <= placeholder);

                if all_placeholder {
                    tracing::info!(
                        joints = records.len(),
                        "supplied joints are placeholders, recovering locations from membership"
                    );
                    self.recover_degenerate(model, records)
                } else {
                    tracing::debug!(joints = records.len(), "using supplied joints verbatim");
                    self.trusted(model, records)
                }
            }
            _ => self.from_geometry(model),
        }
    }

    fn trusted(&self, model: &StructuralModel, records: &[JointRecord]) -> Vec<Joint> {
        records
            .iter()
            .map(|record| Joint {
                id: JointId::new(&record.id),
                location: Point3::new(record.location[0], record.location[1], record.location[2]),
                member_ids: record.member_ids.iter().map(MemberId::new).collect(),
                category: self.classify(model, &record.member_ids),
            })
            .collect()
    }

    /// Recomputes joint locations from member lists when the position
    /// channel is broken. For each endpoint of each referenced member, the
    /// sum of nearest-endpoint distances to every other referenced member is
    /// scored; the minimizing endpoint wins if the spread is plausible,
    /// otherwise the arithmetic mean of all endpoints is used.
    fn recover_degenerate(&self, model: &StructuralModel, records: &[JointRecord]) -> Vec<Joint> {
        let max_spread = resolve_tolerance(self.tolerances, ENDPOINT_RECOVERY_MAX_SPREAD_M);

        records
            .iter()
            .map(|record| {
                let members: Vec<&Member> = record
                    .member_ids
                    .iter()
                    .filter_map(|id| model.member(&MemberId::new(id)))
                    .collect();

                let location = if members.is_empty() {
                    Point3::new(record.location[0], record.location[1], record.location[2])
                } else {
                    recover_location(&members, max_spread)
                };

                Joint {
                    id: JointId::new(&record.id),
                    location,
                    member_ids: record.member_ids.iter().map(MemberId::new).collect(),
                    category: self.classify(model, &record.member_ids),
                }
            })
            .collect()
    }

    /// Cold start: pairwise proximity scan over all members, then greedy
    /// clustering of the candidates. Pair evaluations are read-only and run
    /// in parallel; the merge step is sequential.
    fn from_geometry(&self, model: &StructuralModel) -> Vec<Joint> {
        let intersect_tol = resolve_tolerance(self.tolerances, SEGMENT_INTERSECT_TOL_M);
        let cluster_tol = resolve_tolerance(self.tolerances, JOINT_CLUSTER_TOL_M);

        let ids = model.sorted_member_ids();
        let members: Vec<&Member> = ids.iter().filter_map(|id| model.member(id)).collect();
        let boxes: Vec<Aabb> = members
            .iter()
            .map(|m| Aabb::from_segment(&m.start, &m.end))
            .collect();

        let mut pairs = Vec::new();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                pairs.push((i, j));
            }
        }

        let mut candidates: Vec<JointCandidate> = pairs
            .par_iter()
            .filter_map(|&(i, j)| {
                if !boxes[i].overlaps(&boxes[j], intersect_tol) {
                    return None;
                }
                let a = members[i];
                let b = members[j];
                let hit = segment_segment_distance(&a.start, &a.end, &b.start, &b.end);
                (hit.distance <= intersect_tol).then(|| JointCandidate {
                    location: hit.midpoint(),
                    approach: hit.distance,
                    members: [i, j],
                })
            })
            .collect();

        // Smallest approach first, so the canonical location of each cluster
        // is the tightest hit. Ties break on member indices for determinism.
        candidates.sort_by(|a, b| {
            a.approach
                .total_cmp(&b.approach)
                .then(a.members.cmp(&b.members))
        });

        let mut clusters: Vec<Cluster> = Vec::new();
        for candidate in &candidates {
            match clusters
                .iter_mut()
                .find(|c| distance(&c.location, &candidate.location) <= cluster_tol)
            {
                Some(cluster) => {
                    cluster.members.extend(candidate.members);
                }
                None => {
                    clusters.push(Cluster {
                        location: candidate.location,
                        members: candidate.members.iter().copied().collect(),
                    });
                }
            }
        }

        tracing::debug!(
            members = members.len(),
            candidates = candidates.len(),
            joints = clusters.len(),
            "resolved joints from geometry"
        );

        clusters
            .into_iter()
            .enumerate()
            .map(|(n, cluster)| {
                let member_ids: BTreeSet<MemberId> = cluster
                    .members
                    .iter()
                    .map(|&idx| members[idx].id.clone())
                    .collect();
                let kinds = cluster.members.iter().map(|&idx| members[idx].kind);
                Joint {
                    id: JointId::new(format!("J{}", n + 1)),
                    location: cluster.location,
                    member_ids,
                    category: JointCategory::classify(kinds),
                }
            })
            .collect()
    }

    fn classify(&self, model: &StructuralModel, member_ids: &[String]) -> JointCategory {
        JointCategory::classify(
            member_ids
                .iter()
                .filter_map(|id| model.member(&MemberId::new(id)))
                .map(|m| m.kind),
        )
    }
}

/// Endpoint-sum minimization with mean-of-endpoints fallback.
fn recover_location(members: &[&Member], max_spread: f64) -> Point3<f64> {
    let mut best: Option<(Point3<f64>, f64)> = None;

    for member in members {
        for endpoint in member.endpoints() {
            let spread: f64 = members
                .iter()
                .filter(|other| other.id != member.id)
                .map(|other| other.endpoint_distance(&endpoint))
                .sum();
            if best.map_or(true, |(_, s)| spread < s) {
                best = Some((endpoint, spread));
            }
        }
    }

    match best {
        Some((endpoint, spread)) if spread <= max_spread && members.len() >= 2 => endpoint,
        _ => mean_of_endpoints(members),
    }
}

fn mean_of_endpoints(members: &[&Member]) -> Point3<f64> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for member in members {
        for endpoint in member.endpoints() {
            sum += endpoint.coords;
            count += 1;
        }
    }
    if count == 0 {
        return Point3::origin();
    }
    Point3::from(sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use framecheck_model::{MemberKind, MemberRecord, ModelInput};

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

    fn model_of(members: Vec<MemberRecord>) -> StructuralModel {
        StructuralModel::from_input(&ModelInput {
            members,
            ..Default::default()
        })
        .unwrap()
    }

    fn l_frame() -> StructuralModel {
        model_of(vec![
            beam("m1", [0.0, 0.0, 0.0], [0.0, 0.0, 5.0]),
            beam("m2", [0.0, 0.0, 5.0], [6.0, 0.0, 5.0]),
        ])
    }

    #[test]
    fn trusted_joints_pass_through() {
        let model = l_frame();
        let records = vec![JointRecord {
            id: "J9".into(),
            location: [0.0, 0.0, 5.0],
            member_ids: vec!["m1".into(), "m2".into()],
        }];

        let joints = JointResolver::new(None).resolve(&model, Some(&records));
        assert_eq!(joints.len(), 1);
        assert_eq!(joints[0].id, JointId::new("J9"));
        assert_eq!(joints[0].location, Point3::new(0.0, 0.0, 5.0));
        assert_eq!(joints[0].member_ids.len(), 2);
    }

    #[test]
    fn degenerate_joints_recover_from_membership() {
        let model = l_frame();
        let records = vec![JointRecord {
            id: "J1".into(),
            location: [0.0, 0.0, 0.0],
            member_ids: vec!["m1".into(), "m2".into()],
        }];

        let joints = JointResolver::new(None).resolve(&model, Some(&records));
        assert_eq!(joints.len(), 1);
        assert_relative_eq!(joints[0].location.z, 5.0, epsilon = 1e-9);
        assert_relative_eq!(joints[0].location.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_recovery_falls_back_to_mean_when_spread_too_large() {
        // Two members nowhere near each other: no endpoint is plausible.
        let model = model_of(vec![
            beam("m1", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            beam("m2", [100.0, 0.0, 0.0], [101.0, 0.0, 0.0]),
        ]);
        let records = vec![JointRecord {
            id: "J1".into(),
            location: [0.0, 0.0, 0.0],
            member_ids: vec!["m1".into(), "m2".into()],
        }];

        let joints = JointResolver::new(None).resolve(&model, Some(&records));
        assert_relative_eq!(joints[0].location.x, 50.5, epsilon = 1e-9);
    }

    #[test]
    fn geometric_path_finds_shared_endpoint() {
        let model = l_frame();
        let joints = JointResolver::new(None).resolve(&model, None);

        assert_eq!(joints.len(), 1);
        assert_relative_eq!(joints[0].location.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(joints[0].location.z, 5.0, epsilon = 1e-9);
        assert_eq!(joints[0].member_ids.len(), 2);
        assert_eq!(joints[0].category, JointCategory::BeamToBeam);
    }

    #[test]
    fn geometric_path_finds_mid_span_crossing() {
        let model = model_of(vec![
            beam("m1", [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            beam("m2", [0.0, -1.0, 0.0], [0.0, 1.0, 0.0]),
        ]);
        let joints = JointResolver::new(None).resolve(&model, None);

        assert_eq!(joints.len(), 1);
        assert_relative_eq!(joints[0].location.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(joints[0].location.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn three_members_meeting_cluster_into_one_joint() {
        let model = model_of(vec![
            beam("m1", [0.0, 0.0, 0.0], [0.0, 0.0, 3.0]),
            beam("m2", [0.0, 0.0, 3.0], [4.0, 0.0, 3.0]),
            beam("m3", [0.0, 0.0, 3.0], [0.0, 4.0, 3.0]),
        ]);
        let joints = JointResolver::new(None).resolve(&model, None);

        assert_eq!(joints.len(), 1);
        assert_eq!(joints[0].member_ids.len(), 3);
    }

    #[test]
    fn distant_members_produce_no_joints() {
        let model = model_of(vec![
            beam("m1", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            beam("m2", [10.0, 10.0, 10.0], [11.0, 10.0, 10.0]),
        ]);
        let joints = JointResolver::new(None).resolve(&model, None);
        assert!(joints.is_empty());
    }

    #[test]
    fn empty_model_is_legitimate() {
        let model = StructuralModel::new();
        let joints = JointResolver::new(None).resolve(&model, None);
        assert!(joints.is_empty());
    }

    #[test]
    fn synthesized_joint_ids_are_deterministic() {
        let model = model_of(vec![
            beam("m1", [0.0, 0.0, 0.0], [0.0, 0.0, 3.0]),
            beam("m2", [0.0, 0.0, 3.0], [4.0, 0.0, 3.0]),
            beam("m3", [4.0, 0.0, 3.0], [4.0, 0.0, 0.0]),
        ]);
        let first = JointResolver::new(None).resolve(&model, None);
        let second = JointResolver::new(None).resolve(&model, None);

        let ids: Vec<_> = first.iter().map(|j| j.id.clone()).collect();
        let ids2: Vec<_> = second.iter().map(|j| j.id.clone()).collect();
        assert_eq!(ids, ids2);
        assert_eq!(first.len(), 2);
    }
}
