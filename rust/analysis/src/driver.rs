// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The full pipeline and its bounded fixpoint loop.
//!
//! One run: validate and build the arena, resolve joints, map plates, then
//! alternate detection and correction until the model is clash-free or the
//! iteration budget runs out. Corrections could in principle introduce new
//! clashes, so the budget is mandatory; exhausting it with findings left is
//! a normal, fully reported terminal state, not an error.
//!
//! Every iteration's output is a complete, consistent snapshot, so a caller
//! may stop consuming after any iteration without holding a half-repaired
//! model.

use framecheck_model::providers::{SizingOracle, StandardsProvider, ToleranceProvider};
use framecheck_model::{ModelInput, Result, StructuralModel};
use serde::Serialize;

use crate::clash::Clash;
use crate::corrector::{ClashCorrector, CorrectionOutcome, CorrectionRecord};
use crate::detector::ClashDetector;
use crate::mapper::{assign_plates, PlateAssignment};
use crate::resolver::JointResolver;

/// Default detection/correction iteration budget.
pub const MAX_FIXPOINT_ITERATIONS: usize = 5;

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub max_iterations: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_iterations: MAX_FIXPOINT_ITERATIONS,
        }
    }
}

/// One detection/correction pass.
#[derive(Debug, Clone, Serialize)]
pub struct IterationReport {
    pub iteration: usize,
    /// Findings this pass started from.
    pub clashes: Vec<Clash>,
    /// What happened to each of them, in order.
    pub corrections: Vec<CorrectionRecord>,
}

/// Result of a full run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// The model after the last completed correction pass.
    pub model: StructuralModel,
    /// Findings remaining after the final detection pass (empty on success).
    pub final_clashes: Vec<Clash>,
    /// Ledger of every detection/correction pass that ran.
    pub iterations: Vec<IterationReport>,
    /// How each plate was bound to its joint.
    pub assignments: Vec<PlateAssignment>,
    /// True when the final detection pass found nothing.
    pub converged: bool,
}

impl RunReport {
    pub fn iteration_count(&self) -> usize {
        self.iterations.len()
    }
}

/// The batch entry point: members and raw joints in, repaired model and
/// clash ledger out.
#[derive(Default)]
pub struct ClashPipeline<'a> {
    tolerances: Option<&'a dyn ToleranceProvider>,
    standards: Option<&'a dyn StandardsProvider>,
    oracle: Option<&'a dyn SizingOracle>,
    options: PipelineOptions,
}

impl<'a> ClashPipeline<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerances(mut self, tolerances: &'a dyn ToleranceProvider) -> Self {
        self.tolerances = Some(tolerances);
        self
    }

    pub fn with_standards(mut self, standards: &'a dyn StandardsProvider) -> Self {
        self.standards = Some(standards);
        self
    }

    pub fn with_oracle(mut self, oracle: &'a dyn SizingOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the whole pipeline on one input. Fails only on invalid input;
    /// every downstream inconsistency is reported through the clash ledger.
    pub fn run(&self, input: &ModelInput) -> Result<RunReport> {
        let mut model = StructuralModel::from_input(input)?;

        let resolver = JointResolver::new(self.tolerances);
        let joints = resolver.resolve(&model, input.joints.as_deref());
        tracing::info!(
            members = model.member_count(),
            joints = joints.len(),
            "joint resolution complete"
        );
        model.set_joints(joints);

        let assignments = assign_plates(&mut model, input.plate_joint_map.as_ref());
        let orphans = assignments.iter().filter(|a| a.orphan).count();
        tracing::info!(
            plates = assignments.len(),
            orphans,
            "plate-to-joint mapping complete"
        );

        let detector = ClashDetector::new(self.tolerances, self.standards);
        let corrector = ClashCorrector::new(self.tolerances, self.standards, self.oracle);

        let mut iterations = Vec::new();
        let mut final_clashes = detector.detect(&model);

        while !final_clashes.is_empty() && iterations.len() < self.options.max_iterations {
            let iteration = iterations.len();
            tracing::info!(
                iteration,
                clashes = final_clashes.len(),
                "starting correction pass"
            );

            let (next, corrections) = corrector.apply(&final_clashes, &model);
            let progressed = corrections
                .iter()
                .any(|r| r.outcome == CorrectionOutcome::AutoFixed);
            model = next;
            iterations.push(IterationReport {
                iteration,
                clashes: std::mem::take(&mut final_clashes),
                corrections,
            });

            final_clashes = detector.detect(&model);

            // Nothing was repaired, so the same findings would come back
            // every remaining pass.
            if !progressed {
                tracing::info!(iteration, "no repair applied, stopping early");
                break;
            }
        }

        let converged = final_clashes.is_empty();
        tracing::info!(
            iterations = iterations.len(),
            remaining = final_clashes.len(),
            converged,
            "pipeline finished"
        );

        Ok(RunReport {
            model,
            final_clashes,
            iterations,
            assignments,
            converged,
        })
    }
}
