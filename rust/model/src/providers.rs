// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance, standards, and sizing-oracle collaborators.
//!
//! Detection and correction never own configuration: they consult these
//! read-only providers, injected by the embedding application. Every named
//! value has a built-in fallback so the core runs with no providers at all.
//! All lengths are meters.

/// Members whose closest approach is within this distance meet at a joint.
pub const SEGMENT_INTERSECT_TOL_M: &str = "SEGMENT_INTERSECT_TOL_M";
/// Joint candidates within this distance merge into one joint.
pub const JOINT_CLUSTER_TOL_M: &str = "JOINT_CLUSTER_TOL_M";
/// Supplied joints all within this radius of the origin are placeholders.
pub const PLACEHOLDER_RADIUS_M: &str = "PLACEHOLDER_RADIUS_M";
/// Endpoint-sum recovery accepts a candidate only below this spread.
pub const ENDPOINT_RECOVERY_MAX_SPREAD_M: &str = "ENDPOINT_RECOVERY_MAX_SPREAD_M";
/// Allowed difference between joint elevation and member endpoint consensus.
pub const JOINT_ELEVATION_TOL_M: &str = "JOINT_ELEVATION_TOL_M";
/// Allowed offset between a plate and its owning joint.
pub const PLATE_POSITION_TOL_M: &str = "PLATE_POSITION_TOL_M";
/// Slack around the plate footprint when checking bolt positions.
pub const BOLT_FOOTPRINT_TOL_M: &str = "BOLT_FOOTPRINT_TOL_M";
/// Most-negative local bolt coordinate accepted as numeric noise.
pub const BOLT_NEGATIVE_TOL_M: &str = "BOLT_NEGATIVE_TOL_M";
/// Members whose endpoints pairwise match within this are duplicates.
pub const MEMBER_DUPLICATE_TOL_M: &str = "MEMBER_DUPLICATE_TOL_M";
/// Members shorter than this are treated as zero-length.
pub const ZERO_LENGTH_TOL_M: &str = "ZERO_LENGTH_TOL_M";
/// Model-extent sanity bound; larger coordinates indicate unit mix-ups.
pub const MODEL_EXTENT_M: &str = "MODEL_EXTENT_M";

/// Legal nominal bolt diameters (M12 through M36).
pub const BOLT_DIAMETERS_M: &str = "BOLT_DIAMETERS_M";
/// Minimum plate width.
pub const MIN_PLATE_WIDTH_M: &str = "MIN_PLATE_WIDTH_M";
/// Minimum plate height.
pub const MIN_PLATE_HEIGHT_M: &str = "MIN_PLATE_HEIGHT_M";
/// Upper thickness breakpoints for the minimum-fillet-weld step table.
pub const WELD_THICKNESS_BREAKS_M: &str = "WELD_THICKNESS_BREAKS_M";
/// Minimum fillet weld leg size per thickness band (one longer than breaks).
pub const WELD_MIN_SIZES_M: &str = "WELD_MIN_SIZES_M";
/// Minimum bolt center-to-center spacing as a multiple of diameter.
pub const BOLT_SPACING_FACTOR: &str = "BOLT_SPACING_FACTOR";
/// Minimum bolt edge distance as a multiple of diameter.
pub const BOLT_EDGE_FACTOR: &str = "BOLT_EDGE_FACTOR";

/// Read-only map from a tolerance name to a value in meters.
pub trait ToleranceProvider {
    /// Returns the named tolerance, or `None` if the provider has no entry.
    fn tolerance(&self, name: &str) -> Option<f64>;
}

/// Read-only map from a standards-table name to its values.
pub trait StandardsProvider {
    /// Returns the named table, or `None` if the provider has no entry.
    fn table(&self, name: &str) -> Option<&[f64]>;
}

/// Optional external predictor for connection sizing. Suggestions are always
/// re-validated against the standards tables before acceptance.
pub trait SizingOracle {
    /// Suggested bolt diameter for a plate of the given thickness.
    fn suggest_bolt_diameter(&self, plate_thickness: f64) -> Option<f64>;
    /// Suggested fillet weld leg size for a plate of the given thickness.
    fn suggest_weld_size(&self, plate_thickness: f64) -> Option<f64>;
    /// Suggested plate outline for a joint connecting `member_count` members.
    fn suggest_plate_outline(&self, member_count: usize) -> Option<(f64, f64)>;
}

/// Built-in tolerance values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTolerances;

/// Shared instance for fallback lookups.
pub static DEFAULT_TOLERANCES: DefaultTolerances = DefaultTolerances;

impl ToleranceProvider for DefaultTolerances {
    fn tolerance(&self, name: &str) -> Option<f64> {
        match name {
            SEGMENT_INTERSECT_TOL_M => Some(0.05),
            JOINT_CLUSTER_TOL_M => Some(0.10),
            PLACEHOLDER_RADIUS_M => Some(1e-6),
            ENDPOINT_RECOVERY_MAX_SPREAD_M => Some(5.0),
            JOINT_ELEVATION_TOL_M => Some(0.05),
            PLATE_POSITION_TOL_M => Some(0.005),
            BOLT_FOOTPRINT_TOL_M => Some(0.005),
            BOLT_NEGATIVE_TOL_M => Some(0.001),
            MEMBER_DUPLICATE_TOL_M => Some(0.01),
            ZERO_LENGTH_TOL_M => Some(1e-9),
            MODEL_EXTENT_M => Some(1.0e4),
            _ => None,
        }
    }
}

const BOLT_DIAMETER_TABLE: [f64; 7] = [0.012, 0.016, 0.020, 0.024, 0.027, 0.030, 0.036];
const MIN_PLATE_WIDTH_TABLE: [f64; 1] = [0.08];
const MIN_PLATE_HEIGHT_TABLE: [f64; 1] = [0.08];
const WELD_THICKNESS_BREAKS_TABLE: [f64; 3] = [0.006, 0.013, 0.019];
const WELD_MIN_SIZES_TABLE: [f64; 4] = [0.003, 0.005, 0.006, 0.008];
const BOLT_SPACING_FACTOR_TABLE: [f64; 1] = [2.67];
const BOLT_EDGE_FACTOR_TABLE: [f64; 1] = [1.25];

/// Built-in standards tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStandards;

/// Shared instance for fallback lookups.
pub static DEFAULT_STANDARDS: DefaultStandards = DefaultStandards;

impl StandardsProvider for DefaultStandards {
    fn table(&self, name: &str) -> Option<&[f64]> {
        match name {
            BOLT_DIAMETERS_M => Some(&BOLT_DIAMETER_TABLE),
            MIN_PLATE_WIDTH_M => Some(&MIN_PLATE_WIDTH_TABLE),
            MIN_PLATE_HEIGHT_M => Some(&MIN_PLATE_HEIGHT_TABLE),
            WELD_THICKNESS_BREAKS_M => Some(&WELD_THICKNESS_BREAKS_TABLE),
            WELD_MIN_SIZES_M => Some(&WELD_MIN_SIZES_TABLE),
            BOLT_SPACING_FACTOR => Some(&BOLT_SPACING_FACTOR_TABLE),
            BOLT_EDGE_FACTOR => Some(&BOLT_EDGE_FACTOR_TABLE),
            _ => None,
        }
    }
}

/// Resolves a named tolerance through the optional provider, falling back to
/// the built-in table. Unknown names resolve to zero, which disables the
/// check rather than inventing a bound.
pub fn resolve_tolerance(provider: Option<&dyn ToleranceProvider>, name: &str) -> f64 {
    provider
        .and_then(|p| p.tolerance(name))
        .or_else(|| DEFAULT_TOLERANCES.tolerance(name))
        .unwrap_or(0.0)
}

/// Resolves a named table through the optional provider, falling back to the
/// built-in tables.
pub fn resolve_table<'a>(
    provider: Option<&'a dyn StandardsProvider>,
    name: &str,
) -> Option<&'a [f64]> {
    provider
        .and_then(|p| p.table(name))
        .or_else(|| DEFAULT_STANDARDS.table(name))
}

/// Resolves a single-value table (e.g. a minimum dimension or a factor).
pub fn resolve_scalar(provider: Option<&dyn StandardsProvider>, name: &str) -> Option<f64> {
    resolve_table(provider, name)?.first().copied()
}

/// Smallest table value greater than or equal to `required`.
pub fn nearest_value_at_least(table: &[f64], required: f64) -> Option<f64> {
    table
        .iter()
        .copied()
        .filter(|v| *v >= required)
        .fold(None, |best, v| match best {
            Some(b) if b <= v => Some(b),
            _ => Some(v),
        })
}

/// True if `value` matches some table entry within `tolerance`.
pub fn is_standard_value(table: &[f64], value: f64, tolerance: f64) -> bool {
    table.iter().any(|v| (v - value).abs() <= tolerance)
}

/// Minimum fillet weld leg size for a plate of the given thickness, from the
/// two-table step function.
pub fn min_weld_for_thickness(provider: Option<&dyn StandardsProvider>, thickness: f64) -> f64 {
    let breaks = resolve_table(provider, WELD_THICKNESS_BREAKS_M).unwrap_or(&[]);
    let sizes = resolve_table(provider, WELD_MIN_SIZES_M).unwrap_or(&[]);
    if sizes.is_empty() {
        return 0.0;
    }

    for (i, brk) in breaks.iter().enumerate() {
        if thickness <= *brk {
            return sizes.get(i).copied().unwrap_or(0.0);
        }
    }
    sizes[sizes.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Overrides;

    impl ToleranceProvider for Overrides {
        fn tolerance(&self, name: &str) -> Option<f64> {
            (name == SEGMENT_INTERSECT_TOL_M).then_some(0.2)
        }
    }

    #[test]
    fn override_wins_then_fallback() {
        assert_eq!(
            resolve_tolerance(Some(&Overrides), SEGMENT_INTERSECT_TOL_M),
            0.2
        );
        assert_eq!(
            resolve_tolerance(Some(&Overrides), JOINT_CLUSTER_TOL_M),
            0.10
        );
        assert_eq!(resolve_tolerance(None, MODEL_EXTENT_M), 1.0e4);
        assert_eq!(resolve_tolerance(None, "NOT_A_TOLERANCE"), 0.0);
    }

    #[test]
    fn bolt_diameters_are_sorted_and_standard() {
        let table = resolve_table(None, BOLT_DIAMETERS_M).unwrap();
        assert!(table.windows(2).all(|w| w[0] < w[1]));
        assert!(is_standard_value(table, 0.020, 1e-9));
        assert!(!is_standard_value(table, 0.021, 1e-9));
    }

    #[test]
    fn nearest_value_at_least_picks_smallest_legal() {
        let table = [0.012, 0.016, 0.020];
        assert_eq!(nearest_value_at_least(&table, 0.013), Some(0.016));
        assert_eq!(nearest_value_at_least(&table, 0.016), Some(0.016));
        assert_eq!(nearest_value_at_least(&table, 0.021), None);
    }

    #[test]
    fn weld_step_table() {
        assert_eq!(min_weld_for_thickness(None, 0.005), 0.003);
        assert_eq!(min_weld_for_thickness(None, 0.010), 0.005);
        assert_eq!(min_weld_for_thickness(None, 0.016), 0.006);
        assert_eq!(min_weld_for_thickness(None, 0.030), 0.008);
    }
}
