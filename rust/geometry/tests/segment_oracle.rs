// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Randomized validation of the segment-distance kernel against a dense
//! sampling oracle. The oracle evaluates all point pairs on a fine grid over
//! both segments; its minimum can never be below the true distance, and must
//! converge to it as the grid refines.

use framecheck_geometry::{distance, lerp, segment_segment_distance, Point3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLES: usize = 256;

fn random_point(rng: &mut StdRng) -> Point3<f64> {
    Point3::new(
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
    )
}

fn dense_sampling_min(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    q0: &Point3<f64>,
    q1: &Point3<f64>,
) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..SAMPLES {
        let s = i as f64 / (SAMPLES - 1) as f64;
        let a = lerp(p0, p1, s);
        for j in 0..SAMPLES {
            let t = j as f64 / (SAMPLES - 1) as f64;
            let b = lerp(q0, q1, t);
            let d = distance(&a, &b);
            if d < min {
                min = d;
            }
        }
    }
    min
}

#[test]
fn random_pairs_match_dense_sampling_oracle() {
    let mut rng = StdRng::seed_from_u64(0x5eed_cafe);

    for case in 0..150 {
        let p0 = random_point(&mut rng);
        let p1 = random_point(&mut rng);
        let q0 = random_point(&mut rng);
        let q1 = random_point(&mut rng);

        let kernel = segment_segment_distance(&p0, &p1, &q0, &q1);
        let oracle = dense_sampling_min(&p0, &p1, &q0, &q1);

        // The oracle samples a subset of point pairs, so it can only
        // overestimate the true minimum.
        assert!(
            kernel.distance <= oracle + 1e-9,
            "case {case}: kernel {} above oracle {}",
            kernel.distance,
            oracle
        );

        // And it cannot overestimate by more than the grid step.
        let step_bound = (distance(&p0, &p1) + distance(&q0, &q1)) / SAMPLES as f64;
        assert!(
            oracle - kernel.distance <= step_bound + 1e-9,
            "case {case}: kernel {} too far below oracle {} (bound {})",
            kernel.distance,
            oracle,
            step_bound
        );

        // The reported closest points must realize the reported distance.
        let realized = distance(&kernel.point_on_first, &kernel.point_on_second);
        assert!((realized - kernel.distance).abs() <= 1e-9, "case {case}");

        // Argument order must not matter.
        let reversed = segment_segment_distance(&q0, &q1, &p0, &p1);
        assert!(
            (kernel.distance - reversed.distance).abs() <= 1e-9,
            "case {case}: asymmetric result"
        );
    }
}

#[test]
fn segments_through_a_shared_point_return_zero() {
    let mut rng = StdRng::seed_from_u64(0x0bb5_0001);

    for case in 0..100 {
        let through = random_point(&mut rng);

        // Extend each segment past the shared point in a random direction so
        // the crossing is interior to both.
        let d1 = random_point(&mut rng) - through;
        let d2 = random_point(&mut rng) - through;
        if d1.norm() < 1e-3 || d2.norm() < 1e-3 {
            continue;
        }

        let p0 = through - d1 * rng.gen_range(0.1..1.0);
        let p1 = through + d1 * rng.gen_range(0.1..1.0);
        let q0 = through - d2 * rng.gen_range(0.1..1.0);
        let q1 = through + d2 * rng.gen_range(0.1..1.0);

        let kernel = segment_segment_distance(&p0, &p1, &q0, &q1);
        assert!(
            kernel.distance <= 1e-9,
            "case {case}: intersecting segments reported distance {}",
            kernel.distance
        );
    }
}

#[test]
fn never_exceeds_any_endpoint_distance() {
    let mut rng = StdRng::seed_from_u64(0x7e57_0002);

    for _ in 0..200 {
        let p0 = random_point(&mut rng);
        let p1 = random_point(&mut rng);
        let q0 = random_point(&mut rng);
        let q1 = random_point(&mut rng);

        let kernel = segment_segment_distance(&p0, &p1, &q0, &q1);
        let endpoint_min = [
            distance(&p0, &q0),
            distance(&p0, &q1),
            distance(&p1, &q0),
            distance(&p1, &q1),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min);

        assert!(kernel.distance <= endpoint_min + 1e-9);
    }
}
