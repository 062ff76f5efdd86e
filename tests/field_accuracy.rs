// tests/field_accuracy.rs
//
// End-to-end accuracy and robustness checks of the direct, FMM and
// Barnes-Hut evaluations against each other.
// Run with: cargo test --test field_accuracy

use ferreus_dipole::{DipoleTree, FieldQuantity, RootBounds, TreeError, TreeParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

fn random_cloud(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::with_capacity(3 * n);
    let mut moments = Vec::with_capacity(3 * n);
    for _ in 0..n {
        let mut mu = [0.0f64; 3];
        let mut norm = 0.0;
        while norm < 1e-3 {
            for component in mu.iter_mut() {
                *component = rng.random_range(-1.0..1.0);
            }
            norm = (mu[0] * mu[0] + mu[1] * mu[1] + mu[2] * mu[2]).sqrt();
        }
        for component in mu {
            moments.push(component / norm);
        }
        for _ in 0..3 {
            positions.push(rng.random_range(-1.0..1.0));
        }
    }
    (positions, moments)
}

fn params(ncrit: usize, order: usize, theta: f64, quantity: FieldQuantity) -> TreeParams {
    TreeParams {
        ncrit,
        order,
        theta,
        quantity,
        root: None,
    }
}

/// Sum of absolute errors over the field scale; robust against individual
/// near-zero exact values.
fn mean_relative_error(exact: &[f64], approx: &[f64]) -> f64 {
    let absolute: f64 = exact.iter().zip(approx).map(|(e, a)| (e - a).abs()).sum();
    let scale: f64 = exact.iter().map(|e| e.abs()).sum();
    absolute / scale
}

fn fmm_error(positions: &[f64], moments: &[f64], p: TreeParams) -> f64 {
    let n = positions.len() / 3 * p.quantity.components();
    let mut tree = DipoleTree::new(positions, moments, p).unwrap();
    let mut exact = vec![0.0; n];
    let mut approx = vec![0.0; n];
    tree.compute_field_exact(&mut exact);
    tree.compute_field_fmm(&mut approx);
    mean_relative_error(&exact, &approx)
}

fn bh_error(positions: &[f64], moments: &[f64], p: TreeParams) -> f64 {
    let n = positions.len() / 3 * p.quantity.components();
    let mut tree = DipoleTree::new(positions, moments, p).unwrap();
    let mut exact = vec![0.0; n];
    let mut approx = vec![0.0; n];
    tree.compute_field_exact(&mut exact);
    tree.compute_field_bh(&mut approx);
    mean_relative_error(&exact, &approx)
}

/// Two aligned dipoles a unit apart: the force field has the closed form
/// (0, 0, -1) at both particles, and the accelerated sum must agree with the
/// direct one essentially to rounding.
#[test]
fn two_particle_force_fmm_matches_direct() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let moments = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    let p = params(1, 4, 0.5, FieldQuantity::Force);

    let mut tree = DipoleTree::new(&positions, &moments, p).unwrap();
    let mut exact = vec![0.0; 6];
    let mut approx = vec![0.0; 6];
    tree.compute_field_exact(&mut exact);
    tree.compute_field_fmm(&mut approx);

    for (e, want) in exact.iter().zip([0.0, 0.0, -1.0, 0.0, 0.0, -1.0]) {
        assert!((e - want).abs() < 1e-12);
    }
    for (e, a) in exact.iter().zip(&approx) {
        assert!(
            (e - a).abs() <= 1e-6 * e.abs().max(1.0),
            "{} vs {}",
            e,
            a
        );
    }
}

/// A lone particle feels no field from itself, whatever the mode.
#[test]
fn single_particle_field_is_zero() {
    let positions = [0.3, -0.2, 0.9];
    let moments = [0.0, 1.0, 0.0];
    for quantity in [FieldQuantity::Potential, FieldQuantity::Force] {
        let mut out = vec![1.0; quantity.components()];
        let mut tree =
            DipoleTree::new(&positions, &moments, params(4, 3, 0.5, quantity)).unwrap();
        tree.compute_field_exact(&mut out);
        assert!(out.iter().all(|&v| v == 0.0));
        out.fill(1.0);
        tree.compute_field_fmm(&mut out);
        assert!(out.iter().all(|&v| v == 0.0));
        out.fill(1.0);
        tree.compute_field_bh(&mut out);
        assert!(out.iter().all(|&v| v == 0.0));
    }
}

#[test]
fn fmm_error_small_for_random_cloud() {
    let (positions, moments) = random_cloud(1000, 1234);
    let error = fmm_error(
        &positions,
        &moments,
        params(32, 4, 0.5, FieldQuantity::Potential),
    );
    assert!(error < 5e-3, "mean relative error {}", error);
}

/// Opening the acceptance angle in the tree code costs accuracy relative to
/// the FMM configuration of the previous test.
#[test]
fn wide_angle_bh_is_less_accurate_than_fmm() {
    let (positions, moments) = random_cloud(1000, 1234);
    let fmm = fmm_error(
        &positions,
        &moments,
        params(32, 4, 0.5, FieldQuantity::Potential),
    );
    let bh = bh_error(
        &positions,
        &moments,
        params(32, 4, 0.9, FieldQuantity::Potential),
    );
    assert!(bh > fmm, "bh {} vs fmm {}", bh, fmm);
}

#[test]
fn fmm_error_decreases_with_order() {
    let (positions, moments) = random_cloud(800, 4321);
    let mut errors = Vec::new();
    for order in 2..=8 {
        errors.push(fmm_error(
            &positions,
            &moments,
            params(32, order, 0.5, FieldQuantity::Potential),
        ));
    }
    for pair in errors.windows(2) {
        assert!(
            pair[1] <= pair[0] * 1.2,
            "error grew along the order sweep: {:?}",
            errors
        );
    }
    assert!(
        errors[errors.len() - 1] < errors[0] / 50.0,
        "order sweep barely converged: {:?}",
        errors
    );
}

#[test]
fn bh_error_decreases_with_theta() {
    let (positions, moments) = random_cloud(800, 99);
    let mut errors = Vec::new();
    for theta in [0.9, 0.7, 0.5, 0.3] {
        errors.push(bh_error(
            &positions,
            &moments,
            params(32, 3, theta, FieldQuantity::Potential),
        ));
    }
    for pair in errors.windows(2) {
        assert!(
            pair[1] <= pair[0] * 1.2,
            "error grew as theta shrank: {:?}",
            errors
        );
    }
    assert!(errors[3] < errors[0] / 5.0, "theta sweep barely converged: {:?}", errors);
}

/// Order-6 force agreement with the direct sum, per component.
#[test]
fn force_components_agree_with_direct() {
    let (positions, moments) = random_cloud(1000, 7);
    let mut tree = DipoleTree::new(
        &positions,
        &moments,
        params(32, 6, 0.5, FieldQuantity::Force),
    )
    .unwrap();
    let mut exact = vec![0.0; 3000];
    let mut approx = vec![0.0; 3000];
    tree.compute_field_exact(&mut exact);
    tree.compute_field_fmm(&mut approx);

    for component in 0..3 {
        let e: Vec<f64> = exact.iter().skip(component).step_by(3).copied().collect();
        let a: Vec<f64> = approx.iter().skip(component).step_by(3).copied().collect();
        let error = mean_relative_error(&e, &a);
        assert!(error < 1e-3, "component {} error {}", component, error);
    }
}

/// The accelerated sum must clearly outpace the direct one at moderate N.
#[test]
fn fmm_outpaces_direct() {
    let (positions, moments) = random_cloud(10_000, 2024);
    let mut tree = DipoleTree::new(
        &positions,
        &moments,
        params(64, 3, 0.5, FieldQuantity::Potential),
    )
    .unwrap();
    let mut exact = vec![0.0; 10_000];
    let mut approx = vec![0.0; 10_000];

    let timer = Instant::now();
    tree.compute_field_exact(&mut exact);
    let t_direct = timer.elapsed().as_secs_f64();

    let timer = Instant::now();
    tree.compute_field_fmm(&mut approx);
    let t_fmm = timer.elapsed().as_secs_f64();

    assert!(
        t_fmm * 5.0 < t_direct,
        "fmm {}s vs direct {}s",
        t_fmm,
        t_direct
    );
}

#[test]
fn invalid_parameters_are_rejected() {
    let (positions, moments) = random_cloud(10, 1);

    let bad = [
        params(0, 4, 0.5, FieldQuantity::Potential),
        params(8, 1, 0.5, FieldQuantity::Potential),
        params(8, 4, 0.0, FieldQuantity::Potential),
        params(8, 4, -0.3, FieldQuantity::Potential),
    ];
    for p in bad {
        assert!(matches!(
            DipoleTree::new(&positions, &moments, p),
            Err(TreeError::InvalidParameters { .. })
        ));
    }

    assert!(matches!(
        DipoleTree::new(&[], &[], params(8, 4, 0.5, FieldQuantity::Potential)),
        Err(TreeError::InvalidParameters { .. })
    ));
    assert!(matches!(
        DipoleTree::new(&positions[..6], &moments, params(8, 4, 0.5, FieldQuantity::Potential)),
        Err(TreeError::InvalidParameters { .. })
    ));
}

#[test]
fn particle_outside_explicit_root_is_rejected() {
    let positions = [0.0, 0.0, 0.0, 5.0, 0.0, 0.0];
    let moments = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    let p = TreeParams {
        root: Some(RootBounds {
            centre: [0.0, 0.0, 0.0],
            radius: 1.0,
        }),
        ..TreeParams::default()
    };
    match DipoleTree::new(&positions, &moments, p) {
        Err(TreeError::InvalidGeometry { particle_index }) => assert_eq!(particle_index, 1),
        other => panic!("expected InvalidGeometry, got {:?}", other.map(|_| ())),
    }
}
