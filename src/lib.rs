/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API for the dipole fast summation crate.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Fast summation of point-dipole fields
//!
//! This crate evaluates the interaction field of N point dipoles in three
//! dimensions - either the scalar potential or the force at every particle
//! due to all others - in near-linear time instead of the O(N^2) direct sum.
//!
//! Two accelerations are provided over one adaptive octree:
//!
//! - **The Fast Multipole Method (FMM)** - cell-to-cell (M2L) translations of
//!   Cartesian Taylor expansions, O(N).
//! - **A Barnes-Hut tree code (BH)** - cell-to-particle (M2P) evaluation,
//!   O(N log N).
//!
//! Both use the acceptance criterion of Dehnen, which compares the opening
//! angle `theta` against the radii bounding the farthest particle of each
//! cell, so adaptivity costs no accuracy. The expansion order is a runtime
//! parameter; accuracy is tunable from a few digits to near machine
//! precision, and an exact direct summation is included for validation.
//!
//! # Features
//! - Scalar potential or force (`-grad(phi)`) output, selected per tree
//! - Runtime-selectable expansion order and opening angle
//! - Deterministic: repeated runs are bit-identical regardless of thread count
//! - Parallel evaluation sweeps built on [`rayon`]
//! - Built on [`faer`](https://docs.rs/faer/latest/faer/) matrices for the
//!   coefficient storage, avoiding complex build dependencies
//!
//! # Example
//!
//! ```
//! use ferreus_dipole::{DipoleTree, FieldQuantity, TreeParams};
//! use rand::rngs::StdRng;
//! use rand::{Rng, SeedableRng};
//!
//! // Random unit dipoles in the unit cube
//! let num_particles = 200;
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut positions = Vec::with_capacity(3 * num_particles);
//! let mut moments = Vec::with_capacity(3 * num_particles);
//! for _ in 0..num_particles {
//!     let mu = [
//!         rng.random_range(-1.0..1.0f64),
//!         rng.random_range(-1.0..1.0),
//!         rng.random_range(-1.0..1.0),
//!     ];
//!     let norm = (mu[0] * mu[0] + mu[1] * mu[1] + mu[2] * mu[2]).sqrt();
//!     for component in mu {
//!         moments.push(component / norm);
//!     }
//!     for _ in 0..3 {
//!         positions.push(rng.random_range(-1.0..1.0));
//!     }
//! }
//!
//! // An order-5 tree evaluating the scalar potential
//! let params = TreeParams {
//!     ncrit: 16,
//!     order: 5,
//!     theta: 0.5,
//!     quantity: FieldQuantity::Potential,
//!     root: None,
//! };
//! let mut tree = DipoleTree::new(&positions, &moments, params).unwrap();
//!
//! // Compare the fast evaluation against the direct sum
//! let mut exact = vec![0.0; num_particles];
//! let mut approx = vec![0.0; num_particles];
//! tree.compute_field_exact(&mut exact);
//! tree.compute_field_fmm(&mut approx);
//!
//! let absolute: f64 = exact.iter().zip(&approx).map(|(e, a)| (e - a).abs()).sum();
//! let scale: f64 = exact.iter().map(|e| e.abs()).sum();
//! assert!(absolute / scale < 1e-3);
//! ```
//!
//! # References
//!
//! 1. Dehnen, W. (2002).
//!    *A Hierarchical O(N) Force Calculation Algorithm.*
//!    *Journal of Computational Physics*, **179**(1), 27-42.
//!
//! 2. Visscher, P. B., & Apalkov, D. M. (2010).
//!    *Simple recursive implementation of fast multipole method.*
//!    *Journal of Magnetism and Magnetic Materials*, **322**(2), 275-281.

mod dipole_tree;
mod expansion;
mod geometry;
mod kernels;
mod octree;
mod traversal;
mod utils;

#[doc(inline)]
pub use dipole_tree::{DipoleTree, FieldQuantity, RootBounds, TreeError, TreeParams};
