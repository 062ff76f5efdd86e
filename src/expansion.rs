/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements multi-index arithmetic and coefficient tables for Cartesian Taylor expansions.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Multi-index arithmetic for the Cartesian Taylor basis shared by every
//! expansion kernel.
//!
//! Coefficients of total degree `<= p` are stored flat, graded by degree;
//! within a degree `nx` descends first, then `ny`:
//!
//! `(0,0,0); (1,0,0), (0,1,0), (0,0,1); (2,0,0), (1,1,0), (1,0,1), (0,2,0), (0,1,1), (0,0,2); ...`
//!
//! Every kernel iterates this layout with the same nested loops, so a flat
//! counter walks the table in step with the exponent triples.

/// Number of coefficients of total degree `p` or lower in three variables.
pub(crate) const fn nterms(p: usize) -> usize {
    (p + 1) * (p + 2) * (p + 3) / 6
}

/// Flat offset of the coefficient with exponents `(nx, ny, nz)`.
#[inline(always)]
pub(crate) fn flat_index(nx: usize, ny: usize, nz: usize) -> usize {
    let degree = nx + ny + nz;
    let below = if degree == 0 { 0 } else { nterms(degree - 1) };
    let rx = degree - nx;
    below + rx * (rx + 1) / 2 + (rx - ny)
}

/// Table of scaled monomials `d^n / n!` for every `|n| <= max_degree`, in
/// flat-index order.
pub(crate) fn monomial_table(d: [f64; 3], max_degree: usize) -> Vec<f64> {
    let mut table = vec![0.0; nterms(max_degree)];
    table[0] = 1.0;
    let mut t = 1;
    for degree in 1..=max_degree {
        for nx in (0..=degree).rev() {
            for ny in (0..=degree - nx).rev() {
                let nz = degree - nx - ny;
                // peel one power off the leading non-zero exponent
                table[t] = if nx > 0 {
                    table[flat_index(nx - 1, ny, nz)] * d[0] / nx as f64
                } else if ny > 0 {
                    table[flat_index(nx, ny - 1, nz)] * d[1] / ny as f64
                } else {
                    table[flat_index(nx, ny, nz - 1)] * d[2] / nz as f64
                };
                t += 1;
            }
        }
    }
    table
}

/// Table of the Cartesian derivatives `D_n = d^n (1/|r|)` evaluated at `d`,
/// for every `|n| <= max_degree`.
///
/// Differentiating `r^2 * d_a(1/r) = -x_a / r` with respect to the remaining
/// exponents gives a recurrence in which each entry costs O(1) given the
/// lower-degree entries:
///
/// `r^2 D_n = -(2 n_a - 1) x_a D_(n-e_a) - (n_a - 1)^2 D_(n-2e_a)
///            - sum_(b != a) [ 2 n_b x_b D_(n-e_b) + n_b (n_b - 1) D_(n-2e_b) ]`
///
/// where `a` is any axis with `n_a >= 1` (the leading non-zero axis here).
/// `d` must be non-zero; admissible cell pairs and distinct particles
/// guarantee that.
pub(crate) fn derivative_table(d: [f64; 3], max_degree: usize) -> Vec<f64> {
    let r2 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
    let mut table = vec![0.0; nterms(max_degree)];
    table[0] = 1.0 / r2.sqrt();
    let mut t = 1;
    for degree in 1..=max_degree {
        for nx in (0..=degree).rev() {
            for ny in (0..=degree - nx).rev() {
                let nz = degree - nx - ny;
                let n = [nx, ny, nz];
                let axis = if nx > 0 {
                    0
                } else if ny > 0 {
                    1
                } else {
                    2
                };
                let mut acc = 0.0;
                for b in 0..3 {
                    if n[b] == 0 {
                        continue;
                    }
                    let mut m = n;
                    m[b] -= 1;
                    let first = if b == axis {
                        (2 * n[b] - 1) as f64
                    } else {
                        (2 * n[b]) as f64
                    };
                    acc += first * d[b] * table[flat_index(m[0], m[1], m[2])];
                    if n[b] >= 2 {
                        m[b] -= 1;
                        let second = if b == axis {
                            ((n[b] - 1) * (n[b] - 1)) as f64
                        } else {
                            (n[b] * (n[b] - 1)) as f64
                        };
                        acc += second * table[flat_index(m[0], m[1], m[2])];
                    }
                }
                table[t] = -acc / r2;
                t += 1;
            }
        }
    }
    table
}
