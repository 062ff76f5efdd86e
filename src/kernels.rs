/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the translation and evaluation kernels over Cartesian dipole expansions.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Numeric translation and evaluation kernels (P2M, M2M, M2L, M2P, L2L, L2P
//! and the direct P2P pair) for point-dipole sources.
//!
//! Multipole slices omit the identically-zero monopole slot: the coefficient
//! of multi-index `n` lives at `flat_index(n) - 1` and slices have length
//! `nterms(order) - 1`. Local slices hold degrees `0..order` with length
//! `nterms(order - 1)`; entry `m` is the `m`-th derivative of the incoming
//! potential at the cell centre, so evaluation multiplies by `dx^m / m!`.
//! Displacement arguments are always target minus source. The potential and
//! force paths share every translation operator and differ only in the final
//! evaluation step; force is `-grad(phi)` at the evaluation point.

use crate::expansion::{derivative_table, flat_index, monomial_table, nterms};

/// Accumulates the multipole expansion of a unit point dipole into `m`.
///
/// `dx` is the particle position relative to the cell centre and `mu` the
/// dipole moment. Truncation at `order` is exact through that degree: for
/// `M_n = (-1)^|n| sum_a mu_a dx^(n-e_a) / (n-e_a)!` every retained term is
/// computed in full.
pub(crate) fn particle_to_multipole(order: usize, dx: [f64; 3], mu: [f64; 3], m: &mut [f64]) {
    let table = monomial_table(dx, order - 1);
    let mut t = 1;
    let mut sign = -1.0;
    for degree in 1..=order {
        for nx in (0..=degree).rev() {
            for ny in (0..=degree - nx).rev() {
                let nz = degree - nx - ny;
                let mut acc = 0.0;
                if nx > 0 {
                    acc += mu[0] * table[flat_index(nx - 1, ny, nz)];
                }
                if ny > 0 {
                    acc += mu[1] * table[flat_index(nx, ny - 1, nz)];
                }
                if nz > 0 {
                    acc += mu[2] * table[flat_index(nx, ny, nz - 1)];
                }
                m[t - 1] += sign * acc;
                t += 1;
            }
        }
        sign = -sign;
    }
}

/// Shifts a child multipole expansion onto the parent centre and adds it in.
///
/// `dx` = parent centre minus child centre. The binomial shift
/// `M'_n = sum_(m <= n) dx^(n-m)/(n-m)! M_m` is exact for every retained
/// degree because shifting never raises the degree of a term.
pub(crate) fn multipole_to_multipole(
    order: usize,
    dx: [f64; 3],
    m_child: &[f64],
    m_parent: &mut [f64],
) {
    let table = monomial_table(dx, order - 1);
    let mut t = 1;
    for degree in 1..=order {
        for nx in (0..=degree).rev() {
            for ny in (0..=degree - nx).rev() {
                let nz = degree - nx - ny;
                let mut acc = 0.0;
                for mx in 0..=nx {
                    for my in 0..=ny {
                        for mz in 0..=nz {
                            if mx + my + mz == 0 {
                                continue;
                            }
                            acc += table[flat_index(nx - mx, ny - my, nz - mz)]
                                * m_child[flat_index(mx, my, mz) - 1];
                        }
                    }
                }
                m_parent[t - 1] += acc;
                t += 1;
            }
        }
    }
}

/// Translates a source multipole expansion into a local expansion about the
/// target centre: `L_m += sum_n M_n D_(n+m)(dx)`.
///
/// `dx` = target centre minus source centre. Products are truncated so the
/// combined degree `|n| + |m|` never exceeds the expansion order, which is
/// what limits the local expansion to degrees below `order`.
pub(crate) fn multipole_to_local(order: usize, dx: [f64; 3], m_source: &[f64], l_target: &mut [f64]) {
    let derivs = derivative_table(dx, order);
    let mut t = 0;
    for local_degree in 0..order {
        for lx in (0..=local_degree).rev() {
            for ly in (0..=local_degree - lx).rev() {
                let lz = local_degree - lx - ly;
                let mut acc = 0.0;
                let mut s = 1;
                for source_degree in 1..=order - local_degree {
                    for sx in (0..=source_degree).rev() {
                        for sy in (0..=source_degree - sx).rev() {
                            let sz = source_degree - sx - sy;
                            acc += m_source[s - 1]
                                * derivs[flat_index(lx + sx, ly + sy, lz + sz)];
                            s += 1;
                        }
                    }
                }
                l_target[t] += acc;
                t += 1;
            }
        }
    }
}

/// Potential of a multipole expansion at a point. `dx` = point minus cell
/// centre.
pub(crate) fn multipole_to_point_potential(order: usize, dx: [f64; 3], m: &[f64]) -> f64 {
    let derivs = derivative_table(dx, order);
    let mut phi = 0.0;
    for t in 1..nterms(order) {
        phi += m[t - 1] * derivs[t];
    }
    phi
}

/// Force of a multipole expansion at a point: `F_a = -sum_n M_n D_(n+e_a)`.
pub(crate) fn multipole_to_point_force(order: usize, dx: [f64; 3], m: &[f64]) -> [f64; 3] {
    let derivs = derivative_table(dx, order + 1);
    let mut force = [0.0; 3];
    let mut t = 1;
    for degree in 1..=order {
        for nx in (0..=degree).rev() {
            for ny in (0..=degree - nx).rev() {
                let nz = degree - nx - ny;
                let coefficient = m[t - 1];
                force[0] -= coefficient * derivs[flat_index(nx + 1, ny, nz)];
                force[1] -= coefficient * derivs[flat_index(nx, ny + 1, nz)];
                force[2] -= coefficient * derivs[flat_index(nx, ny, nz + 1)];
                t += 1;
            }
        }
    }
    force
}

/// Shifts a parent local expansion onto a child centre and adds it in:
/// `L'_k += sum_s dx^s/s! L_(k+s)` over the retained degrees.
///
/// `dx` = child centre minus parent centre. Exact: a truncated Taylor
/// polynomial re-expanded about a new origin is the same polynomial.
pub(crate) fn local_to_local(order: usize, dx: [f64; 3], l_parent: &[f64], l_child: &mut [f64]) {
    let table = monomial_table(dx, order - 1);
    let mut t = 0;
    for kept_degree in 0..order {
        for kx in (0..=kept_degree).rev() {
            for ky in (0..=kept_degree - kx).rev() {
                let kz = kept_degree - kx - ky;
                let mut acc = 0.0;
                for shift_degree in 0..order - kept_degree {
                    for sx in (0..=shift_degree).rev() {
                        for sy in (0..=shift_degree - sx).rev() {
                            let sz = shift_degree - sx - sy;
                            acc += table[flat_index(sx, sy, sz)]
                                * l_parent[flat_index(kx + sx, ky + sy, kz + sz)];
                        }
                    }
                }
                l_child[t] += acc;
                t += 1;
            }
        }
    }
}

/// Potential of a local expansion at a point. `dx` = point minus cell centre.
pub(crate) fn local_to_point_potential(order: usize, dx: [f64; 3], l: &[f64]) -> f64 {
    let table = monomial_table(dx, order - 1);
    let mut phi = 0.0;
    for t in 0..nterms(order - 1) {
        phi += l[t] * table[t];
    }
    phi
}

/// Force of a local expansion at a point: `F_a = -sum_m L_m dx^(m-e_a)/(m-e_a)!`.
pub(crate) fn local_to_point_force(order: usize, dx: [f64; 3], l: &[f64]) -> [f64; 3] {
    let table = monomial_table(dx, order - 1);
    let mut force = [0.0; 3];
    let mut t = 0;
    for degree in 0..order {
        for nx in (0..=degree).rev() {
            for ny in (0..=degree - nx).rev() {
                let nz = degree - nx - ny;
                let coefficient = l[t];
                if nx > 0 {
                    force[0] -= coefficient * table[flat_index(nx - 1, ny, nz)];
                }
                if ny > 0 {
                    force[1] -= coefficient * table[flat_index(nx, ny - 1, nz)];
                }
                if nz > 0 {
                    force[2] -= coefficient * table[flat_index(nx, ny, nz - 1)];
                }
                t += 1;
            }
        }
    }
    force
}

/// Potential at displacement `r` (target minus source) of a point dipole `mu`.
#[inline(always)]
pub(crate) fn dipole_potential(r: [f64; 3], mu: [f64; 3]) -> f64 {
    let r2 = r[0] * r[0] + r[1] * r[1] + r[2] * r[2];
    let inv_r = 1.0 / r2.sqrt();
    let inv_r3 = inv_r * inv_r * inv_r;
    (mu[0] * r[0] + mu[1] * r[1] + mu[2] * r[2]) * inv_r3
}

/// Force at displacement `r` of a point dipole `mu`:
/// `F = 3 (mu . r) r / r^5 - mu / r^3`.
#[inline(always)]
pub(crate) fn dipole_force(r: [f64; 3], mu: [f64; 3]) -> [f64; 3] {
    let r2 = r[0] * r[0] + r[1] * r[1] + r[2] * r[2];
    let inv_r = 1.0 / r2.sqrt();
    let inv_r3 = inv_r * inv_r * inv_r;
    let inv_r5 = inv_r3 * inv_r * inv_r;
    let mu_dot_r = mu[0] * r[0] + mu[1] * r[1] + mu[2] * r[2];
    [
        3.0 * mu_dot_r * r[0] * inv_r5 - mu[0] * inv_r3,
        3.0 * mu_dot_r * r[1] * inv_r5 - mu[1] * inv_r3,
        3.0 * mu_dot_r * r[2] * inv_r5 - mu[2] * inv_r3,
    ]
}
