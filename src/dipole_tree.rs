/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the core dipole field tree and its direct, FMM and Barnes-Hut evaluations.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::expansion::nterms;
use crate::geometry;
use crate::kernels;
use crate::octree::{self, Cell};
use crate::traversal::{self, InteractionLists};
use crate::utils;
use faer::Mat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur while validating inputs and building a [`DipoleTree`].
#[derive(Debug)]
pub enum TreeError {
    /// A build parameter is outside its valid range.
    InvalidParameters { reason: &'static str },

    /// A particle position lies outside the requested root cube.
    InvalidGeometry { particle_index: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidParameters { reason } => {
                write!(f, "tree construction failed: {}", reason)
            }
            TreeError::InvalidGeometry { particle_index } => write!(
                f,
                "tree construction failed: particle at row {} lies outside the root cube",
                particle_index
            ),
        }
    }
}

impl std::error::Error for TreeError {}

/// Field quantity evaluated at each particle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldQuantity {
    /// Scalar potential; one output value per particle.
    Potential,

    /// Force `-grad(phi)`; three x,y,z-interleaved output values per particle.
    Force,
}

impl FieldQuantity {
    /// Number of output values per particle.
    pub fn components(&self) -> usize {
        match self {
            FieldQuantity::Potential => 1,
            FieldQuantity::Force => 3,
        }
    }
}

/// Explicit root cube for the octree.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct RootBounds {
    /// Centre of the cube.
    pub centre: [f64; 3],

    /// Half-width of the cube.
    pub radius: f64,
}

/// Parameters controlling tree construction and field evaluation.
///
/// ### Default Values
/// - `ncrit`: `64`
/// - `order`: `4`
/// - `theta`: `0.5`
/// - `quantity`: `FieldQuantity::Potential`
/// - `root`: `None` (derived from the particle extents)
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum number of particles a leaf cell may hold before it is split.
    pub ncrit: usize,

    /// Truncation order of the multipole expansions; the local expansions
    /// carry one order less. Must be at least 2.
    pub order: usize,

    /// Opening angle of the acceptance criterion. A cell pair is evaluated
    /// through expansions when `theta * distance > rmax_t + rmax_s`, so a
    /// smaller angle is more accurate and more expensive.
    pub theta: f64,

    /// Quantity accumulated at each particle.
    pub quantity: FieldQuantity,

    /// Optional explicit root cube. When absent the tree derives a bounding
    /// cube from the particle extents and [`TreeError::InvalidGeometry`]
    /// cannot occur.
    pub root: Option<RootBounds>,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            ncrit: 64,
            order: 4,
            theta: 0.5,
            quantity: FieldQuantity::Potential,
            root: None,
        }
    }
}

/// An adaptive octree of point dipoles supporting direct, FMM and Barnes-Hut
/// field summation.
///
/// Construction validates the inputs, builds the tree serially (cell indices
/// are append-ordered and stable), runs the dual-tree interaction driver
/// once, and allocates the multipole and local coefficient arenas. The three
/// `compute_field_*` methods may then be called in any sequence; each zeroes
/// the state it accumulates into.
#[derive(Debug)]
pub struct DipoleTree {
    /// Particle positions, shape (N, 3).
    positions: Mat<f64>,

    /// Dipole moments, shape (N, 3).
    moments: Mat<f64>,

    params: TreeParams,

    /// All cells, in construction order. Index 0 is the root.
    cells: Vec<Cell>,

    /// Cell indices grouped by tree level.
    levels: Vec<Vec<usize>>,

    /// Leaf cell indices in construction order.
    leaves: Vec<usize>,

    /// Near and far source lists from the dual-tree walk.
    lists: InteractionLists,

    /// Multipole arena; column k is cell k's coefficient slice of length
    /// `nterms(order) - 1`.
    multipole_coefficients: Mat<f64>,

    /// Local arena; column k is cell k's coefficient slice of length
    /// `nterms(order - 1)`.
    local_coefficients: Mat<f64>,

    /// Per-particle accumulator, one column per output component.
    field_values: Mat<f64>,
}

/// Immutable view of one arena column.
fn column(arena: &Mat<f64>, cell: usize, len: usize) -> &[f64] {
    unsafe { std::slice::from_raw_parts(arena.col(cell).as_ptr(), len) }
}

/// Mutable view of one arena column. Callers must guarantee that no other
/// view of the same column is live; the sweep phases only ever hand a column
/// to the task that owns its cell.
unsafe fn column_mut(arena: &Mat<f64>, cell: usize, len: usize) -> &mut [f64] {
    std::slice::from_raw_parts_mut(arena.col(cell).as_ptr() as *mut f64, len)
}

impl DipoleTree {
    /// Builds a tree over `positions` with dipole strengths `moments`, both
    /// flat x,y,z-interleaved slices of equal length `3 * N`.
    ///
    /// # Errors
    /// * [`TreeError::InvalidParameters`] when the slices disagree, `N` is
    ///   zero, `ncrit < 1`, `order < 2` or `theta <= 0`.
    /// * [`TreeError::InvalidGeometry`] when an explicit root cube is given
    ///   and a particle lies outside it.
    pub fn new(positions: &[f64], moments: &[f64], params: TreeParams) -> Result<Self, TreeError> {
        if positions.len() != moments.len() {
            return Err(TreeError::InvalidParameters {
                reason: "positions and moments must have the same length",
            });
        }
        if positions.len() % 3 != 0 {
            return Err(TreeError::InvalidParameters {
                reason: "positions must hold three coordinates per particle",
            });
        }
        let num_particles = positions.len() / 3;
        if num_particles == 0 {
            return Err(TreeError::InvalidParameters {
                reason: "at least one particle is required",
            });
        }
        if params.ncrit < 1 {
            return Err(TreeError::InvalidParameters {
                reason: "ncrit must be at least 1",
            });
        }
        if params.order < 2 {
            return Err(TreeError::InvalidParameters {
                reason: "order must be at least 2",
            });
        }
        if !(params.theta > 0.0) {
            return Err(TreeError::InvalidParameters {
                reason: "theta must be positive",
            });
        }

        let positions = utils::mat_from_interleaved(positions);
        let moments = utils::mat_from_interleaved(moments);

        let (centre, radius) = match params.root {
            Some(root) => {
                if !(root.radius > 0.0) {
                    return Err(TreeError::InvalidParameters {
                        reason: "root radius must be positive",
                    });
                }
                for i in 0..num_particles {
                    if !geometry::contains(root.centre, root.radius, utils::row3(&positions, i)) {
                        return Err(TreeError::InvalidGeometry { particle_index: i });
                    }
                }
                (root.centre, root.radius)
            }
            None => geometry::bounding_cube(&positions),
        };

        let cells = octree::build_cells(&positions, centre, radius, params.ncrit);

        let mut levels: Vec<Vec<usize>> = Vec::new();
        let mut leaves = Vec::new();
        for (k, cell) in cells.iter().enumerate() {
            if cell.level >= levels.len() {
                levels.resize(cell.level + 1, Vec::new());
            }
            levels[cell.level].push(k);
            if cell.is_leaf() {
                leaves.push(k);
            }
        }

        let lists = traversal::build_interaction_lists(&cells, params.theta);

        let multipole_len = nterms(params.order) - 1;
        let local_len = nterms(params.order - 1);
        let num_cells = cells.len();

        Ok(DipoleTree {
            positions,
            moments,
            params,
            cells,
            levels,
            leaves,
            lists,
            multipole_coefficients: Mat::zeros(multipole_len, num_cells),
            local_coefficients: Mat::zeros(local_len, num_cells),
            field_values: Mat::zeros(num_particles, params.quantity.components()),
        })
    }

    /// Number of particles held by the tree.
    pub fn num_particles(&self) -> usize {
        self.positions.nrows()
    }

    /// Number of cells in the octree.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Build parameters the tree was constructed with.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Direct O(N^2) reference sum of the pairwise dipole field.
    ///
    /// `out` must have length `N` (potential) or `3 * N` (force).
    pub fn compute_field_exact(&mut self, out: &mut [f64]) {
        self.check_output(out);
        self.reset_field_values();

        let n = self.positions.nrows();
        let field_ref = &self.field_values;

        match self.params.quantity {
            FieldQuantity::Potential => {
                (0..n).into_par_iter().for_each(|i| {
                    let target = utils::row3(&self.positions, i);
                    let mut phi = 0.0;
                    for j in 0..n {
                        if j == i {
                            continue;
                        }
                        let r = geometry::displacement(target, utils::row3(&self.positions, j));
                        phi += kernels::dipole_potential(r, utils::row3(&self.moments, j));
                    }
                    unsafe {
                        *(field_ref.col(0).as_ptr() as *mut f64).add(i) = phi;
                    }
                });
            }
            FieldQuantity::Force => {
                (0..n).into_par_iter().for_each(|i| {
                    let target = utils::row3(&self.positions, i);
                    let mut force = [0.0; 3];
                    for j in 0..n {
                        if j == i {
                            continue;
                        }
                        let r = geometry::displacement(target, utils::row3(&self.positions, j));
                        let f = kernels::dipole_force(r, utils::row3(&self.moments, j));
                        force[0] += f[0];
                        force[1] += f[1];
                        force[2] += f[2];
                    }
                    unsafe {
                        for c in 0..3 {
                            *(field_ref.col(c).as_ptr() as *mut f64).add(i) = force[c];
                        }
                    }
                });
            }
        }

        self.write_output(out);
    }

    /// FMM evaluation: upward P2M/M2M sweep, M2L over the far lists, downward
    /// L2L sweep, then leaf L2P plus near-field P2P.
    pub fn compute_field_fmm(&mut self, out: &mut [f64]) {
        self.check_output(out);
        self.check_arenas();
        self.reset_field_values();
        self.reset_multipole_coefficients();
        self.reset_local_coefficients();

        self.upward_pass();
        self.multipole_to_local_pass();
        self.local_to_local_pass();
        self.fmm_leaf_pass();

        self.write_output(out);
    }

    /// Barnes-Hut evaluation: upward P2M/M2M sweep, then per-particle M2P
    /// against the far lists of the leaf's ancestor chain plus near-field P2P.
    pub fn compute_field_bh(&mut self, out: &mut [f64]) {
        self.check_output(out);
        self.check_arenas();
        self.reset_field_values();
        self.reset_multipole_coefficients();

        self.upward_pass();
        self.bh_leaf_pass();

        self.write_output(out);
    }

    /// Panics when the output slice disagrees with the particle count and
    /// field quantity.
    fn check_output(&self, out: &[f64]) {
        assert_eq!(
            out.len(),
            self.positions.nrows() * self.params.quantity.components(),
            "output slice length must be the particle count times the component count"
        );
    }

    /// Arena shape agreement is a structural invariant; a mismatch is a bug,
    /// not a recoverable condition.
    fn check_arenas(&self) {
        assert_eq!(
            self.multipole_coefficients.ncols(),
            self.cells.len(),
            "multipole arena misaligned with the cell vector"
        );
        assert_eq!(
            self.local_coefficients.ncols(),
            self.cells.len(),
            "local arena misaligned with the cell vector"
        );
        assert_eq!(
            self.multipole_coefficients.nrows(),
            nterms(self.params.order) - 1,
            "multipole arena misaligned with the expansion order"
        );
        assert_eq!(
            self.local_coefficients.nrows(),
            nterms(self.params.order - 1),
            "local arena misaligned with the expansion order"
        );
    }

    fn reset_multipole_coefficients(&mut self) {
        self.multipole_coefficients = Mat::zeros(nterms(self.params.order) - 1, self.cells.len());
    }

    fn reset_local_coefficients(&mut self) {
        self.local_coefficients = Mat::zeros(nterms(self.params.order - 1), self.cells.len());
    }

    fn reset_field_values(&mut self) {
        self.field_values = Mat::zeros(
            self.positions.nrows(),
            self.params.quantity.components(),
        );
    }

    /// Copies the accumulated field into the caller's interleaved slice.
    fn write_output(&self, out: &mut [f64]) {
        let components = self.params.quantity.components();
        for i in 0..self.field_values.nrows() {
            for c in 0..components {
                out[components * i + c] = self.field_values[(i, c)];
            }
        }
    }

    /// P2M over the leaves, then M2M level by level towards the root so
    /// child multipoles are final before their parent reads them.
    fn upward_pass(&self) {
        let order = self.params.order;
        let multipole_ref = &self.multipole_coefficients;
        let multipole_len = multipole_ref.nrows();

        self.leaves.par_iter().for_each(|&leaf| {
            let cell = &self.cells[leaf];
            let m = unsafe { column_mut(multipole_ref, leaf, multipole_len) };
            for &i in &cell.leaf {
                let dx = geometry::displacement(utils::row3(&self.positions, i), cell.centre);
                kernels::particle_to_multipole(order, dx, utils::row3(&self.moments, i), m);
            }
        });

        for level in (0..self.levels.len().saturating_sub(1)).rev() {
            self.levels[level].par_iter().for_each(|&k| {
                let cell = &self.cells[k];
                if cell.is_leaf() {
                    return;
                }
                let m_parent = unsafe { column_mut(multipole_ref, k, multipole_len) };
                for child in cell.children() {
                    let dx = geometry::displacement(cell.centre, self.cells[child].centre);
                    kernels::multipole_to_multipole(
                        order,
                        dx,
                        column(multipole_ref, child, multipole_len),
                        m_parent,
                    );
                }
            });
        }
    }

    /// M2L from every far-list source into its target cell's local expansion.
    /// Targets own disjoint local columns, so they run in parallel.
    fn multipole_to_local_pass(&self) {
        let order = self.params.order;
        let multipole_ref = &self.multipole_coefficients;
        let local_ref = &self.local_coefficients;
        let multipole_len = multipole_ref.nrows();
        let local_len = local_ref.nrows();

        (0..self.cells.len()).into_par_iter().for_each(|k| {
            let sources = &self.lists.far[k];
            if sources.is_empty() {
                return;
            }
            let target = &self.cells[k];
            let l = unsafe { column_mut(local_ref, k, local_len) };
            for &source in sources {
                let dx = geometry::displacement(target.centre, self.cells[source].centre);
                kernels::multipole_to_local(
                    order,
                    dx,
                    column(multipole_ref, source, multipole_len),
                    l,
                );
            }
        });
    }

    /// L2L level by level away from the root; every cell pulls its parent's
    /// expansion, which the previous level already finalised.
    fn local_to_local_pass(&self) {
        let order = self.params.order;
        let local_ref = &self.local_coefficients;
        let local_len = local_ref.nrows();

        for level in 1..self.levels.len() {
            self.levels[level].par_iter().for_each(|&k| {
                let cell = &self.cells[k];
                let dx = geometry::displacement(cell.centre, self.cells[cell.parent].centre);
                let l = unsafe { column_mut(local_ref, k, local_len) };
                kernels::local_to_local(
                    order,
                    dx,
                    column(local_ref, cell.parent, local_len),
                    l,
                );
            });
        }
    }

    /// L2P of each leaf's local expansion plus P2P over its near list. Every
    /// particle belongs to exactly one leaf, so the field rows are disjoint
    /// across tasks.
    fn fmm_leaf_pass(&self) {
        let order = self.params.order;
        let local_ref = &self.local_coefficients;
        let local_len = local_ref.nrows();
        let field_ref = &self.field_values;

        self.leaves.par_iter().for_each(|&leaf| {
            let cell = &self.cells[leaf];
            let l = column(local_ref, leaf, local_len);
            let near = &self.lists.near[leaf];

            match self.params.quantity {
                FieldQuantity::Potential => {
                    for &i in &cell.leaf {
                        let target = utils::row3(&self.positions, i);
                        let dx = geometry::displacement(target, cell.centre);
                        let phi = kernels::local_to_point_potential(order, dx, l)
                            + self.near_field_potential(i, target, near);
                        unsafe {
                            *(field_ref.col(0).as_ptr() as *mut f64).add(i) = phi;
                        }
                    }
                }
                FieldQuantity::Force => {
                    for &i in &cell.leaf {
                        let target = utils::row3(&self.positions, i);
                        let dx = geometry::displacement(target, cell.centre);
                        let mut force = kernels::local_to_point_force(order, dx, l);
                        let near_force = self.near_field_force(i, target, near);
                        force[0] += near_force[0];
                        force[1] += near_force[1];
                        force[2] += near_force[2];
                        unsafe {
                            for c in 0..3 {
                                *(field_ref.col(c).as_ptr() as *mut f64).add(i) = force[c];
                            }
                        }
                    }
                }
            }
        });
    }

    /// M2P of every admissible source recorded on the leaf's ancestor chain
    /// plus P2P over the near list.
    fn bh_leaf_pass(&self) {
        let order = self.params.order;
        let multipole_ref = &self.multipole_coefficients;
        let multipole_len = multipole_ref.nrows();
        let field_ref = &self.field_values;

        self.leaves.par_iter().for_each(|&leaf| {
            let cell = &self.cells[leaf];
            let near = &self.lists.near[leaf];

            // far-field sources accumulated by this leaf and its ancestors,
            // in leaf-to-root order
            let mut far_sources: Vec<usize> = Vec::new();
            let mut k = leaf;
            loop {
                far_sources.extend_from_slice(&self.lists.far[k]);
                if k == 0 {
                    break;
                }
                k = self.cells[k].parent;
            }

            match self.params.quantity {
                FieldQuantity::Potential => {
                    for &i in &cell.leaf {
                        let target = utils::row3(&self.positions, i);
                        let mut phi = self.near_field_potential(i, target, near);
                        for &source in &far_sources {
                            let dx = geometry::displacement(target, self.cells[source].centre);
                            phi += kernels::multipole_to_point_potential(
                                order,
                                dx,
                                column(multipole_ref, source, multipole_len),
                            );
                        }
                        unsafe {
                            *(field_ref.col(0).as_ptr() as *mut f64).add(i) = phi;
                        }
                    }
                }
                FieldQuantity::Force => {
                    for &i in &cell.leaf {
                        let target = utils::row3(&self.positions, i);
                        let mut force = self.near_field_force(i, target, near);
                        for &source in &far_sources {
                            let dx = geometry::displacement(target, self.cells[source].centre);
                            let f = kernels::multipole_to_point_force(
                                order,
                                dx,
                                column(multipole_ref, source, multipole_len),
                            );
                            force[0] += f[0];
                            force[1] += f[1];
                            force[2] += f[2];
                        }
                        unsafe {
                            for c in 0..3 {
                                *(field_ref.col(c).as_ptr() as *mut f64).add(i) = force[c];
                            }
                        }
                    }
                }
            }
        });
    }

    /// Direct potential on a target particle from the particles of the near
    /// cells, skipping the target itself.
    fn near_field_potential(&self, target_index: usize, target: [f64; 3], sources: &[usize]) -> f64 {
        let mut phi = 0.0;
        for &source in sources {
            for &j in &self.cells[source].leaf {
                if j == target_index {
                    continue;
                }
                let r = geometry::displacement(target, utils::row3(&self.positions, j));
                phi += kernels::dipole_potential(r, utils::row3(&self.moments, j));
            }
        }
        phi
    }

    /// Direct force on a target particle from the particles of the near
    /// cells, skipping the target itself.
    fn near_field_force(&self, target_index: usize, target: [f64; 3], sources: &[usize]) -> [f64; 3] {
        let mut force = [0.0; 3];
        for &source in sources {
            for &j in &self.cells[source].leaf {
                if j == target_index {
                    continue;
                }
                let r = geometry::displacement(target, utils::row3(&self.positions, j));
                let f = kernels::dipole_force(r, utils::row3(&self.moments, j));
                force[0] += f[0];
                force[1] += f[1];
                force[2] += f[2];
            }
        }
        force
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

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

    fn relative_error(exact: &[f64], approx: &[f64]) -> f64 {
        let absolute: f64 = exact
            .iter()
            .zip(approx)
            .map(|(e, a)| (e - a).abs())
            .sum();
        let scale: f64 = exact.iter().map(|e| e.abs()).sum();
        absolute / scale
    }

    #[test]
    fn fmm_matches_direct_on_a_small_cloud() {
        let (positions, moments) = random_cloud(300, 17);
        let params = TreeParams {
            ncrit: 16,
            order: 6,
            theta: 0.5,
            ..TreeParams::default()
        };
        let mut tree = DipoleTree::new(&positions, &moments, params).unwrap();
        let mut exact = vec![0.0; 300];
        let mut approx = vec![0.0; 300];
        tree.compute_field_exact(&mut exact);
        tree.compute_field_fmm(&mut approx);
        assert!(relative_error(&exact, &approx) < 1e-4);
    }

    #[test]
    fn bh_matches_direct_on_a_small_cloud() {
        let (positions, moments) = random_cloud(300, 17);
        let params = TreeParams {
            ncrit: 16,
            order: 6,
            theta: 0.5,
            ..TreeParams::default()
        };
        let mut tree = DipoleTree::new(&positions, &moments, params).unwrap();
        let mut exact = vec![0.0; 300];
        let mut approx = vec![0.0; 300];
        tree.compute_field_exact(&mut exact);
        tree.compute_field_bh(&mut approx);
        assert!(relative_error(&exact, &approx) < 1e-4);
    }

    /// A tree stays reusable across evaluation modes because every compute
    /// call re-zeroes the state it accumulates into.
    #[test]
    fn modes_can_be_rerun_on_one_tree() {
        let (positions, moments) = random_cloud(150, 29);
        let params = TreeParams {
            ncrit: 8,
            order: 4,
            theta: 0.6,
            ..TreeParams::default()
        };
        let mut tree = DipoleTree::new(&positions, &moments, params).unwrap();

        let mut first = vec![0.0; 150];
        let mut scratch = vec![0.0; 150];
        let mut second = vec![0.0; 150];
        tree.compute_field_fmm(&mut first);
        tree.compute_field_bh(&mut scratch);
        tree.compute_field_exact(&mut scratch);
        tree.compute_field_fmm(&mut second);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn force_output_has_three_components_per_particle() {
        let (positions, moments) = random_cloud(64, 5);
        let params = TreeParams {
            ncrit: 8,
            order: 4,
            theta: 0.5,
            quantity: FieldQuantity::Force,
            ..TreeParams::default()
        };
        let mut tree = DipoleTree::new(&positions, &moments, params).unwrap();
        let mut exact = vec![0.0; 3 * 64];
        let mut approx = vec![0.0; 3 * 64];
        tree.compute_field_exact(&mut exact);
        tree.compute_field_fmm(&mut approx);
        assert!(relative_error(&exact, &approx) < 5e-3);
    }

    #[test]
    fn explicit_root_accepts_contained_particles() {
        let (positions, moments) = random_cloud(40, 3);
        let params = TreeParams {
            ncrit: 4,
            root: Some(RootBounds {
                centre: [0.0, 0.0, 0.0],
                radius: 1.5,
            }),
            ..TreeParams::default()
        };
        assert!(DipoleTree::new(&positions, &moments, params).is_ok());
    }

    #[test]
    fn explicit_root_rejects_outside_particles() {
        let positions = [0.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        let moments = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let params = TreeParams {
            root: Some(RootBounds {
                centre: [0.0, 0.0, 0.0],
                radius: 1.0,
            }),
            ..TreeParams::default()
        };
        match DipoleTree::new(&positions, &moments, params) {
            Err(TreeError::InvalidGeometry { particle_index }) => assert_eq!(particle_index, 1),
            other => panic!("expected InvalidGeometry, got {:?}", other.map(|_| ())),
        }
    }
}
