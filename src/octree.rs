/////////////////////////////////////////////////////////////////////////////////////////////
//
// Constructs the adaptive octree over the particle cloud by per-particle insertion.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Adaptive octree construction.
//!
//! Cells live in a single append-only vector and refer to each other by
//! index, so identities stay stable while the vector grows and the
//! coefficient arenas can later be addressed by cell id. Construction is
//! strictly serial; the append order is part of the deterministic contract.

use crate::geometry;
use crate::utils;
use faer::Mat;

/// Depth cap. A leaf at this level absorbs particles without splitting, so
/// coincident particles cannot recurse forever.
pub(crate) const MAX_DEPTH: usize = 32;

const NO_CELL: usize = usize::MAX;

/// A node of the octree.
#[derive(Debug)]
pub(crate) struct Cell {
    /// Number of particles routed through this cell during construction.
    /// The counter keeps running after a split, so an interior cell holds its
    /// subtree population.
    pub(crate) nleaf: usize,

    /// Occupancy bitmask over the eight octants.
    pub(crate) nchild: u8,

    /// Tree level; 0 for the root.
    pub(crate) level: usize,

    /// Child cell index per octant; valid only where `nchild` has the bit set.
    pub(crate) child: [usize; 8],

    /// Particle indices held by the cell; emptied when the cell splits.
    pub(crate) leaf: Vec<usize>,

    /// Centre of the cube.
    pub(crate) centre: [f64; 3],

    /// Half-width of the cube.
    pub(crate) radius: f64,

    /// Distance from `centre` to the farthest particle in the subtree, set by
    /// a bottom-up pass after construction.
    pub(crate) rmax: f64,

    /// Index of the parent cell; the root points at itself.
    pub(crate) parent: usize,
}

impl Cell {
    fn new(centre: [f64; 3], radius: f64, parent: usize, level: usize) -> Self {
        Cell {
            nleaf: 0,
            nchild: 0,
            level,
            child: [NO_CELL; 8],
            leaf: Vec::new(),
            centre,
            radius,
            rmax: 0.0,
            parent,
        }
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.nchild == 0
    }

    /// Indices of the existing children, in octant order.
    pub(crate) fn children(&self) -> impl Iterator<Item = usize> + '_ {
        let occupancy = self.nchild;
        (0..8)
            .filter(move |&octant| occupancy & (1u8 << octant) != 0)
            .map(move |octant| self.child[octant])
    }
}

/// Builds the cell vector by inserting particles one at a time. A leaf that
/// exceeds `ncrit` particles is split and its particles redistributed into
/// the child octants, recursively if one octant receives them all.
pub(crate) fn build_cells(
    positions: &Mat<f64>,
    centre: [f64; 3],
    radius: f64,
    ncrit: usize,
) -> Vec<Cell> {
    let mut cells = vec![Cell::new(centre, radius, 0, 0)];
    for i in 0..positions.nrows() {
        insert_particle(&mut cells, positions, i, 0, ncrit);
    }
    compute_rmax(&mut cells, positions);
    cells
}

/// Descends from `start` to the leaf containing particle `i`, counting the
/// particle into every cell along the path.
fn insert_particle(
    cells: &mut Vec<Cell>,
    positions: &Mat<f64>,
    i: usize,
    start: usize,
    ncrit: usize,
) {
    let point = utils::row3(positions, i);
    let mut curr = start;
    loop {
        cells[curr].nleaf += 1;
        if cells[curr].is_leaf() {
            cells[curr].leaf.push(i);
            if cells[curr].nleaf > ncrit && cells[curr].level < MAX_DEPTH {
                split_cell(cells, positions, curr, ncrit);
            }
            return;
        }
        let octant = geometry::octant(point, cells[curr].centre);
        curr = child_or_create(cells, curr, octant);
    }
}

/// Turns a full leaf into an interior cell: its particles move into the
/// child octants and its own list is emptied. `nleaf` keeps the subtree
/// count accumulated so far.
fn split_cell(cells: &mut Vec<Cell>, positions: &Mat<f64>, parent: usize, ncrit: usize) {
    let moved = std::mem::take(&mut cells[parent].leaf);
    for i in moved {
        let octant = geometry::octant(utils::row3(positions, i), cells[parent].centre);
        let child = child_or_create(cells, parent, octant);
        insert_particle(cells, positions, i, child, ncrit);
    }
}

fn child_or_create(cells: &mut Vec<Cell>, parent: usize, octant: usize) -> usize {
    if cells[parent].nchild & (1u8 << octant) == 0 {
        let centre = geometry::child_centre(cells[parent].centre, cells[parent].radius, octant);
        let radius = 0.5 * cells[parent].radius;
        let level = cells[parent].level + 1;
        let index = cells.len();
        cells.push(Cell::new(centre, radius, parent, level));
        cells[parent].child[octant] = index;
        cells[parent].nchild |= 1u8 << octant;
    }
    cells[parent].child[octant]
}

/// Sets `rmax` exactly: each leaf walks its ancestor chain once and every
/// particle updates the centre distance of the whole chain.
fn compute_rmax(cells: &mut [Cell], positions: &Mat<f64>) {
    for k in 0..cells.len() {
        if !cells[k].is_leaf() {
            continue;
        }
        let particles = cells[k].leaf.clone();
        for i in particles {
            let point = utils::row3(positions, i);
            let mut ancestor = k;
            loop {
                let d = geometry::distance(point, cells[ancestor].centre);
                if d > cells[ancestor].rmax {
                    cells[ancestor].rmax = d;
                }
                if ancestor == 0 {
                    break;
                }
                ancestor = cells[ancestor].parent;
            }
        }
    }
}
