/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the dual-tree interaction driver with the Dehnen acceptance criterion.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Dual-tree interaction driver.
//!
//! A single serial walk from the (root, root) pair classifies every cell pair
//! as near (direct particle sums) or far (multipole-admissible) and records
//! the sources per target cell. The evaluation passes then consume the lists
//! in deterministic order, so field values are reproducible bit-for-bit
//! regardless of thread count.

use crate::geometry;
use crate::octree::Cell;

/// Near (P2P) and far (M2L or M2P, depending on the acceleration mode)
/// source lists, indexed by target cell. Near lists are populated only at
/// leaf targets; far lists can attach to any cell and cover its whole
/// subtree.
#[derive(Debug)]
pub(crate) struct InteractionLists {
    pub(crate) near: Vec<Vec<usize>>,
    pub(crate) far: Vec<Vec<usize>>,
}

/// Runs the dual-tree walk for the whole tree.
pub(crate) fn build_interaction_lists(cells: &[Cell], theta: f64) -> InteractionLists {
    let mut lists = InteractionLists {
        near: vec![Vec::new(); cells.len()],
        far: vec![Vec::new(); cells.len()],
    };
    split_pair(cells, theta * theta, 0, 0, &mut lists);
    lists
}

/// Classifies one (target, source) pair.
///
/// Leaf pairs interact directly. Otherwise the pair is admissible when
/// `theta * |c_t - c_s| > rmax_t + rmax_s` (compared squared); failing that,
/// the larger cell (by half-width, ties open the target) is opened and its
/// children recurse against the other side. The self pair is never
/// admissible, so it descends until the leaf pairs handle it with
/// self-exclusion.
fn split_pair(
    cells: &[Cell],
    theta_squared: f64,
    target: usize,
    source: usize,
    lists: &mut InteractionLists,
) {
    let t = &cells[target];
    let s = &cells[source];

    if t.is_leaf() && s.is_leaf() {
        lists.near[target].push(source);
        return;
    }

    let d2 = geometry::distance_squared(t.centre, s.centre);
    let rsum = t.rmax + s.rmax;
    if theta_squared * d2 > rsum * rsum {
        lists.far[target].push(source);
        return;
    }

    if s.is_leaf() || (!t.is_leaf() && t.radius >= s.radius) {
        for child in t.children() {
            split_pair(cells, theta_squared, child, source, lists);
        }
    } else {
        for child in s.children() {
            split_pair(cells, theta_squared, target, child, lists);
        }
    }
}
