/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides geometric primitives for the adaptive octree: octants, child centres, distances.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::utils;
use faer::Mat;

/// Octant of `point` relative to `centre`. Bit `a` is set when the
/// coordinate along axis `a` is greater than or equal to the centre, so
/// points on a splitting plane always land in the positive octant.
#[inline(always)]
pub(crate) fn octant(point: [f64; 3], centre: [f64; 3]) -> usize {
    ((point[0] >= centre[0]) as usize)
        | (((point[1] >= centre[1]) as usize) << 1)
        | (((point[2] >= centre[2]) as usize) << 2)
}

/// Centre of the child cube in `octant` of a cell at `centre` with
/// half-width `radius`.
#[inline(always)]
pub(crate) fn child_centre(centre: [f64; 3], radius: f64, octant: usize) -> [f64; 3] {
    let half = 0.5 * radius;
    [
        centre[0] + if octant & 1 != 0 { half } else { -half },
        centre[1] + if octant & 2 != 0 { half } else { -half },
        centre[2] + if octant & 4 != 0 { half } else { -half },
    ]
}

/// Componentwise `a - b`.
#[inline(always)]
pub(crate) fn displacement(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline(always)]
pub(crate) fn distance_squared(a: [f64; 3], b: [f64; 3]) -> f64 {
    let d = displacement(a, b);
    d[0] * d[0] + d[1] * d[1] + d[2] * d[2]
}

#[inline(always)]
pub(crate) fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Cube containment under the infinity norm (boundaries included).
#[inline(always)]
pub(crate) fn contains(centre: [f64; 3], radius: f64, point: [f64; 3]) -> bool {
    (point[0] - centre[0]).abs() <= radius
        && (point[1] - centre[1]).abs() <= radius
        && (point[2] - centre[2]).abs() <= radius
}

/// Axis-aligned bounding cube of a point matrix, grown by a small relative
/// margin so boundary points sit strictly inside. Degenerate clouds (a single
/// point, or all points coincident) fall back to a unit half-width.
pub(crate) fn bounding_cube(points: &Mat<f64>) -> ([f64; 3], f64) {
    let extents = utils::get_pointarray_extents(points);
    let centre = [
        0.5 * (extents[0] + extents[3]),
        0.5 * (extents[1] + extents[4]),
        0.5 * (extents[2] + extents[5]),
    ];
    let mut radius: f64 = 0.0;
    for axis in 0..3 {
        radius = radius.max(0.5 * (extents[axis + 3] - extents[axis]));
    }
    if radius > 0.0 {
        (centre, radius * (1.0 + 1e-6))
    } else {
        (centre, 1.0)
    }
}
