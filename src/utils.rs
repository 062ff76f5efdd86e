/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides utility routines for bounding box computation and flat-slice conversion.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;

/// Computes the axis aligned bounding box (AABB) extents of a matrix of points.
///
/// Returns a flat vector containing the minimum and maximum values along each
/// column (dimension) of the input matrix, arranged as
/// `[min_0, min_1, ..., min_n, max_0, max_1, ..., max_n]`.
pub(crate) fn get_pointarray_extents(points: &Mat<f64>) -> Vec<f64> {
    let ncols = points.ncols();
    let mut extents = vec![0.0; 2 * ncols];

    for col in 0..ncols {
        extents[col] = points[(0, col)];
        extents[col + ncols] = points[(0, col)];
    }

    for row in 0..points.nrows() {
        for col in 0..ncols {
            let value = points[(row, col)];
            if value < extents[col] {
                extents[col] = value;
            }
            if value > extents[col + ncols] {
                extents[col + ncols] = value;
            }
        }
    }

    extents
}

/// Builds an (N, 3) matrix from a flat x,y,z-interleaved slice of length 3N.
pub(crate) fn mat_from_interleaved(values: &[f64]) -> Mat<f64> {
    Mat::from_fn(values.len() / 3, 3, |i, j| values[3 * i + j])
}

/// Row `i` of an (N, 3) matrix as a coordinate triple.
#[inline(always)]
pub(crate) fn row3(points: &Mat<f64>, i: usize) -> [f64; 3] {
    [points[(i, 0)], points[(i, 1)], points[(i, 2)]]
}
