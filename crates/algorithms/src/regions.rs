//! Connected-region extraction from change masks
//!
//! Labels 8-connected components of changed cells by BFS flood fill.
//! Components are discovered in scan order (top-to-bottom, left-to-right),
//! so the output ordering is deterministic. Components smaller than the
//! minimum area are dropped as thresholding artifacts.

use crate::segment::UNCHANGED;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

/// 8-connected neighbor offsets
const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Axis-aligned bounding box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge (column of the leftmost cell)
    pub x: u32,
    /// Top edge (row of the topmost cell)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// One connected cluster of changed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Number of changed cells in the cluster
    pub area: usize,
    /// Axis-aligned bounding box of the cluster
    pub bbox: BoundingBox,
}

/// Parameters for region extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionParams {
    /// Clusters below this pixel count are discarded as noise
    pub min_area: usize,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self { min_area: 100 }
    }
}

/// Region extraction algorithm
#[derive(Debug, Clone, Default)]
pub struct ExtractRegions;

impl Algorithm for ExtractRegions {
    type Input = Raster<u8>;
    type Output = Vec<Region>;
    type Params = RegionParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ExtractRegions"
    }

    fn description(&self) -> &'static str {
        "Label 8-connected changed regions and drop those below the noise floor"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        extract_regions(&input, &params)
    }
}

/// Find 8-connected changed regions, filtered by minimum area.
///
/// Regions are returned in discovery order of their topmost-leftmost cell.
pub fn extract_regions(mask: &Raster<u8>, params: &RegionParams) -> Result<Vec<Region>> {
    let (rows, cols) = mask.shape();
    if rows == 0 || cols == 0 {
        return Err(Error::InvariantViolation(
            "cannot extract regions from an empty mask".to_string(),
        ));
    }

    let mut visited = Array2::<bool>::from_elem((rows, cols), false);
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut regions = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            if visited[(row, col)] {
                continue;
            }
            let v = unsafe { mask.get_unchecked(row, col) };
            if v == UNCHANGED {
                visited[(row, col)] = true;
                continue;
            }

            // Flood-fill one component from its first scan-order cell
            visited[(row, col)] = true;
            queue.push_back((row, col));

            let mut area = 0usize;
            let (mut min_r, mut max_r) = (row, row);
            let (mut min_c, mut max_c) = (col, col);

            while let Some((r, c)) = queue.pop_front() {
                area += 1;
                min_r = min_r.min(r);
                max_r = max_r.max(r);
                min_c = min_c.min(c);
                max_c = max_c.max(c);

                for &(dr, dc) in &NEIGHBORS_8 {
                    let nr = r as isize + dr;
                    let nc = c as isize + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let (nr, nc) = (nr as usize, nc as usize);
                    if visited[(nr, nc)] {
                        continue;
                    }
                    visited[(nr, nc)] = true;
                    if unsafe { mask.get_unchecked(nr, nc) } != UNCHANGED {
                        queue.push_back((nr, nc));
                    }
                }
            }

            if area >= params.min_area {
                regions.push(Region {
                    area,
                    bbox: BoundingBox {
                        x: min_c as u32,
                        y: min_r as u32,
                        width: (max_c - min_c + 1) as u32,
                        height: (max_r - min_r + 1) as u32,
                    },
                });
            }
        }
    }

    Ok(regions)
}
