//! Structuring element definitions for morphological operations
//!
//! A structuring element defines the neighborhood shape used in erosion,
//! dilation, and the derived open/close transforms.

use serde::{Deserialize, Serialize};
use terradiff_core::{Error, Result};

/// Shape of a structuring element for morphological operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuringElement {
    /// Square element of given radius (side = 2*radius + 1)
    Square(usize),
    /// Cross (plus-shaped) element of given radius
    Cross(usize),
    /// Disk element of given radius
    Disk(usize),
}

impl Default for StructuringElement {
    fn default() -> Self {
        StructuringElement::Square(1)
    }
}

impl StructuringElement {
    /// Validate the structuring element, returning an error for invalid configurations
    pub fn validate(&self) -> Result<()> {
        let r = self.radius();
        if r == 0 {
            return Err(Error::InvalidParameter {
                name: "radius",
                value: "0".to_string(),
                reason: "structuring element radius must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get the radius of the structuring element
    pub fn radius(&self) -> usize {
        match self {
            StructuringElement::Square(r)
            | StructuringElement::Cross(r)
            | StructuringElement::Disk(r) => *r,
        }
    }

    /// Compute (dr, dc) offsets relative to center for all active cells
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        match self {
            StructuringElement::Square(r) => {
                let r = *r as isize;
                let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
                for dr in -r..=r {
                    for dc in -r..=r {
                        offsets.push((dr, dc));
                    }
                }
                offsets
            }
            StructuringElement::Disk(r) => {
                let r_sq = (r * r) as isize;
                let r = *r as isize;
                let mut offsets = Vec::new();
                for dr in -r..=r {
                    for dc in -r..=r {
                        if dr * dr + dc * dc <= r_sq {
                            offsets.push((dr, dc));
                        }
                    }
                }
                offsets
            }
            StructuringElement::Cross(r) => {
                let r = *r as isize;
                let mut offsets = Vec::new();
                for d in -r..=r {
                    offsets.push((d, 0)); // vertical arm
                    if d != 0 {
                        offsets.push((0, d)); // horizontal arm (skip center duplicate)
                    }
                }
                offsets
            }
        }
    }
}
