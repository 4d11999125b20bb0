use std::fmt;

use serde::{Deserialize, Serialize};

/// How the neighbor stencil wraps at the edges of the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeighborWrap {
    /// Every axis wraps with its own cell count.
    #[default]
    PerAxis,
    /// The y-axis stencil wraps with the x-axis cell count. Reproduces runs
    /// made with the historical stencil.
    Legacy,
}

impl fmt::Display for NeighborWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighborWrap::PerAxis => write!(f, "per-axis"),
            NeighborWrap::Legacy => write!(f, "legacy"),
        }
    }
}

/// Settings of the reactive-step engine.
///
/// # Examples
///
/// ```
/// use rsmd::{EngineConfig, NeighborWrap};
///
/// let config = EngineConfig {
///     cycles: 50,
///     frequency: 0.5,
///     cell_counts: [3, 3, 3],
///     ..Default::default()
/// };
/// assert_eq!(config.neighbor_wrap, NeighborWrap::PerAxis);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Last cycle to run (cycles are numbered from 1).
    pub cycles: usize,

    /// Scalar multiplied with a candidate's rate before the acceptance draw.
    pub frequency: f64,

    /// Number of cells along x, y and z. Each must be at least 1.
    pub cell_counts: [usize; 3],

    /// Wrapping rule of the neighbor stencil.
    pub neighbor_wrap: NeighborWrap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycles: 1,
            frequency: 1.0,
            cell_counts: [1, 1, 1],
            neighbor_wrap: NeighborWrap::default(),
        }
    }
}
