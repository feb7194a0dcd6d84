//! Compression statistics

use serde::Serialize;
use std::fmt;

/// Running counters for a compression session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompressionStats {
    /// Points accepted by `feed`
    pub input_points: usize,
    /// Points emitted as archived, including the trailing flush
    pub archived_points: usize,
    /// Archived points forced by the max-interval policy
    pub forced_points: usize,
}

impl CompressionStats {
    /// Compression ratio (input / archived)
    pub fn ratio(&self) -> f64 {
        if self.archived_points > 0 {
            self.input_points as f64 / self.archived_points as f64
        } else {
            0.0
        }
    }

    /// Fraction of input points discarded, in [0, 1]
    pub fn reduction(&self) -> f64 {
        if self.input_points > 0 {
            1.0 - self.archived_points as f64 / self.input_points as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} points ({} forced), ratio: {:.1}x, reduction: {:.1}%",
            self.input_points,
            self.archived_points,
            self.forced_points,
            self.ratio(),
            self.reduction() * 100.0
        )
    }
}
