//! Core data types for the compression engine
//!
//! This module defines the value types shared by both compressors:
//! - `Point`: A single timestamped reading
//! - `Algorithm`: Which point-selection method a session runs
//! - `CompressionConfig`: Deviation and max-interval parameters

use crate::compression::error::{CompressionError, CompressionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single timestamped sensor reading
///
/// Archived points are the same type: the output of a session is always a
/// subsequence of its input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// Position on the time axis, in caller-chosen units (strictly increasing within a stream)
    pub time: f64,
    /// The measured value
    pub value: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }

    /// Check that both coordinates are usable for slope arithmetic
    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.value.is_finite()
    }

    /// Slope of the straight line from `self` to `other`
    pub(crate) fn slope_to(&self, other: &Point) -> f64 {
        (other.value - self.value) / (other.time - self.time)
    }
}

impl From<(f64, f64)> for Point {
    fn from((time, value): (f64, f64)) -> Self {
        Self::new(time, value)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.time, self.value)
    }
}

/// Point-selection method run by a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Keep a point when it leaves a fixed band around the last archived value
    Deadband,
    /// Keep a point when no line from the last archived point fits everything since
    #[default]
    SwingingDoor,
}

impl Algorithm {
    /// Get all algorithms for iteration
    pub fn all() -> &'static [Algorithm] {
        &[Algorithm::Deadband, Algorithm::SwingingDoor]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Deadband => write!(f, "deadband"),
            Algorithm::SwingingDoor => write!(f, "swinging_door"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deadband" => Ok(Algorithm::Deadband),
            "swinging_door" | "swinging-door" | "swingingdoor" | "sdt" => {
                Ok(Algorithm::SwingingDoor)
            }
            other => Err(CompressionError::Config(format!(
                "unknown algorithm '{}', expected deadband or swinging_door",
                other
            ))),
        }
    }
}

/// Parameters shared by both compressors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CompressionConfig {
    /// Maximum allowed vertical error (must be >= 0)
    pub deviation: f64,
    /// Longest allowed gap between archived points, in the same units as `Point::time`
    #[serde(default)]
    pub max_interval: Option<f64>,
}

impl CompressionConfig {
    /// Create a config with the given deviation and no max interval
    pub fn new(deviation: f64) -> Self {
        Self {
            deviation,
            max_interval: None,
        }
    }

    /// Builder: bound the gap between archived points
    pub fn max_interval(mut self, interval: f64) -> Self {
        self.max_interval = Some(interval);
        self
    }

    /// Reject parameters that would break the error bound
    ///
    /// `+inf` is a legal deviation: every interior point is then discarded.
    pub fn validate(&self) -> CompressionResult<()> {
        if self.deviation.is_nan() || self.deviation < 0.0 {
            return Err(CompressionError::Config(format!(
                "deviation must be >= 0, got {}",
                self.deviation
            )));
        }

        if let Some(interval) = self.max_interval {
            if interval.is_nan() || interval <= 0.0 {
                return Err(CompressionError::Config(format!(
                    "max_interval must be > 0, got {}",
                    interval
                )));
            }
        }

        Ok(())
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_tuple() {
        let point: Point = (2.0, 7.5).into();
        assert_eq!(point, Point::new(2.0, 7.5));
        assert!(point.is_finite());
        assert!(!Point::new(f64::NAN, 1.0).is_finite());
        assert!(!Point::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_point_slope() {
        let a = Point::new(0.0, 1.0);
        let b = Point::new(4.0, 3.0);
        assert_eq!(a.slope_to(&b), 0.5);
    }

    #[test]
    fn test_point_serialization() {
        let point = Point::new(10.0, 3.25);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"time":10.0,"value":3.25}"#);

        let restored: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(point, restored);
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("deadband".parse::<Algorithm>().unwrap(), Algorithm::Deadband);
        assert_eq!(
            "Swinging-Door".parse::<Algorithm>().unwrap(),
            Algorithm::SwingingDoor
        );
        assert_eq!("sdt".parse::<Algorithm>().unwrap(), Algorithm::SwingingDoor);
        assert!(matches!(
            "boxcar".parse::<Algorithm>(),
            Err(CompressionError::Config(_))
        ));

        for algorithm in Algorithm::all() {
            let round: Algorithm = algorithm.to_string().parse().unwrap();
            assert_eq!(*algorithm, round);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(CompressionConfig::new(0.0).validate().is_ok());
        assert!(CompressionConfig::new(0.5).max_interval(60.0).validate().is_ok());
        assert!(CompressionConfig::new(f64::INFINITY).validate().is_ok());

        assert!(CompressionConfig::new(-1.0).validate().is_err());
        assert!(CompressionConfig::new(f64::NAN).validate().is_err());
        assert!(CompressionConfig::new(1.0).max_interval(0.0).validate().is_err());
        assert!(CompressionConfig::new(1.0).max_interval(-5.0).validate().is_err());
        assert!(CompressionConfig::new(1.0)
            .max_interval(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: CompressionConfig = toml::from_str("deviation = 0.25").unwrap();
        assert_eq!(config.deviation, 0.25);
        assert_eq!(config.max_interval, None);
    }
}
