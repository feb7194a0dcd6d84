//! Deadband (exception) compression
//!
//! A point is archived only when its value leaves a fixed band of
//! `±deviation` around the last archived value. With `deviation = 0` this
//! degenerates to change detection.

use crate::compression::session::Compressor;
use crate::compression::types::Point;

/// Decide whether `next` must be archived given the last archived point
pub fn decide(last_archived: &Point, next: &Point, deviation: f64) -> bool {
    (next.value - last_archived.value).abs() > deviation
}

/// Deadband compressor
///
/// The only memory is the last archived point and the most recent discarded
/// point, which is kept so the session can flush it at end of stream.
#[derive(Debug, Clone)]
pub struct Deadband {
    deviation: f64,
    anchor: Option<Point>,
    candidate: Option<Point>,
}

impl Deadband {
    pub fn new(deviation: f64) -> Self {
        Self {
            deviation,
            anchor: None,
            candidate: None,
        }
    }
}

impl Compressor for Deadband {
    fn name(&self) -> &'static str {
        "deadband"
    }

    fn deviation(&self) -> f64 {
        self.deviation
    }

    fn anchor(&mut self, anchor: Point) {
        self.anchor = Some(anchor);
        self.candidate = None;
    }

    fn advance(&mut self, next: Point) -> Option<Point> {
        let Some(anchor) = self.anchor else {
            self.anchor(next);
            return Some(next);
        };

        if decide(&anchor, &next, self.deviation) {
            self.anchor(next);
            Some(next)
        } else {
            self.candidate = Some(next);
            None
        }
    }

    fn anchor_point(&self) -> Option<Point> {
        self.anchor
    }

    fn candidate(&self) -> Option<Point> {
        self.candidate
    }
}
