//! Swinging door compression
//!
//! Every point seen since the last archived point (the anchor) defines a band
//! of `±deviation` around its value. The set of straight lines through the
//! anchor that pass through all of those bands is a cone of slopes
//! `[min_slope, max_slope]`. Each new point can only narrow the cone, like a
//! pair of doors swinging shut.
//!
//! When the straight line from the anchor to a new point falls outside the
//! cone, that point can no longer close the segment. The previous point (the
//! candidate), which was still inside, is archived and becomes the new anchor,
//! and a fresh cone is opened towards the new point.
//!
//! ```text
//!            max_slope
//!          ╱
//!  anchor •──────── • candidate
//!          ╲
//!            min_slope
//! ```
//!
//! Points exactly on a cone edge count as inside.

use crate::compression::session::Compressor;
use crate::compression::types::Point;

/// Cone state between an anchor and the most recent unarchived point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorState {
    /// Last archived point, origin of the cone
    pub anchor: Point,
    /// Most recent point not yet archived
    pub candidate: Point,
    /// Upper door: steepest slope still within deviation of every point since `anchor`
    pub max_slope: f64,
    /// Lower door: shallowest slope still within deviation of every point since `anchor`
    pub min_slope: f64,
}

/// Slope range `(lower, upper)` from `anchor` through the deviation band around `point`
fn band_slopes(anchor: &Point, point: &Point, deviation: f64) -> (f64, f64) {
    let dt = point.time - anchor.time;
    let lower = ((point.value - deviation) - anchor.value) / dt;
    let upper = ((point.value + deviation) - anchor.value) / dt;
    (lower, upper)
}

impl DoorState {
    /// Open a cone from `anchor` through the band around `candidate`
    ///
    /// No violation test is made on the first edge after an anchor.
    pub fn open(anchor: Point, candidate: Point, deviation: f64) -> Self {
        let (min_slope, max_slope) = band_slopes(&anchor, &candidate, deviation);
        Self {
            anchor,
            candidate,
            max_slope,
            min_slope,
        }
    }

    /// Check whether `next` can still close a segment started at the anchor
    pub fn admits(&self, next: &Point) -> bool {
        let slope = self.anchor.slope_to(next);
        slope >= self.min_slope && slope <= self.max_slope
    }

    /// Feed one point through the cone
    ///
    /// Returns the point to archive, if any, and the state to continue with.
    /// On violation the archived point is the previous candidate, never `next`.
    pub fn advance(self, next: Point, deviation: f64) -> (Option<Point>, DoorState) {
        if !self.admits(&next) {
            let archived = self.candidate;
            return (Some(archived), DoorState::open(archived, next, deviation));
        }

        let (lower, upper) = band_slopes(&self.anchor, &next, deviation);
        let narrowed = DoorState {
            anchor: self.anchor,
            candidate: next,
            max_slope: self.max_slope.min(upper),
            min_slope: self.min_slope.max(lower),
        };
        (None, narrowed)
    }

    /// Width of the remaining cone
    pub fn aperture(&self) -> f64 {
        self.max_slope - self.min_slope
    }
}

#[derive(Debug, Clone, Copy)]
enum Door {
    Idle,
    Anchored(Point),
    Open(DoorState),
}

/// Swinging door compressor
#[derive(Debug, Clone)]
pub struct SwingingDoor {
    deviation: f64,
    door: Door,
}

impl SwingingDoor {
    pub fn new(deviation: f64) -> Self {
        Self {
            deviation,
            door: Door::Idle,
        }
    }

    /// Current cone, once at least one point follows the anchor
    pub fn state(&self) -> Option<&DoorState> {
        match &self.door {
            Door::Open(state) => Some(state),
            _ => None,
        }
    }
}

impl Compressor for SwingingDoor {
    fn name(&self) -> &'static str {
        "swinging_door"
    }

    fn deviation(&self) -> f64 {
        self.deviation
    }

    fn anchor(&mut self, anchor: Point) {
        self.door = Door::Anchored(anchor);
    }

    fn advance(&mut self, next: Point) -> Option<Point> {
        match self.door {
            Door::Idle => {
                self.door = Door::Anchored(next);
                Some(next)
            }
            Door::Anchored(anchor) => {
                self.door = Door::Open(DoorState::open(anchor, next, self.deviation));
                None
            }
            Door::Open(state) => {
                let (archived, state) = state.advance(next, self.deviation);
                self.door = Door::Open(state);
                archived
            }
        }
    }

    fn anchor_point(&self) -> Option<Point> {
        match self.door {
            Door::Idle => None,
            Door::Anchored(anchor) => Some(anchor),
            Door::Open(state) => Some(state.anchor),
        }
    }

    fn candidate(&self) -> Option<Point> {
        self.state().map(|state| state.candidate)
    }
}
