//! Compression session (streaming driver)
//!
//! A `Session` feeds points one at a time to a `Compressor` and applies the
//! policies shared by every algorithm:
//!
//! - the first point of a stream is always archived
//! - timestamps must strictly increase
//! - the max-interval policy forces out the pending candidate when the gap
//!   since the anchor grows too large
//! - `finish()` flushes the pending candidate so the last point is archived
//!
//! ```text
//!   Empty ──feed──▶ Anchored ──feed──▶ Anchored
//!     │                 │
//!     └────finish───────┴──finish / error──▶ Finished
//! ```
//!
//! Each call does O(1) work and archived points are never retracted, so
//! output produced before the stream ends is stable.

use crate::compression::deadband::Deadband;
use crate::compression::error::{CompressionError, CompressionResult};
use crate::compression::stats::CompressionStats;
use crate::compression::swinging_door::SwingingDoor;
use crate::compression::types::{Algorithm, CompressionConfig, Point};
use std::fmt;

/// Point-selection procedure driven by a `Session`
///
/// Implementations keep whatever look-back they need between the anchor (the
/// last archived point) and the newest point. Ordering, validation and the
/// max-interval policy are the session's job.
pub trait Compressor: fmt::Debug + Send {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Deviation the compressor was built with
    fn deviation(&self) -> f64;

    /// Establish `anchor` as the last archived point, discarding all look-back
    fn anchor(&mut self, anchor: Point);

    /// Consider `next`, returning a point that must be archived now
    ///
    /// The returned point is either `next` itself or an earlier candidate.
    /// With no anchor yet, `next` becomes the anchor and is returned.
    fn advance(&mut self, next: Point) -> Option<Point>;

    /// The last archived point, if any
    fn anchor_point(&self) -> Option<Point>;

    /// The most recent point not yet archived, if any
    fn candidate(&self) -> Option<Point>;
}

/// Build the compressor for `algorithm`
pub fn compressor_for(algorithm: Algorithm, deviation: f64) -> Box<dyn Compressor> {
    match algorithm {
        Algorithm::Deadband => Box::new(Deadband::new(deviation)),
        Algorithm::SwingingDoor => Box::new(SwingingDoor::new(deviation)),
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No point fed yet
    Empty,
    /// At least one point fed; an anchor exists
    Anchored,
    /// `finish()` was called or a usage error occurred; no more input accepted
    Finished,
}

/// Points archived by a single `feed` or `finish` call, in time order
///
/// Holds at most one point, except on a deadband session where a max-interval
/// flush and a deadband exception happen on the same call: the flushed
/// candidate is then followed by the new point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emitted {
    slots: [Option<Point>; 2],
    cursor: usize,
}

impl Emitted {
    fn one(point: Point) -> Self {
        Self {
            slots: [Some(point), None],
            cursor: 0,
        }
    }

    fn push(&mut self, point: Point) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(point);
        }
    }

    /// Number of points not yet iterated
    pub fn len(&self) -> usize {
        self.slots[self.cursor.min(2)..]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Peek at the next point without consuming it
    pub fn first(&self) -> Option<Point> {
        self.slots[self.cursor.min(2)..].iter().flatten().next().copied()
    }
}

impl Iterator for Emitted {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        while self.cursor < self.slots.len() {
            let slot = self.slots[self.cursor].take();
            self.cursor += 1;
            if slot.is_some() {
                return slot;
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for Emitted {}

/// Streaming compression over one ordered point sequence
///
/// A session exclusively owns its compressor state. Independent streams (one
/// per sensor tag, say) use independent sessions.
#[derive(Debug)]
pub struct Session {
    compressor: Box<dyn Compressor>,
    config: CompressionConfig,
    state: SessionState,
    last_time: f64,
    stats: CompressionStats,
}

/// Create a session running `algorithm` with `config`
pub fn new_session(algorithm: Algorithm, config: CompressionConfig) -> CompressionResult<Session> {
    Session::new(algorithm, config)
}

impl Session {
    /// Create a session, failing fast on an invalid config
    pub fn new(algorithm: Algorithm, config: CompressionConfig) -> CompressionResult<Self> {
        config.validate()?;
        Ok(Self::build(compressor_for(algorithm, config.deviation), config))
    }

    /// Create a session around a caller-supplied compressor
    ///
    /// The compressor must not have seen any points yet, and its deviation
    /// must equal `config.deviation`.
    pub fn with_compressor(
        compressor: Box<dyn Compressor>,
        config: CompressionConfig,
    ) -> CompressionResult<Self> {
        config.validate()?;
        if compressor.deviation() != config.deviation {
            return Err(CompressionError::Config(format!(
                "{} compressor deviation {} does not match configured deviation {}",
                compressor.name(),
                compressor.deviation(),
                config.deviation
            )));
        }
        Ok(Self::build(compressor, config))
    }

    fn build(compressor: Box<dyn Compressor>, config: CompressionConfig) -> Self {
        tracing::debug!(
            compressor = compressor.name(),
            deviation = config.deviation,
            max_interval = ?config.max_interval,
            "Compression session created"
        );

        Self {
            compressor,
            config,
            state: SessionState::Empty,
            last_time: f64::NEG_INFINITY,
            stats: CompressionStats::default(),
        }
    }

    /// Feed the next point of the stream
    ///
    /// # Errors
    /// - `State` if the session is finished
    /// - `InvalidPoint` if a coordinate is NaN or infinite
    /// - `Order` if `point.time` does not strictly exceed the previous time
    ///
    /// `InvalidPoint` and `Order` leave the session finished: nothing more is
    /// processed and `finish()` flushes nothing.
    pub fn feed(&mut self, point: Point) -> CompressionResult<Emitted> {
        tracing::trace!(time = point.time, value = point.value, "feed");

        if self.state == SessionState::Finished {
            return Err(CompressionError::State("feed called after finish"));
        }

        if !point.is_finite() {
            self.state = SessionState::Finished;
            tracing::warn!("Rejected non-finite point {}, session stopped", point);
            return Err(CompressionError::InvalidPoint {
                time: point.time,
                value: point.value,
            });
        }

        if point.time <= self.last_time {
            self.state = SessionState::Finished;
            tracing::warn!(
                "Rejected point at time {} after time {}, session stopped",
                point.time,
                self.last_time
            );
            return Err(CompressionError::Order {
                previous: self.last_time,
                time: point.time,
            });
        }

        self.last_time = point.time;
        self.stats.input_points += 1;

        if self.state == SessionState::Empty {
            self.state = SessionState::Anchored;
            self.compressor.anchor(point);
            self.stats.archived_points += 1;
            tracing::debug!(compressor = self.compressor.name(), "Archived first point {}", point);
            return Ok(Emitted::one(point));
        }

        let mut emitted = Emitted::default();

        if let Some(forced) = self.expire_candidate(&point) {
            self.stats.forced_points += 1;
            emitted.push(forced);
        }

        if let Some(archived) = self.compressor.advance(point) {
            tracing::debug!(compressor = self.compressor.name(), "Archived {}", archived);
            emitted.push(archived);
        }

        self.stats.archived_points += emitted.len();
        Ok(emitted)
    }

    /// Apply the max-interval policy ahead of `next`
    ///
    /// When the gap from the anchor to `next` exceeds the limit, the pending
    /// candidate is archived and becomes the anchor `next` is judged against.
    fn expire_candidate(&mut self, next: &Point) -> Option<Point> {
        let limit = self.config.max_interval?;
        let anchor = self.compressor.anchor_point()?;
        let candidate = self.compressor.candidate()?;

        if next.time - anchor.time <= limit {
            return None;
        }

        tracing::debug!(
            compressor = self.compressor.name(),
            "Archived {} (max interval {} exceeded)",
            candidate,
            limit
        );
        self.compressor.anchor(candidate);
        Some(candidate)
    }

    /// End the stream, flushing the pending candidate
    ///
    /// Calling `finish` again, or after a feed error, returns nothing.
    pub fn finish(&mut self) -> Emitted {
        let emitted = match self.state {
            SessionState::Anchored => self
                .compressor
                .candidate()
                .map(Emitted::one)
                .unwrap_or_default(),
            SessionState::Empty | SessionState::Finished => Emitted::default(),
        };

        if let Some(point) = emitted.first() {
            tracing::debug!(compressor = self.compressor.name(), "Flushed last point {}", point);
        }

        self.state = SessionState::Finished;
        self.stats.archived_points += emitted.len();
        emitted
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Name of the active compressor
    pub fn algorithm_name(&self) -> &'static str {
        self.compressor.name()
    }

    pub fn stats(&self) -> CompressionStats {
        self.stats
    }
}
