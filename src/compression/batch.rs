//! Batch and iterator views over a compression session
//!
//! Both are thin wrappers over `Session::feed` / `Session::finish`; nothing
//! here buffers more than the points archived by a single call.

use crate::compression::error::CompressionResult;
use crate::compression::session::{Emitted, Session};
use crate::compression::stats::CompressionStats;
use crate::compression::types::{Algorithm, CompressionConfig, Point};

/// Compress a complete ordered sequence
///
/// Equivalent to feeding every point and then finishing.
///
/// # Example
/// ```
/// use historian_compression::{compress, Algorithm, CompressionConfig, Point};
///
/// let input = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 10.0)]
///     .map(Point::from);
/// let archived = compress(Algorithm::SwingingDoor, CompressionConfig::new(0.5), input).unwrap();
///
/// assert_eq!(archived, [(0.0, 0.0), (3.0, 3.0), (4.0, 10.0)].map(Point::from));
/// ```
pub fn compress<I>(
    algorithm: Algorithm,
    config: CompressionConfig,
    points: I,
) -> CompressionResult<Vec<Point>>
where
    I: IntoIterator<Item = Point>,
{
    Session::new(algorithm, config)?.compress_iter(points).collect()
}

/// Lazy iterator of archived points, created by `Session::compress_iter`
///
/// Yields `Err` once and then stops if the input breaks the session contract.
/// The trailing candidate is flushed when the input is exhausted.
#[derive(Debug)]
pub struct Compressed<I> {
    session: Session,
    points: I,
    pending: Emitted,
    done: bool,
}

impl Session {
    /// Drive this session over `points`, yielding archived points as they are decided
    pub fn compress_iter<I>(self, points: I) -> Compressed<I::IntoIter>
    where
        I: IntoIterator<Item = Point>,
    {
        Compressed {
            session: self,
            points: points.into_iter(),
            pending: Emitted::default(),
            done: false,
        }
    }
}

impl<I> Compressed<I> {
    /// Counters of the underlying session so far
    pub fn stats(&self) -> CompressionStats {
        self.session.stats()
    }

    /// Recover the session, e.g. to inspect its final state
    pub fn into_session(self) -> Session {
        self.session
    }
}

impl<I> Iterator for Compressed<I>
where
    I: Iterator<Item = Point>,
{
    type Item = CompressionResult<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(point) = self.pending.next() {
                return Some(Ok(point));
            }

            if self.done {
                return None;
            }

            match self.points.next() {
                Some(point) => match self.session.feed(point) {
                    Ok(emitted) => self.pending = emitted,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                None => {
                    self.pending = self.session.finish();
                    self.done = true;
                }
            }
        }
    }
}
