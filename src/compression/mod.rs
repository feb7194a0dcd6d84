//! Compression engine
//!
//! This module provides the point-selection core:
//!
//! - **types**: Core data structures (Point, Algorithm, CompressionConfig)
//! - **deadband**: Fixed-band exception filter
//! - **swinging_door**: Cone-narrowing trend compression
//! - **session**: Streaming driver shared by both algorithms
//! - **batch**: Whole-sequence and iterator conveniences
//! - **stats**: Counters and ratios
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Point → Session.feed ─┬─ order / finiteness checks
//!                       ├─ max-interval policy
//!                       └─ Compressor.advance → 0..1 archived points
//!
//! Session.finish → flush pending candidate
//! ```
//!
//! # Example
//!
//! ```rust
//! use historian_compression::compression::{Algorithm, CompressionConfig, Point, Session};
//!
//! let config = CompressionConfig::new(0.3).max_interval(3600.0);
//! let mut session = Session::new(Algorithm::Deadband, config)?;
//!
//! let mut archived = Vec::new();
//! for (time, value) in [(0.0, 5.0), (1.0, 5.2), (2.0, 5.05), (3.0, 6.0), (4.0, 6.1)] {
//!     archived.extend(session.feed(Point::new(time, value))?);
//! }
//! archived.extend(session.finish());
//!
//! assert_eq!(archived.len(), 3);
//! # Ok::<(), historian_compression::CompressionError>(())
//! ```

pub mod batch;
pub mod deadband;
pub mod error;
pub mod session;
pub mod stats;
pub mod swinging_door;
pub mod types;

// Re-export commonly used types
pub use batch::{compress, Compressed};
pub use deadband::Deadband;
pub use error::{CompressionError, CompressionResult};
pub use session::{compressor_for, new_session, Compressor, Emitted, Session, SessionState};
pub use stats::CompressionStats;
pub use swinging_door::{DoorState, SwingingDoor};
pub use types::{Algorithm, CompressionConfig, Point};
