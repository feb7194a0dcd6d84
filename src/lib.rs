//! # Historian Compression
//!
//! Deadband and swinging door compression of historian time-series data.
//!
//! A stream of timestamped readings is reduced to a subsequence of archived
//! points such that every discarded point can be reconstructed, within a fixed
//! deviation, by linear interpolation between its archived neighbours.
//!
//! ## Features
//!
//! - **Streaming**: one point in, zero or one archived point out, O(1) per call
//! - **Stable output**: archived points are never retracted
//! - **Two algorithms, one driver**: deadband and swinging door share a
//!   `Compressor` trait behind a single `Session`
//! - **Max interval**: bounds the gap between archived points on flat signals
//!
//! ## Modules
//!
//! - [`compression`]: Compression engine (point model, algorithms, session)
//! - [`config`]: TOML configuration with environment overrides
//! - [`io`]: CSV and JSON point readers and writers
//!
//! ## Quick Start
//!
//! ```rust
//! use historian_compression::{Algorithm, CompressionConfig, Point, Session};
//!
//! let mut session = Session::new(Algorithm::SwingingDoor, CompressionConfig::new(0.5))?;
//!
//! let mut archived = Vec::new();
//! for (time, value) in [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 10.0)] {
//!     archived.extend(session.feed(Point::new(time, value))?);
//! }
//! archived.extend(session.finish());
//!
//! assert_eq!(archived, [(0.0, 0.0), (3.0, 3.0), (4.0, 10.0)].map(Point::from));
//! println!("{}", session.stats());
//! # Ok::<(), historian_compression::CompressionError>(())
//! ```

pub mod compression;
pub mod config;
pub mod io;


// Re-export top-level types for convenience
pub use compression::{
    compress, new_session, Algorithm, CompressionConfig, CompressionError, CompressionResult,
    CompressionStats, Compressor, Deadband, DoorState, Emitted, Point, Session, SessionState,
    SwingingDoor,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use io::{CsvPointReader, ImportResult, IoError, TimeKind};
