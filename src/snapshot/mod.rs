//! Snapshot and restore for machine history.
//!
//! A snapshot is a versioned, serializable capture of every region's
//! activation record, letting a host persist progress across process
//! restarts. Callbacks and the tree shape are never serialized; restoring
//! writes history (`resumable`) only, and the host re-adopts the captured
//! configuration with `resume` requests so no lifecycle callback is
//! skipped.
//!
//! # Example
//!
//! ```rust
//! use canopy::{composite, leaf, MachineBuilder, Snapshot};
//!
//! canopy::bare_state! {
//!     struct Root;
//!     struct Draft;
//!     struct Review;
//! }
//!
//! let mut machine = MachineBuilder::<()>::new()
//!     .root(composite(Root, vec![leaf(Draft), leaf(Review)]))
//!     .build(())
//!     .unwrap();
//!
//! machine.change_to::<Review>();
//! machine.update();
//!
//! let saved = serde_json::to_string(&machine.snapshot()).unwrap();
//!
//! // A fresh machine starts over in Draft; restoring the snapshot and
//! // resuming walks back into the captured configuration.
//! let mut revived = MachineBuilder::<()>::new()
//!     .root(composite(Root, vec![leaf(Draft), leaf(Review)]))
//!     .build(())
//!     .unwrap();
//! let snapshot: Snapshot = serde_json::from_str(&saved).unwrap();
//! revived.restore(&snapshot).unwrap();
//! revived.resume::<Root>();
//! revived.update();
//! assert!(revived.is_active::<Review>());
//! ```

pub mod error;

pub use error::SnapshotError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version identifier for the snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Captured activation record of one region, in fork order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkSnapshot {
    /// Prong that was active at capture time, if any. Informational.
    pub active: Option<u8>,
    /// Prong a `resume` would select. The only slot written on restore.
    pub resumable: Option<u8>,
}

/// Serializable capture of a machine's per-region history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version.
    pub version: u32,
    /// When the snapshot was captured.
    pub created_at: DateTime<Utc>,
    /// One record per region, in build order.
    pub forks: Vec<ForkSnapshot>,
}
