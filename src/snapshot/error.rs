//! Restore errors for machine snapshots.

use thiserror::Error;

/// Errors that can occur when restoring a snapshot into a machine.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot format version {found} does not match supported version {expected}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Snapshot captures {found} regions but this machine has {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Snapshot prong {prong} is out of range for region {fork}")]
    InvalidProng { fork: usize, prong: u8 },
}
