//! Directory-service boundary for homelink.
//!
//! Everything the reconciliation engine needs to know about the remote
//! device directory lives here: the [`RemoteDevice`] descriptor and its
//! tag types, the [`DeviceDirectory`] / [`Location`] traits the engine
//! consumes, and the [`RefreshTokenRotation`] event stream. Transport and
//! authentication stay behind the trait implementations.

pub mod device;
pub mod error;
pub mod location;
pub mod rotation;
pub mod snapshot;

pub use device::{CategoryId, DeviceKind, DeviceStatus, DeviceType, RemoteDevice, SyntheticKind};
pub use error::Error;
pub use location::{DeviceDirectory, Location};
pub use rotation::RefreshTokenRotation;
pub use snapshot::{DirectorySnapshot, LocationSnapshot, SnapshotDirectory};
