//! Accessory reconciliation engine between `homelink-api` and a host registry.
//!
//! A pass flows leaf to root through these stages:
//!
//! - **[`injector`]** appends synthetic devices (panic buttons, location
//!   mode) to each location's listing.
//! - **[`classify`]** maps each device to an [`AccessoryVariant`], or `None`.
//! - **[`IdentityResolver`]** derives the stable [`AccessoryId`] used as the
//!   reconciliation key.
//! - **[`visibility`]** applies hide-lists, type filters, and light-group policy.
//! - **[`reconcile()`]** diffs the live set against the [`AccessoryCache`] and
//!   returns a [`ReconcilePlan`]; it never mutates anything.
//! - **[`Platform`]** drives the whole pass and applies the plan through an
//!   [`AccessoryHost`] in batched calls.
//!
//! The [`RotationListener`] persists refresh-credential rotations through a
//! [`CredentialStore`], independent of passes.

pub mod classify;
pub mod config;
pub mod error;
pub mod host;
pub mod injector;
pub mod log;
pub mod model;
pub mod platform;
pub mod reconcile;
pub mod resolver;
pub mod rotation;
pub mod visibility;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::classify;
pub use config::PlatformConfig;
pub use error::CoreError;
pub use host::AccessoryHost;
pub use log::{PlatformLog, SilentLog, TracingLog};
pub use platform::{LocationSummary, PassReport, Platform};
pub use reconcile::{
    AccessoryBinding, AccessoryCache, ClassifiedDevice, HiddenDevice, LocationScan, ReconcilePlan,
    reconcile,
};
pub use resolver::IdentityResolver;
pub use rotation::{CredentialStore, RotationListener, RotationStats};
pub use visibility::{HiddenReason, Visibility};

pub use model::{
    AccessoryId, AccessoryVariant, HostCategory, MacAddress, Placement, PlatformAccessory, Role,
};
