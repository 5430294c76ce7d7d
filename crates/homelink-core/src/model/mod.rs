// ── Engine domain model ──
//
// Identity types, accessory records, and behavior variants shared by
// every stage of the reconciliation pipeline.

pub mod accessory;
pub mod identity;

// ── Re-exports ──────────────────────────────────────────────────────

pub use accessory::{AccessoryVariant, HostCategory, Placement, PlatformAccessory};
pub use identity::{AccessoryId, MacAddress, Role};
