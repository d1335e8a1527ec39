//! `nd-core`: foundational types for the `netdesign` logistics network
//! planner.
//!
//! This crate is a dependency of every other `nd-*` crate.  It has no `nd-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `FacilityId`, `DemandId`, `ProductId`                 |
//! | [`geo`]         | `GeoPoint`, haversine distance in miles               |
//! | [`facility`]    | `Facility`, `FacilityKind`, `KindSet`                 |
//! | [`demand`]      | `Demand`                                              |
//! | [`transport`]   | `TransportMode`, `TransportCostTable`                 |
//! | [`config`]      | `ModelConfig`, `ServiceThresholds`                    |
//! | [`snapshot`]    | `NetworkSnapshot`, `SnapshotBuilder`                  |
//! | [`error`]       | `NdError`, `NdResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `nd-io` and JSON-loaded configs.               |

pub mod config;
pub mod demand;
pub mod error;
pub mod facility;
pub mod geo;
pub mod ids;
pub mod snapshot;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ModelConfig, ServiceThresholds};
pub use demand::Demand;
pub use error::{NdError, NdResult};
pub use facility::{Facility, FacilityKind, KindSet};
pub use geo::GeoPoint;
pub use ids::{DemandId, FacilityId, ProductId};
pub use snapshot::{NetworkSnapshot, SnapshotBuilder};
pub use transport::{TransportCost, TransportCostTable, TransportMode};
