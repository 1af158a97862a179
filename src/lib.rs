//! Deterministic multi-tier data-center fabric synthesizer.
//!
//! ```
//! use fabric_synth::fabric::{generate, devices_by_tier, FabricConfig};
//! use fabric_synth::models::Tier;
//!
//! let fabric = generate(&FabricConfig::default());
//! assert_eq!(fabric.devices.len(), 53);
//! assert_eq!(devices_by_tier(&fabric.devices, Tier::Spine).len(), 12);
//! ```

pub mod config;
pub mod error;
pub mod fabric;
pub mod metrics;
pub mod models;
pub mod snapshot;
pub mod utils;

pub use error::FabricError;
pub use fabric::{generate, try_generate, FabricConfig, FabricGenerator, FaultPolicy};
pub use models::{Device, Fabric, TopologyLink};
