//! Fabric topology synthesis.
//!
//! [`generate`] turns four tier sizes into a device inventory and a directed
//! link list. Structure (IDs, addressing, peering, ports, seeded faults) is a
//! pure function of the [`FabricConfig`] and [`FaultPolicy`]; operational
//! metrics (cpu, memory, uptime, utilization) are jittered from the supplied
//! RNG and are not reproducible unless the caller seeds it.

pub mod addressing;
pub mod devices;
pub mod links;
pub mod queries;
pub mod remediation;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::FabricError;
use crate::models::{DeviceStatus, Fabric, LinkStatus, Tier};

pub use devices::device_id;
pub use links::{spine_tor_allocation, SpineTorSlot};
pub use queries::{devices_by_tier, summarize, topology_links};

fn default_core_count() -> usize {
    4
}

fn default_spine_count() -> usize {
    12
}

fn default_tor_count() -> usize {
    16
}

fn default_endpoint_count() -> usize {
    20
}

/// Tier sizes for one generation run. Absent fields fall back to the
/// 4 / 12 / 16 / 20 defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricConfig {
    #[serde(default = "default_core_count", alias = "coreCount")]
    pub core_count: usize,
    #[serde(default = "default_spine_count", alias = "spineCount")]
    pub spine_count: usize,
    #[serde(default = "default_tor_count", alias = "torCount")]
    pub tor_count: usize,
    #[serde(default = "default_endpoint_count", alias = "endpointCount")]
    pub endpoint_count: usize,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            core_count: default_core_count(),
            spine_count: default_spine_count(),
            tor_count: default_tor_count(),
            endpoint_count: default_endpoint_count(),
        }
    }
}

impl FabricConfig {
    pub fn new(core_count: usize, spine_count: usize, tor_count: usize, endpoint_count: usize) -> Self {
        Self {
            core_count,
            spine_count,
            tor_count,
            endpoint_count,
        }
    }

    /// Number of devices the given tier will contain
    pub fn tier_count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Management => 1,
            Tier::Core => self.core_count,
            Tier::Spine => self.spine_count,
            Tier::Tor => self.tor_count,
            Tier::Endpoint => self.endpoint_count,
        }
    }

    pub fn device_count(&self) -> usize {
        Tier::ALL.iter().map(|t| self.tier_count(*t)).sum()
    }

    /// Reject empty tiers. [`generate`] does not call this; empty tiers there
    /// simply produce no devices and no links for that tier.
    pub fn validate(&self) -> Result<(), FabricError> {
        for tier in [Tier::Core, Tier::Spine, Tier::Tor, Tier::Endpoint] {
            if self.tier_count(tier) == 0 {
                return Err(FabricError::InvalidConfiguration {
                    tier,
                    reason: "must contain at least one device".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Status override for one device, addressed by tier and 1-based index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFault {
    pub tier: Tier,
    pub index: usize,
    pub status: DeviceStatus,
}

/// Status override for the spine -> tor link between two 1-based indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFault {
    pub spine: usize,
    pub tor: usize,
    pub status: LinkStatus,
    pub utilization: u8,
}

/// Faults seeded into a freshly generated fabric so demo scenarios have a
/// concrete target. The default policy degrades `tor-005` and breaks the
/// spine 3 -> tor 5 link at 95% utilization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultPolicy {
    #[serde(default)]
    pub devices: Vec<DeviceFault>,
    #[serde(default)]
    pub links: Vec<LinkFault>,
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self {
            devices: vec![DeviceFault {
                tier: Tier::Tor,
                index: 5,
                status: DeviceStatus::Degraded,
            }],
            links: vec![LinkFault {
                spine: 3,
                tor: 5,
                status: LinkStatus::Error,
                utilization: 95,
            }],
        }
    }
}

impl FaultPolicy {
    /// Policy that seeds nothing
    pub fn none() -> Self {
        Self {
            devices: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Seeded status for a device; the first matching override wins
    pub fn device_status(&self, tier: Tier, index: usize) -> Option<DeviceStatus> {
        self.devices
            .iter()
            .find(|f| f.tier == tier && f.index == index)
            .map(|f| f.status)
    }

    /// Seeded fault for a spine -> tor link; the first matching override wins
    pub fn link_fault(&self, spine: usize, tor: usize) -> Option<&LinkFault> {
        self.links.iter().find(|f| f.spine == spine && f.tor == tor)
    }

    fn warn_out_of_range(&self, config: &FabricConfig) {
        for f in &self.devices {
            if f.index == 0 || f.index > config.tier_count(f.tier) {
                tracing::warn!(
                    "Skipping device fault {} #{}: tier has {} devices",
                    f.tier,
                    f.index,
                    config.tier_count(f.tier)
                );
            }
        }
        for f in &self.links {
            if !links::in_range(config, f.spine, f.tor) {
                tracing::warn!(
                    "Skipping link fault spine {} -> tor {}: fabric has {} spines, {} tors",
                    f.spine,
                    f.tor,
                    config.spine_count,
                    config.tor_count
                );
            }
        }
    }
}

/// Generator bound to a configuration and fault policy
#[derive(Debug, Clone, Default)]
pub struct FabricGenerator {
    config: FabricConfig,
    faults: FaultPolicy,
}

impl FabricGenerator {
    pub fn new(config: FabricConfig) -> Self {
        Self {
            config,
            faults: FaultPolicy::default(),
        }
    }

    pub fn with_faults(mut self, faults: FaultPolicy) -> Self {
        self.faults = faults;
        self
    }

    /// Generate with the thread-local RNG
    pub fn generate(&self) -> Fabric {
        self.generate_with_rng(&mut rand::thread_rng())
    }

    /// Generate drawing all metric jitter from `rng`
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Fabric {
        self.faults.warn_out_of_range(&self.config);

        let devices = devices::synthesize(&self.config, &self.faults, rng);
        let links = links::synthesize(&self.config, &self.faults, rng);

        tracing::info!(
            "Generated fabric: {} devices, {} links (core={}, spine={}, tor={}, endpoint={})",
            devices.len(),
            links.len(),
            self.config.core_count,
            self.config.spine_count,
            self.config.tor_count,
            self.config.endpoint_count
        );

        Fabric { devices, links }
    }
}

/// Generate a fabric with the default fault policy. Never fails; empty tiers
/// produce empty device and link sets for that tier.
pub fn generate(config: &FabricConfig) -> Fabric {
    FabricGenerator::new(*config).generate()
}

/// Like [`generate`], but rejects configurations with an empty tier
pub fn try_generate(config: &FabricConfig) -> Result<Fabric, FabricError> {
    config.validate()?;
    Ok(generate(config))
}
