//! Structural properties of generated fabrics over the supported tier ranges.

use std::collections::HashSet;

use fabric_synth::fabric::{
    devices_by_tier, spine_tor_allocation, FabricConfig, FabricGenerator, FaultPolicy,
};
use fabric_synth::models::{DeviceStatus, LinkStatus, Tier};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Spine-tor link count derived per plane rather than by walking every slot
fn expected_spine_tor_links(spines: usize, tors: usize) -> usize {
    let planes = spines.min(4);
    if planes == 0 || tors == 0 {
        return 0;
    }
    let block = tors.div_ceil(planes);
    (0..planes)
        .map(|p| {
            let spines_in_plane = (spines - p).div_ceil(planes);
            let tors_in_block = tors.saturating_sub(p * block).min(block);
            spines_in_plane * tors_in_block
        })
        .sum()
}

fn config_strategy() -> impl Strategy<Value = FabricConfig> {
    (1usize..=8, 1usize..=24, 1usize..=32, 1usize..=64)
        .prop_map(|(c, s, t, e)| FabricConfig::new(c, s, t, e))
}

proptest! {
    #[test]
    fn device_count_matches_tiers(cfg in config_strategy(), seed in any::<u64>()) {
        let fabric = FabricGenerator::new(cfg)
            .with_faults(FaultPolicy::none())
            .generate_with_rng(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(
            fabric.devices.len(),
            1 + cfg.core_count + cfg.spine_count + cfg.tor_count + cfg.endpoint_count
        );
    }

    #[test]
    fn link_count_matches_partition(cfg in config_strategy()) {
        let fabric = FabricGenerator::new(cfg).with_faults(FaultPolicy::none()).generate();
        let spine_tor = expected_spine_tor_links(cfg.spine_count, cfg.tor_count);
        prop_assert_eq!(spine_tor_allocation(cfg.spine_count, cfg.tor_count).len(), spine_tor);
        prop_assert_eq!(
            fabric.links.len(),
            cfg.core_count * cfg.spine_count + spine_tor + cfg.endpoint_count
        );
    }

    #[test]
    fn every_tor_reachable_from_a_spine(spines in 1usize..=24, tors in 1usize..=32) {
        let reached: HashSet<usize> = spine_tor_allocation(spines, tors)
            .into_iter()
            .map(|slot| slot.tor)
            .collect();
        prop_assert_eq!(reached, (1..=tors).collect::<HashSet<_>>());
    }

    #[test]
    fn neighbor_list_lengths(cfg in config_strategy()) {
        let fabric = FabricGenerator::new(cfg).generate();
        for d in &fabric.devices {
            let expected = match d.tier {
                Tier::Core => Some(cfg.spine_count),
                Tier::Spine => Some(cfg.core_count),
                Tier::Tor => Some(cfg.spine_count.min(4)),
                Tier::Management | Tier::Endpoint => None,
            };
            prop_assert_eq!(d.bgp.as_ref().map(|b| b.neighbors.len()), expected);
        }
    }

    #[test]
    fn ids_unique_and_ports_positive(cfg in config_strategy()) {
        let fabric = FabricGenerator::new(cfg).generate();
        let device_ids: HashSet<&str> = fabric.devices.iter().map(|d| d.id.as_str()).collect();
        prop_assert_eq!(device_ids.len(), fabric.devices.len());
        let link_ids: HashSet<u32> = fabric.links.iter().map(|l| l.id).collect();
        prop_assert_eq!(link_ids.len(), fabric.links.len());
        for l in &fabric.links {
            prop_assert!(l.source_port > 0 && l.target_port > 0);
            prop_assert!(device_ids.contains(l.source.as_str()));
            prop_assert!(device_ids.contains(l.target.as_str()));
        }
    }

    #[test]
    fn core_and_spine_views_are_adjacent(cfg in config_strategy()) {
        let fabric = FabricGenerator::new(cfg).generate();
        let cores = devices_by_tier(&fabric.devices, Tier::Core);
        let spines = devices_by_tier(&fabric.devices, Tier::Spine);
        for (ci, core) in cores.iter().enumerate() {
            for (si, spine) in spines.iter().enumerate() {
                let spine_addr = core.bgp.as_ref().unwrap().neighbors[si].peer_ip;
                let core_addr = spine.bgp.as_ref().unwrap().neighbors[ci].peer_ip;
                prop_assert_eq!(u32::from(spine_addr), u32::from(core_addr) + 1);
            }
        }
    }

    #[test]
    fn structure_is_reproducible(cfg in config_strategy()) {
        let generator = FabricGenerator::new(cfg);
        let a = generator.generate();
        let b = generator.generate();
        for (x, y) in a.devices.iter().zip(&b.devices) {
            prop_assert_eq!(&x.id, &y.id);
            prop_assert_eq!(x.tier, y.tier);
            prop_assert_eq!(x.status, y.status);
            prop_assert_eq!(x.mgmt_ip, y.mgmt_ip);
            prop_assert_eq!(&x.bgp, &y.bgp);
        }
        for (x, y) in a.links.iter().zip(&b.links) {
            prop_assert_eq!(x.id, y.id);
            prop_assert_eq!(&x.source, &y.source);
            prop_assert_eq!(&x.target, &y.target);
            prop_assert_eq!((x.source_port, x.target_port), (y.source_port, y.target_port));
            prop_assert_eq!(x.status, y.status);
        }
        prop_assert_eq!(a.links.len(), b.links.len());
    }
}

#[test]
fn default_config_seeds_one_degraded_tor_and_one_flap_link() {
    let fabric = FabricGenerator::new(FabricConfig::default()).generate();
    assert_eq!(fabric.devices.len(), 53);

    let degraded: Vec<&str> = fabric
        .devices
        .iter()
        .filter(|d| d.status == DeviceStatus::Degraded)
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(degraded, vec!["tor-005"]);
    assert!(fabric
        .devices
        .iter()
        .filter(|d| d.id != "tor-005")
        .all(|d| d.status == DeviceStatus::Healthy));

    let errors: Vec<_> = fabric
        .links
        .iter()
        .filter(|l| l.status == LinkStatus::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].utilization, 95);
    assert_eq!(errors[0].source, "spine-03");
    assert_eq!(errors[0].target, "tor-005");
}

#[test]
fn spine_query_returns_spine_tier_only() {
    let cfg = FabricConfig::default();
    let fabric = fabric_synth::generate(&cfg);
    let spines = devices_by_tier(&fabric.devices, Tier::Spine);
    assert_eq!(spines.len(), cfg.spine_count);
    assert!(spines.iter().all(|d| d.tier == Tier::Spine));
}

#[test]
fn custom_fault_policy_targets_other_points() {
    let faults: FaultPolicy = serde_json::from_str(
        r#"{
            "devices": [{"tier": "spine", "index": 2, "status": "critical"}],
            "links": [{"spine": 1, "tor": 2, "status": "error", "utilization": 90}]
        }"#,
    )
    .unwrap();
    let fabric = FabricGenerator::new(FabricConfig::default())
        .with_faults(faults)
        .generate();

    assert_eq!(
        fabric.device("spine-02").map(|d| d.status),
        Some(DeviceStatus::Critical)
    );
    assert_eq!(
        fabric.device("tor-005").map(|d| d.status),
        Some(DeviceStatus::Healthy)
    );
    let broken: Vec<_> = fabric
        .links
        .iter()
        .filter(|l| l.status == LinkStatus::Error)
        .collect();
    assert_eq!(broken.len(), 1);
    assert_eq!((broken[0].source.as_str(), broken[0].target.as_str()), ("spine-01", "tor-002"));
    assert_eq!(broken[0].utilization, 90);
    // spine 1 already wires tor 2, so no extra link
    assert_eq!(fabric.links.len(), 48 + 48 + 20);
}
