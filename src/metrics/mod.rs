//! Synthetic metric history for seeding a time-series store from a freshly
//! generated inventory. Each device's current cpu / memory / peer count is
//! the baseline the samples jitter around.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Device, DeviceStatus};

const CPU_JITTER: i16 = 10;
const MEMORY_JITTER: i16 = 5;
/// Non-healthy devices drop one BGP peer on every Nth sample
const PEER_FLAP_EVERY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSample {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub cpu: u8,
    pub memory: u8,
    pub bgp_peers: usize,
}

#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Samples per device
    pub points: usize,
    pub step: Duration,
    /// Timestamp of the newest sample
    pub end: DateTime<Utc>,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            points: 60,
            step: Duration::seconds(60),
            end: Utc::now(),
        }
    }
}

fn jittered<R: Rng + ?Sized>(rng: &mut R, base: u8, spread: i16) -> u8 {
    let value = i16::from(base) + rng.gen_range(-spread..=spread);
    value.clamp(0, 100) as u8
}

/// Backfill `options.points` samples per device, oldest first, grouped by device
pub fn backfill_history<R: Rng + ?Sized>(
    devices: &[Device],
    options: &HistoryOptions,
    rng: &mut R,
) -> Vec<MetricSample> {
    let mut samples = Vec::with_capacity(devices.len() * options.points);

    for device in devices {
        let peers = device.bgp_peer_count();
        let flapping = device.status != DeviceStatus::Healthy && peers > 0;

        for n in 0..options.points {
            let age = (options.points - 1 - n) as i32;
            let bgp_peers = if flapping && n % PEER_FLAP_EVERY == PEER_FLAP_EVERY - 1 {
                peers - 1
            } else {
                peers
            };
            samples.push(MetricSample {
                device_id: device.id.clone(),
                timestamp: options.end - options.step * age,
                cpu: jittered(rng, device.cpu, CPU_JITTER),
                memory: jittered(rng, device.memory, MEMORY_JITTER),
                bgp_peers,
            });
        }
    }

    tracing::debug!(
        "Backfilled {} metric samples for {} devices",
        samples.len(),
        devices.len()
    );
    samples
}
