use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fabric::{summarize, FabricConfig};
use crate::metrics::MetricSample;
use crate::models::{Device, Fabric, TopologyLink, TopologySummary};

/// Everything one run hands to downstream seeders, as a single JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricSnapshot {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub config: FabricConfig,
    pub summary: TopologySummary,
    pub devices: Vec<Device>,
    pub links: Vec<TopologyLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<MetricSample>,
}

impl FabricSnapshot {
    pub fn new(config: FabricConfig, fabric: Fabric) -> Self {
        let summary = summarize(&fabric.devices, &fabric.links);
        let (devices, links) = fabric.into_parts();
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            config,
            summary,
            devices,
            links,
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<MetricSample>) -> Self {
        self.history = history;
        self
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize fabric snapshot")
    }

    /// Write the snapshot as pretty JSON, creating parent directories
    pub async fn write_to(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(path, self.to_json()?)
            .await
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        tracing::info!("Wrote fabric snapshot {} to {}", self.run_id, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fabric::FabricGenerator;

    #[test]
    fn test_snapshot_roundtrip_via_file() {
        let config = FabricConfig::new(2, 4, 4, 6);
        let snapshot = FabricSnapshot::new(config, FabricGenerator::new(config).generate());
        assert_eq!(snapshot.summary.device_count, 17);

        let dir = std::env::temp_dir().join(format!("fabric-synth-{}", snapshot.run_id));
        let path = dir.join("snapshot.json");
        tokio_test::block_on(snapshot.write_to(&path)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let loaded: FabricSnapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.run_id, snapshot.run_id);
        assert_eq!(loaded.devices.len(), 17);
        assert_eq!(loaded.links, snapshot.links);
        assert!(loaded.history.is_empty());
        assert!(!raw.contains("\"history\""));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
