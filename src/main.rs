use anyhow::Context;
use chrono::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fabric_synth::config::Config;
use fabric_synth::fabric::FabricGenerator;
use fabric_synth::metrics::{backfill_history, HistoryOptions};
use fabric_synth::snapshot::FabricSnapshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fabric_synth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = Config::load();
    tracing::info!(
        "Generating fabric: core={} spine={} tor={} endpoint={}",
        cfg.fabric.core_count,
        cfg.fabric.spine_count,
        cfg.fabric.tor_count,
        cfg.fabric.endpoint_count
    );

    if cfg.strict {
        cfg.fabric.validate().context("Refusing to generate fabric")?;
    }

    let mut rng = rand::thread_rng();
    let fabric = FabricGenerator::new(cfg.fabric)
        .with_faults(cfg.fault_policy())
        .generate_with_rng(&mut rng);

    let history = if cfg.history_points > 0 {
        let options = HistoryOptions {
            points: cfg.history_points,
            step: Duration::seconds(cfg.history_step_secs),
            ..Default::default()
        };
        backfill_history(&fabric.devices, &options, &mut rng)
    } else {
        Vec::new()
    };

    let snapshot = FabricSnapshot::new(cfg.fabric, fabric).with_history(history);
    tracing::info!(
        "Snapshot {}: {} devices, {} links, {} error links",
        snapshot.run_id,
        snapshot.summary.device_count,
        snapshot.summary.link_count,
        snapshot.summary.error_links
    );

    if cfg.output_path.is_empty() {
        println!("{}", snapshot.to_json()?);
    } else {
        snapshot.write_to(&cfg.output_path).await?;
    }

    Ok(())
}
