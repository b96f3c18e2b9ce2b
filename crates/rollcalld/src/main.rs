use anyhow::Result;
use rollcall_core::{AttendanceLedger, Controller, FirstMatch, Registry, SharedState, Worker};
use rollcall_hw::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod config;
mod encoder;
mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("rollcalld starting");

    let cfg = config::Config::from_env();
    let pipeline_cfg = cfg.pipeline();

    let mut enc = encoder::EncoderClient::connect(&cfg.encoder_socket)?;
    let registry = Registry::load(&cfg.registry_path, &cfg.seed_dir, &mut enc)?;
    let ledger = AttendanceLedger::new(cfg.ledger_path.clone(), cfg.log_cooldown);
    let shared = Arc::new(SharedState::new(registry, ledger, &pipeline_cfg));

    let (tx, rx) = mpsc::channel(16);
    let run_flag = Arc::new(AtomicBool::new(true));

    // Camera trouble disables recognition but keeps the process up;
    // shutdown remains usable.
    let worker = match Camera::open(&cfg.camera_device) {
        Ok(camera) => Some(
            Worker::new(
                camera,
                enc,
                FirstMatch,
                shared.clone(),
                tx,
                run_flag.clone(),
                pipeline_cfg.clone(),
            )
            .spawn(),
        ),
        Err(e) => {
            tracing::error!(device = %cfg.camera_device, error = %e, "camera unavailable; recognition disabled");
            drop(tx);
            None
        }
    };

    let controller = Controller::new(
        rx,
        shared,
        ui::StdinPrompter,
        ui::ConsoleRenderer,
        pipeline_cfg,
    )
    .spawn();

    tracing::info!("rollcalld ready");
    tokio::signal::ctrl_c().await?;

    tracing::info!("rollcalld shutting down");
    run_flag.store(false, Ordering::SeqCst);
    if let Some(handle) = worker {
        let _ = handle.join();
    }
    let _ = controller.join();

    Ok(())
}
