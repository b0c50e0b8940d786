// src/main.rs
mod app;
mod detector;
mod gesture;
mod keys;
mod landmarks;
mod ui;
mod video;

use anyhow::{Context, Result};
use eframe::egui;
use tracing::{info, warn};

use crate::app::HandPilotApp;
use crate::detector::{DetectorConfig, HandDetector};
use crate::keys::KeyInjector;
use crate::video::CameraSource;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    list_cameras();

    // Every collaborator must come up before the window does; there is no
    // retry or degraded mode.
    let camera = CameraSource::new(0).context("camera startup failed")?;
    let detector =
        HandDetector::new(DetectorConfig::default()).context("detector startup failed")?;
    let injector = KeyInjector::new().context("key injection startup failed")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1150.0, 760.0])
            .with_min_inner_size([900.0, 600.0]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "HandPilot",
        options,
        Box::new(move |_cc| Box::new(HandPilotApp::new(camera, detector, injector))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run application: {e}"))
}

fn list_cameras() {
    match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
        Ok(cameras) => {
            info!("found {} camera(s)", cameras.len());
            for (i, camera) in cameras.iter().enumerate() {
                info!("  [{}] {}", i, camera.human_name());
            }
        }
        Err(e) => {
            warn!("failed to query cameras: {e}");
        }
    }
}
