use crate::app_config::AppConfig;
use crate::attendance::Attendance;
use crate::notification::Notification;
use crate::notification_listener::notification_listener;
use crate::simulator::SimulatedDevice;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task;
use tracing::{info, warn};

mod app_config;
mod attendance;
mod biometric;
mod coordinate_deserializer;
mod domain;
mod geo;
mod notification;
mod notification_listener;
mod session;
mod simulator;

const COMMANDS: &str = "scan, confirm, dismiss, locate, report, quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let (tx, rx) = mpsc::channel::<Notification>(config.attendance().notification_buffer_size());
    let listener = task::spawn(async move { notification_listener(rx).await });
    info!("✅  Initialized notification listener");

    let device = SimulatedDevice::new(config.device().clone());
    let mut attendance = Attendance::new(&config, device.clone(), device, tx);

    let phase = attendance.start().await;
    info!("✅  Session started in phase {:?}", phase);
    info!("🔥 {} is up and running, commands: {}", env!("CARGO_PKG_NAME"), COMMANDS);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "scan" => {
                let phase = attendance.request_scan().await;
                info!("👆 Scan requested, now in phase {:?}", phase);
            }
            "confirm" => attendance.confirm().await,
            "dismiss" => attendance.dismiss().await,
            "locate" => {
                let phase = attendance.refresh_location().await;
                info!("📍 Location refreshed, now in phase {:?}", phase);
            }
            "report" => attendance.report().await,
            "quit" => break,
            "" => continue,
            other => warn!("⚠️ Unknown command '{}', expected one of: {}", other, COMMANDS),
        }
    }

    let session = attendance.session();
    info!(
        authenticated = session.is_authenticated(),
        confirmed = session.is_confirmed(),
        locked = session.is_locked(),
        reported = session.is_reported(),
        card_visible = session.is_card_visible(),
        failed_attempts = session.failed_attempts(),
        "🪵 Leaving in phase {:?}",
        session.phase()
    );
    if let (Some(location), Some(distance_m)) = (session.location(), session.distance_m()) {
        info!(
            latitude = location.latitude(),
            longitude = location.longitude(),
            "📍 Last known location was {:.0} m from the reference point",
            distance_m
        );
    }
    if let Some(record) = session.record() {
        info!(distance_m = record.distance_m(), "✅  Attendance marked at {}", record.marked_at());
    }

    // Closing the session closes the channel, which lets the listener drain and finish
    drop(attendance);
    let surfaced = listener.await?;
    info!("🪵 Session closed after {} notification(s)", surfaced);

    Ok(())
}
