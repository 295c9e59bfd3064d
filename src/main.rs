//! pongBot firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │  HardwareAdapter   LogEventSink   MonotonicClock             │
//! │  QueuedLink<EspMqttPublisher>     QueuedLink<NullPublisher>  │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │            AppService (pure logic)                 │      │
//! │  │  Router · ArmingEngine · sync                      │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  ControlLoop (single thread, fixed period)                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result, anyhow};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use pongbot::adapters::log_sink::LogEventSink;
use pongbot::adapters::mqtt;
use pongbot::adapters::remote_link::{NullPublisher, QueuedLink};
use pongbot::adapters::time::MonotonicClock;
use pongbot::app::service::AppService;
use pongbot::config::LauncherConfig;
use pongbot::control_loop::ControlLoop;
use pongbot::drivers::hw_init;
use pongbot::remote::RemoteKind;
use pongbot::remote::queue::{BROKER_INBOUND, DASHBOARD_INBOUND};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("pongBot v{} booting", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = LauncherConfig::load(option_env!("PONGBOT_CONFIG_JSON")).context("config")?;

    // ── 3. Hardware (fatal on failure) ────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let hw = hw_init::init_hardware(peripherals.ledc, &config).context("hardware init")?;

    // ── 4. WiFi station ───────────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: option_env!("PONGBOT_WIFI_SSID")
            .unwrap_or_default()
            .try_into()
            .map_err(|_| anyhow!("wifi ssid too long"))?,
        password: option_env!("PONGBOT_WIFI_PASS")
            .unwrap_or_default()
            .try_into()
            .map_err(|_| anyhow!("wifi password too long"))?,
        ..Default::default()
    }))?;
    wifi.start()?;
    // The loop runs without the network too: fire and hold stay local, and
    // both remotes resync when they come up.
    match wifi.connect().and_then(|_| wifi.wait_netif_up()) {
        Ok(()) => info!("wifi: connected"),
        Err(e) => warn!("wifi: connect failed ({e}), continuing offline"),
    }

    // ── 5. Remote links ───────────────────────────────────────
    let publisher = mqtt::connect(&config.broker).context("mqtt")?;
    let broker = QueuedLink::new(RemoteKind::Broker, &BROKER_INBOUND, publisher);
    let dashboard = QueuedLink::new(RemoteKind::Dashboard, &DASHBOARD_INBOUND, NullPublisher);

    // ── 6. Control loop ───────────────────────────────────────
    let period = config.loop_period_ms;
    let app = AppService::new(config);
    let mut control = ControlLoop::new(
        app,
        hw,
        MonotonicClock::new(),
        LogEventSink::new(),
        dashboard,
        broker,
        period,
    );

    info!("System ready. Entering control loop.");
    control.run(|| false);

    drop(wifi);
    Ok(())
}
