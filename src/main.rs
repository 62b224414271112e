//! Gatekeeper Firmware: Main Entry Point
//!
//! Dual-mode boot: the stored credential triple decides, once per boot,
//! which of two services runs.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  WifiAdapter      NvsAdapter     RemoteClient   LogEventSink   │
//! │  (NetworkPort)    (StoragePort)  (HttpClient)   (EventSink)    │
//! │  RelayDriver      EspSystem      EspHttpServer                 │
//! │  (RelayPort)      (Entropy/Restart)                            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  Bootstrapper ─▶ Mode::Provisioning ─▶ ProvisioningPortal      │
//! │              └─▶ Mode::Operational  ─▶ OperationalApi          │
//! │                                        RemoteNotifier          │
//! │                                        ActuationController     │
//! │                                        (worker thread)         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use embedded_hal::delay::DelayNs;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};

use gatekeeper::adapters::device_id;
use gatekeeper::adapters::http_client::RemoteClient;
use gatekeeper::adapters::log_sink::LogEventSink;
use gatekeeper::adapters::nvs::NvsAdapter;
use gatekeeper::adapters::system::EspSystem;
use gatekeeper::adapters::wifi::WifiAdapter;
use gatekeeper::app::actuation::{self, ActuationController};
use gatekeeper::app::bootstrap::{AccessPoint, Bootstrapper, Mode};
use gatekeeper::app::notifier::RemoteNotifier;
use gatekeeper::app::provisioning::ProvisioningService;
use gatekeeper::config::GateConfig;
use gatekeeper::credentials::{ConfigStore, DeviceCredentials};
use gatekeeper::drivers::delay::SystemDelay;
use gatekeeper::drivers::hw_init;
use gatekeeper::drivers::relay::RelayDriver;
use gatekeeper::http::auth::AuthGate;
use gatekeeper::http::server;
use gatekeeper::http::{FollowUp, OperationalApi, ProvisioningPortal};
use gatekeeper::keygen::ApiKeyGenerator;

/// Provisioning mode has nothing to do between requests.
const PORTAL_IDLE_MS: u32 = 1_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let mac = device_id::read_mac();
    info!("╔══════════════════════════════════════╗");
    info!("║  Gatekeeper v{}  {}          ║", env!("CARGO_PKG_VERSION"), device_id::device_id(&mac));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Relay lines safe before anything else ──────────────
    if let Err(e) = hw_init::release_relay_lines() {
        // Not fatal: the pulse path releases the lines again on first use.
        error!("Relay release at boot failed: {}", e);
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = GateConfig::default();
    if let Err(reason) = config.validate() {
        anyhow::bail!("invalid build configuration: {reason}");
    }

    // ── 4. Stored credentials ─────────────────────────────────
    let nvs = NvsAdapter::new().map_err(|e| anyhow::anyhow!("NVS init failed: {e}"))?;
    let store = ConfigStore::new(nvs);
    let creds = store.load().unwrap_or_else(|e| {
        warn!("Credential read failed ({}), treating device as unprovisioned", e);
        DeviceCredentials::default()
    });

    // ── 5. Network bring-up for the selected mode ─────────────
    let peripherals = Peripherals::take().context("peripherals")?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let wifi = WifiAdapter::new(peripherals.modem, sysloop, nvs_partition)?;

    let mut sink = LogEventSink::new();
    let mut boot = Bootstrapper::new(wifi, SystemDelay, config.join_poll_interval_ms);
    let ap_ssid = device_id::access_point_ssid(&mac);
    let mode = boot
        .boot(
            creds,
            AccessPoint {
                ssid: ap_ssid.as_str(),
                password: &config.ap_password,
            },
            &mut sink,
        )
        .map_err(|e| anyhow::anyhow!("network bring-up failed: {e}"))?;
    // Dropping the adapter would stop WiFi.
    let _wifi = boot.into_network();

    match mode {
        Mode::Provisioning => run_provisioning(&config, store),
        Mode::Operational(creds) => run_operational(&config, &creds),
    }
}

// ── Provisioning mode ─────────────────────────────────────────

fn run_provisioning(config: &GateConfig, store: ConfigStore<NvsAdapter>) -> Result<()> {
    let mut system = EspSystem::new();
    let keygen = ApiKeyGenerator::from_entropy(&mut system);
    let service = ProvisioningService::new(store, keygen, LogEventSink::new());
    let portal = Arc::new(ProvisioningPortal::new(
        service,
        Duration::from_millis(u64::from(config.restart_grace_ms)),
    ));

    let _server = server::start(config.http_port, portal, |follow_up| match follow_up {
        FollowUp::Restart { after } => {
            std::thread::spawn(move || EspSystem::new().restart_after(after));
        }
    })?;
    info!("Provisioning portal ready");

    // The boot cycle ends with the restart scheduled by a successful submit.
    let mut delay = SystemDelay;
    loop {
        delay.delay_ms(PORTAL_IDLE_MS);
    }
}

// ── Operational mode ──────────────────────────────────────────

fn run_operational(config: &GateConfig, creds: &DeviceCredentials) -> Result<()> {
    let controller = ActuationController::new(RelayDriver::new(), SystemDelay, config.pulse_duration_ms);
    let actuator = actuation::spawn_worker(
        controller,
        LogEventSink::new(),
        Duration::from_millis(u64::from(config.completion_timeout_ms())),
    )
    .context("actuation worker")?;

    let api = Arc::new(OperationalApi::new(AuthGate::new(&creds.api_key), actuator.clone()));
    // Operational mode never restarts itself.
    let _server = server::start(config.http_port, api, |_follow_up| {})?;
    info!("Operational API ready");

    let mut notifier = RemoteNotifier::from_config(config);
    if !notifier.is_enabled() {
        info!("Remote notifier disabled (no endpoint configured)");
    }
    let mut client = RemoteClient::new();
    let mut sink = LogEventSink::new();
    let mut delay = SystemDelay;

    // ── Main loop ─────────────────────────────────────────────
    loop {
        notifier.poll_once(&mut client, &actuator, &mut sink);
        delay.delay_ms(config.loop_interval_ms);
    }
}
