//! Core-pinned thread spawning.
//!
//! ESP-IDF implements `std::thread` on top of pthreads, which are FreeRTOS
//! tasks underneath.  `esp_pthread_set_cfg()` sets thread-local options
//! that apply to the *next* `pthread_create()` from the calling thread, so
//! the config→spawn pair must not be interleaved with other thread
//! creation on the same thread.  On the host, falls back to a plain spawn.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32 dual-core.
///
/// Core 0 (PRO_CPU) stays with WiFi, lwIP and the HTTP server task, which
/// ESP-IDF places there itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 1 (APP_CPU): actuation worker.
    App = 1,
}

/// Spawn `f` pinned to `core` with explicit priority and stack size.
///
/// `name` must be null-terminated (e.g. `"actuator\0"`); the pthread
/// config keeps the raw pointer.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    // SAFETY: `cfg` is fully initialised by the IDF default constructor and
    // `name` is 'static and null-terminated.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = i32::from(priority);
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        core,
        priority,
        stack_kb
    );

    std::thread::Builder::new().name(display_name.into()).spawn(f)
}

/// Host fallback; ignores core affinity, priority and the stack budget
/// (host threads need far more than the firmware gives the worker).
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    _core: Core,
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    let display_name = name.trim_end_matches('\0');
    log::debug!("Spawning '{}' (sim, stack={}KB)", display_name, stack_kb);

    std::thread::Builder::new().name(display_name.into()).spawn(f)
}
