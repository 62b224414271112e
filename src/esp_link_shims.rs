//! Runtime symbol providers for `embassy-time` and `critical-section`.
//!
//! `async-io-mini` timers and the `embassy-sync` channels expect these
//! symbols at link time. On the device they are backed by the ESP-IDF
//! timer and a std mutex; on the host the `std` drivers of both crates
//! provide them and are only pulled in here so every host binary links.

#[cfg(not(target_os = "espidf"))]
use critical_section as _;
#[cfg(not(target_os = "espidf"))]
use embassy_time as _;

#[cfg(target_os = "espidf")]
use core::cell::{Cell, RefCell};
#[cfg(target_os = "espidf")]
use core::time::Duration;
#[cfg(target_os = "espidf")]
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(target_os = "espidf")]
static SECTION_LOCK: Mutex<()> = Mutex::new(());

#[cfg(target_os = "espidf")]
thread_local! {
    static SECTION_DEPTH: Cell<u8> = const { Cell::new(0) };
    static SECTION_GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

/// Re-entrant per thread: only the outermost acquire takes the lock.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    SECTION_DEPTH.with(|depth| {
        let d = depth.get();
        if d == 0 {
            // A panic inside a section leaves `()` behind; nothing to repair.
            let lock = SECTION_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            SECTION_GUARD.with(|guard| *guard.borrow_mut() = Some(lock));
        }
        let next = d.saturating_add(1);
        depth.set(next);
        next
    })
}

#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    SECTION_DEPTH.with(|depth| {
        let d = depth.get();
        if d == 0 {
            return;
        }
        depth.set(d - 1);
        if d == 1 {
            SECTION_GUARD.with(|guard| *guard.borrow_mut() = None);
        }
    });
}

/// Microseconds since boot, matching the 1 MHz tick embassy-time assumes.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    // SAFETY: plain read of the monotonic ESP timer.
    unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
}

/// Wakes `waker` at tick `at` from a short-lived helper thread.
///
/// Only the actuation timeout uses a timer, at most once per pulse, so one
/// thread per registration is cheap enough.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_schedule_wake(at: u64, waker: *mut core::ffi::c_void) {
    if waker.is_null() {
        return;
    }

    // SAFETY: embassy-time hands over a pointer to a live `Waker` for the
    // duration of this call; it is cloned before returning.
    let waker = unsafe { (*(waker as *const core::task::Waker)).clone() };
    let spawned = std::thread::Builder::new()
        .name("timer-wake".into())
        .spawn(move || {
            let now = _embassy_time_now();
            if at > now {
                std::thread::sleep(Duration::from_micros(at - now));
            }
            waker.wake();
        });
    if let Err(e) = spawned {
        log::error!("timer wake thread failed to start: {e}");
    }
}
