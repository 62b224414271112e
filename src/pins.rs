//! GPIO pin assignments for the gate controller board.
//!
//! Single source of truth: the relay driver and boot-time line release
//! reference this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Gate relay (two-terminal pulse input)
// ---------------------------------------------------------------------------

/// Relay terminal A.  Driven HIGH during a pulse, otherwise a floating input.
pub const RELAY_A_GPIO: i32 = 26;
/// Relay terminal B.  Driven HIGH during a pulse, otherwise a floating input.
pub const RELAY_B_GPIO: i32 = 27;

/// Level written to a relay line while it is driven.
pub const RELAY_ASSERTED_LEVEL: u32 = 1;

/// Sampled at reset to pick boot mode and flash voltage; a relay wired
/// here can stop the board from booting.
pub const STRAPPING_GPIOS: [i32; 5] = [0, 2, 5, 12, 15];
