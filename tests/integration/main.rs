//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one surface or service
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware required.

mod bootstrap_tests;
mod mock_hw;
mod notifier_tests;
mod provisioning_flow_tests;
