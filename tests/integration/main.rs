//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock hardware on a simulated clock.  All tests run on the host
//! with no real hardware required.

mod alerts_tests;
mod modem_tests;
