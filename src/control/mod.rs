//! Derived metrics computed from sensor readings.

pub mod lifespan;
