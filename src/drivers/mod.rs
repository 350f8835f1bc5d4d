//! Output drivers built on `embedded-hal` GPIO and delay traits.

pub mod alerts;
pub mod lcd;
