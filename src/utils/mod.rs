//! Shared utilities.
//!
//! - [`log`]: Leveled stderr logging and the `info!`/`warn!`/`error!` macros

pub mod log;
