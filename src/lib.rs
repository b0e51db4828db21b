//! Intcode library.
//!
//! Provides a stored-program integer machine, I/O queue wiring, and a
//! cooperative scheduler for running wired machines together.

pub mod network;
pub mod utils;
pub mod vm;
