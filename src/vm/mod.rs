//! Stored-program machine executing comma-separated integer programs.
//!
//! A [`program::Program`] is the immutable parse of a program text; each
//! [`machine::Machine`] seeded from it runs on a private copy of the
//! words, so one template can drive any number of concurrent machines.
//!
//! # Architecture
//!
//! - **Memory**: a flat array of signed 64-bit words, growable on write,
//!   zero on reads past the end
//! - **Instruction format**: one word per opcode; the two low decimal
//!   digits select the operation, higher digits select addressing modes
//! - **Addressing modes**: position, immediate, and relative
//!   (see [`mode::Mode`])
//! - **Execution model**: cooperative stepping; an input read on an
//!   empty queue suspends the machine instead of blocking
//! - **I/O**: shared FIFO queues ([`queue::IoQueue`]) with synchronous
//!   push/pop listeners
//!
//! # Modules
//!
//! - [`errors`]: decode and execution fault types
//! - [`isa`]: opcode set definition and mappings
//! - [`machine`]: the machine proper with its decoder, executor, and runner
//! - [`memory`]: growable word-addressed memory
//! - [`mode`]: parameter addressing modes
//! - [`program`]: program text parsing
//! - [`queue`]: shared I/O queues and observation hooks

pub mod errors;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod machine;
pub mod memory;
pub mod mode;
pub mod program;
pub mod queue;
