//! Wiring and scheduling for groups of machines.
//!
//! Machines cooperate by sharing I/O queues: one machine's output queue
//! becomes another's input queue, so emitted values are delivered
//! without copying. A round-robin scheduler drives the whole group
//! until every machine halts.
//!
//! - [`link`]: queue wiring helpers for pipelines and rings
//! - [`scheduler`]: cooperative round-robin scheduler

pub mod link;
pub mod scheduler;
