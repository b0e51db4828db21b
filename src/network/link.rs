//! Queue wiring helpers.
//!
//! Wiring replaces a machine's input queue with another machine's
//! output queue, so both sides hold the same queue and values flow
//! between them without copying. Values pushed for a machine after
//! wiring land in the shared queue.

use crate::vm::machine::Machine;

/// Feeds `upstream`'s output queue into `downstream` as its input.
pub fn pipe(upstream: &Machine, downstream: &mut Machine) {
    downstream.set_input(upstream.output_handle());
}

/// Wires `machines` into a pipeline, each feeding the next.
///
/// The first machine's input and the last machine's output stay
/// unwired, forming the pipeline's own ends.
pub fn chain(machines: &mut [Machine]) {
    for index in 1..machines.len() {
        let handle = machines[index - 1].output_handle();
        machines[index].set_input(handle);
    }
}

/// Wires `machines` into a closed ring.
///
/// Like [`chain`], plus the last machine feeds the first. A ring of one
/// machine feeds its own output back into its input.
pub fn ring(machines: &mut [Machine]) {
    if machines.is_empty() {
        return;
    }
    chain(machines);
    let handle = machines[machines.len() - 1].output_handle();
    machines[0].set_input(handle);
}
