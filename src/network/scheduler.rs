//! Cooperative round-robin scheduler.
//!
//! Drives a group of wired machines by giving each one a turn to run
//! until it suspends or halts, pass after pass, until the whole group
//! halts. A pass in which no live machine executes anything is a
//! deadlock, reported as [`NetworkError::Stalled`].

use intcode_derive::Error;

use crate::vm::errors::VmError;
use crate::vm::machine::Machine;
use crate::warn;

/// Faults surfaced while driving a group of machines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// A machine's fatal fault, tagged with the machine's id.
    #[error("machine {id} faulted: {error}")]
    Machine { id: usize, error: VmError },
    /// Every live machine is starved and nothing can feed them.
    #[error("no machine made progress after {ticks} ticks")]
    Stalled { ticks: u64 },
}

/// What one scheduler pass over the machines accomplished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Instructions executed across all machines during the pass.
    pub steps: u64,
    /// Machines halted as of the end of the pass.
    pub halted: usize,
    /// Machines under schedule.
    pub total: usize,
}

impl TickReport {
    pub fn all_halted(&self) -> bool {
        self.halted == self.total
    }
}

/// Round-robin driver for a group of wired machines.
pub struct Scheduler {
    machines: Vec<Machine>,
    /// Value handed to a starved machine at the start of its turn.
    idle_input: Option<i64>,
    /// Completed passes over the machine list.
    ticks: u64,
}

impl Scheduler {
    /// Creates a scheduler over `machines`, in turn order.
    pub fn new(machines: Vec<Machine>) -> Self {
        Self {
            machines,
            idle_input: None,
            ticks: 0,
        }
    }

    /// Like [`Scheduler::new`], but a machine whose input queue is
    /// empty at the start of its turn receives `idle_input` instead of
    /// suspending untouched.
    pub fn with_idle_input(machines: Vec<Machine>, idle_input: i64) -> Self {
        Self {
            machines,
            idle_input: Some(idle_input),
            ticks: 0,
        }
    }

    /// Completed ticks so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Instructions executed across all machines so far.
    pub fn total_steps(&self) -> u64 {
        self.machines.iter().map(Machine::steps).sum()
    }

    pub fn machine(&self, index: usize) -> &Machine {
        &self.machines[index]
    }

    pub fn machine_mut(&mut self, index: usize) -> &mut Machine {
        &mut self.machines[index]
    }

    /// Runs one pass: every live machine gets one turn, in list order,
    /// and runs until it suspends or halts.
    pub fn tick(&mut self) -> Result<TickReport, NetworkError> {
        let steps_before = self.total_steps();
        let idle_input = self.idle_input;

        for machine in &mut self.machines {
            if machine.is_halted() {
                continue;
            }
            if let Some(value) = idle_input {
                if machine.input_handle().borrow().is_empty() {
                    machine.push_input(value);
                }
            }
            if let Err(error) = machine.run() {
                return Err(NetworkError::Machine {
                    id: machine.id(),
                    error,
                });
            }
        }

        self.ticks += 1;
        let halted = self.machines.iter().filter(|m| m.is_halted()).count();
        Ok(TickReport {
            steps: self.total_steps() - steps_before,
            halted,
            total: self.machines.len(),
        })
    }

    /// Ticks until every machine halts.
    ///
    /// Returns the final report, or [`NetworkError::Stalled`] once a
    /// full tick passes in which no live machine could execute.
    pub fn run(&mut self) -> Result<TickReport, NetworkError> {
        loop {
            let report = self.tick()?;
            if report.all_halted() {
                return Ok(report);
            }
            if report.steps == 0 {
                warn!(
                    "{} machines still live but tick {} made no progress",
                    report.total - report.halted,
                    self.ticks
                );
                return Err(NetworkError::Stalled { ticks: self.ticks });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::link::{pipe, ring};
    use crate::vm::program::Program;

    /// Reads an addend, then loops three times: read a value, add the
    /// addend, emit the sum.
    const RING_PROGRAM: &str = "3,21,3,22,1,21,22,22,4,22,1001,23,-1,23,1005,23,2,99,0,0,0,0,0,3";

    /// Reads a phase, then loops five times: read a signal, double it,
    /// add the adjusted phase, emit the result.
    const AMPLIFIER_PROGRAM: &str =
        "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5";

    fn machine(source: &str) -> Machine {
        let program = source.parse::<Program>().expect("program parse failed");
        Machine::new(&program)
    }

    #[test]
    fn tick_reports_progress() {
        let mut scheduler = Scheduler::new(vec![machine("1101,1,1,0,99")]);
        let report = scheduler.tick().expect("tick failed");
        assert_eq!(
            report,
            TickReport {
                steps: 2,
                halted: 1,
                total: 1
            }
        );
        assert!(report.all_halted());
    }

    #[test]
    fn empty_network_halts_immediately() {
        let mut scheduler = Scheduler::new(Vec::new());
        let report = scheduler.run().expect("network run failed");
        assert!(report.all_halted());
        assert_eq!(report.steps, 0);
    }

    #[test]
    fn pipeline_progresses_across_ticks() {
        let upstream = machine("104,7,104,35,99");
        let mut downstream = machine("3,0,3,2,1,0,2,0,4,0,99");
        pipe(&upstream, &mut downstream);

        // the downstream machine is scheduled first, so its input only
        // arrives on the following tick
        let mut scheduler = Scheduler::new(vec![downstream, upstream]);
        let report = scheduler.run().expect("network run failed");
        assert!(report.all_halted());
        assert_eq!(scheduler.ticks(), 2);
        assert_eq!(scheduler.machine(0).output_values(), vec![42]);
    }

    #[test]
    fn ring_circulates_until_every_machine_halts() {
        let program: Program = RING_PROGRAM.parse().expect("program parse failed");
        let mut machines: Vec<Machine> = (0..3).map(|id| Machine::with_id(&program, id)).collect();
        ring(&mut machines);

        let mut scheduler = Scheduler::new(machines);
        for (index, addend) in [1, 2, 3].into_iter().enumerate() {
            scheduler.machine_mut(index).push_input(addend);
        }
        scheduler.machine_mut(0).push_input(0);

        let report = scheduler.run().expect("network run failed");
        assert!(report.all_halted());
        assert_eq!(report.total, 3);
        assert_eq!(scheduler.ticks(), 3);
        assert_eq!(scheduler.machine(2).last_output(), Some(18));
        assert_eq!(scheduler.total_steps(), 51);
    }

    #[test]
    fn five_machine_feedback_ring_amplifies_the_seed() {
        let program: Program = AMPLIFIER_PROGRAM.parse().expect("program parse failed");
        let mut machines: Vec<Machine> = (0..5).map(|id| Machine::with_id(&program, id)).collect();
        ring(&mut machines);

        let mut scheduler = Scheduler::new(machines);
        for (index, phase) in [9, 8, 7, 6, 5].into_iter().enumerate() {
            scheduler.machine_mut(index).push_input(phase);
        }
        scheduler.machine_mut(0).push_input(0);

        let report = scheduler.run().expect("network run failed");
        assert!(report.all_halted());
        assert_eq!(scheduler.ticks(), 5);
        assert_eq!(scheduler.machine(4).last_output(), Some(139_629_729));
    }

    #[test]
    fn starved_network_stalls() {
        let mut scheduler = Scheduler::new(vec![machine("3,0,99")]);
        assert_eq!(
            scheduler.run().expect_err("expected stall"),
            NetworkError::Stalled { ticks: 1 }
        );
    }

    #[test]
    fn idle_input_feeds_starved_machines() {
        let mut scheduler = Scheduler::with_idle_input(vec![machine("3,0,99")], -1);
        let report = scheduler.run().expect("network run failed");
        assert!(report.all_halted());
        assert_eq!(scheduler.machine(0).peek(0), -1);
    }

    #[test]
    fn machine_faults_carry_the_machine_id() {
        let program: Program = "0".parse().expect("program parse failed");
        let healthy = machine("99");
        let faulty = Machine::with_id(&program, 7);

        let mut scheduler = Scheduler::new(vec![healthy, faulty]);
        assert_eq!(
            scheduler.run().expect_err("expected fault"),
            NetworkError::Machine {
                id: 7,
                error: VmError::UnknownOpcode {
                    opcode: 0,
                    word: 0,
                    pointer: 0
                }
            }
        );
    }

    #[test]
    fn network_error_display() {
        let error = NetworkError::Machine {
            id: 1,
            error: VmError::UnknownOpcode {
                opcode: 0,
                word: 0,
                pointer: 0,
            },
        };
        assert_eq!(
            error.to_string(),
            "machine 1 faulted: unknown opcode 0 (word 0) at address 0"
        );
    }
}
