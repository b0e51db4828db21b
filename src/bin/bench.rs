//! Machine benchmark binary.
//!
//! Measures execution throughput for representative programs.
//! Run with: `cargo run --release --bin bench`

use std::time::{Duration, Instant};

use intcode::network::link::ring;
use intcode::network::scheduler::Scheduler;
use intcode::vm::machine::Machine;
use intcode::vm::program::Program;

// ---------------------------------------------------------------------------
// Benchmark harness
// ---------------------------------------------------------------------------

struct BenchResult {
    name: &'static str,
    iterations: u64,
    total: Duration,
    /// Instructions executed by one run.
    steps: u64,
}

impl BenchResult {
    fn avg(&self) -> Duration {
        self.total / self.iterations as u32
    }

    fn print(&self) {
        let avg = self.avg();
        let ns_per_op = avg.as_nanos();
        let ns_per_step = if self.steps > 0 {
            format!("{:>8.1}", ns_per_op as f64 / self.steps as f64)
        } else {
            "       -".to_string()
        };
        println!(
            "  {:<24} {:>7} iters {:>10.3} us/iter {:>10} steps  {} ns/step",
            self.name,
            self.iterations,
            ns_per_op as f64 / 1000.0,
            self.steps,
            ns_per_step,
        );
    }
}

/// Runs `f` for at least `min_duration`, returning aggregated results.
fn bench<F>(name: &'static str, min_duration: Duration, mut f: F) -> BenchResult
where
    F: FnMut() -> u64,
{
    // Warmup
    for _ in 0..5 {
        f();
    }

    let mut iterations = 0u64;
    let mut steps = 0u64;
    let start = Instant::now();
    while start.elapsed() < min_duration {
        steps = f();
        iterations += 1;
    }
    let total = start.elapsed();

    BenchResult {
        name,
        iterations,
        total,
        steps,
    }
}

/// Runs a fresh machine seeded from `program` to halt, returning its steps.
fn run_once(program: &Program) -> u64 {
    let mut machine = Machine::new(program);
    machine.run().expect("machine run failed");
    machine.steps()
}

// ---------------------------------------------------------------------------
// Benchmark programs
// ---------------------------------------------------------------------------

/// Decrements cell 8 from 500000 to zero, two instructions per lap.
const COUNTDOWN: &str = "1001,8,-1,8,1005,8,0,99,500000";

/// Adds, multiplies, compares, and jumps for 100000 laps.
const ARITHMETIC_MIX: &str = "1101,0,0,60,1001,60,1,60,1102,2,3,61,1007,60,100000,62,1005,62,4,99";

/// Emits its own sixteen cells through the relative base.
const QUINE: &str = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";

/// Echoes 10000 queued inputs back to the output queue.
const QUEUE_ECHO: &str = "3,13,4,13,1001,12,-1,12,1005,12,0,99,10000,0";

/// Ring worker: reads an addend, then adds it to 1000 circulated values.
const RING_WORKER: &str = "3,21,3,22,1,21,22,22,4,22,1001,23,-1,23,1005,23,2,99,0,0,0,0,0,1000";

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let min = Duration::from_secs(2);

    println!("Machine Benchmarks (each runs for >= 2s)\n");
    println!(
        "  {:<24} {:>7}       {:>14} {:>12}  {:>8}",
        "benchmark", "iters", "avg time", "steps/run", "ns/step"
    );
    println!("  {}", "-".repeat(78));

    let countdown: Program = COUNTDOWN.parse().expect("program parse failed");
    let arithmetic: Program = ARITHMETIC_MIX.parse().expect("program parse failed");
    let quine: Program = QUINE.parse().expect("program parse failed");
    let echo: Program = QUEUE_ECHO.parse().expect("program parse failed");
    let worker: Program = RING_WORKER.parse().expect("program parse failed");

    let r = bench("countdown(500K)", min, || run_once(&countdown));
    r.print();

    let r = bench("arithmetic_mix(100K)", min, || run_once(&arithmetic));
    r.print();

    let r = bench("quine", min, || run_once(&quine));
    r.print();

    let r = bench("queue_echo(10K)", min, || {
        let mut machine = Machine::new(&echo);
        for value in 0..10_000 {
            machine.push_input(value);
        }
        machine.run().expect("machine run failed");
        machine.steps()
    });
    r.print();

    let r = bench("ring(3x1000)", min, || {
        let mut machines: Vec<Machine> = (0..3).map(|id| Machine::with_id(&worker, id)).collect();
        ring(&mut machines);
        let mut scheduler = Scheduler::new(machines);
        for (index, addend) in [1, 2, 3].into_iter().enumerate() {
            scheduler.machine_mut(index).push_input(addend);
        }
        scheduler.machine_mut(0).push_input(0);
        scheduler.run().expect("network run failed");
        scheduler.total_steps()
    });
    r.print();

    println!();
}
