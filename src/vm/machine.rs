//! The machine proper: decoder, executor, and cooperative runner.
//!
//! A [`Machine`] owns a private memory image seeded from a [`Program`]
//! and advances one instruction per [`Machine::step`]. It never blocks:
//! reading from an empty input queue suspends the machine instead, and
//! the caller resumes it once input arrives.

use std::rc::Rc;

use crate::vm::errors::VmError;
use crate::vm::isa::Opcode;
use crate::vm::memory::Memory;
use crate::vm::mode::Mode;
use crate::vm::program::Program;
use crate::vm::queue::{IoQueue, QueueHandle};

/// Outcome of a single step, as seen by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The instruction completed and the pointer moved.
    Advanced,
    /// Input starvation. Nothing changed; queue a value and step again.
    Waiting,
    /// The halt opcode executed; the machine is now inert.
    Halted,
}

/// Effect of one executed instruction on the pointer and run state.
enum Effect {
    /// Move the pointer past the instruction and its parameters.
    Advance(usize),
    /// Set the pointer to an absolute address.
    Jump(usize),
    /// Suspend without consuming the instruction.
    Wait,
    /// Latch the halt signal.
    Halt,
}

/// One instruction word split into its opcode and addressing modes.
///
/// The raw word is kept so faults raised while executing the
/// instruction can report it verbatim.
struct Decoded {
    opcode: Opcode,
    modes: [Mode; 3],
    word: i64,
}

/// A stored-program machine with private memory and shareable I/O queues.
pub struct Machine {
    /// Identifier reported in orchestrator diagnostics.
    id: usize,
    /// Address of the next instruction word.
    pointer: usize,
    /// Base address added to relative-mode parameters.
    relative_base: i64,
    /// Private memory image, seeded from the program template.
    memory: Memory,
    /// Input queue; reassignable so machines can share queues.
    input: QueueHandle,
    /// Output queue; reassignable so machines can share queues.
    output: QueueHandle,
    /// One-shot halt signal. Once set it is never cleared.
    halted: bool,
    /// Count of instructions executed so far.
    steps: u64,
}

impl Machine {
    /// Creates a machine with id 0 loaded with `program`.
    pub fn new(program: &Program) -> Self {
        Self::with_id(program, 0)
    }

    /// Creates a machine loaded with `program`.
    ///
    /// The machine gets its own copy of the program words, a pointer and
    /// relative base of zero, and fresh empty queues. The same program
    /// can seed any number of machines.
    pub fn with_id(program: &Program, id: usize) -> Self {
        Self {
            id,
            pointer: 0,
            relative_base: 0,
            memory: Memory::new(program.words().to_vec()),
            input: IoQueue::new().handle(),
            output: IoQueue::new().handle(),
            halted: false,
            steps: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of instructions executed since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Reads a memory cell without stepping. Cells past the end read 0.
    pub fn peek(&self, address: usize) -> i64 {
        self.memory.read(address)
    }

    /// Overwrites a memory cell without stepping, growing memory if needed.
    pub fn poke(&mut self, address: usize, value: i64) {
        self.memory.write(address, value);
    }

    // ==================== I/O queues ====================

    /// Returns a shared handle to the input queue.
    pub fn input_handle(&self) -> QueueHandle {
        Rc::clone(&self.input)
    }

    /// Returns a shared handle to the output queue.
    pub fn output_handle(&self) -> QueueHandle {
        Rc::clone(&self.output)
    }

    /// Replaces the input queue with `handle`.
    ///
    /// Passing another machine's [`Machine::output_handle`] wires the two
    /// together: values the upstream machine emits become this machine's
    /// input with no copying.
    pub fn set_input(&mut self, handle: QueueHandle) {
        self.input = handle;
    }

    /// Replaces the output queue with `handle`.
    pub fn set_output(&mut self, handle: QueueHandle) {
        self.output = handle;
    }

    /// Appends one value to the input queue.
    pub fn push_input(&mut self, value: i64) {
        self.input.borrow_mut().push(value);
    }

    /// Appends each byte of `text` to the input queue as its code point.
    pub fn push_ascii(&mut self, text: &str) {
        let mut input = self.input.borrow_mut();
        for byte in text.bytes() {
            input.push(i64::from(byte));
        }
    }

    /// Removes and returns the oldest value from the output queue.
    pub fn pop_output(&mut self) -> Option<i64> {
        self.output.borrow_mut().pop()
    }

    /// Returns the newest value in the output queue without removing it.
    pub fn last_output(&self) -> Option<i64> {
        self.output.borrow().last()
    }

    /// Returns the output queue's values, oldest first.
    pub fn output_values(&self) -> Vec<i64> {
        self.output.borrow().to_vec()
    }

    /// Renders the output queue as text.
    ///
    /// Printable code points and newlines become characters; anything
    /// else is written in decimal on its own line.
    pub fn output_to_ascii(&self) -> String {
        let mut text = String::new();
        for value in self.output.borrow().to_vec() {
            match value {
                10 => text.push('\n'),
                32..=126 => text.push(value as u8 as char),
                other => {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&other.to_string());
                    text.push('\n');
                }
            }
        }
        text
    }

    /// Registers a listener fired after each value this machine emits.
    ///
    /// The listener runs synchronously inside the emitting step, after
    /// the value has been appended to the output queue.
    pub fn observe_output(&mut self, listener: impl FnMut(&mut IoQueue, i64) + 'static) {
        self.output.borrow_mut().observe_push(listener);
    }

    /// Registers a listener fired after each value this machine consumes.
    ///
    /// The listener runs synchronously inside the consuming step, after
    /// the value has been removed from the input queue. Pushing into the
    /// queue it receives is the supported way to feed the next read.
    pub fn observe_input(&mut self, listener: impl FnMut(&mut IoQueue, i64) + 'static) {
        self.input.borrow_mut().observe_pop(listener);
    }

    // ==================== Stepping ====================

    /// Decodes and executes the instruction under the pointer.
    ///
    /// Returns [`Step::Waiting`] without consuming the instruction when
    /// an input read finds the queue empty. Any [`VmError`] is fatal:
    /// the machine must not be stepped again after one.
    pub fn step(&mut self) -> Result<Step, VmError> {
        if self.halted {
            return Err(VmError::SteppedAfterHalt {
                pointer: self.pointer,
            });
        }

        let decoded = self.decode()?;
        match self.execute(&decoded)? {
            Effect::Advance(count) => {
                self.pointer += count;
                self.steps += 1;
                Ok(Step::Advanced)
            }
            Effect::Jump(target) => {
                self.pointer = target;
                self.steps += 1;
                Ok(Step::Advanced)
            }
            Effect::Wait => Ok(Step::Waiting),
            Effect::Halt => {
                self.halted = true;
                self.steps += 1;
                Ok(Step::Halted)
            }
        }
    }

    /// Steps until the machine suspends or halts.
    ///
    /// Returns [`Step::Waiting`] on input starvation, [`Step::Halted`]
    /// after the halt opcode, never [`Step::Advanced`].
    pub fn run(&mut self) -> Result<Step, VmError> {
        loop {
            match self.step()? {
                Step::Advanced => {}
                outcome => return Ok(outcome),
            }
        }
    }

    /// Returns an independent copy of the machine's state.
    ///
    /// The copy gets its own memory image and its own queues holding the
    /// same pending values. Listeners are not carried over, and the halt
    /// signal starts unset regardless of the source machine's. Stepping
    /// either machine is never observable in the other.
    pub fn snapshot(&self) -> Machine {
        Machine {
            id: self.id,
            pointer: self.pointer,
            relative_base: self.relative_base,
            memory: self.memory.clone(),
            input: IoQueue::from_values(self.input.borrow().to_vec()).handle(),
            output: IoQueue::from_values(self.output.borrow().to_vec()).handle(),
            halted: false,
            steps: self.steps,
        }
    }

    // ==================== Decode ====================

    /// Splits the word under the pointer into opcode and modes.
    ///
    /// The two low decimal digits select the opcode; the next digits,
    /// least significant first, select one mode per parameter. Missing
    /// digits mean position mode. Digits beyond the opcode's parameter
    /// count are ignored.
    fn decode(&self) -> Result<Decoded, VmError> {
        let word = self.memory.read(self.pointer);
        let opcode = Opcode::from_code(word % 100).ok_or(VmError::UnknownOpcode {
            opcode: word % 100,
            word,
            pointer: self.pointer,
        })?;

        let mut modes = [Mode::Position; 3];
        let mut digits = word / 100;
        for (slot, mode) in modes.iter_mut().take(opcode.parameters()).enumerate() {
            let digit = digits % 10;
            *mode = Mode::from_digit(digit).ok_or(VmError::InvalidMode {
                digit,
                parameter: slot + 1,
                word,
                pointer: self.pointer,
            })?;
            digits /= 10;
        }

        Ok(Decoded { opcode, modes, word })
    }

    fn execute(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        match decoded.opcode {
            Opcode::Add => self.op_add(decoded),
            Opcode::Multiply => self.op_multiply(decoded),
            Opcode::Input => self.op_input(decoded),
            Opcode::Output => self.op_output(decoded),
            Opcode::JumpIfTrue => self.op_jump_if_true(decoded),
            Opcode::JumpIfFalse => self.op_jump_if_false(decoded),
            Opcode::LessThan => self.op_less_than(decoded),
            Opcode::Equals => self.op_equals(decoded),
            Opcode::AdjustRelativeBase => self.op_adjust_relative_base(decoded),
            Opcode::Halt => Ok(Effect::Halt),
        }
    }

    // ==================== Parameter resolution ====================

    /// Resolves parameter `index` (1-based) to a value.
    fn read_parameter(&self, decoded: &Decoded, index: usize) -> Result<i64, VmError> {
        let literal = self.memory.read(self.pointer + index);
        match decoded.modes[index - 1] {
            Mode::Immediate => Ok(literal),
            Mode::Position => {
                let address = self.checked_address(decoded, index, literal)?;
                Ok(self.memory.read(address))
            }
            Mode::Relative => {
                let address =
                    self.checked_address(decoded, index, literal.wrapping_add(self.relative_base))?;
                Ok(self.memory.read(address))
            }
        }
    }

    /// Resolves parameter `index` (1-based) to a write destination.
    ///
    /// Immediate mode has no destination to name, so it faults here.
    fn write_address(&self, decoded: &Decoded, index: usize) -> Result<usize, VmError> {
        let literal = self.memory.read(self.pointer + index);
        match decoded.modes[index - 1] {
            Mode::Position => self.checked_address(decoded, index, literal),
            Mode::Relative => {
                self.checked_address(decoded, index, literal.wrapping_add(self.relative_base))
            }
            Mode::Immediate => Err(VmError::ImmediateWrite {
                parameter: index,
                word: decoded.word,
                pointer: self.pointer,
            }),
        }
    }

    /// Converts a resolved address to a cell index, faulting below zero.
    fn checked_address(
        &self,
        decoded: &Decoded,
        index: usize,
        address: i64,
    ) -> Result<usize, VmError> {
        usize::try_from(address).map_err(|_| VmError::NegativeAddress {
            address,
            parameter: index,
            word: decoded.word,
            pointer: self.pointer,
        })
    }

    /// Resolves parameter `index` to a jump target, faulting below zero.
    fn jump_target(&self, decoded: &Decoded, index: usize) -> Result<usize, VmError> {
        let target = self.read_parameter(decoded, index)?;
        usize::try_from(target).map_err(|_| VmError::NegativeJump {
            target,
            word: decoded.word,
            pointer: self.pointer,
        })
    }

    // ==================== Handlers ====================

    fn op_add(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let lhs = self.read_parameter(decoded, 1)?;
        let rhs = self.read_parameter(decoded, 2)?;
        let dest = self.write_address(decoded, 3)?;
        self.memory.write(dest, lhs.wrapping_add(rhs));
        Ok(Effect::Advance(4))
    }

    fn op_multiply(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let lhs = self.read_parameter(decoded, 1)?;
        let rhs = self.read_parameter(decoded, 2)?;
        let dest = self.write_address(decoded, 3)?;
        self.memory.write(dest, lhs.wrapping_mul(rhs));
        Ok(Effect::Advance(4))
    }

    fn op_input(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let value = match self.input.borrow_mut().pop() {
            Some(value) => value,
            None => return Ok(Effect::Wait),
        };
        let dest = self.write_address(decoded, 1)?;
        self.memory.write(dest, value);
        Ok(Effect::Advance(2))
    }

    fn op_output(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let value = self.read_parameter(decoded, 1)?;
        self.output.borrow_mut().push(value);
        Ok(Effect::Advance(2))
    }

    fn op_jump_if_true(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let condition = self.read_parameter(decoded, 1)?;
        if condition != 0 {
            Ok(Effect::Jump(self.jump_target(decoded, 2)?))
        } else {
            Ok(Effect::Advance(3))
        }
    }

    fn op_jump_if_false(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let condition = self.read_parameter(decoded, 1)?;
        if condition == 0 {
            Ok(Effect::Jump(self.jump_target(decoded, 2)?))
        } else {
            Ok(Effect::Advance(3))
        }
    }

    fn op_less_than(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let lhs = self.read_parameter(decoded, 1)?;
        let rhs = self.read_parameter(decoded, 2)?;
        let dest = self.write_address(decoded, 3)?;
        self.memory.write(dest, i64::from(lhs < rhs));
        Ok(Effect::Advance(4))
    }

    fn op_equals(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let lhs = self.read_parameter(decoded, 1)?;
        let rhs = self.read_parameter(decoded, 2)?;
        let dest = self.write_address(decoded, 3)?;
        self.memory.write(dest, i64::from(lhs == rhs));
        Ok(Effect::Advance(4))
    }

    fn op_adjust_relative_base(&mut self, decoded: &Decoded) -> Result<Effect, VmError> {
        let offset = self.read_parameter(decoded, 1)?;
        self.relative_base = self.relative_base.wrapping_add(offset);
        Ok(Effect::Advance(2))
    }
}
