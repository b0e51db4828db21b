use intcode_derive::Error;

/// Errors that can occur while loading a program or executing a machine.
///
/// Decode and execute faults carry the instruction pointer and the raw
/// memory word so a failing program can be diagnosed without a debugger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VmError {
    /// Opcode outside the closed instruction set.
    #[error("unknown opcode {opcode} (word {word}) at address {pointer}")]
    UnknownOpcode {
        opcode: i64,
        word: i64,
        pointer: usize,
    },
    /// Addressing-mode digit outside {0, 1, 2}.
    #[error("invalid addressing mode digit {digit} for parameter {parameter} of word {word} at address {pointer}")]
    InvalidMode {
        digit: i64,
        parameter: usize,
        word: i64,
        pointer: usize,
    },
    /// Write destination resolved through an immediate-mode parameter.
    #[error("immediate-mode write destination for parameter {parameter} of word {word} at address {pointer}")]
    ImmediateWrite {
        parameter: usize,
        word: i64,
        pointer: usize,
    },
    /// Parameter resolved to an address below zero.
    #[error("parameter {parameter} of word {word} at address {pointer} resolves to negative address {address}")]
    NegativeAddress {
        address: i64,
        parameter: usize,
        word: i64,
        pointer: usize,
    },
    /// Jump instruction targeting an address below zero.
    #[error("word {word} at address {pointer} jumps to negative address {target}")]
    NegativeJump {
        target: i64,
        word: i64,
        pointer: usize,
    },
    /// A halted machine was stepped again.
    #[error("machine stepped after halt (pointer {pointer})")]
    SteppedAfterHalt { pointer: usize },
    /// Program source item that does not parse as an integer.
    #[error("invalid program item '{item}' at index {index}")]
    InvalidItem { item: String, index: usize },
    /// Program source with no items at all.
    #[error("empty program source")]
    EmptySource,
}
