//! Instruction Set Architecture (ISA) definitions.
//!
//! Defines the machine's opcode table. The
//! [`for_each_opcode!`](crate::for_each_opcode) macro holds the canonical
//! opcode definitions and invokes a callback macro for code generation, so
//! other modules can generate opcode-related code without duplicating the
//! table.
//!
//! This module generates:
//! - The [`Opcode`] enum with decimal code mappings
//! - [`Opcode::from_code`] for decoding the two low digits of a word
//! - The mnemonic and parameter-count tables
//!
//! # Instruction Format
//!
//! An instruction is a run of consecutive memory words: the instruction
//! word followed by one word per parameter. The two least-significant
//! decimal digits of the instruction word select the opcode; the next three
//! digits, least-significant-first, select each parameter's
//! [`Mode`](super::mode::Mode).

/// Invokes a callback macro with the complete opcode definition list.
///
/// Entries are `Name = code, "MNEMONIC", parameter_count`.
#[macro_export]
macro_rules! for_each_opcode {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Arithmetic
            // =========================
            /// ADD p1, p2, dst ; dst = p1 + p2
            Add = 1, "ADD", 3,
            /// MUL p1, p2, dst ; dst = p1 * p2
            Multiply = 2, "MUL", 3,
            // =========================
            // I/O
            // =========================
            /// IN dst ; dst = next input value, suspending while none is queued
            Input = 3, "IN", 1,
            /// OUT p1 ; append p1 to the output queue
            Output = 4, "OUT", 1,
            // =========================
            // Control flow
            // =========================
            /// JNZ p1, p2 ; if p1 != 0 then pointer = p2
            JumpIfTrue = 5, "JNZ", 2,
            /// JZ p1, p2 ; if p1 == 0 then pointer = p2
            JumpIfFalse = 6, "JZ", 2,
            /// LT p1, p2, dst ; dst = 1 if p1 < p2 else 0
            LessThan = 7, "LT", 3,
            /// EQ p1, p2, dst ; dst = 1 if p1 == p2 else 0
            Equals = 8, "EQ", 3,
            // =========================
            // Addressing
            // =========================
            /// ARB p1 ; relative_base += p1
            AdjustRelativeBase = 9, "ARB", 1,
            // =========================
            // Termination
            // =========================
            /// HALT ; set the one-shot halt signal
            Halt = 99, "HALT", 0,
        }
    };
}

#[macro_export]
macro_rules! define_opcodes {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $code:literal, $mnemonic:literal, $params:literal
        ),* $(,)?
    ) => {
        /// Operation selected by the two low decimal digits of an
        /// instruction word.
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $name = $code,
            )*
        }

        impl Opcode {
            /// Decodes a two-digit opcode value.
            ///
            /// Returns `None` for codes outside the instruction set; the
            /// decoder attaches pointer and word context to the fault.
            pub const fn from_code(code: i64) -> Option<Self> {
                match code {
                    $( $code => Some(Opcode::$name), )*
                    _ => None,
                }
            }

            /// Returns the assembly-style mnemonic for this opcode.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }

            /// Returns how many parameter words follow the instruction word.
            pub const fn parameters(&self) -> usize {
                match self {
                    $( Opcode::$name => $params, )*
                }
            }
        }
    };
}

for_each_opcode!(define_opcodes);
