/// Addressing mode of a single instruction parameter.
///
/// Encoded as one decimal digit per parameter, least-significant-first,
/// starting at the third decimal place of the instruction word. Digits the
/// word is too small to contain default to [`Mode::Position`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Parameter is a memory address.
    Position = 0,
    /// Parameter is the operand value itself.
    Immediate = 1,
    /// Parameter is an offset from the relative base.
    Relative = 2,
}

impl Mode {
    /// Converts a decoded decimal digit into a mode.
    ///
    /// Returns `None` for digits outside the mode set; the decoder attaches
    /// pointer and word context to the resulting fault.
    pub const fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(Mode::Position),
            1 => Some(Mode::Immediate),
            2 => Some(Mode::Relative),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digit_valid() {
        assert_eq!(Mode::from_digit(0), Some(Mode::Position));
        assert_eq!(Mode::from_digit(1), Some(Mode::Immediate));
        assert_eq!(Mode::from_digit(2), Some(Mode::Relative));
    }

    #[test]
    fn from_digit_invalid() {
        for digit in 3..10 {
            assert_eq!(Mode::from_digit(digit), None);
        }
        assert_eq!(Mode::from_digit(-1), None);
    }
}
