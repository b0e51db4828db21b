/// Growable integer memory, initialized from a program template.
///
/// Every address from 0 upward is readable: addresses beyond the populated
/// region hold 0. Writes past the end zero-extend the populated region up
/// to the written address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<i64>,
}

impl Memory {
    /// Creates a memory image from the given cells.
    pub fn new(cells: Vec<i64>) -> Self {
        Self { cells }
    }

    /// Reads the value at `address`, yielding 0 past the populated region.
    pub fn read(&self, address: usize) -> i64 {
        self.cells.get(address).copied().unwrap_or(0)
    }

    /// Writes `value` at `address`, zero-extending the populated region if
    /// the address lies past its end.
    pub fn write(&mut self, address: usize, value: i64) {
        if address >= self.cells.len() {
            self.cells.resize(address + 1, 0);
        }
        self.cells[address] = value;
    }

    /// Returns the populated region length.
    ///
    /// Addresses at or past this length read as 0 until written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell has been populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the populated region as a slice.
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_inside_populated_region() {
        let memory = Memory::new(vec![10, 20, 30]);
        assert_eq!(memory.read(0), 10);
        assert_eq!(memory.read(2), 30);
    }

    #[test]
    fn read_past_end_is_zero() {
        let memory = Memory::new(vec![10, 20, 30]);
        assert_eq!(memory.read(3), 0);
        assert_eq!(memory.read(1_000_000), 0);
        assert_eq!(memory.len(), 3);
    }

    #[test]
    fn write_past_end_zero_extends() {
        let mut memory = Memory::new(vec![1]);
        memory.write(4, 7);
        assert_eq!(memory.len(), 5);
        assert_eq!(memory.as_slice(), &[1, 0, 0, 0, 7]);
    }

    #[test]
    fn write_inside_populated_region() {
        let mut memory = Memory::new(vec![1, 2, 3]);
        memory.write(1, 9);
        assert_eq!(memory.as_slice(), &[1, 9, 3]);
        assert_eq!(memory.len(), 3);
    }
}
