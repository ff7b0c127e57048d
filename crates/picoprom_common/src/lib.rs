pub mod pins;
pub mod word;

pub use word::{ControlLines, Direction, Transaction};

/// Number of addressable cells in the emulated device (15-bit address bus).
pub const EEPROM_SIZE: usize = 1 << word::ADDRESS_BITS;
