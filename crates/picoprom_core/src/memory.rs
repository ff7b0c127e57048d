use picoprom_common::word::{word_address, ADDRESS_MASK};
use picoprom_common::EEPROM_SIZE;

/// Cell address inside the emulated device.
///
/// Every constructor masks to 15 bits, so indexing the store with an
/// `Address` can never go out of range.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Address(u16);

impl Address {
    #[inline(always)]
    pub const fn new(raw: u16) -> Self {
        Self(raw & ADDRESS_MASK as u16)
    }

    /// Address field of a transaction word.
    #[inline(always)]
    pub const fn from_word(word: u32) -> Self {
        Self(word_address(word))
    }

    #[inline(always)]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline(always)]
    const fn index(self) -> usize {
        self.0 as usize & (EEPROM_SIZE - 1)
    }
}

impl From<u16> for Address {
    fn from(raw: u16) -> Self {
        Address::new(raw)
    }
}

/// Contents cell `index` holds right after power-on.
#[inline]
pub const fn initial_value(index: u16) -> u8 {
    (index as u8).wrapping_add((index >> 8) as u8)
}

/// The emulated chip's contents.
///
/// Volatile on purpose: a fresh store always starts from the same fill
/// pattern (see [`initial_value`]) and nothing is ever written back.
pub struct Eeprom {
    cells: [u8; EEPROM_SIZE],
}

impl Default for Eeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl Eeprom {
    pub fn new() -> Self {
        let mut eeprom = Self {
            cells: [0; EEPROM_SIZE],
        };
        eeprom.fill_initial();
        eeprom
    }

    /// Restore the power-on contents in place.
    pub fn reset(&mut self) {
        self.fill_initial();
    }

    fn fill_initial(&mut self) {
        for (i, cell) in self.cells.iter_mut().enumerate() {
            *cell = initial_value(i as u16);
        }
    }

    #[inline(always)]
    pub fn read(&self, address: Address) -> u8 {
        self.cells[address.index()]
    }

    #[inline(always)]
    pub fn write(&mut self, address: Address, value: u8) {
        self.cells[address.index()] = value;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }
}
