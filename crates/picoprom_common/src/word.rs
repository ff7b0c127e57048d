//! Layout of the 32-bit word the bus sampler hands over for every completed
//! bus transaction.
//!
//! | Bits  | Field    |
//! |-------|----------|
//! | 0-1   | reserved |
//! | 2     | `/R`: 0 = host reads, 1 = host writes |
//! | 3     | `/W` write strobe |
//! | 4     | `/CS` chip select |
//! | 5-7   | reserved |
//! | 8-22  | address  |
//! | 23-30 | data     |
//! | 31    | reserved |
//!
//! Both [`Transaction::decode`] and [`encode_word`] are built from the
//! constants below so the two sides cannot drift apart.

use bitflags::bitflags;

pub const ADDRESS_SHIFT: u32 = 8;
pub const ADDRESS_BITS: u32 = 15;
pub const ADDRESS_MASK: u32 = (1 << ADDRESS_BITS) - 1;

pub const DATA_SHIFT: u32 = 23;
pub const DATA_BITS: u32 = 8;
pub const DATA_MASK: u32 = (1 << DATA_BITS) - 1;

pub const READ_WRITE_BIT: u32 = 2;
pub const WRITE_STROBE_BIT: u32 = 3;
pub const CHIP_SELECT_BIT: u32 = 4;

bitflags! {
    /// Control line levels captured alongside the address and data pins.
    ///
    /// Only `READ_WRITE` takes part in dispatch. The other two are carried
    /// for diagnostics; the sampler only emits a word once the transaction is
    /// selected and resolved, so they are not re-checked here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlLines: u32 {
        /// `/R` high: the host is writing.
        const READ_WRITE = 1 << READ_WRITE_BIT;
        /// `/W` level.
        const WRITE_STROBE = 1 << WRITE_STROBE_BIT;
        /// `/CS` level.
        const CHIP_SELECT = 1 << CHIP_SELECT_BIT;
    }
}

impl ControlLines {
    #[inline]
    pub const fn from_word(word: u32) -> Self {
        Self::from_bits_truncate(word)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Read,
    Write,
}

impl Direction {
    #[inline(always)]
    pub const fn from_word(word: u32) -> Self {
        if word & (1 << READ_WRITE_BIT) == 0 {
            Direction::Read
        } else {
            Direction::Write
        }
    }

    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Direction::Write)
    }
}

/// Address field of a transaction word, always within the 15-bit range.
#[inline(always)]
pub const fn word_address(word: u32) -> u16 {
    ((word >> ADDRESS_SHIFT) & ADDRESS_MASK) as u16
}

/// Data field of a transaction word.
#[inline(always)]
pub const fn word_data(word: u32) -> u8 {
    ((word >> DATA_SHIFT) & DATA_MASK) as u8
}

/// Build a transaction word the way the sampler reports a resolved cycle:
/// `/W` released high, `/CS` asserted low.
///
/// Address and data wider than their fields are truncated to the field
/// width, never saturated.
pub const fn encode_word(address: u32, data: u32, direction: Direction) -> u32 {
    let mut word = ((address & ADDRESS_MASK) << ADDRESS_SHIFT)
        | ((data & DATA_MASK) << DATA_SHIFT)
        | ControlLines::WRITE_STROBE.bits();
    if direction.is_write() {
        word |= ControlLines::READ_WRITE.bits();
    }
    word
}

/// A single decoded bus transaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Transaction {
    pub address: u16,
    /// Only meaningful for writes; reads carry whatever sat on the data pins.
    pub data: u8,
    pub direction: Direction,
}

impl Transaction {
    pub const fn read(address: u16) -> Self {
        Self {
            address: (address as u32 & ADDRESS_MASK) as u16,
            data: 0,
            direction: Direction::Read,
        }
    }

    pub const fn write(address: u16, data: u8) -> Self {
        Self {
            address: (address as u32 & ADDRESS_MASK) as u16,
            data,
            direction: Direction::Write,
        }
    }

    /// Total over every 32-bit input.
    #[inline(always)]
    pub const fn decode(word: u32) -> Self {
        Self {
            address: word_address(word),
            data: word_data(word),
            direction: Direction::from_word(word),
        }
    }

    pub const fn encode(&self) -> u32 {
        encode_word(self.address as u32, self.data as u32, self.direction)
    }

    #[inline]
    pub const fn is_write(&self) -> bool {
        self.direction.is_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_extraction() {
        // /R=1, /W=1, /CS=0, address 0x1234, data 0xAB.
        let word = 0b1100 | (0x1234 << 8) | (0xAB << 23);
        assert_eq!(word_address(word), 0x1234);
        assert_eq!(word_data(word), 0xAB);
        assert_eq!(Direction::from_word(word), Direction::Write);

        let read = word & !0b100;
        assert_eq!(Direction::from_word(read), Direction::Read);
    }

    #[test]
    fn test_reserved_bits_are_ignored() {
        let word = 0x8000_00E3 | (0x0042 << 8) | (0x5A << 23);
        let t = Transaction::decode(word);
        assert_eq!(t.address, 0x0042);
        assert_eq!(t.data, 0x5A);
        assert_eq!(t.direction, Direction::Read);
    }

    #[test]
    fn test_decode_is_total() {
        let t = Transaction::decode(u32::MAX);
        assert_eq!(t.address, 0x7FFF);
        assert_eq!(t.data, 0xFF);
        assert!(t.is_write());

        let t = Transaction::decode(0);
        assert_eq!(t, Transaction::read(0));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for address in [0u16, 1, 0x00FF, 0x0100, 0x1234, 0x4000, 0x7FFE, 0x7FFF] {
            for data in [0u8, 1, 0x7F, 0x80, 0xAB, 0xFF] {
                for direction in [Direction::Read, Direction::Write] {
                    let t = Transaction {
                        address,
                        data,
                        direction,
                    };
                    assert_eq!(Transaction::decode(t.encode()), t);
                }
            }
        }
    }

    #[test]
    fn test_oversized_fields_are_masked() {
        let word = encode_word(0x9234, 0x1AB, Direction::Write);
        let t = Transaction::decode(word);
        assert_eq!(t.address, 0x1234);
        assert_eq!(t.data, 0xAB);

        let word = encode_word(0x1_0000 + 7, 0x300, Direction::Read);
        let t = Transaction::decode(word);
        assert_eq!(t.address, 7);
        assert_eq!(t.data, 0);

        assert_eq!(Transaction::write(0xFFFF, 1).address, 0x7FFF);
        assert_eq!(Transaction::read(0x8000).address, 0);
    }

    #[test]
    fn test_encoded_control_lines() {
        let write = ControlLines::from_word(Transaction::write(0x10, 0x20).encode());
        assert_eq!(write, ControlLines::READ_WRITE | ControlLines::WRITE_STROBE);

        let read = ControlLines::from_word(Transaction::read(0x10).encode());
        assert_eq!(read, ControlLines::WRITE_STROBE);
        assert!(!read.contains(ControlLines::CHIP_SELECT));
    }
}
