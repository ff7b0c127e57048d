//! Board pin declarations.
//!
//! These describe how the emulated chip's bus is wired to the
//! microcontroller's GPIOs. Provisioning tools read them to label pins; the
//! dispatch path never looks at them.

use std::fmt;

/// Pins that carry the address bus, A0-A14.
pub const ADDRESS_PIN_MASK: u32 = 0x7FFF;
/// Pins that carry the data bus, D0-D7.
pub const DATA_PIN_MASK: u32 = 0xFF << 15;

pub const WRITE_ENABLE_PIN: u8 = 26;
pub const READ_ENABLE_PIN: u8 = 27;
pub const CHIP_SELECT_PIN: u8 = 28;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PinGroup {
    /// A contiguous or sparse set of pins sharing one label.
    Mask(u32),
    Single(u8),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PinDecl {
    pub label: &'static str,
    pub pins: PinGroup,
}

impl PinDecl {
    const fn mask(label: &'static str, mask: u32) -> Self {
        Self {
            label,
            pins: PinGroup::Mask(mask),
        }
    }

    const fn single(label: &'static str, pin: u8) -> Self {
        Self {
            label,
            pins: PinGroup::Single(pin),
        }
    }

    /// GPIO bitmask covered by this declaration.
    pub const fn gpio_mask(&self) -> u32 {
        match self.pins {
            PinGroup::Mask(mask) => mask,
            PinGroup::Single(pin) => 1 << pin,
        }
    }
}

impl fmt::Display for PinDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pins {
            PinGroup::Mask(mask) => {
                let first = mask.trailing_zeros();
                let last = 31 - mask.leading_zeros();
                write!(f, "{:<8} GPIO{}-GPIO{}", self.label, first, last)
            }
            PinGroup::Single(pin) => write!(f, "{:<8} GPIO{}", self.label, pin),
        }
    }
}

pub const PIN_DECLS: [PinDecl; 5] = [
    PinDecl::mask("A0-A14", ADDRESS_PIN_MASK),
    PinDecl::mask("D0-D7", DATA_PIN_MASK),
    PinDecl::single("/W", WRITE_ENABLE_PIN),
    PinDecl::single("/R", READ_ENABLE_PIN),
    PinDecl::single("/CS", CHIP_SELECT_PIN),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_do_not_overlap() {
        let mut seen = 0u32;
        for decl in PIN_DECLS.iter() {
            assert_eq!(seen & decl.gpio_mask(), 0, "{} overlaps", decl.label);
            seen |= decl.gpio_mask();
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(PIN_DECLS[0].to_string(), "A0-A14   GPIO0-GPIO14");
        assert_eq!(PIN_DECLS[1].to_string(), "D0-D7    GPIO15-GPIO22");
        assert_eq!(PIN_DECLS[4].to_string(), "/CS      GPIO28");
    }
}
