//! Transaction scripts replayed against the emulator.
//!
//! One transaction per line:
//!
//! ```text
//! # comment
//! w 1234 ab     # write 0xAB to 0x1234
//! r 0x1234      # read it back
//! ```
//!
//! Values are hexadecimal. Out-of-range values are masked to the field width,
//! exactly like the bus encoding does.

use anyhow::{anyhow, bail, Context, Result};
use picoprom_common::word::{encode_word, ADDRESS_MASK, DATA_MASK};
use picoprom_common::{Direction, Transaction};

/// Runs when no script is given.
pub const DEMO_SCRIPT: &str = "\
# store a byte, then read it back twice
w 1234 ab
r 1234
r 1234
# untouched cells still hold the power-on pattern
r 0100
r 01ff
";

pub fn parse(source: &str) -> Result<Vec<Transaction>> {
    let mut transactions = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let transaction =
            parse_line(line).with_context(|| format!("line {}: '{}'", index + 1, raw.trim()))?;
        transactions.push(transaction);
    }
    Ok(transactions)
}

fn parse_line(line: &str) -> Result<Transaction> {
    let mut fields = line.split_whitespace();
    let op = fields.next().ok_or_else(|| anyhow!("empty transaction"))?;
    let address = parse_hex(fields.next().ok_or_else(|| anyhow!("missing address"))?)?;

    let (direction, data) = match op {
        "r" | "R" | "read" => (Direction::Read, 0),
        "w" | "W" | "write" => {
            let data = parse_hex(fields.next().ok_or_else(|| anyhow!("missing data"))?)?;
            (Direction::Write, data)
        }
        other => bail!("unknown operation '{}', expected r or w", other),
    };

    if let Some(extra) = fields.next() {
        bail!("unexpected trailing field '{}'", extra);
    }
    if address & !ADDRESS_MASK != 0 {
        log::warn!("Address {:#X} wider than 15 bits, masked", address);
    }
    if data & !DATA_MASK != 0 {
        log::warn!("Data {:#X} wider than 8 bits, masked", data);
    }

    Ok(Transaction::decode(encode_word(address, data, direction)))
}

fn parse_hex(text: &str) -> Result<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).with_context(|| format!("invalid hex value '{}'", text))
}
