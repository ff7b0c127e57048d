pub mod script;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use picoprom_common::pins::PIN_DECLS;
use picoprom_core::{channel, spawn_dispatcher, DispatchStats, Eeprom, Transaction};
use typed_builder::TypedBuilder;

pub enum Command {
    Run(RunInfo),
    Pins,
}

#[derive(TypedBuilder)]
pub struct RunInfo {
    /// Transaction script; the built-in demo runs when absent.
    #[builder(default)]
    pub script_path: Option<PathBuf>,
    /// Where to write the final 32 KiB image.
    #[builder(default)]
    pub dump_path: Option<PathBuf>,
}

pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::Run(info) => run(info),
        Command::Pins => {
            let stdout = io::stdout();
            print_pins(&mut stdout.lock())
        }
    }
}

/// Power-on: declare the bus pins and fill the store.
pub fn boot() -> Eeprom {
    log::info!("eeprom starting");
    for decl in PIN_DECLS.iter() {
        log::debug!("pin {}", decl);
    }
    let eeprom = Eeprom::new();
    log::info!("eeprom initialized");
    eeprom
}

pub fn run(info: RunInfo) -> Result<()> {
    let source = match &info.script_path {
        Some(path) => {
            log::info!("Replaying script: '{}'", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("failed to read script '{}'", path.display()))?
        }
        None => {
            log::info!("No script provided, running the built-in demo");
            script::DEMO_SCRIPT.to_string()
        }
    };
    let transactions = script::parse(&source)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let (eeprom, stats) = replay(boot(), &transactions, &mut out)?;
    writeln!(out, "{} reads, {} writes", stats.reads, stats.writes)?;

    if let Some(path) = &info.dump_path {
        fs::write(path, eeprom.as_bytes())
            .with_context(|| format!("failed to write dump '{}'", path.display()))?;
        log::info!("Wrote {} bytes to '{}'", eeprom.as_bytes().len(), path.display());
    }
    Ok(())
}

/// Drive `transactions` through a dispatcher thread, one bus cycle at a
/// time, printing every read response.
///
/// Returns the store once the dispatcher has drained and stopped.
pub fn replay<W: Write>(
    eeprom: Eeprom,
    transactions: &[Transaction],
    out: &mut W,
) -> Result<(Eeprom, DispatchStats)> {
    let (sampler, port) = channel();
    let handle = spawn_dispatcher(eeprom, port).context("failed to spawn dispatcher thread")?;

    for transaction in transactions {
        if transaction.is_write() {
            if !sampler.write(transaction.address, transaction.data) {
                bail!("dispatcher stopped before write to {:#06x}", transaction.address);
            }
        } else {
            let value = sampler.read(transaction.address).ok_or_else(|| {
                anyhow!("dispatcher stopped before answering read of {:#06x}", transaction.address)
            })?;
            writeln!(out, "read {:04x} -> {:02x}", transaction.address, value)?;
        }
    }

    drop(sampler);
    handle
        .join()
        .map_err(|_| anyhow!("dispatcher thread panicked"))
}

pub fn print_pins<W: Write>(out: &mut W) -> Result<()> {
    for decl in PIN_DECLS.iter() {
        writeln!(out, "{}", decl)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use picoprom_core::Address;

    #[test]
    fn test_replay_demo() {
        let transactions = script::parse(script::DEMO_SCRIPT).unwrap();
        let mut out = Vec::new();
        let (eeprom, stats) = replay(Eeprom::new(), &transactions, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "read 1234 -> ab\nread 1234 -> ab\nread 0100 -> 01\nread 01ff -> 00\n"
        );
        assert_eq!(stats, DispatchStats { reads: 4, writes: 1 });
        assert_eq!(eeprom.read(Address::new(0x1234)), 0xAB);
    }

    #[test]
    fn test_replay_empty_script() {
        let mut out = Vec::new();
        let (eeprom, stats) = replay(Eeprom::new(), &[], &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats, DispatchStats::default());
        assert_eq!(eeprom.as_bytes(), Eeprom::new().as_bytes());
    }

    #[test]
    fn test_run_writes_dump() {
        let dir = std::env::temp_dir().join(format!("picoprom-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let script_path = dir.join("script.txt");
        let dump_path = dir.join("dump.bin");
        fs::write(&script_path, "w 0 5a\nw 7fff 01\n").unwrap();

        let info = RunInfo::builder()
            .script_path(Some(script_path))
            .dump_path(Some(dump_path.clone()))
            .build();
        run(info).unwrap();

        let image = fs::read(&dump_path).unwrap();
        assert_eq!(image.len(), picoprom_core::EEPROM_SIZE);
        assert_eq!(image[0], 0x5A);
        assert_eq!(image[1], 1);
        assert_eq!(image[0x7FFF], 0x01);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_run_missing_script() {
        let info = RunInfo::builder()
            .script_path(Some(PathBuf::from("/nonexistent/picoprom/script.txt")))
            .build();
        let err = run(info).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read script"));
    }

    #[test]
    fn test_print_pins() {
        let mut out = Vec::new();
        print_pins(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("/R       GPIO27"));
    }
}
