//! Transaction dispatch loop.
//!
//! The loop is a two-state machine: idle while waiting for the next word,
//! then one read or one write, then idle again. Nothing is carried over from
//! one transaction to the next.
//!
//! The decoder never looks at `/CS` or `/W`. The sampler only emits a word
//! once the chip is selected and the cycle has resolved (for writes, after
//! the rising `/W` edge), and the loop relies on that: whatever word
//! arrives is serviced.

use std::io;
use std::thread::{self, JoinHandle};

use picoprom_common::{Direction, Transaction};

use crate::memory::{Address, Eeprom};
use crate::port::{ChannelPort, SamplerPort};

macro_rules! op_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "op-trace")]
        log::debug!($($arg)*);
    };
}

/// Counters reported when the loop stops.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DispatchStats {
    pub reads: u64,
    pub writes: u64,
}

pub struct Dispatcher<'a> {
    eeprom: &'a mut Eeprom,
    stats: DispatchStats,
}

impl<'a> Dispatcher<'a> {
    pub fn new(eeprom: &'a mut Eeprom) -> Self {
        Self {
            eeprom,
            stats: DispatchStats::default(),
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Service exactly one transaction word.
    #[inline(always)]
    pub fn service<P: SamplerPort + ?Sized>(&mut self, word: u32, port: &mut P) {
        let address = Address::from_word(word);

        // Reads go first: the host is stalled on the bus until the
        // response is out.
        match Direction::from_word(word) {
            Direction::Read => {
                let value = self.eeprom.read(address);
                port.put(value);
                self.stats.reads += 1;
                op_trace!("read {:x}", value);
            }
            Direction::Write => {
                let data = Transaction::decode(word).data;
                self.eeprom.write(address, data);
                self.stats.writes += 1;
                op_trace!("wrote {:x}", data);
            }
        }

        op_trace!(
            "completed op {:x}: /R {} /W {} /CS {} adr {:x} data {:x}",
            word,
            (word >> 2) & 1,
            (word >> 3) & 1,
            (word >> 4) & 1,
            address.get(),
            Transaction::decode(word).data
        );
    }

    /// Service words until the sampler side closes.
    ///
    /// On hardware this never returns; only a reset stops it.
    pub fn run<P: SamplerPort + ?Sized>(mut self, port: &mut P) -> DispatchStats {
        while let Some(word) = port.get_blocking() {
            self.service(word, port);
        }
        log::info!(
            "Dispatcher stopped after {} reads, {} writes",
            self.stats.reads,
            self.stats.writes
        );
        self.stats
    }
}

/// Run the dispatch loop on its own thread.
///
/// The thread owns the store while it runs and hands it back, together with
/// the counters, once the [`BusSampler`](crate::port::BusSampler) is dropped.
pub fn spawn_dispatcher(
    mut eeprom: Eeprom,
    mut port: ChannelPort,
) -> io::Result<JoinHandle<(Eeprom, DispatchStats)>> {
    thread::Builder::new()
        .name("picoprom_dispatch".into())
        .spawn(move || {
            let stats = Dispatcher::new(&mut eeprom).run(&mut port);
            (eeprom, stats)
        })
}
