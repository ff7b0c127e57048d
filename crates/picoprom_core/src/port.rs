//! The handoff between the bus sampler and the dispatch loop.
//!
//! On hardware this is a co-processor FIFO. Here it is a pair of unbounded
//! `mpsc` channels: transaction words flow towards the dispatcher, response
//! bytes flow back.

use std::sync::mpsc::{self, Receiver, Sender};

use picoprom_common::Transaction;

/// Dispatcher-side view of the bus sampler.
pub trait SamplerPort {
    /// Wait, without timeout, for the next transaction word.
    ///
    /// Returns `None` once the sampler is gone and no more words can arrive.
    fn get_blocking(&mut self) -> Option<u32>;

    /// Hand a read response back. Must not block: the sampler is already
    /// waiting for it.
    fn put(&mut self, value: u8);
}

/// Create a connected sampler/dispatcher pair.
pub fn channel() -> (BusSampler, ChannelPort) {
    let (word_tx, word_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();
    (
        BusSampler {
            words: word_tx,
            responses: response_rx,
        },
        ChannelPort {
            words: word_rx,
            responses: response_tx,
        },
    )
}

pub struct ChannelPort {
    words: Receiver<u32>,
    responses: Sender<u8>,
}

impl SamplerPort for ChannelPort {
    #[inline]
    fn get_blocking(&mut self) -> Option<u32> {
        self.words.recv().ok()
    }

    #[inline]
    fn put(&mut self, value: u8) {
        if self.responses.send(value).is_err() {
            log::warn!("Sampler gone, dropping read response 0x{:02X}", value);
        }
    }
}

/// Software stand-in for the bus sampler.
///
/// Emits one word per transaction, in call order, and collects the
/// responses for reads. Dropping it closes the port and lets the dispatch
/// loop return.
pub struct BusSampler {
    words: Sender<u32>,
    responses: Receiver<u8>,
}

impl BusSampler {
    /// Forward a raw transaction word. Returns `false` if the dispatcher has
    /// stopped.
    ///
    /// For a read word the response must later be collected with
    /// [`BusSampler::response`], in submission order.
    pub fn submit(&self, word: u32) -> bool {
        self.words.send(word).is_ok()
    }

    /// Block until the response to the oldest outstanding read arrives.
    pub fn response(&self) -> Option<u8> {
        self.responses.recv().ok()
    }

    pub fn write(&self, address: u16, data: u8) -> bool {
        self.submit(Transaction::write(address, data).encode())
    }

    /// Full read round trip.
    pub fn read(&self, address: u16) -> Option<u8> {
        if !self.submit(Transaction::read(address).encode()) {
            return None;
        }
        self.response()
    }

    /// Run one transaction, returning the response for reads.
    pub fn transact(&self, transaction: Transaction) -> Option<u8> {
        if transaction.is_write() {
            self.write(transaction.address, transaction.data);
            None
        } else {
            self.read(transaction.address)
        }
    }
}
