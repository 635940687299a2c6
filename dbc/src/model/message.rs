//! `Message` and its bit-occupancy map (spec §3 "Message").

use crate::error::Error;
use crate::model::attribute::Attributes;
use crate::model::signal::Signal;

/// One slot of a message's `length*8`-bit occupancy map. Tracks which
/// roles claim the bit and the signal names that claim it, so an overlap
/// can be reported with both offending names (spec §8 S6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BitSlot {
    normal: bool,
    multiplexor: bool,
    multiplexed: bool,
    owners: Vec<String>,
}

impl BitSlot {
    fn is_empty(&self) -> bool {
        !self.normal && !self.multiplexor && !self.multiplexed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u32,
    pub name: String,
    /// Length in bytes. Classical CAN targets 1..8; larger lengths are
    /// accepted but not targeted by the emitter (spec §3).
    pub length: u32,
    pub transmitter: String,
    pub description: String,
    pub signals: Vec<Signal>,
    /// Generic attribute assignments. The period (`GenMsgCycleTime`) and
    /// send-type (`GenMsgSendType`) sugar fields the JSON projection
    /// exposes live here as ordinary entries, not as dedicated fields
    /// (spec §4.4 step 7: "the value is still stored as a normal
    /// attribute"; §4.6 does the sugar folding at the JSON boundary).
    pub attributes: Attributes,
    /// Set during lowering iff the message has more than one multiplexor
    /// signal (spec §4.4 step 9).
    pub extended_mux: bool,
    occupancy: Vec<BitSlot>,
}

impl Message {
    pub fn new(id: u32, name: impl Into<String>, length: u32, transmitter: impl Into<String>) -> Self {
        Message {
            id,
            name: name.into(),
            length,
            transmitter: transmitter.into(),
            description: String::new(),
            signals: vec![],
            attributes: Attributes::default(),
            extended_mux: false,
            occupancy: vec![BitSlot::default(); (length * 8) as usize],
        }
    }

    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn signal_mut(&mut self, name: &str) -> Option<&mut Signal> {
        self.signals.iter_mut().find(|s| s.name == name)
    }

    /// Name uniqueness, bit-range bounds, and bit-occupancy overlap (spec
    /// §4.3, §3 message invariants a/b/c).
    pub fn add_signal(&mut self, sig: Signal) -> crate::Result<()> {
        if self.signals.iter().any(|s| s.name == sig.name) {
            return Err(Error::DuplicateName { kind: "signal", name: sig.name });
        }

        let end = sig.start_bit as usize + sig.size as usize;
        if end > self.occupancy.len() {
            return Err(Error::OutOfRange {
                what: format!("signal '{}' bit range", sig.name),
                value: format!("[{}, {})", sig.start_bit, end),
                bounds: format!("[0, {})", self.occupancy.len()),
            });
        }

        let is_multiplexed = sig.role.is_multiplexed();
        let is_multiplexor = sig.role.is_multiplexor();

        for bit in sig.start_bit as usize..end {
            let slot = &self.occupancy[bit];
            if !slot.is_empty() {
                let compatible = is_multiplexed && slot.multiplexed && !slot.normal;
                if !compatible {
                    let first = slot.owners.last().cloned().unwrap_or_default();
                    return Err(Error::BitOverlap {
                        message_id: self.id,
                        first,
                        second: sig.name,
                        bit: bit as u32,
                    });
                }
            }
        }

        for bit in sig.start_bit as usize..end {
            let slot = &mut self.occupancy[bit];
            slot.normal |= !is_multiplexed && !is_multiplexor;
            slot.multiplexor |= is_multiplexor;
            slot.multiplexed |= is_multiplexed;
            slot.owners.push(sig.name.clone());
        }

        self.signals.push(sig);
        Ok(())
    }

    pub fn bit_len(&self) -> u32 {
        self.occupancy.len() as u32
    }
}
