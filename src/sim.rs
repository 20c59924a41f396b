//! Simulated register file and interrupt controller for host tests

use std::collections::{BTreeSet, VecDeque};
use std::vec::Vec;

use crate::irq::{InterruptController, Irq};
use crate::pac::i2s0::rcsr;
use crate::pac::{Register, SaiRegisters};

/// One register access, with the value read or written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read(Register, u32),
    Write(Register, u32),
}

impl Access {
    pub(crate) fn register(&self) -> Register {
        match *self {
            Access::Read(register, _) | Access::Write(register, _) => register,
        }
    }
}

/// Status bits of RCSR that software cannot write
const RCSR_READ_ONLY: u32 = rcsr::FRF | rcsr::FWF;

/// Register file with a receive FIFO behind `Rdr0`
///
/// `Rcsr` behaves like the hardware: writing `FR` empties the FIFO and is not latched, writing 1
/// to a flag in `W1C_FLAGS` clears it, and `FRF`/`FWF` only change through [`set`](Self::set) or
/// a FIFO reset.
#[derive(Debug, Default)]
pub(crate) struct SimRegisters {
    values: [u32; Register::COUNT],
    rx_fifo: VecDeque<u32>,
    log: Vec<Access>,
    fifo_resets: usize,
}

impl SimRegisters {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current value, without logging an access
    pub(crate) fn value(&self, register: Register) -> u32 {
        self.values[register as usize]
    }

    /// Forces a value, bypassing write semantics and the log
    pub(crate) fn set(&mut self, register: Register, value: u32) {
        self.values[register as usize] = value;
    }

    /// Queues words in the receive FIFO
    pub(crate) fn push_rx(&mut self, words: &[u32]) {
        self.rx_fifo.extend(words.iter().copied());
    }

    pub(crate) fn log(&self) -> &[Access] {
        &self.log
    }

    pub(crate) fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Number of writes with `RCSR.FR` set
    pub(crate) fn fifo_resets(&self) -> usize {
        self.fifo_resets
    }
}

impl SaiRegisters for SimRegisters {
    fn read(&mut self, register: Register) -> u32 {
        let value = match register {
            Register::Rdr0 => self.rx_fifo.pop_front().unwrap_or(0),
            _ => self.values[register as usize],
        };
        self.log.push(Access::Read(register, value));
        value
    }

    fn write(&mut self, register: Register, value: u32) {
        self.log.push(Access::Write(register, value));
        if register != Register::Rcsr {
            self.values[register as usize] = value;
            return;
        }
        let old = self.values[register as usize];
        let mut stored = (old & RCSR_READ_ONLY)
            | (old & rcsr::W1C_FLAGS & !value)
            | (value & !(RCSR_READ_ONLY | rcsr::W1C_FLAGS | rcsr::FR));
        if value & rcsr::FR != 0 {
            self.rx_fifo.clear();
            self.fifo_resets += 1;
            stored &= !RCSR_READ_ONLY;
        }
        self.values[register as usize] = stored;
    }
}

/// Interrupt controller keeping the set of enabled lines
#[derive(Debug, Default)]
pub(crate) struct SimInterrupts {
    enabled: BTreeSet<u16>,
}

impl SimInterrupts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_enabled(&self, irq: u16) -> bool {
        self.enabled.contains(&irq)
    }
}

impl InterruptController for SimInterrupts {
    fn enable(&mut self, irq: Irq) {
        self.enabled.insert(irq.0);
    }

    fn disable(&mut self, irq: Irq) {
        self.enabled.remove(&irq.0);
    }
}
