//! I2S0 (SAI) register definitions
//!
//! This module is based on the register map of the Kinetis K20 family (MK20DX128). Field names
//! and bit positions follow the vendor header so that values can be checked against the
//! reference manual.
//!
//! Register access goes through the [`SaiRegisters`] trait. [`Mmio`] implements it with volatile
//! accesses to the memory-mapped registers of one [`InstanceMap`].

use vcell::VolatileCell;

use crate::Error;

#[doc = "Transmit/receive control, configuration, data and clock registers"]
pub mod i2s0;
#[doc = "System integration module, clock gating"]
pub mod sim;

/// A 32-bit memory-mapped register
pub type Reg = VolatileCell<u32>;

/// A bit field inside a 32-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    offset: u8,
    width: u8,
}

impl Field {
    pub const fn new(offset: u8, width: u8) -> Self {
        Field { offset, width }
    }

    /// Bits of the register covered by this field
    pub const fn mask(self) -> u32 {
        (((1u64 << self.width) - 1) as u32) << self.offset
    }

    /// Places `value` in this field. Bits of `value` that do not fit are dropped.
    pub const fn bits(self, value: u32) -> u32 {
        (value << self.offset) & self.mask()
    }

    /// Extracts this field from a register value
    pub const fn read(self, register: u32) -> u32 {
        (register & self.mask()) >> self.offset
    }
}

/// I2S0 register block
///
/// The transmit half (0x00..0x80) and the receive half (0x80..0x100) have the same layout.
#[repr(C)]
pub struct RegisterBlock {
    #[doc = "0x00 - Transmit control register"]
    pub tcsr: Reg,
    #[doc = "0x04 - Transmit configuration 1 register"]
    pub tcr1: Reg,
    #[doc = "0x08 - Transmit configuration 2 register"]
    pub tcr2: Reg,
    #[doc = "0x0c - Transmit configuration 3 register"]
    pub tcr3: Reg,
    #[doc = "0x10 - Transmit configuration 4 register"]
    pub tcr4: Reg,
    #[doc = "0x14 - Transmit configuration 5 register"]
    pub tcr5: Reg,
    _reserved0: [u32; 2],
    #[doc = "0x20 - Transmit data register 0"]
    pub tdr0: Reg,
    _reserved1: [u32; 7],
    #[doc = "0x40 - Transmit FIFO register 0"]
    pub tfr0: Reg,
    _reserved2: [u32; 7],
    #[doc = "0x60 - Transmit mask register"]
    pub tmr: Reg,
    _reserved3: [u32; 7],
    #[doc = "0x80 - Receive control register"]
    pub rcsr: Reg,
    #[doc = "0x84 - Receive configuration 1 register"]
    pub rcr1: Reg,
    #[doc = "0x88 - Receive configuration 2 register"]
    pub rcr2: Reg,
    #[doc = "0x8c - Receive configuration 3 register"]
    pub rcr3: Reg,
    #[doc = "0x90 - Receive configuration 4 register"]
    pub rcr4: Reg,
    #[doc = "0x94 - Receive configuration 5 register"]
    pub rcr5: Reg,
    _reserved4: [u32; 2],
    #[doc = "0xa0 - Receive data register 0"]
    pub rdr0: Reg,
    _reserved5: [u32; 7],
    #[doc = "0xc0 - Receive FIFO register 0"]
    pub rfr0: Reg,
    _reserved6: [u32; 7],
    #[doc = "0xe0 - Receive mask register"]
    pub rmr: Reg,
    _reserved7: [u32; 7],
    #[doc = "0x100 - MCLK control register"]
    pub mcr: Reg,
    #[doc = "0x104 - MCLK divide register"]
    pub mdr: Reg,
}

/// Registers the driver reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Tcsr,
    Tcr1,
    Tcr2,
    Tcr3,
    Tcr4,
    Tcr5,
    Tdr0,
    Tmr,
    Rcsr,
    Rcr1,
    Rcr2,
    Rcr3,
    Rcr4,
    Rcr5,
    Rdr0,
    Rmr,
    Mcr,
    Mdr,
    /// System clock gating control register 6, outside the I2S0 block
    SimScgc6,
}

impl Register {
    /// Number of registers, for register files indexed by `Register as usize`
    pub const COUNT: usize = Register::SimScgc6 as usize + 1;
}

/// Access to the registers of one SAI instance
///
/// Reads take `&mut self` because reading `Rdr0` pops the receive FIFO.
pub trait SaiRegisters {
    fn read(&mut self, register: Register) -> u32;

    fn write(&mut self, register: Register, value: u32);

    /// Read-modify-write of one register
    fn modify<F>(&mut self, register: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(register);
        self.write(register, f(value));
    }
}

/// Addresses and interrupt lines of one physical SAI instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceMap {
    /// Instance index, also the index into [`INSTANCES`]
    pub id: u8,
    /// Base address of the [`RegisterBlock`]
    pub registers: usize,
    /// Address of the clock gating register holding this instance's gate bit
    pub clock_gate: usize,
    /// Gate bit of this instance in the clock gating register
    pub clock_gate_mask: u32,
    /// Receive interrupt number
    pub rx_irq: u16,
    /// Transmit interrupt number
    pub tx_irq: u16,
}

/// I2S0 on MK20DX128
pub const I2S0: InstanceMap = InstanceMap {
    id: 0,
    registers: 0x4002_f000,
    clock_gate: sim::SCGC6_ADDRESS,
    clock_gate_mask: sim::scgc6::I2S,
    rx_irq: 14,
    tx_irq: 13,
};

/// Register maps, indexed by instance id. The K20 has a single SAI.
pub static INSTANCES: [InstanceMap; 1] = [I2S0];

/// Looks up the register map of an instance
///
/// Ids without a register map are rejected instead of producing a driver that would access
/// arbitrary addresses.
pub fn instance(id: u8) -> Result<&'static InstanceMap, Error> {
    INSTANCES
        .get(usize::from(id))
        .ok_or(Error::UnknownInstance(id))
}

/// Volatile access to the memory-mapped registers of one instance
#[derive(Debug)]
pub struct Mmio {
    registers: usize,
    clock_gate: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// The caller must own the peripheral described by `map`: no other code may access its
    /// registers while the returned value exists, and `map` must describe real hardware
    /// addresses on the running device.
    pub unsafe fn new(map: &InstanceMap) -> Self {
        Mmio {
            registers: map.registers,
            clock_gate: map.clock_gate,
        }
    }

    fn block(&self) -> &RegisterBlock {
        // Safety: the address comes from an InstanceMap, see `new`
        unsafe { &*(self.registers as *const RegisterBlock) }
    }

    fn cell(&self, register: Register) -> &Reg {
        match register {
            Register::Tcsr => &self.block().tcsr,
            Register::Tcr1 => &self.block().tcr1,
            Register::Tcr2 => &self.block().tcr2,
            Register::Tcr3 => &self.block().tcr3,
            Register::Tcr4 => &self.block().tcr4,
            Register::Tcr5 => &self.block().tcr5,
            Register::Tdr0 => &self.block().tdr0,
            Register::Tmr => &self.block().tmr,
            Register::Rcsr => &self.block().rcsr,
            Register::Rcr1 => &self.block().rcr1,
            Register::Rcr2 => &self.block().rcr2,
            Register::Rcr3 => &self.block().rcr3,
            Register::Rcr4 => &self.block().rcr4,
            Register::Rcr5 => &self.block().rcr5,
            Register::Rdr0 => &self.block().rdr0,
            Register::Rmr => &self.block().rmr,
            Register::Mcr => &self.block().mcr,
            Register::Mdr => &self.block().mdr,
            // Safety: as for `block`
            Register::SimScgc6 => unsafe { &*(self.clock_gate as *const Reg) },
        }
    }
}

impl SaiRegisters for Mmio {
    #[inline(always)]
    fn read(&mut self, register: Register) -> u32 {
        self.cell(register).get()
    }

    #[inline(always)]
    fn write(&mut self, register: Register, value: u32) {
        self.cell(register).set(value)
    }
}
