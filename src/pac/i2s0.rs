//! Field definitions of the I2S0 registers
//!
//! The transmit registers share the receive layout (`TCSR`/`RCSR`, `TCR1`/`RCR1`, ...), so only
//! the receive names are given here.

use super::Field;

#[doc = "Receive control register (RCSR) fields"]
pub mod rcsr {
    #[doc = "Bit 31 - Receiver enable"]
    pub const RE: u32 = 1 << 31;
    #[doc = "Bit 30 - Stop enable"]
    pub const STOPE: u32 = 1 << 30;
    #[doc = "Bit 29 - Debug enable"]
    pub const DBGE: u32 = 1 << 29;
    #[doc = "Bit 28 - Bit clock enable"]
    pub const BCE: u32 = 1 << 28;
    #[doc = "Bit 25 - FIFO reset (write only)"]
    pub const FR: u32 = 1 << 25;
    #[doc = "Bit 24 - Software reset"]
    pub const SR: u32 = 1 << 24;
    #[doc = "Bit 20 - Word start flag (write 1 to clear)"]
    pub const WSF: u32 = 1 << 20;
    #[doc = "Bit 19 - Sync error flag (write 1 to clear)"]
    pub const SEF: u32 = 1 << 19;
    #[doc = "Bit 18 - FIFO error flag (write 1 to clear)"]
    pub const FEF: u32 = 1 << 18;
    #[doc = "Bit 17 - FIFO warning flag"]
    pub const FWF: u32 = 1 << 17;
    #[doc = "Bit 16 - FIFO request flag"]
    pub const FRF: u32 = 1 << 16;
    #[doc = "Bit 12 - Word start interrupt enable"]
    pub const WSIE: u32 = 1 << 12;
    #[doc = "Bit 11 - Sync error interrupt enable"]
    pub const SEIE: u32 = 1 << 11;
    #[doc = "Bit 10 - FIFO error interrupt enable"]
    pub const FEIE: u32 = 1 << 10;
    #[doc = "Bit 9 - FIFO warning interrupt enable"]
    pub const FWIE: u32 = 1 << 9;
    #[doc = "Bit 8 - FIFO request interrupt enable"]
    pub const FRIE: u32 = 1 << 8;
    #[doc = "Bit 1 - FIFO warning DMA enable"]
    pub const FWDE: u32 = 1 << 1;
    #[doc = "Bit 0 - FIFO request DMA enable"]
    pub const FRDE: u32 = 1 << 0;

    /// Flags cleared by writing 1
    pub const W1C_FLAGS: u32 = WSF | SEF | FEF;
}

#[doc = "Receive configuration 1 register (RCR1) fields"]
pub mod rcr1 {
    use super::Field;
    #[doc = "Bits 0:2 - Receive FIFO watermark"]
    pub const RFW: Field = Field::new(0, 3);
}

#[doc = "Receive configuration 2 register (RCR2) fields"]
pub mod rcr2 {
    use super::Field;
    #[doc = "Bits 30:31 - Synchronous mode"]
    pub const SYNC: Field = Field::new(30, 2);
    #[doc = "Bit 29 - Bit clock swap"]
    pub const BCS: u32 = 1 << 29;
    #[doc = "Bit 28 - Bit clock input"]
    pub const BCI: u32 = 1 << 28;
    #[doc = "Bits 26:27 - MCLK select"]
    pub const MSEL: Field = Field::new(26, 2);
    #[doc = "Bit 25 - Bit clock polarity (active low)"]
    pub const BCP: u32 = 1 << 25;
    #[doc = "Bit 24 - Bit clock direction (generated internally, master)"]
    pub const BCD: u32 = 1 << 24;
    #[doc = "Bits 0:7 - Bit clock divide, BCLK = MCLK / ((DIV + 1) * 2)"]
    pub const DIV: Field = Field::new(0, 8);
}

#[doc = "Receive configuration 3 register (RCR3) fields"]
pub mod rcr3 {
    use super::Field;
    #[doc = "Bit 16 - Receive channel enable"]
    pub const RCE: u32 = 1 << 16;
    #[doc = "Bits 0:4 - Word flag configuration"]
    pub const WDFL: Field = Field::new(0, 5);
}

#[doc = "Receive configuration 4 register (RCR4) fields"]
pub mod rcr4 {
    use super::Field;
    #[doc = "Bits 16:19 - Frame size, in words, minus one"]
    pub const FRSZ: Field = Field::new(16, 4);
    #[doc = "Bits 8:12 - Sync width, in bit clocks, minus one"]
    pub const SYWD: Field = Field::new(8, 5);
    #[doc = "Bit 4 - MSB first"]
    pub const MF: u32 = 1 << 4;
    #[doc = "Bit 3 - Frame sync early (one bit before the frame)"]
    pub const FSE: u32 = 1 << 3;
    #[doc = "Bit 1 - Frame sync polarity (active low)"]
    pub const FSP: u32 = 1 << 1;
    #[doc = "Bit 0 - Frame sync direction (generated internally, master)"]
    pub const FSD: u32 = 1 << 0;
}

#[doc = "Receive configuration 5 register (RCR5) fields"]
pub mod rcr5 {
    use super::Field;
    #[doc = "Bits 24:28 - Word N width, minus one"]
    pub const WNW: Field = Field::new(24, 5);
    #[doc = "Bits 16:20 - Word 0 width, minus one"]
    pub const W0W: Field = Field::new(16, 5);
    #[doc = "Bits 8:12 - First bit shifted"]
    pub const FBT: Field = Field::new(8, 5);
}

#[doc = "MCLK control register (MCR) fields"]
pub mod mcr {
    use super::Field;
    #[doc = "Bit 31 - Divider update flag"]
    pub const DUF: u32 = 1 << 31;
    #[doc = "Bit 30 - MCLK output enable"]
    pub const MOE: u32 = 1 << 30;
    #[doc = "Bits 24:25 - MCLK input clock select"]
    pub const MICS: Field = Field::new(24, 2);
}

#[doc = "MCLK divide register (MDR) fields"]
pub mod mdr {
    use super::Field;
    #[doc = "Bits 12:19 - MCLK fraction, minus one"]
    pub const FRACT: Field = Field::new(12, 8);
    #[doc = "Bits 0:11 - MCLK divide, minus one"]
    pub const DIVIDE: Field = Field::new(0, 12);
}
