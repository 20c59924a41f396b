#[doc = "Address of System Clock Gating Control Register 6 (SIM_SCGC6)"]
pub const SCGC6_ADDRESS: usize = 0x4004_803c;

#[doc = "SIM_SCGC6 fields"]
pub mod scgc6 {
    #[doc = "Bit 15 - I2S clock gate control"]
    pub const I2S: u32 = 1 << 15;
}
