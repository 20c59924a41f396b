//! This library drives the synchronous audio interface (SAI, named I2S0 in the reference
//! manual) of Kinetis K20 microcontrollers as an I2S bus master receiving two-channel audio.
//!
//! The driver generates the master clock (MCLK), the bit clock (BCLK) and the frame sync
//! (WCLK) for an external codec, and uses the receive FIFO request interrupt to copy each frame
//! to two caller-provided words before calling a user callback.
//!
//! # Usage
//!
//! Build a [`Sai`] around the on-chip peripheral, configure it with [`SaiConfig`], install it
//! in [`SAI0`] and start reception. The application's vector table must call
//! [`i2s0_rx_isr`] and [`i2s0_tx_isr`] for the I2S0 receive and transmit interrupts.
//!
//! ```ignore
//! static LEFT: AtomicU32 = AtomicU32::new(0);
//! static RIGHT: AtomicU32 = AtomicU32::new(0);
//!
//! fn on_frame() {
//!     let (l, r) = (LEFT.load(Relaxed), RIGHT.load(Relaxed));
//!     /* process one frame, quickly */
//! }
//!
//! let mut sai = unsafe { Sai::steal(0) }?;
//! sai.begin(&SaiConfig::with_sample_rate(48_000, 32, 2))?;
//! SAI0.install(sai)?;
//! SAI0.with(|sai| unsafe { sai.start_rx(on_frame, LEFT.as_ptr(), RIGHT.as_ptr()) });
//! ```
//!
//! For fine control, or with a framework that owns the interrupt handlers, a [`Sai`] can also
//! be used directly: call [`Sai::on_rx_interrupt`] from the receive handler.
//!
//! # Clocks
//!
//! Only 48 kHz is supported from a sample rate, with MCLK = 96 MHz × 16 / 125 = 12.288 MHz and
//! BCLK = MCLK / 4 = 3.072 MHz. Other clock inputs can be served with
//! [`SaiConfig::with_divider`].
//!
//! # Issues and limitations
//! - The transmit registers are not configured. `start_tx` only manages the transmit
//!   interrupt and its callback.
//! - Each receive interrupt reads three words from the data register and keeps the first and
//!   the third one. The middle read is required by the hardware; removing it misaligns the
//!   channels.
//! - Nothing checks the channel count, the bit width or the destination addresses.
//!
#![no_std]

#[cfg(test)]
extern crate std;

// Must come first, the other modules use its macros
mod fmt;

pub mod config;
pub mod driver;
pub mod irq;
pub mod pac;
pub mod registry;

#[cfg(test)]
mod sim;

pub use crate::config::{ClockSource, MclkDivider, SaiConfig};
pub use crate::driver::{Callback, RxStatus, Sai};
pub use crate::irq::{InterruptController, Irq, Nvic};
pub use crate::pac::{InstanceMap, Mmio, Register, SaiRegisters};
pub use crate::registry::{i2s0_rx_isr, i2s0_tx_isr, HardwareSai, Slot, SAI0};

/// Errors reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The sample rate has no entry in [`config::MCLK_TABLE`]
    UnsupportedSampleRate(u32),
    /// No register map exists for this instance id
    UnknownInstance(u8),
    /// The registry slot already holds a driver
    AlreadyInstalled,
    /// Reception was resumed before it was ever started
    NotStarted,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnsupportedSampleRate(rate) => write!(f, "unsupported sample rate {} Hz", rate),
            Error::UnknownInstance(id) => write!(f, "no SAI instance {}", id),
            Error::AlreadyInstalled => f.write_str("SAI driver already installed"),
            Error::NotStarted => f.write_str("SAI reception never started"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn error_messages() {
        assert_eq!(
            Error::UnsupportedSampleRate(44_100).to_string(),
            "unsupported sample rate 44100 Hz"
        );
        assert_eq!(Error::UnknownInstance(3).to_string(), "no SAI instance 3");
    }
}
