//! Interrupt driven SAI driver.
//!
//! [`Sai`] wraps the register access and interrupt control of one SAI instance. It configures
//! the master clock and the receive frame, and moves one two-channel frame from the receive
//! FIFO to caller memory on each receive interrupt.
//!
//! # Configure and start
//!
//! ```ignore
//! let mut sai = unsafe { Sai::steal(0) }?;
//! sai.begin(&SaiConfig::with_sample_rate(48_000, 32, 2))?;
//! unsafe { sai.start_rx(on_frame, LEFT.as_ptr(), RIGHT.as_ptr()) };
//! ```
//!
//! # Interrupt handling
//!
//! On each receive interrupt, [`Sai::on_rx_interrupt`] drains the FIFO and then calls the
//! receive callback. The callback therefore always sees the words of the frame that raised the
//! interrupt. When the driver lives in the [`registry`](crate::registry), the fixed handlers
//! [`i2s0_rx_isr`](crate::i2s0_rx_isr) and [`i2s0_tx_isr`](crate::i2s0_tx_isr) do this.
//!
//! # Callbacks
//!
//! Callbacks take no arguments and return nothing. They run in interrupt context and must not
//! block: the next frame is lost if the callback is still running when its FIFO request comes.
use core::convert::Infallible;
use core::ptr;

use crate::config::{
    bit_clock_hz, ClockSource, MclkDivider, SaiConfig, BCLK_DIV, BCLK_SOURCE_MCLK,
    MCLK_INPUT_HZ, SYNC_ASYNCHRONOUS,
};
use crate::irq::{InterruptController, Irq, Nvic};
use crate::pac::i2s0::{mcr, mdr, rcr1, rcr2, rcr3, rcr4, rcr5, rcsr};
use crate::pac::{self, InstanceMap, Mmio, Register, SaiRegisters};
use crate::Error;

/// Function called from an interrupt handler
pub type Callback = fn();

/// Content of the receive control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStatus {
    value: u32,
}

impl RxStatus {
    /// Get the FRF flag. If `true` the FIFO holds at least watermark + 1 words.
    pub fn fifo_request(&self) -> bool {
        self.value & rcsr::FRF != 0
    }

    /// Get the FWF flag. If `true` all enabled FIFOs are full.
    pub fn fifo_warning(&self) -> bool {
        self.value & rcsr::FWF != 0
    }

    /// Get the FEF flag. If `true` a FIFO overflowed and received words were lost.
    ///
    /// This flag stays set until cleared with [`Sai::clear_rx_errors`].
    pub fn fifo_error(&self) -> bool {
        self.value & rcsr::FEF != 0
    }

    /// Get the SEF flag. If `true` a frame sync was detected earlier than expected.
    pub fn sync_error(&self) -> bool {
        self.value & rcsr::SEF != 0
    }

    /// Get the WSF flag. If `true` the start of a word was detected.
    pub fn word_start(&self) -> bool {
        self.value & rcsr::WSF != 0
    }

    /// Raw register value
    pub fn bits(&self) -> u32 {
        self.value
    }
}

/// Where received frames go
#[derive(Debug, Clone, Copy)]
struct RxTarget {
    callback: Callback,
    ch0: *mut u32,
    ch1: *mut u32,
}

// Safety: the destinations are only written from the receive interrupt of a single core, and
// `start_rx` makes the caller responsible for their validity.
unsafe impl Send for RxTarget {}

/// Driver of one SAI instance.
///
///  - `R`: register access, [`Mmio`] on hardware
///  - `C`: interrupt line control, [`Nvic`] on hardware
pub struct Sai<R, C> {
    id: u8,
    registers: R,
    interrupts: C,
    clock_gate_mask: u32,
    rx_irq: Irq,
    tx_irq: Irq,
    channels: u8,
    bits: u8,
    sample_rate: Option<u32>,
    mclk_hz: Option<u32>,
    rx: Option<RxTarget>,
    tx_callback: Option<Callback>,
    rx_running: bool,
    tx_running: bool,
}

impl Sai<Mmio, Nvic> {
    /// Creates the driver for instance `id` on the running device.
    ///
    /// Fails with [`Error::UnknownInstance`] if `id` has no register map.
    ///
    /// # Safety
    ///
    /// The caller must own the peripheral: no other code may access its registers or its two
    /// interrupt lines while the driver exists. See also [`Mmio::new`] and [`Nvic::steal`].
    pub unsafe fn steal(id: u8) -> Result<Self, Error> {
        let map = pac::instance(id)?;
        Ok(Self::new(map, Mmio::new(map), Nvic::steal()))
    }
}

/// Constructors and Destructors
impl<R, C> Sai<R, C>
where
    R: SaiRegisters,
    C: InterruptController,
{
    /// Instantiates a driver for the instance described by `map`.
    ///
    /// Both interrupt lines are disabled, so no handler runs before a `start_*` call.
    pub fn new(map: &InstanceMap, registers: R, interrupts: C) -> Self {
        let mut sai = Sai {
            id: map.id,
            registers,
            interrupts,
            clock_gate_mask: map.clock_gate_mask,
            rx_irq: Irq(map.rx_irq),
            tx_irq: Irq(map.tx_irq),
            channels: 0,
            bits: 0,
            sample_rate: None,
            mclk_hz: None,
            rx: None,
            tx_callback: None,
            rx_running: false,
            tx_running: false,
        };
        sai.interrupts.disable(sai.rx_irq);
        sai.interrupts.disable(sai.tx_irq);
        sai
    }

    /// Stops both directions and releases the register and interrupt handles.
    pub fn release(mut self) -> (R, C) {
        self.stop_rx();
        self.stop_tx();
        (self.registers, self.interrupts)
    }
}

/// Configuration
impl<R, C> Sai<R, C>
where
    R: SaiRegisters,
    C: InterruptController,
{
    /// Configures the master clock and the receive frame.
    ///
    /// Fails with [`Error::UnsupportedSampleRate`] if the configuration asks for a sample rate
    /// missing from [`MCLK_TABLE`](crate::config::MCLK_TABLE). In that case no register is
    /// written and the driver must not be started.
    ///
    /// The transmit registers are left at their reset values.
    pub fn begin(&mut self, config: &SaiConfig) -> Result<(), Error> {
        let (divider, sample_rate) = match config.clock {
            ClockSource::SampleRate(rate) => (MclkDivider::for_sample_rate(rate)?, Some(rate)),
            ClockSource::Divider(divider) => (divider, None),
        };
        self.channels = config.channels;
        self.bits = config.bits;
        self.sample_rate = sample_rate;
        // The divider input is only known for table entries
        self.mclk_hz = sample_rate.map(|_| divider.output_hz(MCLK_INPUT_HZ));

        self.init_mclk(divider);
        self.init_rx();
        self.init_tx();
        Ok(())
    }

    /// Sets the clock gate of the peripheral. Setting it again has no effect.
    pub fn enable_bus_clock(&mut self) {
        let mask = self.clock_gate_mask;
        self.registers.modify(Register::SimScgc6, |r| r | mask);
    }

    /// Programs the master clock divider and enables MCLK output.
    fn init_mclk(&mut self, divider: MclkDivider) {
        self.enable_bus_clock();
        // output = input * (FRACT + 1) / (DIVIDE + 1)
        self.registers.modify(Register::Mdr, |r| {
            let r = r & !(mdr::FRACT.mask() | mdr::DIVIDE.mask());
            r | mdr::FRACT.bits(u32::from(divider.fract()) - 1)
                | mdr::DIVIDE.bits(u32::from(divider.divide()) - 1)
        });
        self.registers.modify(Register::Mcr, |r| r | mcr::MOE);
        debug!(
            "SAI{}: MCLK = input * {} / {}",
            self.id,
            divider.fract(),
            divider.divide()
        );
        if let Some(mclk_hz) = self.mclk_hz {
            debug!("SAI{}: MCLK {} Hz from {} Hz", self.id, mclk_hz, MCLK_INPUT_HZ);
        }
    }

    fn init_rx(&mut self) {
        let channels = u32::from(self.channels);
        let bits = u32::from(self.bits);

        self.registers
            .write(Register::Rcr1, rcr1::RFW.bits(channels.wrapping_sub(1)));
        self.registers.write(
            Register::Rcr2,
            rcr2::MSEL.bits(BCLK_SOURCE_MCLK)
                | rcr2::SYNC.bits(SYNC_ASYNCHRONOUS)
                | rcr2::DIV.bits(BCLK_DIV)
                | rcr2::BCD
                | rcr2::BCP,
        );
        self.registers.write(Register::Rcr3, rcr3::RCE);
        self.registers.write(
            Register::Rcr4,
            rcr4::FRSZ.bits(channels.wrapping_sub(1))
                | rcr4::SYWD.bits(bits.wrapping_sub(1))
                | rcr4::MF
                | rcr4::FSD
                | rcr4::FSE,
        );
        self.registers.write(
            Register::Rcr5,
            rcr5::W0W.bits(bits.wrapping_sub(1))
                | rcr5::WNW.bits(bits.wrapping_sub(1))
                | rcr5::FBT.bits(bits.wrapping_sub(1)),
        );
        // Nothing is clocked in before this write
        self.registers
            .write(Register::Rcsr, rcsr::BCE | rcsr::RE | rcsr::FRIE);
        debug!(
            "SAI{}: RX {} words of {} bits",
            self.id,
            self.channels,
            self.bits
        );
        if let Some(mclk_hz) = self.mclk_hz {
            debug!("SAI{}: BCLK {} Hz", self.id, bit_clock_hz(mclk_hz));
        }
    }

    fn init_tx(&mut self) {
        debug!("SAI{}: TX registers not configured", self.id);
    }

    /// Instance index
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Words per frame given to [`begin`](Self::begin)
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Bits per word given to [`begin`](Self::begin)
    pub fn bit_width(&self) -> u8 {
        self.bits
    }

    /// Sample rate given to [`begin`](Self::begin), `None` when configured from a divider
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Master clock frequency, `None` when configured from a divider since the divider input
    /// is not known then
    pub fn mclk_hz(&self) -> Option<u32> {
        self.mclk_hz
    }
}

/// Receive methods
impl<R, C> Sai<R, C>
where
    R: SaiRegisters,
    C: InterruptController,
{
    /// Starts reception: each receive interrupt writes the two channel words to `ch0` and `ch1`
    /// and then calls `callback`.
    ///
    /// # Safety
    ///
    /// `ch0` and `ch1` must be valid for volatile writes of a `u32` until reception is stopped
    /// (or, when stopped with [`stop_rx`](Self::stop_rx), until it is resumed and stopped
    /// again). [`begin`](Self::begin) must have succeeded before.
    pub unsafe fn start_rx(&mut self, callback: Callback, ch0: *mut u32, ch1: *mut u32) {
        self.rx = Some(RxTarget { callback, ch0, ch1 });
        self.rx_running = true;
        self.interrupts.enable(self.rx_irq);
        trace!("SAI{}: RX started", self.id);
    }

    /// Re-enables reception with the callback and destinations of the last
    /// [`start_rx`](Self::start_rx).
    ///
    /// Fails with [`Error::NotStarted`] if reception was never started.
    pub fn resume_rx(&mut self) -> Result<(), Error> {
        if self.rx.is_none() {
            return Err(Error::NotStarted);
        }
        self.rx_running = true;
        self.interrupts.enable(self.rx_irq);
        trace!("SAI{}: RX resumed", self.id);
        Ok(())
    }

    /// Disables the receive interrupt. The callback and the destinations are kept.
    ///
    /// The receive callback may stop reception, for example through
    /// [`Slot::with`](crate::Slot::with), since the FIFO has been drained when it runs. A
    /// handler that still holds the driver must not call this before the drain is done.
    pub fn stop_rx(&mut self) {
        self.interrupts.disable(self.rx_irq);
        self.rx_running = false;
        trace!("SAI{}: RX stopped", self.id);
    }

    /// `true` between `start_rx`/`resume_rx` and `stop_rx`
    pub fn is_rx_running(&self) -> bool {
        self.rx_running
    }

    /// Callback of the last [`start_rx`](Self::start_rx)
    pub fn rx_callback(&self) -> Option<Callback> {
        self.rx.map(|target| target.callback)
    }

    /// Channel 0 and channel 1 destinations of the last [`start_rx`](Self::start_rx)
    pub fn rx_destinations(&self) -> Option<(*mut u32, *mut u32)> {
        self.rx.map(|target| (target.ch0, target.ch1))
    }

    /// Get the content of the receive control register.
    pub fn rx_status(&mut self) -> RxStatus {
        RxStatus {
            value: self.registers.read(Register::Rcsr),
        }
    }

    /// Clears the FIFO error, sync error and word start flags.
    pub fn clear_rx_errors(&mut self) {
        self.registers
            .modify(Register::Rcsr, |r| r | rcsr::W1C_FLAGS);
    }

    /// Reads one frame from the receive FIFO and resets the FIFO.
    ///
    /// The hardware needs a read between the two channel words: the second read of the data
    /// register is discarded. The FIFO reset comes after the three reads, otherwise words of
    /// the next frame are lost.
    fn pop_frame(&mut self) -> [u32; 2] {
        let ch0 = self.registers.read(Register::Rdr0);
        let _ = self.registers.read(Register::Rdr0);
        let ch1 = self.registers.read(Register::Rdr0);
        // Writing back a set W1C flag would clear it
        self.registers
            .modify(Register::Rcsr, |r| (r & !rcsr::W1C_FLAGS) | rcsr::FR);
        [ch0, ch1]
    }

    /// Moves one frame from the receive FIFO to the destinations given to `start_rx`.
    ///
    /// Without destinations the frame is discarded, the FIFO is still reset.
    pub fn drain_rx_fifo(&mut self) {
        let [ch0, ch1] = self.pop_frame();
        if let Some(target) = self.rx {
            // Safety: guaranteed by the caller of `start_rx`
            unsafe {
                ptr::write_volatile(target.ch0, ch0);
                ptr::write_volatile(target.ch1, ch1);
            }
        }
    }

    /// Drains the receive FIFO and returns the callback to run for this interrupt.
    ///
    /// Used by handlers that must release the driver before calling the callback.
    pub fn service_rx(&mut self) -> Option<Callback> {
        self.drain_rx_fifo();
        self.rx_callback()
    }

    /// Receive interrupt handler: drains the FIFO, then calls the receive callback.
    pub fn on_rx_interrupt(&mut self) {
        if let Some(callback) = self.service_rx() {
            callback();
        }
    }

    /// Polls for one frame while the receive interrupt is stopped.
    ///
    /// Returns `WouldBlock` until the FIFO request flag is set, then reads the frame as the
    /// interrupt handler does and returns `[channel 0, channel 1]`.
    pub fn read_frame(&mut self) -> nb::Result<[u32; 2], Infallible> {
        if !self.rx_status().fifo_request() {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.pop_frame())
    }
}

/// Transmit methods
impl<R, C> Sai<R, C>
where
    R: SaiRegisters,
    C: InterruptController,
{
    /// Stores the transmit callback and enables the transmit interrupt.
    ///
    /// The transmit registers are not configured by [`begin`](Self::begin); the peripheral
    /// runs with whatever the application wrote to them, or their reset values.
    pub fn start_tx(&mut self, callback: Callback) {
        self.tx_callback = Some(callback);
        self.tx_running = true;
        self.interrupts.enable(self.tx_irq);
        trace!("SAI{}: TX started", self.id);
    }

    /// Disables the transmit interrupt. The callback is kept.
    pub fn stop_tx(&mut self) {
        self.interrupts.disable(self.tx_irq);
        self.tx_running = false;
        trace!("SAI{}: TX stopped", self.id);
    }

    pub fn is_tx_running(&self) -> bool {
        self.tx_running
    }

    pub fn tx_callback(&self) -> Option<Callback> {
        self.tx_callback
    }

    /// Transmit interrupt handler: calls the transmit callback.
    pub fn on_tx_interrupt(&mut self) {
        if let Some(callback) = self.tx_callback {
            callback();
        }
    }
}

#[cfg(test)]
impl<R, C> Sai<R, C> {
    pub(crate) fn registers_mut(&mut self) -> &mut R {
        &mut self.registers
    }

    pub(crate) fn interrupts(&self) -> &C {
        &self.interrupts
    }
}
