//! Process-wide home of the SAI driver, reachable from interrupt handlers.
//!
//! The vector table of the application must route the I2S0 receive and transmit interrupts to
//! [`i2s0_rx_isr`] and [`i2s0_tx_isr`]. Those handlers work on the driver installed in
//! [`SAI0`]:
//!
//! ```ignore
//! let mut sai = unsafe { Sai::steal(0) }?;
//! sai.begin(&SaiConfig::with_sample_rate(48_000, 32, 2))?;
//! SAI0.install(sai)?;
//! SAI0.with(|sai| unsafe { sai.start_rx(on_frame, LEFT.as_ptr(), RIGHT.as_ptr()) });
//! ```
//!
//! Accesses are serialized with `critical_section`. The handlers call the user callback after
//! leaving the critical section, so a callback may use [`Slot::with`] itself.
use core::cell::RefCell;

use critical_section::Mutex;

use crate::driver::Sai;
use crate::irq::{InterruptController, Nvic};
use crate::pac::{Mmio, SaiRegisters};
use crate::Error;

/// Holds at most one driver
pub struct Slot<R, C> {
    inner: Mutex<RefCell<Option<Sai<R, C>>>>,
}

impl<R, C> Slot<R, C> {
    pub const fn new() -> Self {
        Slot {
            inner: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<R, C> Default for Slot<R, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, C> Slot<R, C>
where
    R: SaiRegisters,
    C: InterruptController,
{
    /// Moves a driver into the slot.
    ///
    /// Fails with [`Error::AlreadyInstalled`] if the slot is taken; `sai` is dropped then.
    pub fn install(&self, sai: Sai<R, C>) -> Result<(), Error> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            if slot.is_some() {
                return Err(Error::AlreadyInstalled);
            }
            *slot = Some(sai);
            Ok(())
        })
    }

    /// Stops both directions and takes the driver out of the slot.
    pub fn uninstall(&self) -> Option<Sai<R, C>> {
        critical_section::with(|cs| {
            let mut sai = self.inner.borrow_ref_mut(cs).take()?;
            sai.stop_rx();
            sai.stop_tx();
            Some(sai)
        })
    }

    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// Runs `f` on the installed driver. Returns `None` if the slot is empty.
    ///
    /// `f` runs inside a critical section, so the interrupt handlers cannot observe a
    /// half-updated callback or destination.
    pub fn with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Sai<R, C>) -> T,
    {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Receive interrupt: drains the FIFO, then calls the receive callback.
    pub fn on_rx_interrupt(&self) {
        let callback = critical_section::with(|cs| {
            self.inner
                .borrow_ref_mut(cs)
                .as_mut()
                .and_then(Sai::service_rx)
        });
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Transmit interrupt: calls the transmit callback.
    pub fn on_tx_interrupt(&self) {
        let callback = critical_section::with(|cs| {
            self.inner
                .borrow_ref(cs)
                .as_ref()
                .and_then(Sai::tx_callback)
        });
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Driver type of the on-chip SAI
pub type HardwareSai = Sai<Mmio, Nvic>;

/// Slot of instance 0, used by [`i2s0_rx_isr`] and [`i2s0_tx_isr`]
pub static SAI0: Slot<Mmio, Nvic> = Slot::new();

/// I2S0 receive interrupt handler
pub fn i2s0_rx_isr() {
    SAI0.on_rx_interrupt();
}

/// I2S0 transmit interrupt handler
pub fn i2s0_tx_isr() {
    SAI0.on_tx_interrupt();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pac::i2s0::rcsr;
    use crate::pac::{Register, I2S0};
    use crate::sim::{SimInterrupts, SimRegisters};
    use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    type SimSlot = Slot<SimRegisters, SimInterrupts>;

    fn sim_sai() -> Sai<SimRegisters, SimInterrupts> {
        Sai::new(&I2S0, SimRegisters::new(), SimInterrupts::new())
    }

    fn nop() {}

    #[test]
    fn install_once() {
        let slot = SimSlot::new();
        assert!(!slot.is_installed());
        assert_eq!(slot.install(sim_sai()), Ok(()));
        assert_eq!(slot.install(sim_sai()), Err(Error::AlreadyInstalled));
        assert!(slot.is_installed());
        assert!(slot.uninstall().is_some());
        assert!(slot.uninstall().is_none());
        assert_eq!(slot.install(sim_sai()), Ok(()));
    }

    #[test]
    fn empty_slot_handlers_do_nothing() {
        let slot = SimSlot::new();
        slot.on_rx_interrupt();
        slot.on_tx_interrupt();
        assert_eq!(slot.with(|sai| sai.id()), None);
    }

    #[test]
    fn uninstall_disables_lines() {
        let slot = SimSlot::new();
        slot.install(sim_sai()).unwrap();
        slot.with(|sai| sai.start_tx(nop)).unwrap();
        let sai = slot.uninstall().unwrap();
        assert!(!sai.is_tx_running());
        assert!(!sai.interrupts().is_enabled(I2S0.tx_irq));
    }

    static RX_SLOT: SimSlot = SimSlot::new();
    static RX_CH0: AtomicU32 = AtomicU32::new(0);
    static RX_CH1: AtomicU32 = AtomicU32::new(0);
    static RX_SEEN: AtomicU32 = AtomicU32::new(0);

    /// Records the frame, then stops reception from inside the handler
    fn record_and_stop() {
        let frame = (RX_CH0.load(Ordering::SeqCst) << 16) | RX_CH1.load(Ordering::SeqCst);
        RX_SEEN.store(frame, Ordering::SeqCst);
        RX_SLOT.with(|sai| sai.stop_rx());
    }

    #[test]
    fn rx_handler_drains_before_callback() {
        RX_SLOT.install(sim_sai()).unwrap();
        RX_SLOT
            .with(|sai| {
                sai.registers_mut().push_rx(&[0xaaaa, 0xdead, 0x5555]);
                unsafe { sai.start_rx(record_and_stop, RX_CH0.as_ptr(), RX_CH1.as_ptr()) };
            })
            .unwrap();

        RX_SLOT.on_rx_interrupt();

        assert_eq!(RX_SEEN.load(Ordering::SeqCst), 0xaaaa_5555);
        let (running, resets) = RX_SLOT
            .with(|sai| (sai.is_rx_running(), sai.registers_mut().fifo_resets()))
            .unwrap();
        assert!(!running);
        assert_eq!(resets, 1);
        assert_eq!(
            RX_SLOT.with(|sai| sai.registers_mut().value(Register::Rcsr) & rcsr::FR),
            Some(0)
        );
    }

    static TX_SLOT: SimSlot = SimSlot::new();
    static TX_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn count_tx() {
        TX_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn tx_handler_calls_back() {
        TX_SLOT.install(sim_sai()).unwrap();
        TX_SLOT.on_tx_interrupt();
        assert_eq!(TX_CALLS.load(Ordering::SeqCst), 0);
        TX_SLOT.with(|sai| sai.start_tx(count_tx)).unwrap();
        TX_SLOT.on_tx_interrupt();
        assert_eq!(TX_CALLS.load(Ordering::SeqCst), 1);
    }
}
