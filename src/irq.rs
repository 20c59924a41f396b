//! Interrupt line control

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;

/// An interrupt number as wired to the NVIC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Irq(pub u16);

// Safety: the numbers come from the instance map, which only lists interrupts of the device
unsafe impl InterruptNumber for Irq {
    #[inline]
    fn number(self) -> u16 {
        self.0
    }
}

/// Enables and disables interrupt lines
pub trait InterruptController {
    fn enable(&mut self, irq: Irq);

    fn disable(&mut self, irq: Irq);
}

/// [`InterruptController`] backed by the Cortex-M NVIC
#[derive(Debug)]
pub struct Nvic {
    _private: (),
}

impl Nvic {
    /// # Safety
    ///
    /// Unmasking an interrupt can break mask-based critical sections. The caller must make sure
    /// the handlers of the lines controlled through this value are in place before they are
    /// enabled.
    pub unsafe fn steal() -> Self {
        Nvic { _private: () }
    }
}

impl InterruptController for Nvic {
    fn enable(&mut self, irq: Irq) {
        // Safety: see `steal`
        unsafe { NVIC::unmask(irq) }
    }

    fn disable(&mut self, irq: Irq) {
        NVIC::mask(irq)
    }
}
