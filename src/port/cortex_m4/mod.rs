//! Cortex-M4 port implementation
//!
//! SysTick drives the tick counter; the kernel loop sleeps with `wfi` between
//! ticks. USART2 (PA2, AF7) carries the serial console on STM32F401 boards.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::exception;
use portable_atomic::{AtomicU32, Ordering};

use super::Port;
use crate::types::OsTick;

/// Ticks since `SysTickPort::start`, written only by the SysTick handler
static TICKS: AtomicU32 = AtomicU32::new(0);

/// Current SysTick count
#[inline]
pub fn ticks() -> OsTick {
    TICKS.load(Ordering::Relaxed)
}

#[exception]
fn SysTick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// SysTick-backed port
pub struct SysTickPort {
    _private: (),
}

impl SysTickPort {
    /// Start SysTick with the given reload value
    ///
    /// # Example
    /// For 16MHz clock with 1000Hz tick rate: cnts = 16_000_000 / 1000 = 16_000
    pub fn start(cnts: u32) -> Self {
        let mut p = unsafe { cortex_m::Peripherals::steal() };

        p.SYST.set_reload(cnts - 1);
        p.SYST.clear_current();
        p.SYST.set_clock_source(SystClkSource::Core);
        p.SYST.enable_interrupt();
        p.SYST.enable_counter();

        SysTickPort { _private: () }
    }
}

impl Port for SysTickPort {
    #[inline]
    fn ticks(&self) -> OsTick {
        ticks()
    }

    #[inline]
    fn idle(&mut self) {
        cortex_m::asm::wfi();
    }
}

// ============ Serial console ============

#[cfg(feature = "pac")]
mod serial {
    use core::fmt;

    use crate::pac;

    /// Blocking transmit-only USART2 writer
    pub struct Usart2 {
        _private: (),
    }

    impl Usart2 {
        /// Route PA2 to USART2 TX and enable the transmitter at `baud`
        pub fn init(pclk_hz: u32, baud: u32) -> Self {
            pac::RCC.ahb1enr().modify(|w| w.set_gpioaen(true));
            pac::RCC.apb1enr().modify(|w| w.set_usart2en(true));

            pac::GPIOA.moder().modify(|w| w.set_moder(2, pac::gpio::vals::Moder::ALTERNATE));
            pac::GPIOA.afr(0).modify(|w| w.set_afr(2, 7));

            // Oversampling by 16: BRR holds USARTDIV in 12.4 fixed point
            pac::USART2.brr().write_value(pac::usart::regs::Brr((pclk_hz + baud / 2) / baud));
            pac::USART2.cr1().write(|w| {
                w.set_ue(true);
                w.set_te(true);
            });

            Usart2 { _private: () }
        }

        fn write_byte(&mut self, byte: u8) {
            while !pac::USART2.sr().read().txe() {}
            pac::USART2.dr().write(|w| w.set_dr(byte as u16));
        }
    }

    impl fmt::Write for Usart2 {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            s.bytes().for_each(|b| self.write_byte(b));
            Ok(())
        }
    }
}

#[cfg(feature = "pac")]
pub use serial::Usart2;
