//! Panic handlers, fault handler and the defmt timestamp

// When defmt is enabled on bare metal, log over RTT and panic through panic-probe
#[cfg(all(feature = "defmt", target_os = "none"))]
use defmt_rtt as _;

#[cfg(all(feature = "defmt", target_os = "none"))]
use panic_probe as _;

#[cfg(all(feature = "defmt", target_os = "none"))]
#[defmt::panic_handler]
fn defmt_panic() -> ! {
    cortex_m::asm::udf()
}

// Without defmt just halt
#[cfg(all(not(feature = "defmt"), target_os = "none"))]
use panic_halt as _;

#[cfg(target_arch = "arm")]
#[cortex_m_rt::exception]
unsafe fn HardFault(_ef: &cortex_m_rt::ExceptionFrame) -> ! {
    loop { cortex_m::asm::udf(); }
}

// Log lines are stamped with the SysTick count
#[cfg(all(feature = "defmt", target_os = "none"))]
defmt::timestamp!("{=u32}", crate::port::ticks());
