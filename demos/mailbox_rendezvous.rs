//! Mailbox demo, rendezvous variant
//!
//! The Producer signals a binary semaphore after each publish and the
//! Detector waits on it, so every publish is seen. Output goes to USART2 at
//! 115200 baud, like the polling demo.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use mailbox_rtos::app::{self, Detector, Drain, Lcg, Producer, SerialConsole, System, Variant};
use mailbox_rtos::port::{SysTickPort, Usart2};
use mailbox_rtos::{Kernel, CFG_CPU_CLOCK_HZ, CFG_RANDOM_SEED, CFG_SERIAL_BAUD, CFG_TICK_RATE_HZ};

#[entry]
fn main() -> ! {
    let serial = Usart2::init(CFG_CPU_CLOCK_HZ, CFG_SERIAL_BAUD);

    let mut detector = Detector::rendezvous();
    let mut producer = Producer::new(Lcg::new(CFG_RANDOM_SEED), Variant::Rendezvous);
    let mut drain = Drain::new();

    let mut kernel = Kernel::new(System::new(SerialConsole::new(serial)));
    app::create_tasks(&mut kernel, &mut detector, &mut producer, &mut drain)
        .expect("task creation failed");

    mailbox_rtos::info!("Mailbox demo (rendezvous)");
    let mut port = SysTickPort::start(CFG_CPU_CLOCK_HZ / CFG_TICK_RATE_HZ);
    match kernel.start(&mut port) {
        Ok(never) => match never {},
        Err(_) => panic!("no task to run"),
    }
}
