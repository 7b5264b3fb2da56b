//! Blinks the user LED (PA5 on the Nucleo-F401RE) through the fast pin
//! interface.
//!
//! The GPIOA clock and the pin's output mode are expected to be set up by
//! the board startup code, like the rest of the hardware configuration.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;
use stm32_fastpin::gpio::{FastOutput, PA5};

#[entry]
fn main() -> ! {
    let led = FastOutput::<PA5>::new();
    loop {
        led.on();
        cortex_m::asm::delay(8_000_000);
        led.off();
        cortex_m::asm::delay(8_000_000);
    }
}
