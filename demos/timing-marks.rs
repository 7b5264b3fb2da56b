//! Emits timing markers for a logic analyzer.
//!
//! One pin frames a "measured" section with a level mark while a second pin
//! tags the iterations inside it with counted event pulses, the way the
//! fast pins are meant to be used around real code under measurement. Wire
//! PC8 and PC9 to the analyzer; port C clock and output modes come from the
//! board startup code.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;
use stm32_fastpin::fast_outputs;

fast_outputs! {
    /// Level marker framing the measured section
    WINDOW: stm32_fastpin::gpio::PC8,
    /// Event pulses, counted so events can be told apart on the trace
    EVENT: stm32_fastpin::gpio::PC9,
}

#[entry]
fn main() -> ! {
    loop {
        WINDOW.on();
        for n in 1..=4u32 {
            cortex_m::asm::delay(1_000);
            EVENT.pulse(n);
        }
        WINDOW.off();
        cortex_m::asm::delay(100_000);
    }
}
