//! # Type-level module for the fast GPIO pins
//!
//! This module provides a type-level API for the diagnostic GPIO pins. Each
//! [`FastPin`] is zero-sized: the pin descriptor, meaning the owning port's
//! register block address and the pin's single-bit mask, lives entirely in
//! the type. There is no data to pass around and no indirection on the
//! operation path. Real code is generated as a side effect of
//! monomorphization, and every operation compiles down to the one masked
//! register access it describes, with `#[inline(always)]` on the whole path
//! so that even unoptimized builds do not pay a call. That matters here: a
//! marker pin that costs a function call perturbs the very timing it is
//! meant to expose.
//!
//! Pins are identified by [`PinId`] types named after their datasheet
//! identifier, e.g. [`PC8`], each tying together a [`GpioPort`] and a bit
//! number. A [`FastPin`] is parameterized by a `PinId` and a [`PinMode`]:
//! [`Output`] pins offer the full operation set ([`on`](FastPin::on),
//! [`off`](FastPin::off), [`set`](FastPin::set), [`get`](FastPin::get),
//! [`pulse`](FastPin::pulse)); [`Input`] pins only
//! [`get`](FastPin::get). Driving a pin bound as input is rejected by the
//! compiler instead of silently ignored, and a name bound to a pin ID that
//! does not exist fails the build.
//!
//! Unlike the pin types of a full HAL, fast pins are not singletons.
//! [`FastPin::new`] is a safe `const fn` and handles may be freely
//! materialized, including from interrupt context. This is sound because
//! every write goes through the port's set/reset register as a
//! hardware-atomic masked store that cannot disturb the other pins of the
//! port, and [`get`](FastPin::get) is a pure read of the input data
//! register. The flip side is that nothing stops an application from also
//! driving the same pin through its regular HAL; these pins deliberately
//! step around ownership, so reserve a few pins for instrumentation.
//!
//! Pin direction, pull and speed configuration belong to the board startup
//! code (CubeMX-style init) and are not touched here.
//!
//! ## Examples
//!
//! ```no_run
//! use stm32_fastpin::fast_outputs;
//! use stm32_fastpin::gpio::PC8;
//!
//! fast_outputs! {
//!     /// Marker pin, wired to the logic analyzer
//!     DBG: PC8,
//! }
//!
//! DBG.on();
//! // ... section under measurement ...
//! DBG.off();
//! DBG.pulse(3);
//! ```
//!
//! # Embedded HAL traits
//!
//! [`OutputPin`] is implemented for output pins and [`InputPin`] for every
//! pin (the input data register reflects the electrical state in both
//! roles), with [`Infallible`] as the error type, so fast pins can be
//! handed to driver code written against the common traits.

use super::reg::RegisterInterface;
use crate::Sealed;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use paste::paste;

//==================================================================================================
//  Pin modes
//==================================================================================================

/// Type-level enum for the two pin roles
///
/// The valid options are [`Output`] and [`Input`].
pub trait PinMode: Sealed {}

/// Type-level variant of [`PinMode`] for pins driven by the application
pub enum Output {}
/// Type-level variant of [`PinMode`] for read-only pins
pub enum Input {}

impl Sealed for Output {}
impl Sealed for Input {}
impl PinMode for Output {}
impl PinMode for Input {}

//==================================================================================================
//  Ports
//==================================================================================================

/// Type-level enum for GPIO ports
///
/// Each implementor resolves to the base address of its port register block
/// at compile time.
pub trait GpioPort: Sealed {
    /// Base address of the port register block
    const BASE: u32;
}

macro_rules! declare_ports {
    ($(($Port:ident, $BASE:literal),)+) => {
        paste!(
            $(
                #[doc = "GPIO port " $Port]
                pub enum $Port {}
                impl Sealed for $Port {}
                impl GpioPort for $Port {
                    const BASE: u32 = $BASE;
                }
            )+
        );
    };
}

declare_ports!(
    (PortA, 0x4002_0000),
    (PortB, 0x4002_0400),
    (PortC, 0x4002_0800),
    (PortD, 0x4002_0C00),
    (PortE, 0x4002_1000),
    (PortH, 0x4002_1C00),
);

//==================================================================================================
//  Pin IDs
//==================================================================================================

/// Type-level enum for pin IDs
///
/// A pin ID carries the whole pin descriptor: the owning port and the bit
/// number within it. The bit mask is derived as `1 << NUM`, so it has
/// exactly one bit set by construction.
pub trait PinId: Sealed {
    /// Port the pin belongs to
    type Port: GpioPort;
    /// Bit number of the pin within the port (0..=15)
    const NUM: u8;
}

macro_rules! pin_id {
    ($Port:ident, $Id:ident, $NUM:literal) => {
        // Need paste macro to use ident in doc attribute
        paste! {
            #[doc = "Pin ID representing pin " $Id]
            pub enum $Id {}
            impl Sealed for $Id {}
            impl PinId for $Id {
                type Port = $Port;
                const NUM: u8 = $NUM;
            }
        }
    };
}

macro_rules! declare_pins {
    (
        $Port:ident, [$(($Id:ident, $NUM:literal),)+]
    ) => {
        $(
            pin_id!($Port, $Id, $NUM);
        )+
    }
}

declare_pins!(
    PortA,
    [
        (PA0, 0),
        (PA1, 1),
        (PA2, 2),
        (PA3, 3),
        (PA4, 4),
        (PA5, 5),
        (PA6, 6),
        (PA7, 7),
        (PA8, 8),
        (PA9, 9),
        (PA10, 10),
        (PA11, 11),
        (PA12, 12),
        (PA13, 13),
        (PA14, 14),
        (PA15, 15),
    ]
);

declare_pins!(
    PortB,
    [
        (PB0, 0),
        (PB1, 1),
        (PB2, 2),
        (PB3, 3),
        (PB4, 4),
        (PB5, 5),
        (PB6, 6),
        (PB7, 7),
        (PB8, 8),
        (PB9, 9),
        (PB10, 10),
        (PB11, 11),
        (PB12, 12),
        (PB13, 13),
        (PB14, 14),
        (PB15, 15),
    ]
);

declare_pins!(
    PortC,
    [
        (PC0, 0),
        (PC1, 1),
        (PC2, 2),
        (PC3, 3),
        (PC4, 4),
        (PC5, 5),
        (PC6, 6),
        (PC7, 7),
        (PC8, 8),
        (PC9, 9),
        (PC10, 10),
        (PC11, 11),
        (PC12, 12),
        (PC13, 13),
        (PC14, 14),
        (PC15, 15),
    ]
);

declare_pins!(
    PortD,
    [
        (PD0, 0),
        (PD1, 1),
        (PD2, 2),
        (PD3, 3),
        (PD4, 4),
        (PD5, 5),
        (PD6, 6),
        (PD7, 7),
        (PD8, 8),
        (PD9, 9),
        (PD10, 10),
        (PD11, 11),
        (PD12, 12),
        (PD13, 13),
        (PD14, 14),
        (PD15, 15),
    ]
);

declare_pins!(
    PortE,
    [
        (PE0, 0),
        (PE1, 1),
        (PE2, 2),
        (PE3, 3),
        (PE4, 4),
        (PE5, 5),
        (PE6, 6),
        (PE7, 7),
        (PE8, 8),
        (PE9, 9),
        (PE10, 10),
        (PE11, 11),
        (PE12, 12),
        (PE13, 13),
        (PE14, 14),
        (PE15, 15),
    ]
);

// Only the two port H pins bonded out on the F401-class parts
declare_pins!(
    PortH,
    [
        (PH0, 0),
        (PH1, 1),
    ]
);

//==================================================================================================
//  Registers
//==================================================================================================

/// Provide the register interface for [`FastPin`]s
///
/// Zero-sized; the pin descriptor is entirely in the type parameter.
pub(in crate::gpio) struct Registers<I: PinId> {
    id: PhantomData<I>,
}

// The constants come straight from the pin ID: the base address is one of
// the port blocks declared above and the mask has exactly the pin's bit
// set, which is what the register interface requires.
unsafe impl<I: PinId> RegisterInterface for Registers<I> {
    const BASE: u32 = <I::Port as GpioPort>::BASE;
    const MASK: u32 = 1 << I::NUM;
}

impl<I: PinId> Registers<I> {
    const fn new() -> Self {
        Registers { id: PhantomData }
    }
}

//==================================================================================================
//  FastPin
//==================================================================================================

/// A fast diagnostic pin, parameterized by [`PinId`] and [`PinMode`] types
///
/// See the [module documentation](crate::gpio::pins) for the full story; in short, a
/// `FastPin` is a zero-sized handle whose operations are always-inlined
/// masked accesses to its port's set/reset and input data registers.
pub struct FastPin<I: PinId, M: PinMode> {
    regs: Registers<I>,
    mode: PhantomData<M>,
}

/// A [`FastPin`] with the full output operation set
pub type FastOutput<I> = FastPin<I, Output>;
/// A read-only [`FastPin`], exposing only [`FastPin::get`]
pub type FastInput<I> = FastPin<I, Input>;

impl<I: PinId, M: PinMode> FastPin<I, M> {
    /// Create a new [`FastPin`]
    ///
    /// Fast pins are not singletons and this does not configure the pin:
    /// direction, pull and speed are owned by the board init code. Creating
    /// an [`Output`] handle for a pin the board has configured as an input
    /// drives a latch the hardware ignores.
    #[inline(always)]
    pub const fn new() -> Self {
        FastPin {
            regs: Registers::new(),
            mode: PhantomData,
        }
    }

    /// Read the electrical state of the pin: `true` is high, `false` is low
    ///
    /// Reads the port's input data register rather than the output latch,
    /// so the result reflects what is actually on the pin for inputs and
    /// outputs alike.
    #[inline(always)]
    pub fn get(&self) -> bool {
        self.regs.read_pin()
    }
}

impl<I: PinId, M: PinMode> Default for FastPin<I, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: PinId> FastPin<I, Output> {
    /// Drive the pin high
    #[inline(always)]
    pub fn on(&self) {
        self.regs.set_pin()
    }

    /// Drive the pin low
    #[inline(always)]
    pub fn off(&self) {
        self.regs.clear_pin()
    }

    /// Drive the pin high if `value` is true, low otherwise
    #[inline(always)]
    pub fn set(&self, value: bool) {
        self.regs.write_pin(value)
    }

    /// Emit `count` high-then-low pulses on the pin
    ///
    /// Useful to tell events apart on a logic analyzer trace. `pulse(0)`
    /// does nothing; after `pulse(n)` with `n >= 1` the pin rests low.
    #[inline(always)]
    pub fn pulse(&self, count: u32) {
        self.regs.pulse_pin(count)
    }
}

//==================================================================================================
//  Pin binding macros
//==================================================================================================

/// Bind symbolic names to output pins
///
/// Each binding expands to a constant whose methods are the output
/// operation set. The binding is resolved entirely at compile time; a name
/// bound to a pin ID that does not exist fails the build.
///
/// ```no_run
/// use stm32_fastpin::fast_outputs;
/// use stm32_fastpin::gpio::{PC8, PC9};
///
/// fast_outputs! {
///     DBG: PC8,
///     TRIG: PC9,
/// }
///
/// DBG.on();
/// TRIG.pulse(2);
/// DBG.off();
/// ```
#[macro_export]
macro_rules! fast_outputs {
    ($($(#[$attr:meta])* $name:ident: $Id:ty),+ $(,)?) => {
        $(
            $(#[$attr])*
            pub const $name: $crate::gpio::FastOutput<$Id> =
                $crate::gpio::FastOutput::new();
        )+
    };
}

/// Bind symbolic names to read-only pins
///
/// Like [`fast_outputs!`], but the constants expose only
/// [`get`](crate::gpio::FastPin::get). Driving a pin bound as input is a
/// compile error rather than a silent no-op.
///
/// ```no_run
/// use stm32_fastpin::fast_inputs;
/// use stm32_fastpin::gpio::PA0;
///
/// fast_inputs! {
///     SENSE: PA0,
/// }
///
/// if SENSE.get() {
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! fast_inputs {
    ($($(#[$attr:meta])* $name:ident: $Id:ty),+ $(,)?) => {
        $(
            $(#[$attr])*
            pub const $name: $crate::gpio::FastInput<$Id> =
                $crate::gpio::FastInput::new();
        )+
    };
}

//==================================================================================================
//  Embedded HAL traits
//==================================================================================================

impl<I: PinId> OutputPin for FastPin<I, Output> {
    type Error = Infallible;

    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.on();
        Ok(())
    }

    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.off();
        Ok(())
    }
}

impl<I: PinId, M: PinMode> InputPin for FastPin<I, M> {
    type Error = Infallible;

    #[inline(always)]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.get())
    }

    #[inline(always)]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.get())
    }
}

//==================================================================================================
//  Tests
//==================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::reg::{mock_read_gpio_idr, mock_write_gpio_bsrr, read_gpio_idr, write_gpio_bsrr};

    const PORTA_BASE: u32 = <PortA as GpioPort>::BASE;
    const PORTC_BASE: u32 = <PortC as GpioPort>::BASE;

    // PC8, the pin the tests drive
    const DBG_PIN: u32 = 1 << 8;

    crate::fast_outputs! {
        DBG: crate::gpio::PC8,
    }

    crate::fast_inputs! {
        SENSE: crate::gpio::PA0,
    }

    /// `on` writes only the pin's bit to the lower (set) half of BSRR.
    #[test]
    #[mry::lock(write_gpio_bsrr)]
    fn on_writes_set_half() {
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).returns(());

        let dbg = FastOutput::<PC8>::new();
        dbg.on();

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).assert_called(1);
    }

    /// `off` writes the same bit shifted into the upper (reset) half.
    #[test]
    #[mry::lock(write_gpio_bsrr)]
    fn off_writes_reset_half() {
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).returns(());

        let dbg = FastOutput::<PC8>::new();
        dbg.off();

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).assert_called(1);
    }

    /// `set(true)` is exactly `on`, `set(false)` exactly `off`.
    #[test]
    #[mry::lock(write_gpio_bsrr)]
    fn set_selects_between_halves() {
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).returns(());

        let dbg = FastOutput::<PC8>::new();
        dbg.set(true);
        dbg.set(false);
        dbg.set(false);

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).assert_called(1);
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).assert_called(2);
    }

    /// `get` masks the pin's bit out of IDR, ignoring every other bit.
    #[test]
    #[mry::lock(read_gpio_idr)]
    fn get_high_when_bit_set() {
        mock_read_gpio_idr(PORTC_BASE).returns(DBG_PIN | 0x8001);

        let dbg = FastOutput::<PC8>::new();
        assert!(dbg.get());
    }

    #[test]
    #[mry::lock(read_gpio_idr)]
    fn get_low_when_bit_clear() {
        mock_read_gpio_idr(PORTC_BASE).returns(!DBG_PIN);

        let dbg = FastOutput::<PC8>::new();
        assert!(!dbg.get());
    }

    /// An input-bound pin reads through the same IDR path.
    #[test]
    #[mry::lock(read_gpio_idr)]
    fn input_pin_reads_idr() {
        mock_read_gpio_idr(PORTA_BASE).returns(1);

        assert!(SENSE.get());

        mock_read_gpio_idr(PORTA_BASE).assert_called(1);
    }

    /// `pulse(n)` produces exactly n set/reset write pairs.
    #[test]
    #[mry::lock(write_gpio_bsrr)]
    fn pulse_emits_count_pairs() {
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).returns(());

        let dbg = FastOutput::<PC8>::new();
        dbg.pulse(3);

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).assert_called(3);
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).assert_called(3);
    }

    /// `pulse(0)` never touches the register.
    #[test]
    #[mry::lock(write_gpio_bsrr)]
    fn pulse_zero_writes_nothing() {
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).returns(());

        let dbg = FastOutput::<PC8>::new();
        dbg.pulse(0);

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).assert_called(0);
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).assert_called(0);
    }

    /// A full workout of one pin never writes a neighbouring pin's bit
    /// positions. The mock also panics on any write value that is not one of
    /// the two registered masks, so stray full-register writes cannot slip
    /// through.
    #[test]
    #[mry::lock(write_gpio_bsrr)]
    fn neighbour_bits_untouched() {
        let neighbour = 1u32 << 9; // PC9, same port
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, neighbour).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, neighbour << 16).returns(());

        let dbg = FastOutput::<PC8>::new();
        dbg.on();
        dbg.set(false);
        dbg.pulse(2);
        dbg.off();

        mock_write_gpio_bsrr(PORTC_BASE, neighbour).assert_called(0);
        mock_write_gpio_bsrr(PORTC_BASE, neighbour << 16).assert_called(0);
    }

    /// The embedded-hal traits resolve to the same masked accesses.
    #[test]
    #[mry::lock(write_gpio_bsrr, read_gpio_idr)]
    fn embedded_hal_traits_map_to_masked_accesses() {
        use crate::prelude::*;

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).returns(());
        mock_read_gpio_idr(PORTC_BASE).returns(DBG_PIN);

        let mut dbg = FastOutput::<PC8>::new();
        dbg.set_high().unwrap();
        dbg.set_low().unwrap();
        assert!(dbg.is_high().unwrap());
        assert!(!dbg.is_low().unwrap());

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).assert_called(1);
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).assert_called(1);
    }

    /// The scenario a bound marker pin goes through during a measurement:
    /// level mark on, readback high, three event pulses, level mark off.
    #[test]
    #[mry::lock(write_gpio_bsrr, read_gpio_idr)]
    fn bound_marker_drives_and_reads() {
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).returns(());
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).returns(());
        mock_read_gpio_idr(PORTC_BASE).returns(DBG_PIN);

        DBG.on();
        assert!(DBG.get());
        DBG.pulse(3);
        DBG.off();

        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN).assert_called(4);
        mock_write_gpio_bsrr(PORTC_BASE, DBG_PIN << 16).assert_called(4);
    }
}
