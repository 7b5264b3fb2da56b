//! Register model of the STM32 GPIO port block.
//!
//! Only the two registers the pin operations touch are modelled: the bit
//! set/reset register `BSRR` and the input data register `IDR`. Writing a bit
//! in the lower half of BSRR drives the corresponding pin high; writing the
//! same bit shifted into the upper half drives it low. Either way the access
//! is a single store and the hardware applies it to just the addressed bit,
//! so the output latch is never read back and operations on one pin cannot
//! disturb another pin of the same port, including from interrupt context.
//!
//! All register traffic goes through [`write_gpio_bsrr`] and
//! [`read_gpio_idr`]. On the target these compile down to the bare volatile
//! store/load; under `cfg(test)` they are wrapped by `mry` so the unit tests
//! can run against a simulated register model on the host.

use paste::paste;

// Register offsets within a port block, per the F4 reference manual (the
// block starts with MODER/OTYPER/OSPEEDR/PUPDR, which belong to the board
// init code and are not accessed here).
const IDR_OFFSET: u32 = 0x10;
const BSRR_OFFSET: u32 = 0x18;

macro_rules! gpio_reg_rw {
    (read $name:ident, $offset:ident) => {
        paste! {
            #[doc = "Read the `" $name "` register of the port at `base`"]
            #[cfg_attr(test, mry::mry)]
            #[inline(always)]
            pub fn [<read_gpio_ $name>](base: u32) -> u32 {
                // Safety: `base` addresses a GPIO port block that is valid for
                // the whole program lifetime, and the register is read-only
                unsafe { core::ptr::read_volatile((base + $offset) as *const u32) }
            }
        }
    };
    (write $name:ident, $offset:ident) => {
        paste! {
            #[doc = "Write `value` to the `" $name "` register of the port at `base`"]
            #[cfg_attr(test, mry::mry)]
            #[inline(always)]
            pub fn [<write_gpio_ $name>](base: u32, value: u32) {
                // Safety: `base` addresses a GPIO port block that is valid for
                // the whole program lifetime; the register is write-only and
                // the store is a single bus transaction
                unsafe { core::ptr::write_volatile((base + $offset) as *mut u32, value) }
            }
        }
    };
}

gpio_reg_rw!(read idr, IDR_OFFSET);
gpio_reg_rw!(write bsrr, BSRR_OFFSET);

/// Provide the register accesses for a single pin
///
/// Implementors supply the port base address and the pin's bit mask; the
/// provided methods perform the masked accesses. Everything here carries
/// `#[inline(always)]` because these pins exist to instrument code timing:
/// the operations must stay a handful of instructions with no call overhead
/// even when the caller is compiled without optimization.
///
/// # Safety
///
/// `BASE` must be the base address of a GPIO port register block and `MASK`
/// must have exactly one bit set, within the port width. Under those
/// constraints every write below touches only the implementor's own pin.
pub(super) unsafe trait RegisterInterface {
    const BASE: u32;
    const MASK: u32;

    /// Drive the pin high by writing its set position
    #[inline(always)]
    fn set_pin(&self) {
        write_gpio_bsrr(Self::BASE, Self::MASK);
    }

    /// Drive the pin low by writing its reset position
    #[inline(always)]
    fn clear_pin(&self) {
        write_gpio_bsrr(Self::BASE, Self::MASK << 16);
    }

    /// Write the logic level of the pin
    #[inline(always)]
    fn write_pin(&self, bit: bool) {
        if bit {
            self.set_pin();
        } else {
            self.clear_pin();
        }
    }

    /// Read the electrical state of the pin
    ///
    /// Reads the input data register rather than the output latch, so the
    /// result is the actual pin state for inputs and outputs alike.
    #[inline(always)]
    fn read_pin(&self) -> bool {
        read_gpio_idr(Self::BASE) & Self::MASK != 0
    }

    /// Emit `count` high-then-low pulses on the pin
    #[inline(always)]
    fn pulse_pin(&self, count: u32) {
        for _ in 0..count {
            self.set_pin();
            self.clear_pin();
        }
    }
}
