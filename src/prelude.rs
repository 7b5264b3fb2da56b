//! Prelude
// embedded-hal doesn’t have v2 in its prelude, so we export the digital
// traits ourselves
pub use embedded_hal::digital::v2::InputPin as _embedded_hal_gpio_InputPin;
pub use embedded_hal::digital::v2::OutputPin as _embedded_hal_gpio_OutputPin;

pub use crate::gpio::{FastInput, FastOutput};
