//! Pin direction switching.
//!
//! The DHT bus is a single open line that the host drives low to request a
//! frame and then releases so the sensor can answer. embedded-hal 1.0 only
//! covers levels, so direction changes go through this type-state trait: a
//! pin is consumed in one mode and handed back in the other.

pub use embedded_hal::digital::PinState;

/// Bias applied to the line once it is released to input mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    /// Rely on the external pull-up resistor of the sensor module.
    None,
    /// Enable the MCU's internal pull-up.
    Up,
}

impl From<bool> for Pull {
    fn from(pull_up: bool) -> Pull {
        if pull_up {
            Pull::Up
        } else {
            Pull::None
        }
    }
}

/// Converts a pin between its input and output types.
pub trait IoPin<TInput, TOutput> {
    type Error;

    /// Releases the line and starts listening, with the given bias.
    fn into_input_pin(self, pull: Pull) -> Result<TInput, Self::Error>;

    /// Takes control of the line, driving it to `state` right away.
    fn into_output_pin(self, state: PinState) -> Result<TOutput, Self::Error>;
}
