#![cfg_attr(not(test), no_std)]

/// Timing capture of the raw bit train, protected by an interrupt guard.
pub mod capture;
/// Comfort classification against four boundary lines in the humidity/temperature plane.
pub mod comfort;
/// Dew point estimators with selectable speed/accuracy trade-offs.
pub mod dew_point;
/// Universal driver for reading from DHT11, DHT21 or DHT22 sensors.
pub mod dhtxx;
/// Errors raised while talking to the sensor.
pub mod error;
/// The 5 byte on-wire frame: checksum and per-family decoding.
pub mod frame;
/// Switching the data line between input and output.
pub mod pin;
/// Temperature scale conversion and heat index.
pub mod units;

pub use comfort::{ComfortModel, ComfortState};
pub use dew_point::DewPointAlgorithm;
pub use dhtxx::{Dht, Reading, SensorConfig, SensorFamily};
pub use error::Error;
pub use frame::RawFrame;
pub use units::TemperatureScale;
