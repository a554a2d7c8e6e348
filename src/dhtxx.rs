use core::mem;
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::capture;
use crate::comfort::{ComfortModel, ComfortState};
use crate::dew_point::{self, DewPointAlgorithm};
use crate::error::Error;
use crate::frame::{self, RawFrame};
use crate::pin::{IoPin, PinState, Pull};
use crate::units::{self, TemperatureScale};

/// The read interval recommended by the datasheets.
pub const DATASHEET_READ_INTERVAL: Duration = Duration::from_millis(2000);

/// A longer read interval that keeps the sensor from self-heating.
pub const LONG_READ_INTERVAL: Duration = Duration::from_millis(4000);

/// The minimum read interval of a DHT11.
///
/// Note that this can vary a bit by device, so check your device's datasheet to be sure. Try
/// doubling this value if you are encountering problems.
pub const MIN_DHT11_READ_INTERVAL: Duration = Duration::from_millis(1000);

/// The minimum read interval of a DHT21 or DHT22.
///
/// Note that this can vary a bit by device, so check your device's datasheet to be sure. Try
/// doubling this value if you are encountering problems.
pub const MIN_DHT22_READ_INTERVAL: Duration = Duration::from_millis(2000);

/// How long the line is held low to request a frame.
const REQUEST_DURATION: Duration = Duration::from_millis(20);

/// How long the line idles high before the first request.
const SETTLE_DURATION: Duration = Duration::from_millis(250);

/// The supported sensors, grouped by how they lay out their payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorFamily {
    /// Whole degrees in byte 2 and whole percent in byte 0.
    Dht11,
    /// Same layout as the DHT22. Also sold as the AM2301.
    Dht21,
    /// Tenths of a percent in bytes 0-1, tenths of a degree in bytes 2-3 with
    /// bit 7 of byte 2 as the sign.
    Dht22,
}

impl SensorFamily {
    pub const AM2301: SensorFamily = SensorFamily::Dht21;

    /// Looks a family up by its model number (11, 21 or 22).
    pub fn from_model_number<TIoError>(model: u8) -> Result<SensorFamily, Error<TIoError>> {
        match model {
            11 => Ok(SensorFamily::Dht11),
            21 => Ok(SensorFamily::Dht21),
            22 => Ok(SensorFamily::Dht22),
            _ => {
                log::warn!("sensor type {} not implemented", model);
                Err(Error::UnsupportedFamily(model))
            }
        }
    }

    pub fn model_number(&self) -> u8 {
        match self {
            SensorFamily::Dht11 => 11,
            SensorFamily::Dht21 => 21,
            SensorFamily::Dht22 => 22,
        }
    }

    /// The shortest read interval the sensor tolerates.
    pub fn min_read_interval(&self) -> Duration {
        match self {
            SensorFamily::Dht11 => MIN_DHT11_READ_INTERVAL,
            SensorFamily::Dht21 | SensorFamily::Dht22 => MIN_DHT22_READ_INTERVAL,
        }
    }
}

/// Options to modify the behavior of the DHT driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorConfig {
    /// Selects how received frames are decoded.
    pub family: SensorFamily,
    /// Whether to enable the internal pull-up while listening to the sensor.
    pub pull_up: bool,
    /// Reads within this interval of the previous attempt return the cached
    /// reading. Cannot be below [`SensorFamily::min_read_interval`].
    pub min_read_interval: Duration,
}

pub const DEFAULT_DHT11_CONFIG: SensorConfig = SensorConfig::new(SensorFamily::Dht11);

pub const DEFAULT_DHT22_CONFIG: SensorConfig = SensorConfig::new(SensorFamily::Dht22);

impl SensorConfig {
    pub const fn new(family: SensorFamily) -> SensorConfig {
        SensorConfig {
            family,
            pull_up: false,
            min_read_interval: DATASHEET_READ_INTERVAL,
        }
    }

    pub const fn with_pull_up(self, pull_up: bool) -> SensorConfig {
        SensorConfig { pull_up, ..self }
    }

    pub const fn with_min_read_interval(self, min_read_interval: Duration) -> SensorConfig {
        SensorConfig {
            min_read_interval,
            ..self
        }
    }
}

/// A decoded measurement, in °C and percent relative humidity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub humidity: f32,
    pub temperature: f32,
}

impl Reading {
    /// Placeholder held by a sensor that has not decoded a frame yet.
    pub const UNKNOWN: Reading = Reading {
        humidity: f32::NAN,
        temperature: f32::NAN,
    };

    pub fn is_known(&self) -> bool {
        !self.humidity.is_nan() && !self.temperature.is_nan()
    }

    pub fn temperature_in(&self, scale: TemperatureScale) -> f32 {
        scale.from_celsius(self.temperature)
    }

    pub fn heat_index(&self, scale: TemperatureScale) -> f32 {
        units::heat_index(self.temperature, self.humidity, scale)
    }

    pub fn dew_point(&self, algorithm: DewPointAlgorithm) -> f64 {
        dew_point::dew_point(self.temperature, self.humidity, algorithm)
    }

    pub fn comfort(&self, model: &ComfortModel) -> (ComfortState, f32) {
        model.classify(self.temperature, self.humidity)
    }
}

#[derive(Debug)]
enum Line<TInputPin, TOutputPin> {
    Input(TInputPin),
    Output(TOutputPin),
    /// A direction switch failed and the HAL kept the pin.
    Detached,
}

/// A DHT sensor on a single data line.
///
/// Reads are rate limited: within [`SensorConfig::min_read_interval`] of the
/// previous attempt the cached reading is returned without touching the bus.
#[derive(Debug)]
pub struct Dht<TInputPin, TOutputPin, TDelay, TimeFn, ElapsedFn, TTime>
where
    TimeFn: Fn() -> TTime,
    ElapsedFn: Fn(TTime) -> Duration,
    TTime: Copy,
{
    line: Line<TInputPin, TOutputPin>,
    delay: TDelay,
    config: SensorConfig,
    time_fn: TimeFn,
    elapsed_since_fn: ElapsedFn,
    settled: bool,
    last_read_time: Option<TTime>,
    reading: Reading,
    acquired_at: Option<TTime>,
}

impl<TInputPin, TOutputPin, TError, TDelay, TimeFn, ElapsedFn, TTime>
    Dht<TInputPin, TOutputPin, TDelay, TimeFn, ElapsedFn, TTime>
where
    TInputPin: InputPin<Error = TError> + IoPin<TInputPin, TOutputPin, Error = TError>,
    TOutputPin: OutputPin<Error = TError> + IoPin<TInputPin, TOutputPin, Error = TError>,
    TDelay: DelayNs,
    TimeFn: Fn() -> TTime,
    ElapsedFn: Fn(TTime) -> Duration,
    TTime: Copy,
{
    /// Constructs a DHT sensor that reads from the given pin.
    ///
    /// The provided `time_fn` closure should provide some representation of a given instant that
    /// can be used with `elapsed_since_fn` to determine how much time has passed since then. It
    /// does not need to reflect real dates and times, but it must be monotonic and resolve
    /// microseconds: the same clock times the bits of each frame.
    ///
    /// Fails with [`Error::InvalidArgument`] if the configured read interval is shorter than the
    /// sensor family allows.
    pub fn new(
        pin: TOutputPin,
        delay: TDelay,
        time_fn: TimeFn,
        elapsed_since_fn: ElapsedFn,
        config: SensorConfig,
    ) -> Result<Dht<TInputPin, TOutputPin, TDelay, TimeFn, ElapsedFn, TTime>, Error<TError>> {
        if config.min_read_interval < config.family.min_read_interval() {
            return Err(Error::InvalidArgument);
        }
        Ok(Dht {
            line: Line::Output(pin),
            delay,
            config,
            time_fn,
            elapsed_since_fn,
            settled: false,
            last_read_time: None,
            reading: Reading::UNKNOWN,
            acquired_at: None,
        })
    }

    /// Drives the line high and waits for the sensor to settle.
    ///
    /// Calling this is optional: the first read settles the sensor itself.
    pub fn begin(&mut self) -> Result<(), Error<TError>> {
        self.drive_idle()?;
        self.settle();
        Ok(())
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// The last successfully decoded reading, or [`Reading::UNKNOWN`].
    pub fn last_reading(&self) -> Reading {
        self.reading
    }

    /// When the last successfully decoded reading was requested.
    pub fn last_acquired_at(&self) -> Option<TTime> {
        self.acquired_at
    }

    /// Reads data from the DHT sensor, honoring the minimum read interval.
    ///
    /// Within the interval this returns the cached reading straight away. Note that the interval
    /// counts from the last attempt, so a read shortly after a failed one returns the stale value
    /// (or [`Reading::UNKNOWN`]). A failed attempt never clears the cache, and is never retried.
    ///
    /// Due to the tight timing necessary to distinguish bits in the DHT's response, this blocks
    /// with interrupts disabled while receiving data, for about 4ms. The request pulse before
    /// that blocks for another 20ms.
    pub fn read(&mut self) -> Result<Reading, Error<TError>> {
        if let Some(last_read_time) = self.last_read_time {
            if (self.elapsed_since_fn)(last_read_time) < self.config.min_read_interval {
                log::debug!("within minimum read interval, using cached reading");
                return Ok(self.reading);
            }
        }

        self.drive_idle()?;
        if !self.settled {
            self.settle();
        }

        let read_time = (self.time_fn)();
        self.last_read_time = Some(read_time);

        let raw = self.capture()?;
        if !raw.is_valid() {
            let expected = frame::checksum(&raw.payload());
            log::warn!(
                "checksum mismatch in {:02x?}: expected {:#04x}",
                raw.bytes(),
                expected
            );
            return Err(Error::ChecksumMismatch {
                expected,
                actual: raw.checksum(),
            });
        }

        self.reading = raw.decode(self.config.family);
        self.acquired_at = Some(read_time);
        Ok(self.reading)
    }

    pub fn read_temperature(&mut self, scale: TemperatureScale) -> Result<f32, Error<TError>> {
        Ok(self.read()?.temperature_in(scale))
    }

    pub fn read_humidity(&mut self) -> Result<f32, Error<TError>> {
        Ok(self.read()?.humidity)
    }

    /// Reads both values from a single acquisition, as `(temperature, humidity)`.
    pub fn read_temperature_and_humidity(
        &mut self,
        scale: TemperatureScale,
    ) -> Result<(f32, f32), Error<TError>> {
        let reading = self.read()?;
        Ok((reading.temperature_in(scale), reading.humidity))
    }

    /// Requests and receives one frame, leaving the line driven high afterwards.
    fn capture(&mut self) -> Result<RawFrame, Error<TError>> {
        self.request_data()?;
        let result = self.receive_data();
        self.swap_to_output_mode()?;
        match &result {
            Ok(raw) => log::trace!("captured frame {:02x?}", raw.bytes()),
            Err(Error::Timeout { transition }) => {
                log::warn!("no response from sensor (stuck at transition {})", transition)
            }
            Err(Error::IncompleteFrame { bits }) => {
                log::warn!("sensor stopped after {} bits", bits)
            }
            Err(_) => {}
        }
        result
    }

    fn request_data(&mut self) -> Result<(), Error<TError>> {
        match &mut self.line {
            Line::Output(pin) => pin.set_low()?,
            _ => return Err(Error::PinUnavailable),
        }
        self.delay.delay_ms(REQUEST_DURATION.as_millis() as u32);
        Ok(())
    }

    fn receive_data(&mut self) -> Result<RawFrame, Error<TError>> {
        capture::without_interrupts(|| -> Result<RawFrame, Error<TError>> {
            self.swap_to_input_mode()?;
            match &mut self.line {
                Line::Input(pin) => {
                    capture::sample_frame(pin, &self.time_fn, &self.elapsed_since_fn)
                }
                _ => Err(Error::PinUnavailable),
            }
        })
    }

    fn settle(&mut self) {
        self.delay.delay_ms(SETTLE_DURATION.as_millis() as u32);
        self.settled = true;
    }

    /// Makes sure the line is an output driven high.
    fn drive_idle(&mut self) -> Result<(), Error<TError>> {
        match &mut self.line {
            Line::Output(pin) => Ok(pin.set_high()?),
            _ => self.swap_to_output_mode(),
        }
    }

    fn swap_to_input_mode(&mut self) -> Result<(), Error<TError>> {
        self.line = match mem::replace(&mut self.line, Line::Detached) {
            Line::Output(pin) => Line::Input(pin.into_input_pin(Pull::from(self.config.pull_up))?),
            Line::Input(pin) => Line::Input(pin),
            Line::Detached => return Err(Error::PinUnavailable),
        };
        Ok(())
    }

    fn swap_to_output_mode(&mut self) -> Result<(), Error<TError>> {
        self.line = match mem::replace(&mut self.line, Line::Detached) {
            Line::Input(pin) => Line::Output(pin.into_output_pin(PinState::High)?),
            Line::Output(mut pin) => {
                pin.set_high()?;
                Line::Output(pin)
            }
            Line::Detached => return Err(Error::PinUnavailable),
        };
        Ok(())
    }
}
