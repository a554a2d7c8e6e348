use bitflags::bitflags;

bitflags! {
    /// Which comfort boundaries a point violates. Empty means comfortable.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ComfortState: u8 {
        const TOO_HOT = 0b0001;
        const TOO_COLD = 0b0010;
        const TOO_DRY = 0b0100;
        const TOO_HUMID = 0b1000;

        const HOT_AND_HUMID = Self::TOO_HOT.bits() | Self::TOO_HUMID.bits();
        const HOT_AND_DRY = Self::TOO_HOT.bits() | Self::TOO_DRY.bits();
        const COLD_AND_HUMID = Self::TOO_COLD.bits() | Self::TOO_HUMID.bits();
        const COLD_AND_DRY = Self::TOO_COLD.bits() | Self::TOO_DRY.bits();
    }
}

impl ComfortState {
    pub const OK: ComfortState = ComfortState::empty();

    pub fn is_ok(&self) -> bool {
        self.is_empty()
    }
}

/// A line `temperature = slope * humidity + intercept`, humidity in percent and
/// temperature in °C.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub slope: f32,
    pub intercept: f32,
}

impl Boundary {
    pub const fn new(slope: f32, intercept: f32) -> Boundary {
        Boundary { slope, intercept }
    }

    /// Temperature of the line at the given humidity.
    pub fn at(&self, humidity: f32) -> f32 {
        humidity * self.slope + self.intercept
    }
}

/// Ratio lost per °C beyond the hot or cold line.
const TEMPERATURE_WEIGHT: f32 = 3.0;
/// Ratio lost per °C beyond the humid or dry line. These lines are nearly
/// vertical, so distances along the temperature axis grow quickly.
const HUMIDITY_WEIGHT: f32 = 0.1;

/// The comfort zone as a quadrilateral bounded by four lines.
///
/// Points above the hot and humid lines, or below the cold and dry lines,
/// are uncomfortable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComfortModel {
    too_hot: Boundary,
    too_cold: Boundary,
    too_dry: Boundary,
    too_humid: Boundary,
}

impl Default for ComfortModel {
    /// A simplified reference comfort chart with corners (humidity %, °C)
    /// A(30, 30.0), B(70, 26.2), C(70.1, 20.55) and D(30.1, 22.22).
    fn default() -> ComfortModel {
        ComfortModel {
            // AB
            too_hot: Boundary::new(-0.095, 32.85),
            // DC
            too_cold: Boundary::new(-0.04175, 23.476675),
            // AD
            too_dry: Boundary::new(-77.8, 2364.0),
            // BC
            too_humid: Boundary::new(-56.5, 3981.2),
        }
    }
}

impl ComfortModel {
    pub const fn new(
        too_hot: Boundary,
        too_cold: Boundary,
        too_dry: Boundary,
        too_humid: Boundary,
    ) -> ComfortModel {
        ComfortModel {
            too_hot,
            too_cold,
            too_dry,
            too_humid,
        }
    }

    /// How far above the hot line the point is; positive means too hot.
    pub fn distance_too_hot(&self, temperature: f32, humidity: f32) -> f32 {
        temperature - self.too_hot.at(humidity)
    }

    /// How far above the humid line the point is; positive means too humid.
    pub fn distance_too_humid(&self, temperature: f32, humidity: f32) -> f32 {
        temperature - self.too_humid.at(humidity)
    }

    /// How far below the cold line the point is; positive means too cold.
    pub fn distance_too_cold(&self, temperature: f32, humidity: f32) -> f32 {
        self.too_cold.at(humidity) - temperature
    }

    /// How far below the dry line the point is; positive means too dry.
    pub fn distance_too_dry(&self, temperature: f32, humidity: f32) -> f32 {
        self.too_dry.at(humidity) - temperature
    }

    /// Classifies a point and scores it from 0 (very uncomfortable) to 100.
    ///
    /// Every violated line sets its flag and takes its weighted distance off
    /// the ratio.
    pub fn classify(&self, temperature: f32, humidity: f32) -> (ComfortState, f32) {
        let checks = [
            (
                ComfortState::TOO_HOT,
                self.distance_too_hot(temperature, humidity),
                TEMPERATURE_WEIGHT,
            ),
            (
                ComfortState::TOO_HUMID,
                self.distance_too_humid(temperature, humidity),
                HUMIDITY_WEIGHT,
            ),
            (
                ComfortState::TOO_COLD,
                self.distance_too_cold(temperature, humidity),
                TEMPERATURE_WEIGHT,
            ),
            (
                ComfortState::TOO_DRY,
                self.distance_too_dry(temperature, humidity),
                HUMIDITY_WEIGHT,
            ),
        ];

        let mut state = ComfortState::OK;
        let mut ratio: f32 = 100.0;
        for (flag, distance, weight) in checks.iter() {
            if *distance > 0.0 {
                state |= *flag;
                ratio -= distance * weight;
            }
        }
        (state, ratio.max(0.0))
    }
}
