use libm::{log, log10, pow};

/// Dew point estimators, ordered by numeric id.
///
/// Timings were measured on an 80MHz core; errors are relative to
/// [`DewPointAlgorithm::Accurate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DewPointAlgorithm {
    /// Goff-Gratch saturation vapor pressure. Reference grade, ~6.0ms.
    #[default]
    Accurate = 0,
    /// Dew point depression polynomial, no vapor pressure step. ~1.5ms, ~0.04°C.
    Fast = 1,
    /// Lowe's polynomial for saturation vapor pressure. ~5.7ms, ~0.01°C.
    AccurateFast = 2,
    /// Magnus closed form. ~1.4ms, ~0.10°C.
    Fastest = 3,
}

impl TryFrom<u8> for DewPointAlgorithm {
    type Error = u8;

    fn try_from(id: u8) -> Result<DewPointAlgorithm, u8> {
        match id {
            0 => Ok(DewPointAlgorithm::Accurate),
            1 => Ok(DewPointAlgorithm::Fast),
            2 => Ok(DewPointAlgorithm::AccurateFast),
            3 => Ok(DewPointAlgorithm::Fastest),
            _ => Err(id),
        }
    }
}

/// Dew point in °C for a temperature in °C and a relative humidity in percent.
///
/// Humidity outside (0, 100] gives NaN or a meaningless value rather than an
/// error; callers are expected to validate their inputs.
pub fn dew_point(temperature: f32, humidity: f32, algorithm: DewPointAlgorithm) -> f64 {
    let temperature = temperature as f64;
    let humidity = humidity as f64 * 0.01;

    match algorithm {
        DewPointAlgorithm::Accurate => {
            from_vapor_pressure(humidity * goff_gratch_saturation_pressure(temperature))
        }
        DewPointAlgorithm::AccurateFast => {
            from_vapor_pressure(humidity * lowe_saturation_pressure(temperature))
        }
        DewPointAlgorithm::Fast => {
            // Baker and Schlatter (1982), as used for U.S. rawinsonde data.
            let dryness = 1.0 - humidity;
            let depression = (14.55 + 0.114 * temperature) * dryness
                + pow((2.5 + 0.007 * temperature) * dryness, 3.0)
                + (15.9 + 0.117 * temperature) * pow(dryness, 14.0);
            temperature - depression
        }
        DewPointAlgorithm::Fastest => {
            const A: f64 = 17.271;
            const B: f64 = 237.7;
            let gamma = (A * temperature) / (B + temperature) + log(humidity);
            (B * gamma) / (A - gamma)
        }
    }
}

/// Saturation vapor pressure over liquid water in hPa (Goff and Gratch).
fn goff_gratch_saturation_pressure(temperature: f64) -> f64 {
    const CELSIUS_TO_KELVIN: f64 = 273.15;
    // Boiling point of water in K, and log10 of the saturation pressure there.
    const BOILING_POINT: f64 = 373.15;
    const LOG_PRESSURE_AT_BOILING: f64 = 3.00571489795;
    const C1: f64 = -7.90298;
    const C2: f64 = 5.02808;
    const C3: f64 = 1.3816e-7;
    const C4: f64 = 11.344;
    const C5: f64 = 8.1328e-3;
    const C6: f64 = -3.49149;

    let kelvin = temperature + CELSIUS_TO_KELVIN;
    let ratio = BOILING_POINT / kelvin - 1.0;
    let pressure = pow(
        10.0,
        C1 * ratio + C2 * log10(ratio + 1.0)
            - C3 * (pow(10.0, C4 * (1.0 - kelvin / BOILING_POINT)) - 1.0)
            + C5 * (pow(10.0, C6 * ratio) - 1.0)
            + LOG_PRESSURE_AT_BOILING,
    );
    pressure.max(0.0)
}

/// Saturation vapor pressure in hPa from Lowe's (1977) 6th order polynomial.
fn lowe_saturation_pressure(temperature: f64) -> f64 {
    6.107799961
        + temperature
            * (0.4436518521
                + temperature
                    * (0.01428945805
                        + temperature
                            * (2.650648471e-4
                                + temperature
                                    * (3.031240396e-6
                                        + temperature
                                            * (2.034080948e-8 + temperature * 6.136820929e-11)))))
}

/// Inverts the Magnus form for a vapor pressure in hPa.
fn from_vapor_pressure(vapor_pressure: f64) -> f64 {
    // hPa to kPa, relative to the 0°C saturation pressure.
    let gamma = log(vapor_pressure / (10.0 * 0.61078));
    (241.88 * gamma) / (17.558 - gamma)
}
