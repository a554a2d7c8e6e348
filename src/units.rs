/// The scale a temperature is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TemperatureScale {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureScale {
    /// Converts a Celsius value into this scale.
    pub fn from_celsius(&self, celsius: f32) -> f32 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    /// Converts a value in this scale into Celsius.
    pub fn to_celsius(&self, value: f32) -> f32 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => fahrenheit_to_celsius(value),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) / 1.8
}

/// Heat index in °F using the Rothfusz regression.
///
/// The regression is only meaningful above roughly 80°F and 40% humidity; no
/// range is enforced.
pub fn heat_index_fahrenheit(temperature: f32, humidity: f32) -> f32 {
    let t2 = temperature * temperature;
    let h2 = humidity * humidity;

    -42.379 + 2.04901523 * temperature + 10.14333127 * humidity
        - 0.22475541 * temperature * humidity
        - 0.00683783 * t2
        - 0.05481717 * h2
        + 0.00122874 * t2 * humidity
        + 0.00085282 * temperature * h2
        - 0.00000199 * t2 * h2
}

/// Heat index in °C, from a regression fit directly on Celsius values.
pub fn heat_index_celsius(temperature: f32, humidity: f32) -> f32 {
    let t2 = temperature * temperature;
    let h2 = humidity * humidity;

    -8.784695 + 1.61139411 * temperature + 2.33854900 * humidity
        - 0.14611605 * temperature * humidity
        - 0.01230809 * t2
        - 0.01642482 * h2
        + 0.00221173 * t2 * humidity
        + 0.00072546 * temperature * h2
        - 0.00000358 * t2 * h2
}

/// Heat index of a Celsius temperature, reported in `scale`.
pub fn heat_index(temperature_celsius: f32, humidity: f32, scale: TemperatureScale) -> f32 {
    match scale {
        TemperatureScale::Celsius => heat_index_celsius(temperature_celsius, humidity),
        TemperatureScale::Fahrenheit => {
            heat_index_fahrenheit(celsius_to_fahrenheit(temperature_celsius), humidity)
        }
    }
}
