use crate::dhtxx::{Reading, SensorFamily};

/// Number of bytes in a frame: 4 payload bytes followed by a checksum.
pub const FRAME_LEN: usize = 5;
/// Number of bits the sensor sends per frame.
pub const FRAME_BITS: u8 = (FRAME_LEN * 8) as u8;

const SIGN_BIT: u8 = 0x80;

/// One frame as sent on the bus.
///
/// Bytes 0-1 carry humidity, bytes 2-3 carry temperature and byte 4 is the
/// checksum. How the payload is interpreted depends on the [`SensorFamily`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> RawFrame {
        RawFrame(bytes)
    }

    /// Packs a reading into the wire layout of `family`, with a valid checksum.
    ///
    /// Values are truncated to the resolution of the layout: whole units for the
    /// DHT11, tenths for the DHT21/DHT22.
    pub fn encode(family: SensorFamily, temperature: f32, humidity: f32) -> RawFrame {
        let payload = match family {
            SensorFamily::Dht11 => [humidity as u8, 0, temperature as u8, 0],
            SensorFamily::Dht21 | SensorFamily::Dht22 => {
                let humidity_x10 = libm::roundf(humidity * 10.0) as u16;
                let mut temperature_x10 = libm::roundf(libm::fabsf(temperature) * 10.0) as u16 & 0x7FFF;
                if temperature < 0.0 {
                    temperature_x10 |= (SIGN_BIT as u16) << 8;
                }
                let [humidity_high, humidity_low] = humidity_x10.to_be_bytes();
                let [temperature_high, temperature_low] = temperature_x10.to_be_bytes();
                [humidity_high, humidity_low, temperature_high, temperature_low]
            }
        };
        let [b0, b1, b2, b3] = payload;
        RawFrame([b0, b1, b2, b3, checksum(&payload)])
    }

    pub fn bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn payload(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    pub fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// True iff the checksum byte equals the truncated sum of the payload.
    pub fn is_valid(&self) -> bool {
        checksum(&self.payload()) == self.checksum()
    }

    /// Interprets the payload under the layout of `family`.
    ///
    /// Does not check the checksum; callers validate first.
    pub fn decode(&self, family: SensorFamily) -> Reading {
        let [b0, b1, b2, b3] = self.payload();
        match family {
            SensorFamily::Dht11 => Reading {
                humidity: b0 as f32,
                temperature: b2 as f32,
            },
            SensorFamily::Dht21 | SensorFamily::Dht22 => {
                let humidity = u16::from_be_bytes([b0, b1]) as f32 / 10.0;
                let temperature = u16::from_be_bytes([b2 & !SIGN_BIT, b3]) as f32 / 10.0;
                Reading {
                    humidity,
                    temperature: if b2 & SIGN_BIT != 0 {
                        -temperature
                    } else {
                        temperature
                    },
                }
            }
        }
    }

    /// Shifts one received bit into the frame, most significant bit first.
    pub(crate) fn push_bit(&mut self, index: u8, bit: bool) {
        let byte = &mut self.0[(index / 8) as usize];
        *byte <<= 1;
        if bit {
            *byte |= 1;
        }
    }
}

/// The 8-bit truncated sum of the payload bytes.
pub fn checksum(payload: &[u8; 4]) -> u8 {
    payload.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_is_valid {
        ($name:ident, $bytes:expr, $is_valid:expr) => {
            #[test]
            fn $name() {
                assert_eq!(RawFrame::from_bytes($bytes).is_valid(), $is_valid);
            }
        };
    }

    test_is_valid!(all_zeros_is_valid, [0, 0, 0, 0, 0], true);

    test_is_valid!(sum_is_valid, [0x02, 0x80, 0x01, 0x04, 0x87], true);

    test_is_valid!(overflowing_sum_is_truncated, [0xFF, 0xFF, 0x02, 0x00, 0x00], true);

    test_is_valid!(wrong_checksum_is_invalid, [0x11, 0x00, 0x0F, 0x00, 0x11], false);

    test_is_valid!(untruncated_sum_is_invalid, [0xFF, 0x01, 0x00, 0x00, 0xFF], false);

    #[test]
    fn single_bit_corruption_is_rejected() {
        let frame = RawFrame::from_bytes([0x02, 0x8C, 0x01, 0x5F, 0xEE]);
        assert!(frame.is_valid());
        for byte in 0..4 {
            for bit in 0..8 {
                let mut bytes = *frame.bytes();
                bytes[byte] ^= 1 << bit;
                assert!(
                    !RawFrame::from_bytes(bytes).is_valid(),
                    "flipping bit {} of byte {} went unnoticed",
                    bit,
                    byte
                );
            }
        }
    }

    #[test]
    fn push_bit_packs_big_endian() {
        let mut frame = RawFrame::default();
        for (index, bit) in [0, 0, 0, 1, 0, 0, 0, 1].iter().enumerate() {
            frame.push_bit(index as u8, *bit == 1);
        }
        frame.push_bit(8, true);
        assert_eq!(frame.bytes(), &[0x11, 0x01, 0, 0, 0]);
    }

    #[test]
    fn dht11_decode_uses_integer_bytes() {
        let reading = RawFrame::from_bytes([71, 2, 24, 3, 100]).decode(SensorFamily::Dht11);
        assert_eq!(reading.humidity, 71.0);
        assert_eq!(reading.temperature, 24.0);
    }

    #[test]
    fn dht22_decode() {
        let reading =
            RawFrame::from_bytes([0x02, 0x80, 0x01, 0x04, 0x87]).decode(SensorFamily::Dht22);
        assert_eq!(reading.humidity, 64.0);
        assert_eq!(reading.temperature, 26.0);
    }

    #[test]
    fn dht22_decode_negative_temperature() {
        let reading =
            RawFrame::from_bytes([0x01, 0x00, 0x81, 0x01, 0x83]).decode(SensorFamily::Dht22);
        assert_eq!(reading.temperature, -25.7);
    }

    #[test]
    fn dht11_ignores_sign_bit() {
        let reading = RawFrame::from_bytes([0, 0, 0x81, 0, 0x81]).decode(SensorFamily::Dht11);
        assert_eq!(reading.temperature, 129.0);
    }

    #[test]
    fn dht21_shares_dht22_layout() {
        let frame = RawFrame::from_bytes([0x02, 0x8C, 0x01, 0x5F, 0xEE]);
        assert_eq!(frame.decode(SensorFamily::Dht21), frame.decode(SensorFamily::Dht22));
    }

    #[test]
    fn fixed_point_encoding_survives_decode() {
        for &(temperature, humidity) in &[
            (-40.0f32, 0.0f32),
            (-0.1, 12.3),
            (0.0, 50.0),
            (21.7, 45.6),
            (34.9, 99.9),
            (80.0, 100.0),
        ] {
            let frame = RawFrame::encode(SensorFamily::Dht22, temperature, humidity);
            assert!(frame.is_valid());
            let reading = frame.decode(SensorFamily::Dht22);
            assert!((reading.temperature - temperature).abs() <= 0.1);
            assert!((reading.humidity - humidity).abs() <= 0.1);
        }
    }
}
