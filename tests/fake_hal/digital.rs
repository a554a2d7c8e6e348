use super::{clock, concurrent};
use dht_climate::pin::{IoPin, PinState, Pull};
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use std::collections::VecDeque;

#[derive(Debug, PartialEq)]
pub enum Error {}

impl digital::Error for Error {
    fn kind(&self) -> ErrorKind {
        match *self {}
    }
}

/// A level held for some number of microseconds.
pub type Segment = (bool, u64);

/// Every sample of the pin costs this much fake time.
pub const SAMPLE_COST_US: u64 = 1;

/// A pin that plays back one queued waveform each time it is switched to
/// input mode. Outside a waveform, the line idles high.
#[derive(Debug)]
pub struct Pin {
    name: &'static str,
    waveforms: VecDeque<Vec<Segment>>,
    active: Vec<Segment>,
    started_at: u64,
}

impl Pin {
    pub fn new(name: &'static str) -> Pin {
        clock::reset(name);
        concurrent::set_named_value(&requests_key(name), 0);
        concurrent::set_named_value(&pull_up_key(name), 0);
        Pin {
            name,
            waveforms: VecDeque::new(),
            active: Vec::new(),
            started_at: 0,
        }
    }

    /// Queues the response to the next request.
    pub fn push_waveform(&mut self, waveform: Vec<Segment>) {
        self.waveforms.push_back(waveform);
    }

    fn level_now(&self) -> bool {
        let mut offset = clock::now(self.name) - self.started_at;
        for (level, duration) in self.active.iter() {
            if offset < *duration {
                return *level;
            }
            offset -= duration;
        }
        true
    }
}

fn requests_key(name: &str) -> String {
    format!("{}/requests", name)
}

fn pull_up_key(name: &str) -> String {
    format!("{}/pull_up", name)
}

/// How many times the line was pulled low to request a frame.
pub fn request_count(name: &str) -> u64 {
    concurrent::get_named_value(&requests_key(name))
}

/// Whether the internal pull-up was enabled on the last release.
pub fn pulled_up(name: &str) -> bool {
    concurrent::get_named_value(&pull_up_key(name)) == 1
}

/// The sensor's answer to a request: ACK, 40 bits and the end marker.
pub fn frame_waveform(bytes: [u8; 5]) -> Vec<Segment> {
    let mut waveform = preamble();
    for byte in bytes.iter() {
        for shift in (0..8).rev() {
            waveform.extend_from_slice(&bit((byte >> shift) & 1 == 1));
        }
    }
    waveform.push((false, 50));
    waveform
}

/// Host release followed by the sensor's ACK.
pub fn preamble() -> Vec<Segment> {
    vec![(true, 30), (false, 80), (true, 80)]
}

pub fn bit(one: bool) -> [Segment; 2] {
    [(false, 50), (true, if one { 70 } else { 27 })]
}

impl ErrorType for Pin {
    type Error = Error;
}

impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Error> {
        let level = self.level_now();
        clock::advance(self.name, SAMPLE_COST_US);
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Error> {
        Ok(!self.is_high()?)
    }
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Error> {
        concurrent::add_to_named_value(&requests_key(self.name), 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl IoPin<Pin, Pin> for Pin {
    type Error = Error;

    fn into_input_pin(mut self, pull: Pull) -> Result<Pin, Error> {
        concurrent::set_named_value(&pull_up_key(self.name), (pull == Pull::Up) as u64);
        self.active = self.waveforms.pop_front().unwrap_or_default();
        self.started_at = clock::now(self.name);
        Ok(self)
    }

    fn into_output_pin(mut self, _state: PinState) -> Result<Pin, Error> {
        self.active.clear();
        Ok(self)
    }
}
