use super::clock;
use embedded_hal::delay::DelayNs;

/// Advances the named fake clock instead of sleeping.
pub struct Delay {
    name: &'static str,
}

impl Delay {
    pub fn new(name: &'static str) -> Delay {
        Delay { name }
    }
}

impl DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        clock::advance(self.name, (ns as u64 + 999) / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        clock::advance(self.name, us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        clock::advance(self.name, ms as u64 * 1000);
    }
}
