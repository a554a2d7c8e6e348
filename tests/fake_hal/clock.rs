//! A fake microsecond clock per pin name. Time only moves when the fake pin
//! is sampled, a fake delay runs, or a test advances it.
use super::concurrent;
use std::time::Duration;

fn key(name: &str) -> String {
    format!("{}/clock", name)
}

pub fn reset(name: &str) {
    concurrent::set_named_value(&key(name), 0);
}

pub fn now(name: &str) -> u64 {
    concurrent::get_named_value(&key(name))
}

pub fn advance(name: &str, micros: u64) {
    concurrent::add_to_named_value(&key(name), micros);
}

pub fn elapsed_since(name: &str, start: u64) -> Duration {
    Duration::from_micros(now(name) - start)
}
