use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Mutex;

lazy_static! {
    static ref NAMED_VALUES: Mutex<HashMap<String, u64>> = Mutex::new(HashMap::new());
}

pub fn set_named_value(name: &str, value: u64) {
    let mut map = NAMED_VALUES.lock().unwrap();
    map.insert(name.to_owned(), value);
}

pub fn get_named_value(name: &str) -> u64 {
    let map = NAMED_VALUES.lock().unwrap();
    map.get(name).copied().unwrap_or(0)
}

/// Adds `amount` to the named value and returns the new value.
pub fn add_to_named_value(name: &str, amount: u64) -> u64 {
    let mut map = NAMED_VALUES.lock().unwrap();
    let value = map.entry(name.to_owned()).or_insert(0);
    *value += amount;
    *value
}
