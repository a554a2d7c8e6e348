#![allow(dead_code)]

pub mod clock;
pub mod concurrent;
pub mod delay;
pub mod digital;
pub mod interrupts;
