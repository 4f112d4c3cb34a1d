#![forbid(unsafe_code)]

pub mod accumulator;
pub mod shared;
