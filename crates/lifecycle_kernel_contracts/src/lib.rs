#![forbid(unsafe_code)]

pub mod common;
pub mod lifecycle;

pub use common::{ContractViolation, ReasonCodeId};
