#![forbid(unsafe_code)]

pub mod catalog;
pub mod generator;
pub mod model;
pub mod time;
pub mod validator;

pub use time::Clock;
