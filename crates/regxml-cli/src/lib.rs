#![deny(unsafe_code)]

//! Library components of the `regxml` command-line driver.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
