#![forbid(unsafe_code)]

//! HTTP front for the bankwatch task registry.

pub mod cli;
pub mod http;
