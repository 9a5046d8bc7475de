//! Protocol exposures
//!
//! An exposure consumes a `ServerHost` and produces a router for one
//! protocol. Only REST exists today.

pub mod rest;

pub use rest::RestExposure;
