//! tradetree: turning-point detection and buy/sell strategy tree
//! enumeration over bid/ask tick series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
