//! Domain models for Salonix.
//!
//! These are the core types shared across all crates.

pub mod customer;
pub mod day_closing;
pub mod tenant;
