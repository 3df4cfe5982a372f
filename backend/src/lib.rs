//! ShaadiCraft - Matrimonial Biodata Builder
//!
//! This crate implements tiered entitlements over a live-previewed biodata
//! draft that can be exported once the matching layout is paid for.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
