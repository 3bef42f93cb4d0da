//! Adapter implementations for identity ports.

pub mod jwt;
pub mod memory;
pub mod postgres;
