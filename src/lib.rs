//! Rategate - Shared Pacing Gate
//!
//! This crate implements a shared rate limiting gate for throttling
//! concurrent workers against one logical resource. Workers call the gate
//! before performing a unit of work; the gate pauses each caller just long
//! enough to keep the long-run call rate at or below a configured ceiling,
//! under either steady spacing or greedy bursting.

pub mod config;
pub mod error;
pub mod gate;
