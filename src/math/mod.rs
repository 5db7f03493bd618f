//! Mathematical utilities for the tract models

/// Intrinsic conditional autoregressive prior
pub mod icar;
/// Log densities and special functions
pub mod probability;
