//! Hierarchical spatial models of tract temperature
//!
//! Both models share the temperature likelihood and the ICAR field; the
//! preferential model adds a Poisson likelihood for station counts.

/// ICAR temperature model
pub mod icar;
/// Unconstrained parameter vector layout
pub mod layout;
/// ICAR model with preferential station sampling
pub mod preferential;
/// Single-chain NUTS sampling through `nuts-rs`
pub mod sampling;

pub use icar::IcarModel;
pub use layout::{ConstrainedDraw, ParameterLayout};
pub use preferential::PreferentialModel;
pub use sampling::{Posterior, SamplerSettings, sample};

/// Differentiable log density over an unconstrained parameter vector
pub trait LogDensity {
    /// Human-readable name used in logs and errors
    fn name(&self) -> &'static str {
        "target density"
    }

    /// Length of the parameter vector
    fn dim(&self) -> usize;

    /// Starting point of the chain
    fn initial_position(&self) -> Vec<f64>;

    /// Log density at `position`, overwriting `gradient` with its gradient
    ///
    /// Both slices have length [`LogDensity::dim`]. Points outside the support
    /// return negative infinity.
    fn ln_density_with_gradient(&self, position: &[f64], gradient: &mut [f64]) -> f64;
}

/// A log density over tract parameters with a known layout
pub trait TractModel: LogDensity {
    /// Layout of the parameter vector
    fn layout(&self) -> ParameterLayout;
}
