//! Tests for the ICAR log density and its gradient

#[cfg(test)]
mod tests {
    use prefsample::math::icar::IcarPrior;
    use prefsample::spatial::Adjacency;

    fn path_prior(zero_sum_sd: f64) -> IcarPrior {
        let Ok(adjacency) = Adjacency::from_pairs(4, &[(0, 1), (1, 2), (2, 3)]) else {
            unreachable!("Path pairs are valid");
        };
        IcarPrior::new(&adjacency, zero_sum_sd)
    }

    // Tests the pairwise term is half the sum of squared neighbour differences
    // Verified by summing over both directions of each pair
    #[test]
    fn test_pairwise_density() {
        let prior = path_prior(0.001);
        let field = [0.0, 1.0, 3.0, 3.0];

        assert_eq!(prior.size(), 4);
        assert_eq!(prior.edge_count(), 3);
        assert!((prior.pairwise_ln_density(&field) + 0.5 * (1.0 + 4.0)).abs() < 1e-12);
    }

    // Tests the pairwise term ignores a constant shift while the sum-to-zero term does not
    // Verified by centring the field inside pairwise_ln_density
    #[test]
    fn test_shift_invariance() {
        let prior = path_prior(0.001);
        let field = [0.4, -0.1, 0.2, -0.5];
        let shifted: Vec<f64> = field.iter().map(|x| x + 3.7).collect();

        assert!((prior.pairwise_ln_density(&field) - prior.pairwise_ln_density(&shifted)).abs() < 1e-12);
        assert!(prior.ln_density(&shifted) < prior.ln_density(&field) - 1.0);
    }

    // Tests the analytic gradient against central finite differences
    // Verified by flipping the sign of the pairwise gradient
    #[test]
    fn test_gradient_matches_finite_differences() {
        let prior = path_prior(0.5);
        let field = [0.3, -0.2, 0.7, -0.4];
        let mut gradient = [0.0; 4];
        let value = prior.ln_density_with_gradient(&field, &mut gradient);

        assert!((value - prior.ln_density(&field)).abs() < 1e-12);

        let h = 1e-6;
        for i in 0..field.len() {
            let mut up = field;
            let mut down = field;
            if let (Some(u), Some(d)) = (up.get_mut(i), down.get_mut(i)) {
                *u += h;
                *d -= h;
            }
            let numeric = (prior.ln_density(&up) - prior.ln_density(&down)) / (2.0 * h);
            let analytic = gradient.get(i).copied().unwrap_or(f64::NAN);
            assert!(
                (numeric - analytic).abs() < 1e-6,
                "coordinate {i}: numeric {numeric}, analytic {analytic}"
            );
        }
    }

    // Tests the gradient is accumulated into existing values
    // Verified by overwriting instead of adding
    #[test]
    fn test_gradient_accumulates() {
        let prior = path_prior(1.0);
        let field = [0.0; 4];
        let mut gradient = [1.0; 4];
        prior.ln_density_with_gradient(&field, &mut gradient);

        assert_eq!(gradient, [1.0; 4]);
    }
}
