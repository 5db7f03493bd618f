//! Tests for the preferential sampling model density

#[cfg(test)]
mod tests {
    use prefsample::analysis::features::PreparedFeatures;
    use prefsample::model::icar::IcarModel;
    use prefsample::model::preferential::PreferentialModel;
    use prefsample::model::{LogDensity, TractModel};
    use prefsample::spatial::Adjacency;

    fn inputs(population: &[f64]) -> (PreparedFeatures, Adjacency) {
        let features = PreparedFeatures::new(
            vec![Some(21.0), Some(19.5), None],
            vec![3, 1, 0],
            population,
        );
        let adjacency = Adjacency::from_pairs(3, &[(0, 1), (1, 2)]);
        match (features, adjacency) {
            (Ok(features), Ok(adjacency)) => (features, adjacency),
            _ => unreachable!("Fixture inputs are valid"),
        }
    }

    fn ln_density<M: LogDensity>(model: &M, position: &[f64]) -> f64 {
        let mut gradient = vec![0.0; position.len()];
        model.ln_density_with_gradient(position, &mut gradient)
    }

    // Tests the analytic gradient against central finite differences
    // Verified by omitting the Poisson term from the field gradient
    #[test]
    fn test_gradient_matches_finite_differences() {
        let (features, adjacency) = inputs(&[2500.0, 1200.0, 700.0]);
        let Ok(model) = PreferentialModel::new(&features, &adjacency) else {
            unreachable!("Fixture sizes agree");
        };
        let position = vec![20.1, -0.4, -2.0, -2.2, -2.5, 0.002, 0.001, -0.002, -0.3, 0.8];
        let mut gradient = vec![0.0; model.dim()];
        model.ln_density_with_gradient(&position, &mut gradient);

        let h = 1e-6;
        for i in 0..position.len() {
            let mut up = position.clone();
            let mut down = position.clone();
            if let (Some(u), Some(d)) = (up.get_mut(i), down.get_mut(i)) {
                *u += h;
                *d -= h;
            }
            let numeric = (ln_density(&model, &up) - ln_density(&model, &down)) / (2.0 * h);
            let analytic = gradient.get(i).copied().unwrap_or(f64::NAN);
            let tolerance = 1e-4 * analytic.abs().max(1.0);
            assert!(
                (numeric - analytic).abs() < tolerance,
                "coordinate {i}: numeric {numeric}, analytic {analytic}"
            );
        }
    }

    // Tests the joint model extends the ICAR layout with two coefficients
    // Verified by reusing the ICAR dimension
    #[test]
    fn test_layout_and_initial_draw() {
        let (features, adjacency) = inputs(&[2500.0, 1200.0, 700.0]);
        let (Ok(icar), Ok(model)) = (
            IcarModel::new(&features, &adjacency),
            PreferentialModel::new(&features, &adjacency),
        ) else {
            unreachable!("Fixture sizes agree");
        };

        assert_eq!(model.dim(), icar.dim() + 2);
        assert_eq!(model.layout().intensity(), Some((8, 9)));

        let draw = model.initial_draw();
        assert_eq!(draw.intensity, Some((-1.0, -1.0)));
        assert_eq!(draw.field, icar.initial_draw().field);
        assert!(ln_density(&model, &model.initial_position()).is_finite());
    }

    // Tests the joint density adds the Poisson and coefficient prior terms
    // Verified by dropping the ln(count!) normalizer
    #[test]
    fn test_density_decomposition() {
        let (features, adjacency) = inputs(&[2000.0, 1000.0, 500.0]);
        let (Ok(icar), Ok(model)) = (
            IcarModel::new(&features, &adjacency),
            PreferentialModel::new(&features, &adjacency),
        ) else {
            unreachable!("Fixture sizes agree");
        };

        // theta = (0, 0) and phi = 0 give rates equal to scaled population
        let mut joint = icar.initial_position();
        for phi in joint.iter_mut().skip(icar.layout().field().start) {
            *phi = 0.0;
        }
        let temperature_part = ln_density(&icar, &joint);
        joint.extend([0.0, 0.0]);

        let rates = [2.0f64, 1.0, 0.5];
        let counts = [3.0f64, 1.0, 0.0];
        let factorials = [6.0f64, 1.0, 1.0];
        let poisson: f64 = rates
            .iter()
            .zip(counts)
            .zip(factorials)
            .map(|((rate, k), factorial)| k * rate.ln() - rate - factorial.ln())
            .sum();
        let theta_prior = 2.0 * (-0.5 - std::f64::consts::TAU.sqrt().ln());

        let expected = temperature_part + poisson + theta_prior;
        let actual = ln_density(&model, &joint);
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    // Tests a zero-population tract with no stations keeps the density finite
    // Verified by evaluating ln(0) inside the gradient
    #[test]
    fn test_zero_population_tract() {
        let (features, adjacency) = inputs(&[2500.0, 1200.0, 0.0]);
        let Ok(model) = PreferentialModel::new(&features, &adjacency) else {
            unreachable!("Fixture sizes agree");
        };
        let position = model.initial_position();
        let mut gradient = vec![0.0; model.dim()];

        assert!(model.ln_density_with_gradient(&position, &mut gradient).is_finite());
        assert!(gradient.iter().all(|g| g.is_finite()));
    }
}
