//! Log densities and special functions used by the tract models

/// ln(sqrt(2π))
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function using the Lanczos approximation
///
/// Accurate to roughly 15 significant digits for positive arguments, which is
/// all the Poisson and inverse gamma normalizers need.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin().abs()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64));

    LN_SQRT_2PI + (x + 0.5) * t.ln() - t + series.ln()
}

/// Log density of Normal(mean, sd) at x
pub fn normal_ln_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    -0.5 * z * z - sd.ln() - LN_SQRT_2PI
}

/// Log density of InverseGamma(alpha, beta) at x > 0
pub fn inverse_gamma_ln_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x <= 0.0 {
        return f64::NEG_INFINITY;
    }
    alpha * beta.ln() - ln_gamma(alpha) - (alpha + 1.0) * x.ln() - beta / x
}

/// Shape and scale of the inverse gamma distribution with the given mean and sd
///
/// Uses alpha = mean²/sd² + 2 and beta = mean (mean²/sd² + 1).
pub fn inverse_gamma_from_moments(mean: f64, sd: f64) -> (f64, f64) {
    let ratio = (mean / sd).powi(2);
    (ratio + 2.0, mean * (ratio + 1.0))
}

/// Log probability of count `k` under Poisson(rate), given ln(rate)
///
/// A rate of zero (`ln_rate == -inf`) yields 0 for `k == 0` and -inf otherwise.
pub fn poisson_ln_pmf(k: u64, ln_rate: f64) -> f64 {
    let k = k as f64;
    if ln_rate == f64::NEG_INFINITY {
        return if k == 0.0 { 0.0 } else { f64::NEG_INFINITY };
    }
    k.mul_add(ln_rate, -ln_rate.exp()) - ln_gamma(k + 1.0)
}
