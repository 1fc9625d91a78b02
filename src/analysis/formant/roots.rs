use rustfft::num_complex::Complex64;

const MAX_ITERATIONS: usize = 500;
const TOLERANCE: f64 = 1e-12;

/// Roots of the prediction polynomial `z^m − a₁z^(m−1) − … − a_m`.
///
/// Roots outside the unit circle are reflected inside so that every pole
/// describes a decaying resonance.
pub(super) fn prediction_roots(coefficients: &[f64]) -> Vec<Complex64> {
    let mut monic = Vec::with_capacity(coefficients.len() + 1);
    monic.push(1.0);
    monic.extend(coefficients.iter().map(|a| -a));
    polynomial_roots(&monic)
        .into_iter()
        .map(|z| if z.norm() > 1.0 { 1.0 / z.conj() } else { z })
        .collect()
}

/// All complex roots of a monic polynomial, highest power first.
fn polynomial_roots(monic: &[f64]) -> Vec<Complex64> {
    let degree = monic.len().saturating_sub(1);
    if degree == 0 {
        return Vec::new();
    }
    let seed = Complex64::new(0.4, 0.9);
    let mut roots: Vec<Complex64> = (0..degree).map(|k| seed.powu(k as u32)).collect();

    for _ in 0..MAX_ITERATIONS {
        let mut largest_step = 0.0_f64;
        for i in 0..degree {
            let zi = roots[i];
            let denom = roots
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .fold(Complex64::new(1.0, 0.0), |acc, (_, &zj)| acc * (zi - zj));
            if denom.norm() == 0.0 {
                continue;
            }
            let step = evaluate(monic, zi) / denom;
            roots[i] = zi - step;
            largest_step = largest_step.max(step.norm());
        }
        if largest_step < TOLERANCE {
            break;
        }
    }
    roots.iter().map(|&z| polish(monic, z)).collect()
}

fn evaluate(poly: &[f64], z: Complex64) -> Complex64 {
    poly.iter()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c)
}

fn derivative(poly: &[f64], z: Complex64) -> Complex64 {
    let degree = poly.len() - 1;
    poly[..degree]
        .iter()
        .enumerate()
        .fold(Complex64::new(0.0, 0.0), |acc, (i, &c)| {
            acc * z + c * (degree - i) as f64
        })
}

/// A few Newton steps, stopping early if the step stops shrinking.
fn polish(poly: &[f64], mut z: Complex64) -> Complex64 {
    let mut last_residual = evaluate(poly, z).norm();
    for _ in 0..10 {
        let slope = derivative(poly, z);
        if slope.norm() == 0.0 {
            break;
        }
        let candidate = z - evaluate(poly, z) / slope;
        let residual = evaluate(poly, candidate).norm();
        if residual >= last_residual {
            break;
        }
        z = candidate;
        last_residual = residual;
    }
    z
}
