/// Linear-prediction coefficients by Burg's method.
///
/// Returns `a[0..order]` such that `x[n] ≈ Σ a[k-1]·x[n-k]`, or `None` when the
/// frame is too short or carries no energy.
pub(super) fn burg_coefficients(frame: &[f64], order: usize) -> Option<Vec<f64>> {
    let n = frame.len();
    if order == 0 || n <= order + 1 {
        return None;
    }
    let energy: f64 = frame.iter().map(|s| s * s).sum();
    if energy <= 0.0 {
        return None;
    }

    let mut forward: Vec<f64> = frame[..n - 1].to_vec();
    let mut backward: Vec<f64> = frame[1..].to_vec();
    let mut coefficients = vec![0.0; order + 1];
    let mut previous = vec![0.0; order + 1];

    for k in 1..=order {
        let mut num = 0.0;
        let mut denom = 0.0;
        for j in 0..n - k {
            num += forward[j] * backward[j];
            denom += forward[j] * forward[j] + backward[j] * backward[j];
        }
        if denom <= 0.0 {
            return None;
        }
        coefficients[k] = 2.0 * num / denom;
        for i in 1..k {
            coefficients[i] = previous[i] - coefficients[k] * previous[k - i];
        }
        if k == order {
            break;
        }
        previous[1..=k].copy_from_slice(&coefficients[1..=k]);
        for j in 0..n - k - 1 {
            forward[j] -= previous[k] * backward[j];
            backward[j] = backward[j + 1] - previous[k] * forward[j + 1];
        }
    }
    coefficients.remove(0);
    Some(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn recovers_second_order_autoregression() {
        // x[n] = 1.6 x[n-1] - 0.8 x[n-2] + e[n]
        let mut rng = StdRng::seed_from_u64(11);
        let mut x = vec![0.0; 20_000];
        for n in 2..x.len() {
            x[n] = 1.6 * x[n - 1] - 0.8 * x[n - 2] + rng.random_range(-1.0..1.0);
        }
        let a = burg_coefficients(&x, 2).unwrap();
        assert!((a[0] - 1.6).abs() < 0.03, "{a:?}");
        assert!((a[1] + 0.8).abs() < 0.03, "{a:?}");
    }

    #[test]
    fn silent_frame_has_no_model() {
        assert!(burg_coefficients(&[0.0; 64], 10).is_none());
    }
}
