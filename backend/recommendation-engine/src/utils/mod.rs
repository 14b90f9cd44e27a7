// Numeric helpers shared by the scoring engines

use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Floor added to norms and deviations before dividing
pub const EPSILON: f64 = 1e-8;

/// Cosine similarity; 0.0 when either vector has zero magnitude
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom <= EPSILON {
        return 0.0;
    }

    let sim = a.dot(&b) / denom;
    if sim.is_finite() {
        sim
    } else {
        0.0
    }
}

/// Indices ordered by descending score.
///
/// The sort is stable, so equal scores keep their input order. NaN compares
/// as equal to everything.
pub fn argsort_desc(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cosine_similarity() {
        let a = array![1.0, 0.0, 1.0];
        let b = array![1.0, 0.0, 1.0];
        let c = array![0.0, 1.0, 0.0];

        assert!((cosine_similarity(a.view(), b.view()) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(a.view(), c.view()).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = array![0.0, 0.0];
        let b = array![1.0, 2.0];

        assert_eq!(cosine_similarity(a.view(), b.view()), 0.0);
    }

    #[test]
    fn test_argsort_desc_is_stable() {
        let order = argsort_desc(&[0.2, 0.9, 0.2, 0.5]);
        assert_eq!(order, vec![1, 3, 0, 2]);
    }
}
