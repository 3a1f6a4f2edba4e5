pub struct MseLoss;

impl MseLoss {
    /// Squared error of one sample, summed over its outputs: Σ(predicted - expected)²
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    /// Mean of per-sample losses over a dataset.
    pub fn mean(sample_losses: impl IntoIterator<Item = f64>) -> f64 {
        let (total, count) = sample_losses.into_iter()
            .fold((0.0, 0usize), |(total, count), loss| (total + loss, count + 1));
        total / count as f64
    }
}
