//! Running mean/variance statistics using Welford's online algorithm.
//!
//! Numerically stable per-dimension statistics backing observation and
//! reward normalization.

use serde::{Deserialize, Serialize};

/// Running mean and standard deviation over fixed-dimension samples.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunningMeanStd {
    /// Running mean per dimension
    mean: Vec<f64>,
    /// Sum of squared deviations per dimension (variance = var_sum / count)
    var_sum: Vec<f64>,
    /// Number of samples seen
    count: f64,
    /// Epsilon for numerical stability
    epsilon: f64,
}

impl RunningMeanStd {
    /// Create statistics for `dim`-dimensional samples.
    pub fn new(dim: usize) -> Self {
        Self {
            mean: vec![0.0; dim],
            var_sum: vec![0.0; dim],
            count: 0.0,
            epsilon: 1e-8,
        }
    }

    /// Update with a single sample.
    ///
    /// # Panics
    /// Panics if the sample dimensionality does not match.
    pub fn update(&mut self, sample: &[f32]) {
        assert_eq!(sample.len(), self.mean.len(), "sample dimension mismatch");

        self.count += 1.0;
        for i in 0..sample.len() {
            let x = sample[i] as f64;
            let delta = x - self.mean[i];
            self.mean[i] += delta / self.count;
            let delta2 = x - self.mean[i];
            self.var_sum[i] += delta * delta2;
        }
    }

    /// Update with a flattened batch of samples.
    pub fn update_batch(&mut self, batch: &[f32]) {
        let dim = self.mean.len();
        assert_eq!(
            batch.len() % dim,
            0,
            "batch length must be a multiple of the dimension"
        );

        for sample in batch.chunks_exact(dim) {
            self.update(sample);
        }
    }

    /// Normalize a sample in place and clip it to `[-clip, clip]`.
    pub fn normalize_clip_inplace(&self, values: &mut [f32], clip: f32) {
        assert_eq!(values.len(), self.mean.len(), "sample dimension mismatch");

        for (i, v) in values.iter_mut().enumerate() {
            let normalized = ((*v as f64 - self.mean[i]) / self.std(i)) as f32;
            *v = normalized.clamp(-clip, clip);
        }
    }

    #[inline]
    fn std(&self, i: usize) -> f64 {
        if self.count < 2.0 {
            // Too few samples for a meaningful estimate
            1.0
        } else {
            (self.var_sum[i] / self.count).sqrt().max(self.epsilon)
        }
    }

    /// Get the mean vector.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Get the population variance vector.
    pub fn variance(&self) -> Vec<f64> {
        if self.count < 2.0 {
            vec![1.0; self.mean.len()]
        } else {
            self.var_sum.iter().map(|&v| v / self.count).collect()
        }
    }

    /// Get the sample count.
    pub fn count(&self) -> f64 {
        self.count
    }

    /// Get the dimensionality.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Get the stability epsilon.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welford_mean() {
        let mut stats = RunningMeanStd::new(2);
        stats.update(&[1.0, 2.0]);
        stats.update(&[3.0, 4.0]);
        stats.update(&[5.0, 6.0]);

        let mean = stats.mean();
        assert!((mean[0] - 3.0).abs() < 1e-10);
        assert!((mean[1] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_welford_variance() {
        let mut stats = RunningMeanStd::new(1);
        // Values: 2, 4, 4, 4, 5, 5, 7, 9 -> mean 5, variance 4
        for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.update(&[x]);
        }

        let var = stats.variance();
        assert!((var[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalize_clip() {
        let mut stats = RunningMeanStd::new(1);
        for _ in 0..500 {
            stats.update(&[0.0]);
            stats.update(&[2.0]);
        }

        let mut centered = [1.0f32];
        stats.normalize_clip_inplace(&mut centered, 10.0);
        assert!(centered[0].abs() < 0.1);

        let mut far = [1000.0f32];
        stats.normalize_clip_inplace(&mut far, 10.0);
        assert_eq!(far[0], 10.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut stats = RunningMeanStd::new(3);
        stats.update(&[1.0, 2.0, 3.0]);
        stats.update(&[4.0, 5.0, 6.0]);

        let json = serde_json::to_string(&stats).unwrap();
        let restored: RunningMeanStd = serde_json::from_str(&json).unwrap();

        assert_eq!(stats.mean(), restored.mean());
        assert_eq!(stats.count(), restored.count());
    }
}
