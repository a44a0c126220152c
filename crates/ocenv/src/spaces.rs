//! Observation and action space descriptions.
//!
//! A condensed, Gymnasium-compatible space model: bounded continuous boxes
//! and discrete action sets, which is all the checker, the vector backends
//! and the built-in environments exercise.

use ndarray::{ArrayD, IxDyn};
use rand::Rng;

/// An observation or action space.
#[derive(Clone, Debug)]
pub enum Space {
    /// Bounded continuous values with a fixed shape.
    Box {
        low: ArrayD<f32>,
        high: ArrayD<f32>,
    },
    /// Integer actions `0..n`, carried as a single-element array.
    Discrete { n: usize },
}

impl Space {
    /// Create a box space with uniform bounds.
    pub fn uniform_box(shape: &[usize], low: f32, high: f32) -> Self {
        Space::Box {
            low: ArrayD::from_elem(IxDyn(shape), low),
            high: ArrayD::from_elem(IxDyn(shape), high),
        }
    }

    /// Create a box space from explicit per-element bounds.
    pub fn bounded_box(low: Vec<f32>, high: Vec<f32>) -> Self {
        let shape = [low.len()];
        Space::Box {
            low: ArrayD::from_shape_vec(IxDyn(&shape), low).expect("bounds length mismatch"),
            high: ArrayD::from_shape_vec(IxDyn(&shape), high).expect("bounds length mismatch"),
        }
    }

    /// Create a discrete space with `n` actions.
    pub fn discrete(n: usize) -> Self {
        Space::Discrete { n }
    }

    /// Get the shape of samples from this space.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Space::Box { low, .. } => low.shape().to_vec(),
            Space::Discrete { .. } => vec![1],
        }
    }

    /// Total number of elements in a flattened sample.
    pub fn flat_dim(&self) -> usize {
        self.shape().iter().product()
    }

    /// Check if this space contains the value.
    pub fn contains(&self, value: &ArrayD<f32>) -> bool {
        match self {
            Space::Box { low, high } => {
                value.shape() == low.shape()
                    && value
                        .iter()
                        .zip(low.iter().zip(high.iter()))
                        .all(|(&v, (&l, &h))| v >= l && v <= h)
            }
            Space::Discrete { n } => {
                if value.len() != 1 {
                    return false;
                }
                let v = value.iter().next().map(|x| x.round()).unwrap_or(-1.0);
                v >= 0.0 && (v as usize) < *n
            }
        }
    }

    /// Sample a random element from this space.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ArrayD<f32> {
        match self {
            Space::Box { low, high } => {
                let values: Vec<f32> = low
                    .iter()
                    .zip(high.iter())
                    .map(|(&l, &h)| {
                        if h > l {
                            rng.gen_range(l..h)
                        } else {
                            l
                        }
                    })
                    .collect();
                ArrayD::from_shape_vec(IxDyn(low.shape()), values).unwrap()
            }
            Space::Discrete { n } => {
                let v = rng.gen_range(0..*n);
                ArrayD::from_elem(IxDyn(&[1]), v as f32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_box_contains() {
        let space = Space::uniform_box(&[2], -1.0, 1.0);
        let inside = ArrayD::from_shape_vec(IxDyn(&[2]), vec![0.5, -0.5]).unwrap();
        let outside = ArrayD::from_shape_vec(IxDyn(&[2]), vec![0.5, 2.0]).unwrap();
        assert!(space.contains(&inside));
        assert!(!space.contains(&outside));
    }

    #[test]
    fn test_discrete_sample_in_range() {
        let space = Space::discrete(3);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let sample = space.sample(&mut rng);
            assert!(space.contains(&sample));
        }
    }

    #[test]
    fn test_flat_dim() {
        assert_eq!(Space::uniform_box(&[4], 0.0, 1.0).flat_dim(), 4);
        assert_eq!(Space::discrete(5).flat_dim(), 1);
    }
}
