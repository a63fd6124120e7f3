//! Feed-Forward Network

use crate::N_CLASSES;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Network hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpParams {
    /// Hidden layer widths
    pub hidden: Vec<usize>,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Hard cap on training epochs
    pub max_epochs: usize,
    /// Stop when the loss improves by less than this for `patience` epochs
    pub tolerance: f64,
    pub patience: usize,
    /// Seed for weight initialization
    pub seed: u64,
}

impl Default for MlpParams {
    fn default() -> Self {
        Self {
            hidden: vec![64, 32],
            learning_rate: 1e-3,
            max_epochs: 500,
            tolerance: 1e-4,
            patience: 10,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Layer {
    weights: Array2<f64>,
    biases: Array1<f64>,
}

/// Small fully-connected network trained full-batch with Adam and
/// cross-entropy loss. Hidden layers use ReLU; the output layer is softmax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLayerPerceptron {
    layers: Vec<Layer>,
}

impl MultiLayerPerceptron {
    /// Train until the loss plateaus or the epoch cap is hit
    pub fn fit(x: ArrayView2<'_, f64>, y: &[usize], params: &MlpParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut sizes = vec![x.ncols()];
        sizes.extend_from_slice(&params.hidden);
        sizes.push(N_CLASSES);

        let mut layers: Vec<Layer> = sizes
            .windows(2)
            .map(|w| xavier_layer(w[0], w[1], &mut rng))
            .collect();

        let n = x.nrows() as f64;
        let targets = one_hot(y);
        let mut adam = AdamState::new(&layers, params.learning_rate);

        let mut best_loss = f64::INFINITY;
        let mut stalled = 0usize;

        for epoch in 0..params.max_epochs {
            // Forward pass, keeping every activation for backprop
            let mut activations = vec![x.to_owned()];
            for (i, layer) in layers.iter().enumerate() {
                let z = activations[i].dot(&layer.weights) + &layer.biases;
                let a = if i + 1 == layers.len() {
                    softmax_rows(z)
                } else {
                    z.mapv(|v| v.max(0.0))
                };
                activations.push(a);
            }

            let output = activations.last().cloned().unwrap_or_default();
            let loss = cross_entropy(&output, &targets);

            // Backward pass
            let mut delta = (&output - &targets) / n;
            let mut grads = Vec::with_capacity(layers.len());
            for (i, layer) in layers.iter().enumerate().rev() {
                let grad_w = activations[i].t().dot(&delta);
                let grad_b = delta.sum_axis(Axis(0));
                if i > 0 {
                    delta = delta.dot(&layer.weights.t());
                    // ReLU gradient gates on the forward activation
                    delta.zip_mut_with(&activations[i], |d, a| {
                        if *a <= 0.0 {
                            *d = 0.0;
                        }
                    });
                }
                grads.push((grad_w, grad_b));
            }
            grads.reverse();
            adam.step(&mut layers, &grads);

            if best_loss - loss < params.tolerance {
                stalled += 1;
                if stalled >= params.patience {
                    debug!(epoch, loss, "training stopped on loss plateau");
                    break;
                }
            } else {
                stalled = 0;
            }
            best_loss = best_loss.min(loss);
        }

        Self { layers }
    }

    /// Softmax output distributions
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<[f64; N_CLASSES]> {
        let mut a = x.to_owned();
        for (i, layer) in self.layers.iter().enumerate() {
            let z = a.dot(&layer.weights) + &layer.biases;
            a = if i + 1 == self.layers.len() {
                softmax_rows(z)
            } else {
                z.mapv(|v| v.max(0.0))
            };
        }

        a.outer_iter()
            .map(|row| {
                let mut probs = [0.0; N_CLASSES];
                for (p, v) in probs.iter_mut().zip(row.iter()) {
                    *p = *v;
                }
                probs
            })
            .collect()
    }
}

fn xavier_layer(fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Layer {
    let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
    let weights =
        Array2::from_shape_fn((fan_in, fan_out), |_| rng.gen_range(-bound..bound));
    Layer {
        weights,
        biases: Array1::zeros(fan_out),
    }
}

fn one_hot(y: &[usize]) -> Array2<f64> {
    let mut out = Array2::zeros((y.len(), N_CLASSES));
    for (i, &label) in y.iter().enumerate() {
        out[[i, label]] = 1.0;
    }
    out
}

fn softmax_rows(mut z: Array2<f64>) -> Array2<f64> {
    for mut row in z.axis_iter_mut(Axis(0)) {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
    z
}

fn cross_entropy(output: &Array2<f64>, targets: &Array2<f64>) -> f64 {
    let n = output.nrows().max(1) as f64;
    let mut loss = 0.0;
    for (o, t) in output.iter().zip(targets.iter()) {
        if *t > 0.0 {
            loss -= t * o.max(1e-12).ln();
        }
    }
    loss / n
}

/// Per-parameter Adam moment estimates
struct AdamState {
    lr: f64,
    t: i32,
    m: Vec<(Array2<f64>, Array1<f64>)>,
    v: Vec<(Array2<f64>, Array1<f64>)>,
}

impl AdamState {
    const BETA1: f64 = 0.9;
    const BETA2: f64 = 0.999;
    const EPS: f64 = 1e-8;

    fn new(layers: &[Layer], lr: f64) -> Self {
        let zeros = |l: &Layer| {
            (
                Array2::zeros(l.weights.raw_dim()),
                Array1::zeros(l.biases.raw_dim()),
            )
        };
        Self {
            lr,
            t: 0,
            m: layers.iter().map(zeros).collect(),
            v: layers.iter().map(zeros).collect(),
        }
    }

    fn step(&mut self, layers: &mut [Layer], grads: &[(Array2<f64>, Array1<f64>)]) {
        self.t += 1;
        let bias1 = 1.0 - Self::BETA1.powi(self.t);
        let bias2 = 1.0 - Self::BETA2.powi(self.t);

        for i in 0..layers.len() {
            let (gw, gb) = &grads[i];

            self.m[i].0.zip_mut_with(gw, |m, g| {
                *m = Self::BETA1 * *m + (1.0 - Self::BETA1) * g;
            });
            self.v[i].0.zip_mut_with(gw, |v, g| {
                *v = Self::BETA2 * *v + (1.0 - Self::BETA2) * g * g;
            });
            self.m[i].1.zip_mut_with(gb, |m, g| {
                *m = Self::BETA1 * *m + (1.0 - Self::BETA1) * g;
            });
            self.v[i].1.zip_mut_with(gb, |v, g| {
                *v = Self::BETA2 * *v + (1.0 - Self::BETA2) * g * g;
            });

            let lr = self.lr;
            azip_update(&mut layers[i].weights, &self.m[i].0, &self.v[i].0, lr, bias1, bias2);
            for ((w, m), v) in layers[i]
                .biases
                .iter_mut()
                .zip(self.m[i].1.iter())
                .zip(self.v[i].1.iter())
            {
                let m_hat = m / bias1;
                let v_hat = v / bias2;
                *w -= lr * m_hat / (v_hat.sqrt() + Self::EPS);
            }
        }
    }
}

fn azip_update(
    weights: &mut Array2<f64>,
    m: &Array2<f64>,
    v: &Array2<f64>,
    lr: f64,
    bias1: f64,
    bias2: f64,
) {
    for ((w, m), v) in weights.iter_mut().zip(m.iter()).zip(v.iter()) {
        let m_hat = m / bias1;
        let v_hat = v / bias2;
        *w -= lr * m_hat / (v_hat.sqrt() + AdamState::EPS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn blobs() -> (Array2<f64>, Vec<usize>) {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..15 {
            let jitter = (i % 5) as f64 * 0.05;
            rows.extend_from_slice(&[-1.0 + jitter, -1.0]);
            y.push(1);
            rows.extend_from_slice(&[1.0 + jitter, 1.0]);
            y.push(6);
        }
        (Array2::from_shape_vec((30, 2), rows).unwrap(), y)
    }

    #[test]
    fn test_learns_separable_clusters() {
        let (x, y) = blobs();
        let params = MlpParams {
            hidden: vec![16],
            max_epochs: 300,
            ..MlpParams::default()
        };
        let model = MultiLayerPerceptron::fit(x.view(), &y, &params);
        let probs = model.predict_proba(x.view());
        let correct = probs
            .iter()
            .zip(&y)
            .filter(|(p, &label)| super::super::argmax(*p) == label)
            .count();
        assert!(correct as f64 / y.len() as f64 > 0.9);
    }

    #[test]
    fn test_output_is_a_distribution() {
        let (x, y) = blobs();
        let params = MlpParams {
            hidden: vec![8],
            max_epochs: 50,
            ..MlpParams::default()
        };
        let model = MultiLayerPerceptron::fit(x.view(), &y, &params);
        for probs in model.predict_proba(x.view()) {
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6);
            assert!(probs.iter().all(|p| *p >= 0.0));
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let (x, y) = blobs();
        let params = MlpParams {
            hidden: vec![8],
            max_epochs: 20,
            ..MlpParams::default()
        };
        let a = MultiLayerPerceptron::fit(x.view(), &y, &params);
        let b = MultiLayerPerceptron::fit(x.view(), &y, &params);
        assert_eq!(a, b);
    }
}
