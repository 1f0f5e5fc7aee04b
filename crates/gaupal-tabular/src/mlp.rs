//! Small MLP used by the tabular classifier, regressor and ensemble heads.

use burn::{
    config::Config,
    module::Module,
    nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu},
    tensor::{backend::Backend, Tensor},
};

/// Configuration for a tabular net
#[derive(Config, Debug)]
pub struct TabularNetConfig {
    /// Input feature width (post feature-selection)
    pub num_features: usize,

    /// Output width: class count for classifier heads, 1 for regression
    pub num_outputs: usize,

    #[config(default = "64")]
    pub hidden_size: usize,

    #[config(default = "0.1")]
    pub dropout: f64,
}

impl TabularNetConfig {
    /// Initialize a net from this configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> TabularNet<B> {
        TabularNet {
            fc1: LinearConfig::new(self.num_features, self.hidden_size).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            fc2: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            fc3: LinearConfig::new(self.hidden_size, self.num_outputs).init(device),
            activation: Relu::new(),
        }
    }
}

/// Linear -> ReLU -> Dropout -> Linear -> ReLU -> Linear
#[derive(Module, Debug)]
pub struct TabularNet<B: Backend> {
    fc1: Linear<B>,
    dropout: Dropout,
    fc2: Linear<B>,
    fc3: Linear<B>,
    activation: Relu,
}

impl<B: Backend> TabularNet<B> {
    /// Forward pass; returns `[batch, num_outputs]` logits (regression heads
    /// use the raw output).
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.fc1.forward(x);
        let x = self.activation.forward(x);
        let x = self.dropout.forward(x);
        let x = self.fc2.forward(x);
        let x = self.activation.forward(x);
        self.fc3.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_output_shape() {
        let device = Default::default();
        let net = TabularNetConfig::new(12, 26).init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 2>::zeros([1, 12], &device);
        assert_eq!(net.forward(input).dims(), [1, 26]);
    }

    #[test]
    fn test_regression_head() {
        let device = Default::default();
        let net = TabularNetConfig::new(8, 1)
            .with_hidden_size(16)
            .init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 2>::zeros([3, 8], &device);
        assert_eq!(net.forward(input).dims(), [3, 1]);
    }
}
