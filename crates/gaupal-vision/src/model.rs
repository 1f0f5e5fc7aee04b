//! CNN architecture for the cattle image classifiers.
//!
//! Both image services share this network: four convolutional blocks with
//! max-pooling, adaptive average pooling, then a two-layer head. The preset
//! configurations double as the candidate set for architecture probing when
//! an artifact ships without a config.

use std::fmt;

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig,
        PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// Configuration for the cattle classifier CNN
#[derive(Config, Debug)]
pub struct CattleClassifierConfig {
    /// Number of output classes
    pub num_classes: usize,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub num_channels: usize,

    /// Base number of convolutional filters
    #[config(default = "32")]
    pub base_filters: usize,

    /// Width of the hidden classifier layer
    #[config(default = "256")]
    pub fc_hidden: usize,

    /// Dropout rate for the classifier head
    #[config(default = "0.3")]
    pub dropout: f64,
}

/// Architecture presets, the candidate set for artifact probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchPreset {
    Standard,
    Wide,
    Lite,
}

impl ArchPreset {
    pub const ALL: [ArchPreset; 3] = [ArchPreset::Standard, ArchPreset::Wide, ArchPreset::Lite];

    /// Build the config for this preset with the given class count
    pub fn config(&self, num_classes: usize) -> CattleClassifierConfig {
        match self {
            ArchPreset::Standard => CattleClassifierConfig::new(num_classes),
            ArchPreset::Wide => CattleClassifierConfig::new(num_classes).with_base_filters(64),
            ArchPreset::Lite => CattleClassifierConfig::new(num_classes)
                .with_base_filters(16)
                .with_fc_hidden(128),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArchPreset::Standard => "standard",
            ArchPreset::Wide => "wide",
            ArchPreset::Lite => "lite",
        }
    }
}

impl fmt::Display for ArchPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CattleClassifierConfig {
    /// The preset this config corresponds to, if any
    pub fn preset(&self) -> Option<ArchPreset> {
        ArchPreset::ALL
            .into_iter()
            .find(|p| {
                let c = p.config(self.num_classes);
                c.base_filters == self.base_filters && c.fc_hidden == self.fc_hidden
            })
    }

    /// Architecture name reported by `/model-info`
    pub fn architecture(&self) -> &'static str {
        self.preset().map(|p| p.name()).unwrap_or("custom")
    }

    /// Initialize a classifier from this configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> CattleClassifier<B> {
        let base = self.base_filters;

        let conv1 = ConvBlock::new(self.num_channels, base, 3, device);
        let conv2 = ConvBlock::new(base, base * 2, 3, device);
        let conv3 = ConvBlock::new(base * 2, base * 4, 3, device);
        let conv4 = ConvBlock::new(base * 4, base * 8, 3, device);

        let global_pool = AdaptiveAvgPool2dConfig::new([1, 1]).init();

        let fc1 = LinearConfig::new(base * 8, self.fc_hidden).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        let fc2 = LinearConfig::new(self.fc_hidden, self.num_classes).init(device);

        CattleClassifier {
            conv1,
            conv2,
            conv3,
            conv4,
            global_pool,
            fc1,
            dropout,
            fc2,
        }
    }
}

/// A CNN block with Conv2d, BatchNorm, ReLU and 2x2 max-pooling
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B>,
    relu: Relu,
    pool: MaxPool2d,
}

impl<B: Backend> ConvBlock<B> {
    fn new(in_channels: usize, out_channels: usize, kernel_size: usize, device: &B::Device) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [kernel_size, kernel_size])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let bn = BatchNormConfig::new(out_channels).init(device);
        let pool = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();

        Self {
            conv,
            bn,
            relu: Relu::new(),
            pool,
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = self.bn.forward(x);
        let x = self.relu.forward(x);
        self.pool.forward(x)
    }
}

/// Cattle image classifier CNN
#[derive(Module, Debug)]
pub struct CattleClassifier<B: Backend> {
    conv1: ConvBlock<B>,
    conv2: ConvBlock<B>,
    conv3: ConvBlock<B>,
    conv4: ConvBlock<B>,

    global_pool: AdaptiveAvgPool2d,

    fc1: Linear<B>,
    dropout: Dropout,
    fc2: Linear<B>,
}

impl<B: Backend> CattleClassifier<B> {
    /// Forward pass
    ///
    /// Input shape `[batch, 3, height, width]`, output logits
    /// `[batch, num_classes]`.
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = self.conv2.forward(x);
        let x = self.conv3.forward(x);
        let x = self.conv4.forward(x);

        // [B, C, H, W] -> [B, C, 1, 1] -> [B, C]
        let x = self.global_pool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        let x = self.fc1.forward(x);
        let x = Relu::new().forward(x);
        let x = self.dropout.forward(x);
        self.fc2.forward(x)
    }

    /// Forward pass with softmax over the class dimension
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let logits = self.forward(x);
        burn::tensor::activation::softmax(logits, 1)
    }
}
