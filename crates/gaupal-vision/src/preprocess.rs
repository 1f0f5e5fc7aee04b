//! Image preprocessing for the deployed classifiers.
//!
//! Uploaded bytes are decoded, forced to RGB (grayscale and RGBA inputs are
//! converted), resized, scaled into the range the model was trained with and
//! emitted in CHW layout.

use burn::tensor::{backend::Backend, Tensor};
use image::{imageops::FilterType, DynamicImage, ImageBuffer, Rgb};
use serde::{Deserialize, Serialize};

use gaupal_core::{Error, Result};

/// Pixel scaling applied after resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScaleMode {
    /// `x / 127.5 - 1.0`, the range the deployed classifiers were trained with
    SignedUnit,
    /// `x / 255.0`
    ZeroOne,
    /// Per-channel `(x / 255 - mean) / std`
    Normalized { mean: [f32; 3], std: [f32; 3] },
}

/// Configuration for image preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub width: u32,
    pub height: u32,
    pub scaling: ScaleMode,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            width: 224,
            height: 224,
            scaling: ScaleMode::SignedUnit,
        }
    }
}

/// Image preprocessor for classifier input
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

impl ImagePreprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Decode uploaded bytes and preprocess into a CHW vector
    pub fn preprocess_bytes(&self, bytes: &[u8]) -> Result<Vec<f32>> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput("empty upload".to_string()));
        }
        let decoded = image::load_from_memory(bytes)?;
        Ok(self.preprocess(&decoded))
    }

    /// Preprocess a decoded image into a CHW vector
    pub fn preprocess(&self, image: &DynamicImage) -> Vec<f32> {
        let rgb = image.to_rgb8();
        let resized = self.resize(&rgb);

        let num_pixels = (self.config.width * self.config.height) as usize;
        let mut out = vec![0.0f32; 3 * num_pixels];

        for (i, pixel) in resized.pixels().enumerate() {
            // CHW layout: all R values, then all G values, then all B values
            out[i] = self.scale(pixel[0], 0);
            out[num_pixels + i] = self.scale(pixel[1], 1);
            out[2 * num_pixels + i] = self.scale(pixel[2], 2);
        }

        out
    }

    /// Decode, preprocess and shape into a `[1, 3, H, W]` tensor
    pub fn tensor<B: Backend>(&self, bytes: &[u8], device: &B::Device) -> Result<Tensor<B, 4>> {
        let chw = self.preprocess_bytes(bytes)?;
        let (h, w) = (self.config.height as usize, self.config.width as usize);
        Ok(Tensor::<B, 1>::from_floats(chw.as_slice(), device).reshape([1, 3, h, w]))
    }

    /// Expected model input shape, batch dimension included
    pub fn input_shape(&self) -> [usize; 4] {
        [1, 3, self.config.height as usize, self.config.width as usize]
    }

    fn resize(&self, image: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        let (width, height) = image.dimensions();
        if width == self.config.width && height == self.config.height {
            return image.clone();
        }
        image::imageops::resize(
            image,
            self.config.width,
            self.config.height,
            FilterType::Lanczos3,
        )
    }

    fn scale(&self, value: u8, channel: usize) -> f32 {
        let v = value as f32;
        match self.config.scaling {
            ScaleMode::SignedUnit => v / 127.5 - 1.0,
            ScaleMode::ZeroOne => v / 255.0,
            ScaleMode::Normalized { mean, std } => (v / 255.0 - mean[channel]) / std[channel],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_default_config() {
        let config = PreprocessConfig::default();
        assert_eq!(config.width, 224);
        assert_eq!(config.height, 224);
        assert_eq!(config.scaling, ScaleMode::SignedUnit);
    }

    #[test]
    fn test_signed_unit_scaling_range() {
        let preprocessor = ImagePreprocessor::default();

        let white = ImageBuffer::from_pixel(224, 224, Rgb([255u8, 255u8, 255u8]));
        let out = preprocessor.preprocess(&DynamicImage::ImageRgb8(white));
        assert!((out[0] - 1.0).abs() < 1e-6);

        let black = ImageBuffer::from_pixel(224, 224, Rgb([0u8, 0u8, 0u8]));
        let out = preprocessor.preprocess(&DynamicImage::ImageRgb8(black));
        assert!((out[0] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_chw_layout() {
        let preprocessor = ImagePreprocessor::new(PreprocessConfig {
            width: 2,
            height: 2,
            scaling: ScaleMode::ZeroOne,
        });

        // Pure red image: first plane 1.0, green and blue planes 0.0
        let red = ImageBuffer::from_pixel(2, 2, Rgb([255u8, 0u8, 0u8]));
        let out = preprocessor.preprocess(&DynamicImage::ImageRgb8(red));

        assert_eq!(out.len(), 12);
        assert!(out[..4].iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(out[4..].iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_grayscale_is_stacked_to_three_channels() {
        let preprocessor = ImagePreprocessor::default();
        let gray = DynamicImage::new_luma8(64, 64);
        let out = preprocessor.preprocess(&gray);
        assert_eq!(out.len(), 3 * 224 * 224);
    }

    #[test]
    fn test_normalized_scaling() {
        let preprocessor = ImagePreprocessor::new(PreprocessConfig {
            width: 4,
            height: 4,
            scaling: ScaleMode::Normalized {
                mean: [0.485, 0.456, 0.406],
                std: [0.229, 0.224, 0.225],
            },
        });
        let img = ImageBuffer::from_pixel(4, 4, Rgb([128u8, 128u8, 128u8]));
        let out = preprocessor.preprocess(&DynamicImage::ImageRgb8(img));
        let expected = (128.0 / 255.0 - 0.485) / 0.229;
        assert!((out[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_tensor_shape() {
        let preprocessor = ImagePreprocessor::default();
        let device = Default::default();

        let img = DynamicImage::new_rgb8(100, 80);
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let tensor = preprocessor.tensor::<TestBackend>(&bytes, &device).unwrap();
        assert_eq!(tensor.dims(), [1, 3, 224, 224]);
    }

    #[test]
    fn test_undecodable_bytes() {
        let preprocessor = ImagePreprocessor::default();
        let err = preprocessor.preprocess_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, gaupal_core::Error::Image(_)));
    }

    #[test]
    fn test_empty_upload() {
        let preprocessor = ImagePreprocessor::default();
        let err = preprocessor.preprocess_bytes(&[]).unwrap_err();
        assert!(matches!(err, gaupal_core::Error::InvalidInput(_)));
    }
}
