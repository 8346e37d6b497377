//! Hash algorithm implementations.

mod average;
mod difference;
mod perceptual;

pub use average::AverageHasher;
pub use difference::DifferenceHasher;
pub use perceptual::PerceptualHasher;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};

/// Shrink an image to a `width` x `height` grayscale thumbnail.
fn grayscale_thumbnail(image: &DynamicImage, width: u32, height: u32) -> GrayImage {
    image.resize_exact(width, height, FilterType::Triangle).to_luma8()
}
