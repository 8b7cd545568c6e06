// ============================================================
// Layer 4 — Normal-Map Normalisation
// ============================================================
// Surface normals are commonly stored as 8-bit RGB images where
// each channel encodes one component of the normal:
//
//   component = value / 255 * 2 - 1      ([0, 255] → [-1, 1])
//
// Quantisation means the decoded vector is only *roughly* unit
// length, so each pixel is renormalised:
//
//   n = v / max(|v|, 1e-6)
//
// The result is an H × W × 3 f32 array ready to be saved as .npy.

use std::path::Path;

use image::RgbImage;
use ndarray::Array3;

use crate::error::{PrepError, PrepResult};

/// Lower bound on the vector norm before dividing.
pub const MIN_NORM: f32 = 1e-6;

/// Scale a vector to unit length, clamping tiny norms.
pub fn unit_vector(v: [f32; 3]) -> [f32; 3] {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt().max(MIN_NORM);
    [v[0] / norm, v[1] / norm, v[2] / norm]
}

/// Decode one 8-bit RGB pixel into a unit normal.
pub fn decode_pixel(rgb: [u8; 3]) -> [f32; 3] {
    unit_vector(rgb.map(|c| c as f32 / 255.0 * 2.0 - 1.0))
}

/// Convert a whole RGB image into an (height, width, 3) array.
pub fn normalize_rgb(img: &RgbImage) -> Array3<f32> {
    let (width, height) = img.dimensions();
    let mut out = Array3::<f32>::zeros((height as usize, width as usize, 3));

    for (x, y, pixel) in img.enumerate_pixels() {
        let n = decode_pixel(pixel.0);
        for (c, value) in n.into_iter().enumerate() {
            out[[y as usize, x as usize, c]] = value;
        }
    }
    out
}

/// Load an image file (any format the image crate decodes) and
/// convert it to a unit normal field. Grayscale and RGBA inputs
/// are converted to RGB first.
pub fn load_normal_map(path: &Path) -> PrepResult<Array3<f32>> {
    let img = image::open(path).map_err(|e| PrepError::Conversion {
        path:    path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(normalize_rgb(&img.to_rgb8()))
}
