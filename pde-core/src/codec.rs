use crate::error::SolverError;
use crate::field::ScalarField;

pub const CHANNELS: usize = 4;

/// Achromatic RGBA8 image, row-major, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LuminanceImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LuminanceImage {
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SolverError> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(SolverError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert a colour RGBA buffer with [`luminance_rgba`]. The length is
    /// checked first; a trailing partial pixel is an error, not dropped.
    pub fn from_color_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self, SolverError> {
        let expected = width * height * CHANNELS;
        if rgba.len() != expected {
            return Err(SolverError::BufferSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        Self::from_rgba(width, height, luminance_rgba(rgba))
    }

    pub fn black(width: usize, height: usize) -> Self {
        let mut data = vec![0u8; width * height * CHANNELS];
        for px in data.chunks_exact_mut(CHANNELS) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn luminance(&self, x: usize, y: usize) -> u8 {
        self.data[(y * self.width + x) * CHANNELS]
    }
}

#[inline]
pub fn normalize_level(level: u8) -> f32 {
    f32::from(level) / 255.0
}

/// Map a field value to an 8-bit level, clamping out-of-range values.
#[inline]
pub fn quantize(value: f32) -> u8 {
    // NaN casts to 0
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn normalize(image: &LuminanceImage) -> ScalarField {
    let data = image
        .data
        .chunks_exact(CHANNELS)
        .map(|px| normalize_level(px[0]))
        .collect();
    ScalarField::from_vec(image.width, image.height, data)
}

/// Write `field` into `out` as an achromatic opaque image without reallocating.
///
/// # Panics
///
/// Panics if the shapes differ.
pub fn denormalize_into(field: &ScalarField, out: &mut LuminanceImage) {
    assert!(
        field.width() == out.width && field.height() == out.height,
        "image shape mismatch"
    );
    for (px, &v) in out.data.chunks_exact_mut(CHANNELS).zip(field.as_slice()) {
        let level = quantize(v);
        px[0] = level;
        px[1] = level;
        px[2] = level;
        px[3] = 255;
    }
}

pub fn denormalize(field: &ScalarField) -> LuminanceImage {
    let mut out = LuminanceImage::black(field.width(), field.height());
    denormalize_into(field, &mut out);
    out
}

/// Convert arbitrary RGBA pixels to achromatic RGBA using Rec.601 luma weights.
pub fn luminance_rgba(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(CHANNELS) {
        let luma = 0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]);
        let level = luma.round().clamp(0.0, 255.0) as u8;
        out.extend_from_slice(&[level, level, level, 255]);
    }
    out
}
