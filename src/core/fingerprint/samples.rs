//! Raw sample storage of a decoded raster and its big-endian serialization.

use image::DynamicImage;
use std::borrow::Cow;

/// The sample storage of a decoded image, without any container framing.
#[derive(Debug, Clone, Copy)]
pub enum Samples<'a> {
    U8(&'a [u8]),
    I16(&'a [i16]),
    U16(&'a [u16]),
    I32(&'a [i32]),
    F32(&'a [f32]),
    F64(&'a [f64]),
}

impl<'a> Samples<'a> {
    /// Borrow the sample storage of a decoded image.
    ///
    /// Returns `None` for layouts the decoder may add in the future.
    pub fn from_image(image: &'a DynamicImage) -> Option<Self> {
        let samples = match image {
            DynamicImage::ImageLuma8(buffer) => Samples::U8(buffer.as_raw()),
            DynamicImage::ImageLumaA8(buffer) => Samples::U8(buffer.as_raw()),
            DynamicImage::ImageRgb8(buffer) => Samples::U8(buffer.as_raw()),
            DynamicImage::ImageRgba8(buffer) => Samples::U8(buffer.as_raw()),
            DynamicImage::ImageLuma16(buffer) => Samples::U16(buffer.as_raw()),
            DynamicImage::ImageLumaA16(buffer) => Samples::U16(buffer.as_raw()),
            DynamicImage::ImageRgb16(buffer) => Samples::U16(buffer.as_raw()),
            DynamicImage::ImageRgba16(buffer) => Samples::U16(buffer.as_raw()),
            DynamicImage::ImageRgb32F(buffer) => Samples::F32(buffer.as_raw()),
            DynamicImage::ImageRgba32F(buffer) => Samples::F32(buffer.as_raw()),
            _ => return None,
        };
        Some(samples)
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(values) => values.len(),
            Samples::I16(values) => values.len(),
            Samples::U16(values) => values.len(),
            Samples::I32(values) => values.len(),
            Samples::F32(values) => values.len(),
            Samples::F64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width in bytes of one element
    pub fn element_width(&self) -> usize {
        match self {
            Samples::U8(_) => 1,
            Samples::I16(_) | Samples::U16(_) => 2,
            Samples::I32(_) | Samples::F32(_) => 4,
            Samples::F64(_) => 8,
        }
    }

    /// Serialize every element in big-endian order.
    ///
    /// 8-bit storage is borrowed unchanged; the result always holds
    /// `len() * element_width()` bytes.
    pub fn to_be_bytes(&self) -> Cow<'a, [u8]> {
        match *self {
            Samples::U8(values) => Cow::Borrowed(values),
            Samples::I16(values) => Cow::Owned(serialize_be(values, i16::to_be_bytes)),
            Samples::U16(values) => Cow::Owned(serialize_be(values, u16::to_be_bytes)),
            Samples::I32(values) => Cow::Owned(serialize_be(values, i32::to_be_bytes)),
            Samples::F32(values) => Cow::Owned(serialize_be(values, f32::to_be_bytes)),
            Samples::F64(values) => Cow::Owned(serialize_be(values, f64::to_be_bytes)),
        }
    }
}

fn serialize_be<T: Copy, const N: usize>(values: &[T], to_be: fn(T) -> [u8; N]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * N);
    for &value in values {
        bytes.extend_from_slice(&to_be(value));
    }
    bytes
}
