//! Error types for the corner-tag-eraser crate.

/// Errors that can occur while parsing a rectangle or erasing a tag.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The rectangle string did not contain exactly four fields.
    #[error("rectangle must be 'left,top,right,bottom' with four comma-separated numbers (got {found})")]
    RectFieldCount {
        /// Number of comma-separated fields found.
        found: usize,
    },

    /// A rectangle field could not be parsed as a number.
    #[error("rectangle {field} value {value:?} is not a number")]
    RectNotANumber {
        /// Name of the offending field (`left`, `top`, `right` or `bottom`).
        field: &'static str,
        /// The raw text of the field.
        value: String,
    },

    /// A rectangle field lies outside `[0, 1]`.
    #[error("rectangle {field} value {value} must be within [0,1]")]
    RectOutOfRange {
        /// Name of the offending field (`left`, `top`, `right` or `bottom`).
        field: &'static str,
        /// The parsed value.
        value: f64,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The detected image format cannot be written back.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image is too large for the JPEG encoder (65535 pixels per side).
    #[error("image too large ({width}x{height}) for JPEG output")]
    ImageTooLarge {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// JPEG encoding failed.
    #[error("JPEG encoding error: {0}")]
    Jpeg(#[from] jpeg_encoder::EncodingError),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
