//! Tag erasing: resolve, sample, fill, re-encode.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, Rgb, RgbImage};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use tracing::debug;

use crate::error::{Error, Result};
use crate::rect::{NormalizedRect, PixelRect};
use crate::sampling;

/// Default JPEG quality used when saving JPEG output.
pub const DEFAULT_QUALITY: u8 = 95;

/// Options controlling tag erasing.
#[derive(Debug, Clone)]
pub struct EraseOptions {
    /// Area to cover, as fractions of image size.
    pub rect: NormalizedRect,
    /// JPEG quality (1-100). Ignored for other formats.
    pub quality: u8,
}

impl Default for EraseOptions {
    fn default() -> Self {
        Self {
            rect: NormalizedRect::default(),
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Result of erasing the tag from a single image file.
#[derive(Debug, Clone)]
pub struct EraseReport {
    /// Path the image was read from.
    pub input: PathBuf,
    /// Path the cleaned image was written to.
    pub output: PathBuf,
    /// Encoding used for the output (the input's detected format).
    pub format: ImageFormat,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel bounds that were covered.
    pub region: PixelRect,
    /// Color the region was filled with.
    pub fill: Rgb<u8>,
}

/// Covers a tag rectangle with the surrounding background color.
///
/// ```no_run
/// use corner_tag_eraser::{EraseOptions, TagEraser};
///
/// let eraser = TagEraser::new(EraseOptions::default());
/// let report = eraser.process_file("scan.jpg".as_ref(), "clean.jpg".as_ref())?;
/// println!("filled {} with {:?}", report.region, report.fill);
/// # Ok::<(), corner_tag_eraser::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagEraser {
    opts: EraseOptions,
}

impl TagEraser {
    /// Create an eraser with the given options.
    #[must_use]
    pub fn new(opts: EraseOptions) -> Self {
        Self { opts }
    }

    /// The options this eraser was built with.
    #[must_use]
    pub fn options(&self) -> &EraseOptions {
        &self.opts
    }

    /// Erase the tag from an image in-place.
    ///
    /// Returns the covered pixel bounds and the fill color.
    pub fn erase(&self, image: &mut RgbImage) -> (PixelRect, Rgb<u8>) {
        let (width, height) = image.dimensions();
        let region = self.opts.rect.to_pixels(width, height);
        debug!(rect = %self.opts.rect, %region, width, height, "resolved tag region");

        let fill = sampling::compute_fill_color(image, region);
        fill_rect(image, region, fill);
        (region, fill)
    }

    /// Process a single image file: load, erase, save.
    ///
    /// The output is encoded in the input's detected format regardless of the
    /// output path's extension. The input file is never modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or decoded, or the output
    /// cannot be encoded or written.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<EraseReport> {
        let (mut rgb_img, format) = load_image(input)?;
        let (region, fill) = self.erase(&mut rgb_img);

        save_image(&rgb_img, output, format, self.opts.quality)?;
        debug!(output = %output.display(), ?format, "wrote cleaned image");

        Ok(EraseReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            format,
            width: rgb_img.width(),
            height: rgb_img.height(),
            region,
            fill,
        })
    }
}

/// Fill `rect` with `color`, including its right and bottom edges.
///
/// Pixels past the image bounds are skipped, so a rect whose right edge equals
/// the image width covers exactly up to the last column.
pub fn fill_rect(image: &mut RgbImage, rect: PixelRect, color: Rgb<u8>) {
    let (width, height) = image.dimensions();
    if rect.left >= width || rect.top >= height || rect.left > rect.right || rect.top > rect.bottom
    {
        return;
    }

    let x2 = rect.right.min(width - 1);
    let y2 = rect.bottom.min(height - 1);
    for y in rect.top..=y2 {
        for x in rect.left..=x2 {
            image.put_pixel(x, y, color);
        }
    }
}

/// Load an image as RGB8 along with its detected format.
///
/// The format is sniffed from the file content, falling back to the path's
/// extension and finally to JPEG. Alpha and palette information is dropped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<(RgbImage, ImageFormat)> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format().unwrap_or(ImageFormat::Jpeg);
    let dyn_img = reader.decode()?;
    debug!(path = %path.display(), ?format, color = ?dyn_img.color(), "loaded image");
    Ok((dyn_img.to_rgb8(), format))
}

/// Save an RGB image in `format`, applying `quality` for JPEG.
///
/// JPEG output uses 4:2:0 chroma subsampling and optimized Huffman tables.
/// The image is fully encoded in memory before the file is created, so a
/// failed encode leaves nothing behind.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if `format` cannot be encoded, or an
/// I/O or encoding error if writing fails.
pub fn save_image(img: &RgbImage, path: &Path, format: ImageFormat, quality: u8) -> Result<()> {
    if !format.writing_enabled() {
        return Err(Error::UnsupportedFormat(format!("{format:?}")));
    }

    let bytes = match format {
        ImageFormat::Jpeg => encode_jpeg(img, quality)?,
        _ => {
            let mut buf = Cursor::new(Vec::new());
            img.write_to(&mut buf, format)?;
            buf.into_inner()
        }
    };

    std::fs::write(path, bytes)?;
    Ok(())
}

/// Encode as baseline JPEG with 4:2:0 subsampling and optimized Huffman tables.
fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let too_large = || Error::ImageTooLarge { width, height };
    let w = u16::try_from(width).map_err(|_| too_large())?;
    let h = u16::try_from(height).map_err(|_| too_large())?;

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality.clamp(1, 100));
    encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(img.as_raw(), w, h, ColorType::Rgb)?;
    Ok(bytes)
}
