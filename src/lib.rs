//! Cover small corner tags (serial numbers, stamps) in images.
//!
//! The tag area is given as a [`NormalizedRect`], fractions of the image size.
//! The crate samples a thin ring of pixels around that area, takes the
//! per-channel median as the background color, and paints the area with it.
//! The cleaned image is re-encoded in the input's format.
//!
//! # Quick Start
//!
//! ```no_run
//! use corner_tag_eraser::{EraseOptions, TagEraser};
//!
//! let opts = EraseOptions {
//!     rect: "0.78,0.02,0.99,0.12".parse().expect("valid rect"),
//!     ..EraseOptions::default()
//! };
//! let eraser = TagEraser::new(opts);
//! eraser
//!     .process_file("scan.jpg".as_ref(), "scan_clean.jpg".as_ref())
//!     .unwrap();
//! ```
//!
//! # In-memory use
//!
//! ```
//! use corner_tag_eraser::TagEraser;
//! use image::{Rgb, RgbImage};
//!
//! let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
//! img.put_pixel(80, 5, Rgb([0, 0, 0]));
//! let (_region, fill) = TagEraser::default().erase(&mut img);
//! assert_eq!(fill, Rgb([255, 255, 255]));
//! assert_eq!(*img.get_pixel(80, 5), fill);
//! ```

#![deny(missing_docs)]

mod eraser;
pub mod error;
pub mod rect;
pub mod sampling;

pub use eraser::{
    fill_rect, load_image, save_image, EraseOptions, EraseReport, TagEraser, DEFAULT_QUALITY,
};
pub use error::{Error, Result};
pub use rect::{NormalizedRect, PixelRect};
