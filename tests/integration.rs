use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use corner_tag_eraser::{load_image, EraseOptions, Error, NormalizedRect, PixelRect, TagEraser};
use image::{ImageFormat, ImageReader, Rgb, RgbImage};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

fn tagged_image(width: u32, height: u32, bg: Rgb<u8>, tag: PixelRect) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, bg);
    for y in tag.top..tag.bottom {
        for x in tag.left..tag.right {
            img.put_pixel(x, y, BLACK);
        }
    }
    img
}

fn sniffed_format(path: &Path) -> Option<ImageFormat> {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .format()
}

#[test]
fn default_rect_cleans_white_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tagged.png");
    let output = dir.path().join("clean.png");

    let tag = PixelRect {
        left: 74,
        top: 2,
        right: 94,
        bottom: 10,
    };
    tagged_image(100, 100, WHITE, tag).save(&input).unwrap();

    let report = TagEraser::default().process_file(&input, &output).unwrap();
    assert_eq!(report.format, ImageFormat::Png);
    assert_eq!(report.fill, WHITE);
    assert_eq!((report.width, report.height), (100, 100));

    let cleaned = image::open(&output).unwrap().to_rgb8();
    assert_eq!(cleaned.dimensions(), (100, 100));
    assert!(cleaned.pixels().all(|px| *px == WHITE));
}

#[test]
fn input_file_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tagged.png");
    let output = dir.path().join("clean.png");

    let tag = PixelRect {
        left: 150,
        top: 5,
        right: 190,
        bottom: 15,
    };
    let original = tagged_image(200, 150, Rgb([40, 80, 120]), tag);
    original.save(&input).unwrap();
    let before = std::fs::read(&input).unwrap();

    TagEraser::default().process_file(&input, &output).unwrap();

    assert_eq!(std::fs::read(&input).unwrap(), before);
    let cleaned = image::open(&output).unwrap().to_rgb8();
    assert!(cleaned.pixels().all(|px| *px == Rgb([40, 80, 120])));
}

#[test]
fn custom_rect_only_changes_covered_area() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tagged.png");
    let output = dir.path().join("clean.png");

    let mut img = RgbImage::from_fn(80, 60, |x, y| {
        if x < 40 {
            Rgb([10, 20, 30])
        } else {
            Rgb([200, 210, 220])
        }
    });
    // Tag in the bottom-left corner, on the dark half.
    for y in 50..56 {
        for x in 4..20 {
            img.put_pixel(x, y, WHITE);
        }
    }
    img.save(&input).unwrap();

    let opts = EraseOptions {
        rect: "0.0,0.8,0.3,0.95".parse().unwrap(),
        ..EraseOptions::default()
    };
    let report = TagEraser::new(opts).process_file(&input, &output).unwrap();
    assert_eq!(
        report.region,
        PixelRect {
            left: 0,
            top: 48,
            right: 24,
            bottom: 57
        }
    );
    assert_eq!(report.fill, Rgb([10, 20, 30]));

    let cleaned = image::open(&output).unwrap().to_rgb8();
    for (x, y, px) in cleaned.enumerate_pixels() {
        let covered = x <= 24 && (48..=57).contains(&y);
        if covered {
            assert_eq!(*px, Rgb([10, 20, 30]), "pixel ({x},{y})");
        } else {
            assert_eq!(px, img.get_pixel(x, y), "pixel ({x},{y})");
        }
    }
}

#[test]
fn output_keeps_input_format_despite_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tagged.png");
    let output = dir.path().join("clean.jpg");

    RgbImage::from_pixel(50, 50, WHITE).save(&input).unwrap();

    let report = TagEraser::default().process_file(&input, &output).unwrap();
    assert_eq!(report.format, ImageFormat::Png);
    assert_eq!(sniffed_format(&output), Some(ImageFormat::Png));
}

#[test]
fn jpeg_round_trip_preserves_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tagged.jpg");
    let output = dir.path().join("clean.jpg");

    let bg = Rgb([200, 180, 160]);
    let tag = PixelRect {
        left: 200,
        top: 6,
        right: 240,
        bottom: 20,
    };
    tagged_image(256, 192, bg, tag).save(&input).unwrap();
    let (decoded_input, format) = load_image(&input).unwrap();
    assert_eq!(format, ImageFormat::Jpeg);

    let report = TagEraser::default().process_file(&input, &output).unwrap();
    assert_eq!(report.format, ImageFormat::Jpeg);
    assert_eq!(sniffed_format(&output), Some(ImageFormat::Jpeg));

    let (cleaned, _) = load_image(&output).unwrap();
    assert_eq!(cleaned.dimensions(), (256, 192));

    // Away from the covered region only compression noise is allowed.
    let keep_out = report.region.expand(16, 256, 192);
    for (x, y, px) in cleaned.enumerate_pixels() {
        let near = (keep_out.left..keep_out.right).contains(&x)
            && (keep_out.top..keep_out.bottom).contains(&y);
        if near {
            continue;
        }
        let orig = decoded_input.get_pixel(x, y);
        for ch in 0..3 {
            let diff = (i32::from(px[ch]) - i32::from(orig[ch])).abs();
            assert!(diff <= 8, "pixel ({x},{y}) ch {ch} diff {diff}");
        }
    }
}

#[test]
fn low_quality_jpeg_is_smaller() {
    let dir = tempfile::tempdir().unwrap();
    let img = RgbImage::from_fn(128, 128, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        let v = ((x * 31 + y * 17) % 256) as u8;
        Rgb([v, v.wrapping_mul(3), v.wrapping_add(91)])
    });
    // Output follows the input format, so the input must be a JPEG.
    let jpeg_input = dir.path().join("noisy.jpg");
    img.save(&jpeg_input).unwrap();

    let high = dir.path().join("high.jpg");
    let low = dir.path().join("low.jpg");
    let eraser = |quality| {
        TagEraser::new(EraseOptions {
            quality,
            ..EraseOptions::default()
        })
    };
    eraser(95).process_file(&jpeg_input, &high).unwrap();
    eraser(20).process_file(&jpeg_input, &low).unwrap();

    let high_len = std::fs::metadata(&high).unwrap().len();
    let low_len = std::fs::metadata(&low).unwrap().len();
    assert!(low_len < high_len, "low={low_len} high={high_len}");
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");
    let err = TagEraser::default()
        .process_file(&dir.path().join("nope.png"), &output)
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!output.exists());
}

#[test]
fn corrupt_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"\x89PNG\r\n\x1a\nnot really a png").unwrap();

    let result = TagEraser::default().process_file(&input, &dir.path().join("out.png"));
    assert!(matches!(result, Err(Error::Image(_))));
}

#[test]
fn unwritable_output_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tagged.png");
    RgbImage::from_pixel(20, 20, WHITE).save(&input).unwrap();

    let output = dir.path().join("missing_dir").join("out.png");
    assert!(TagEraser::default().process_file(&input, &output).is_err());
}

#[test]
fn whole_image_rect_fills_white() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dark.png");
    let output = dir.path().join("out.png");
    RgbImage::from_pixel(30, 20, BLACK).save(&input).unwrap();

    let opts = EraseOptions {
        rect: NormalizedRect::new(0.0, 0.0, 1.0, 1.0).unwrap(),
        ..EraseOptions::default()
    };
    let report = TagEraser::new(opts).process_file(&input, &output).unwrap();
    assert_eq!(report.fill, WHITE);

    let cleaned = image::open(&output).unwrap().to_rgb8();
    assert!(cleaned.pixels().all(|px| *px == WHITE));
}

#[test]
fn rgba_input_is_flattened_to_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alpha.png");
    let output = dir.path().join("out.png");
    image::RgbaImage::from_pixel(40, 40, image::Rgba([9, 9, 9, 128]))
        .save(&input)
        .unwrap();

    TagEraser::default().process_file(&input, &output).unwrap();

    let cleaned = image::open(&output).unwrap();
    assert_eq!(cleaned.color(), image::ColorType::Rgb8);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn successful_run_is_silent_at_info_level() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tagged.png");
    let output = dir.path().join("clean.png");
    RgbImage::from_pixel(40, 40, WHITE).save(&input).unwrap();

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        TagEraser::default().process_file(&input, &output).unwrap();
    });

    let captured = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(captured.is_empty(), "unexpected log output: {captured}");
}
