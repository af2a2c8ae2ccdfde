//! Image I/O regression test
//!
//! Round-trips synthetic 8-bit images through every enabled format,
//! both on disk and in memory, and checks template loading.
//!
//! Run with:
//! ```
//! cargo test -p maxtree-io --test ioformats_reg
//! ```

use maxtree_core::GrayImage;
use maxtree_io::{
    ImageFormat, IoError, detect_format, read_image, read_image_mem, read_template, write_image,
    write_image_mem, write_pgm_ascii,
};
use maxtree_test::{RegParams, fixtures, regout_dir};
use std::fs;

#[test]
fn ioformats_reg() {
    let mut rp = RegParams::new("ioformats");

    let outdir = regout_dir();
    fs::create_dir_all(&outdir).expect("Failed to create output directory");

    let image = fixtures::random_image(37, 23);

    for format in [ImageFormat::Pnm, ImageFormat::Png, ImageFormat::Tiff] {
        eprintln!("=== {:?} file roundtrip ===", format);
        let path = format!("{}/ioformats_roundtrip.{}", outdir, format.extension());
        write_image(&image, &path, format).expect("write image");
        rp.compare_values(1.0, (detect_format(&path).ok() == Some(format)) as u8 as f64, 0.0);
        let back = read_image(&path).expect("read image");
        rp.compare_images(&image, &back);

        eprintln!("=== {:?} memory roundtrip ===", format);
        let bytes = write_image_mem(&image, format).expect("encode image");
        let back = read_image_mem(&bytes).expect("decode image");
        rp.compare_images(&image, &back);
    }

    // Plain graymap goes through the same reader
    let path = format!("{}/ioformats_plain.pgm", outdir);
    let file = fs::File::create(&path).expect("create plain pgm");
    write_pgm_ascii(&image, file).expect("write plain pgm");
    let back = read_image(&path).expect("read plain pgm");
    rp.compare_images(&image, &back);

    let ramp = fixtures::ramp(64, 8, 4);
    rp.write_image_and_check(&ramp, ImageFormat::Pnm)
        .expect("write_image_and_check");

    assert!(rp.cleanup(), "ioformats regression test failed");
}

#[test]
fn template_reg() {
    let mut rp = RegParams::new("template");
    let outdir = regout_dir();
    fs::create_dir_all(&outdir).expect("Failed to create output directory");

    let image = fixtures::flat(8, 6, 40);

    // No file: every pixel participates
    let template = read_template(None::<&str>, &image).expect("full template");
    rp.compare_values(48.0, template.count() as f64, 0.0);

    // Mask with the left half set
    let mask = fixtures::blob_image(8, 6, 0, &[fixtures::Blob::new(0, 0, 4, 6, 255)]);
    let path = format!("{}/template_mask.pgm", outdir);
    write_image(&mask, &path, ImageFormat::Pnm).expect("write mask");
    let template = read_template(Some(&path), &image).expect("mask template");
    rp.compare_values(24.0, template.count() as f64, 0.0);
    rp.compare_values(1.0, template.contains_xy(3, 5) as u8 as f64, 0.0);
    rp.compare_values(0.0, template.contains_xy(4, 0) as u8 as f64, 0.0);

    // Mask of the wrong size is rejected
    let small = GrayImage::new_filled(4, 4, 255).unwrap();
    let path = format!("{}/template_small.pgm", outdir);
    write_image(&small, &path, ImageFormat::Pnm).expect("write small mask");
    let err = read_template(Some(&path), &image);
    rp.compare_values(1.0, matches!(err, Err(IoError::Core(_))) as u8 as f64, 0.0);

    // Missing file is an I/O error
    let err = read_template(Some(format!("{}/does_not_exist.pgm", outdir)), &image);
    rp.compare_values(1.0, matches!(err, Err(IoError::Io(_))) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "template regression test failed");
}
