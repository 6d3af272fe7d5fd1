/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use folio_core::bytestream::{BlobSlot, MIN_CAPACITY};
use folio_core::layout::{ChannelLayout, RowAlignment, ALL_LAYOUTS};
use folio_image::codecs::ImageFormat;
use folio_image::errors::ImageErrors;
use folio_image::image::Image;
use nanorand::Rng;

fn random_image(layout: ChannelLayout, width: usize, height: usize, align: RowAlignment) -> Image {
    let mut rng = nanorand::WyRand::new();
    let mut image = Image::new();
    image.create(layout, width, height, align).unwrap();

    for y in 0..height {
        rng.fill(image.row_mut(y).unwrap());
    }
    image
}

#[test]
fn png_is_lossless() {
    for layout in ALL_LAYOUTS {
        let image = random_image(layout, 37, 19, RowAlignment::Align32);
        let blob = image.export_to(ImageFormat::PNG).unwrap();

        let mut decoded = Image::new();
        decoded.import_from(ImageFormat::PNG, &blob).unwrap();

        assert_eq!(decoded.layout(), layout);
        assert_eq!(decoded.dimensions(), (37, 19));
        assert_eq!(decoded.packed_pixels(), image.packed_pixels());
    }
}

#[test]
fn gif_alpha_classification() {
    let (w, h) = (40, 30);
    let mut image = Image::new();
    image.create(ChannelLayout::RGBA, w, h, RowAlignment::Packed).unwrap();

    for (i, pixel) in image.data_mut().unwrap().chunks_exact_mut(4).enumerate() {
        let alpha = (i % 256) as u8;
        pixel.copy_from_slice(&[(i % 7) as u8 * 30, 90, 200, alpha]);
    }
    let blob = image.export_to(ImageFormat::GIF).unwrap();
    assert_eq!(&blob[..6], b"GIF89a");

    let mut decoded = Image::new();
    decoded.import_from(ImageFormat::GIF, &blob).unwrap();
    assert_eq!(decoded.layout(), ChannelLayout::RGBA);
    assert_eq!(decoded.dimensions(), (w, h));

    let source = image.data().unwrap().chunks_exact(4);
    let output = decoded.data().unwrap().chunks_exact(4);

    for (a, b) in source.zip(output) {
        let expected = if a[3] < 127 { 0 } else { 255 };
        assert_eq!(b[3], expected);
        if expected == 255 {
            assert_eq!(&a[..3], &b[..3]);
        }
    }
}

#[test]
fn gif_without_alpha_is_rgb() {
    let image = random_image(ChannelLayout::Luma, 16, 16, RowAlignment::Align64);
    let blob = image.export_to(ImageFormat::GIF).unwrap();
    assert_eq!(&blob[..6], b"GIF87a");

    let mut decoded = Image::new();
    decoded.import_from(ImageFormat::GIF, &blob).unwrap();
    assert_eq!(decoded.layout(), ChannelLayout::RGB);
}

#[test]
fn gif_keeps_first_frame_only() {
    let mut image = Image::new();
    image.create(ChannelLayout::RGB, 4, 2, RowAlignment::Packed).unwrap();
    for (i, pixel) in image.data_mut().unwrap().chunks_exact_mut(3).enumerate() {
        let color = if i % 3 == 0 { [200, 10, 10] } else { [10, 10, 200] };
        pixel.copy_from_slice(&color);
    }
    let mut data = image.export_to(ImageFormat::GIF).unwrap().into_vec();
    assert_eq!(data.pop(), Some(0x3B));
    // start of a second image descriptor, cut short
    data.extend_from_slice(&[0x2C, 0, 0, 7]);

    let mut decoded = Image::new();
    decoded.import_from(ImageFormat::GIF, &data).unwrap();
    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.packed_pixels(), image.packed_pixels());
}

#[test]
fn jpeg_keeps_dimensions() {
    for (layout, expected) in [
        (ChannelLayout::RGB, ChannelLayout::RGB),
        (ChannelLayout::RGBA, ChannelLayout::RGB),
        (ChannelLayout::Luma, ChannelLayout::Luma),
        (ChannelLayout::LumaA, ChannelLayout::Luma)
    ] {
        let image = random_image(layout, 64, 48, RowAlignment::Align32);
        let blob = image.export_to(ImageFormat::JPEG).unwrap();
        assert_eq!(&blob[..2], &[0xFF, 0xD8]);

        let mut decoded = Image::new();
        decoded.import_from(ImageFormat::JPEG, &blob).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert_eq!(decoded.layout().num_components(), expected.num_components());
    }
}

#[test]
fn memory_output_is_exact() {
    let image = random_image(ChannelLayout::RGB, 100, 100, RowAlignment::Packed);
    let blob = image.export_to(ImageFormat::PNG).unwrap();
    assert!(blob.len() > MIN_CAPACITY);

    let mut written = Vec::new();
    image.save_to_writer(ImageFormat::PNG, &mut written).unwrap();
    assert_eq!(blob.len(), written.len());
    assert_eq!(blob.data(), &written[..]);
}

#[test]
fn reader_and_memory_agree() {
    let image = random_image(ChannelLayout::RGBA, 20, 10, RowAlignment::Packed);
    let blob = image.export_to(ImageFormat::PNG).unwrap();

    let mut cursor = std::io::Cursor::new(blob.into_vec());
    let mut decoded = Image::new();
    decoded.load_from_reader(ImageFormat::PNG, &mut cursor).unwrap();
    assert_eq!(decoded.packed_pixels(), image.packed_pixels());
}

#[test]
fn export_into_slot() {
    let image = random_image(ChannelLayout::RGB, 8, 8, RowAlignment::Packed);
    let mut slot = BlobSlot::new();

    image.export_into(ImageFormat::GIF, &mut slot).unwrap();
    let gif_len = slot.len();
    assert!(gif_len > 0);

    // failure leaves the slot alone
    assert!(image.export_into(ImageFormat::TGA, &mut slot).is_err());
    assert!(image.export_into(ImageFormat::TIFF, &mut slot).is_err());
    assert_eq!(slot.len(), gif_len);

    image.export_into(ImageFormat::PNG, &mut slot).unwrap();
    assert_eq!(&slot.data().unwrap()[1..4], b"PNG");

    assert!(matches!(
        Image::new().export_into(ImageFormat::PNG, &mut slot),
        Err(ImageErrors::NoImageBuffer)
    ));
}
