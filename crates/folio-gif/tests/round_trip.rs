/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use folio_core::bytestream::{ByteSink, ByteSource};
use folio_core::layout::ChannelLayout;
use folio_gif::{GifDecoder, GifEncoder, TRANSPARENCY_ALPHA_THRESHOLD};
use nanorand::Rng;

fn round_trip(pixels: &[u8], w: usize, h: usize, layout: ChannelLayout) -> (Vec<u8>, ChannelLayout) {
    let mut sink = ByteSink::memory();
    GifEncoder::new(pixels, w, h, layout)
        .encode(&mut sink)
        .unwrap();
    sink.finalize().unwrap();
    let blob = sink.into_blob().unwrap();

    let mut decoder = GifDecoder::new(ByteSource::from_slice(&blob));
    let decoded = decoder.decode().unwrap();
    assert_eq!(decoder.dimensions(), Some((w, h)));
    (decoded, decoder.layout().unwrap())
}

#[test]
fn few_colors_survive_exactly() {
    let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [250, 250, 250]];
    let (w, h) = (37, 21);
    let pixels: Vec<u8> = (0..w * h).flat_map(|i| colors[(i / 7) % 4]).collect();

    let (decoded, layout) = round_trip(&pixels, w, h, ChannelLayout::RGB);
    assert_eq!(layout, ChannelLayout::RGB);
    assert_eq!(decoded, pixels);
}

#[test]
fn luma_expands_to_rgb() {
    let pixels = [0, 128, 255, 128];
    let (decoded, layout) = round_trip(&pixels, 2, 2, ChannelLayout::Luma);
    assert_eq!(layout, ChannelLayout::RGB);
    assert_eq!(decoded, [0, 0, 0, 128, 128, 128, 255, 255, 255, 128, 128, 128]);
}

#[test]
fn alpha_is_flattened_at_threshold() {
    let (w, h) = (64, 48);
    let mut rng = nanorand::WyRand::new();
    let mut pixels = vec![0_u8; w * h * 4];
    rng.fill(&mut pixels);

    let (decoded, layout) = round_trip(&pixels, w, h, ChannelLayout::RGBA);
    assert_eq!(layout, ChannelLayout::RGBA);
    assert_eq!(decoded.len(), pixels.len());

    for (source, out) in pixels.chunks_exact(4).zip(decoded.chunks_exact(4)) {
        if source[3] < TRANSPARENCY_ALPHA_THRESHOLD {
            assert_eq!(out[3], 0);
        } else {
            assert_eq!(out[3], 255);
        }
    }
}

#[test]
fn large_random_image() {
    let (w, h) = (300, 200);
    let mut rng = nanorand::WyRand::new();
    let mut pixels = vec![0_u8; w * h * 3];
    rng.fill(&mut pixels);

    let (decoded, layout) = round_trip(&pixels, w, h, ChannelLayout::RGB);
    assert_eq!(layout, ChannelLayout::RGB);
    assert_eq!(decoded.len(), pixels.len());
}

#[test]
fn strided_source() {
    // two rows of two RGB pixels followed by two padding bytes
    let pixels = [
        255, 0, 0, 0, 255, 0, 99, 99, //
        0, 0, 255, 255, 0, 0, 99, 99
    ];
    let mut sink = ByteSink::memory();
    GifEncoder::new_with_stride(&pixels, 2, 2, 8, ChannelLayout::RGB)
        .encode(&mut sink)
        .unwrap();
    sink.finalize().unwrap();
    let blob = sink.into_blob().unwrap();

    let decoded = GifDecoder::new(ByteSource::from_slice(&blob))
        .decode()
        .unwrap();
    assert_eq!(decoded, [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 0, 0]);
}
