/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! GIF support, backed by `folio-gif`
//!
//! Only the first frame of animated files is decoded.
use folio_core::bytestream::{ByteSink, ByteSource};
use folio_core::layout::RowAlignment;
use folio_core::options::{DecoderOptions, EncoderOptions};
use folio_gif::{GifDecoder, GifEncoder};

use crate::codecs::ImageFormat;
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::ImageCodec;

pub struct GifCodec;

impl ImageCodec for GifCodec {
    fn name(&self) -> &'static str {
        "GIF codec"
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::GIF
    }

    fn decode_inner(
        &self, source: &mut ByteSource, image: &mut Image, options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        let mut decoder = GifDecoder::new_with_options(ByteSource::from_reader(source), *options);
        decoder.decode_headers()?;

        let layout = decoder.layout().ok_or("Gif headers not decoded")?;
        let (width, height) = decoder.dimensions().ok_or("Gif headers not decoded")?;

        image.create(layout, width, height, RowAlignment::Packed)?;

        let stride = image.stride();
        let pixels = image.data_mut().ok_or(ImageErrors::NoImageBuffer)?;
        decoder.decode_into(pixels, stride)?;

        Ok(())
    }

    fn encode_inner(
        &self, image: &Image, sink: &mut ByteSink, _: &EncoderOptions
    ) -> Result<(), ImageErrors> {
        let pixels = image.data().ok_or(ImageErrors::NoImageBuffer)?;
        let (width, height) = image.dimensions();

        GifEncoder::new_with_stride(pixels, width, height, image.stride(), image.layout())
            .encode(sink)?;

        Ok(())
    }
}
