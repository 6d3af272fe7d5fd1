/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Represents a png image decoder and encoder, backed by `zune-png`
//!
//! Decoded images are always 8 bits per channel, palette and low bit
//! depth images are expanded and 16 bit samples keep their high byte.
use folio_core::bytestream::{ByteSink, ByteSource};
use folio_core::log::error;
use folio_core::options::{DecoderOptions, EncoderOptions};
use zune_core::bytestream::ZCursor;
use zune_core::result::DecodingResult;

use crate::codecs::{
    create_options_for_decoder, create_options_for_encoder, layout_from_output, ImageFormat
};
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::ImageCodec;

/// Magic bytes starting every png file
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

pub struct PngCodec;

impl From<zune_png::error::PngDecodeErrors> for ImageErrors {
    fn from(from: zune_png::error::PngDecodeErrors) -> Self {
        let err = format!("png: {from:?}");

        ImageErrors::ImageDecodeErrors(err)
    }
}

impl ImageCodec for PngCodec {
    fn name(&self) -> &'static str {
        "PNG codec"
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::PNG
    }

    fn decode_inner(
        &self, source: &mut ByteSource, image: &mut Image, options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        let mut signature = [0; 8];
        source.read_exact_bytes(&mut signature)?;

        if signature != PNG_SIGNATURE {
            error!("Not a png file, signature didn't match");
            return Err(ImageErrors::ImageDecodeErrors(
                "png: signature didn't match".to_string()
            ));
        }
        let mut data = signature.to_vec();
        source.read_to_end(&mut data)?;

        let options = create_options_for_decoder(options).png_set_strip_to_8bit(true);
        let mut decoder = zune_png::PngDecoder::new_with_options(ZCursor::new(data.as_slice()), options);

        let pixels = match decoder.decode()? {
            DecodingResult::U8(pixels) => pixels,
            DecodingResult::U16(pixels) => pixels.iter().map(|x| (x >> 8) as u8).collect(),
            _ => {
                return Err(ImageErrors::ImageDecodeErrors(
                    "png: unsupported sample type".to_string()
                ))
            }
        };
        let (width, height) = decoder
            .dimensions()
            .ok_or(ImageErrors::ImageDecodeErrors("png: no dimensions".to_string()))?;

        let layout = layout_from_output(pixels.len(), width, height)?;

        image.adopt_packed(layout, width, height, pixels)
    }

    fn encode_inner(
        &self, image: &Image, sink: &mut ByteSink, _: &EncoderOptions
    ) -> Result<(), ImageErrors> {
        let options = create_options_for_encoder(image);
        let pixels = image.packed_pixels().ok_or(ImageErrors::NoImageBuffer)?;

        let mut encoder = zune_png::PngEncoder::new(&pixels, options);
        let mut encoded = Vec::new();

        encoder
            .encode(&mut encoded)
            .map_err(|e| ImageErrors::EncodeErrors(format!("png: {e:?}")))?;

        sink.write_all_bytes(&encoded)?;

        Ok(())
    }
}
