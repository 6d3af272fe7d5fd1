/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! JPEG support
//!
//! Decoding is done by `zune-jpeg`, encoding by `jpeg-encoder`.
//! Alpha is not representable, grayscale with alpha is written as
//! grayscale and RGBA as RGB.
use folio_core::bytestream::{ByteSink, ByteSource};
use folio_core::layout::ChannelLayout;
use folio_core::log::error;
use folio_core::options::{DecoderOptions, EncoderOptions};
use jpeg_encoder::{ColorType, Encoder};
use zune_core::bytestream::ZCursor;

use crate::codecs::{create_options_for_decoder, layout_from_output, ImageFormat};
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::ImageCodec;

pub struct JpegCodec;

/// Number of components declared by the first start of frame marker
fn frame_components(data: &[u8]) -> Option<u8> {
    if data.get(..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut position = 2;

    loop {
        if *data.get(position)? != 0xFF {
            return None;
        }
        let marker = *data.get(position + 1)?;
        match marker {
            // fill bytes
            0xFF => position += 1,
            // start of frame, except DHT, JPG and DAC which share the range
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return data.get(position + 9).copied();
            }
            // markers without a length
            0x01 | 0xD0..=0xD7 => position += 2,
            0xD9 | 0xDA => return None,
            _ => {
                let length = u16::from_be_bytes([*data.get(position + 2)?, *data.get(position + 3)?]);
                position += 2 + usize::from(length);
            }
        }
    }
}

impl From<zune_jpeg::errors::DecodeErrors> for ImageErrors {
    fn from(from: zune_jpeg::errors::DecodeErrors) -> Self {
        let err = format!("jpg: {from:?}");

        ImageErrors::ImageDecodeErrors(err)
    }
}

impl From<jpeg_encoder::EncodingError> for ImageErrors {
    fn from(from: jpeg_encoder::EncodingError) -> Self {
        ImageErrors::EncodeErrors(format!("jpg: {from}"))
    }
}

impl ImageCodec for JpegCodec {
    fn name(&self) -> &'static str {
        "JPEG codec"
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::JPEG
    }

    fn decode_inner(
        &self, source: &mut ByteSource, image: &mut Image, options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        let options = create_options_for_decoder(options);
        let mut decoder =
            zune_jpeg::JpegDecoder::new_with_options(ZCursor::new(data.as_slice()), options);

        let mut pixels = decoder.decode()?;
        let (width, height) = decoder
            .dimensions()
            .ok_or(ImageErrors::ImageDecodeErrors("jpg: no dimensions".to_string()))?;

        let mut layout = layout_from_output(pixels.len(), width, height)?;

        if layout == ChannelLayout::RGB && frame_components(&data) == Some(1) {
            // grayscale files stay grayscale
            pixels = pixels.chunks_exact(3).map(|x| x[0]).collect();
            layout = ChannelLayout::Luma;
        }
        if layout.has_alpha() {
            error!("JPEG decoder produced {layout:?} output");
            return Err(ImageErrors::ImageDecodeErrors(format!(
                "jpg: unexpected {layout:?} output"
            )));
        }

        image.adopt_packed(layout, width, height, pixels)
    }

    fn encode_inner(
        &self, image: &Image, sink: &mut ByteSink, options: &EncoderOptions
    ) -> Result<(), ImageErrors> {
        let (width, height) = image.dimensions();

        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            error!("JPEG cannot store {width}x{height} images");
            return Err(ImageErrors::TooLargeDimensions(width, height));
        };
        let pixels = image.packed_pixels().ok_or(ImageErrors::NoImageBuffer)?;

        let encoder = Encoder::new(&mut *sink, options.jpeg_quality());

        match image.layout() {
            ChannelLayout::Luma => encoder.encode(&pixels, w, h, ColorType::Luma)?,
            ChannelLayout::LumaA => {
                let luma: Vec<u8> = pixels.chunks_exact(2).map(|x| x[0]).collect();
                encoder.encode(&luma, w, h, ColorType::Luma)?;
            }
            ChannelLayout::RGB => encoder.encode(&pixels, w, h, ColorType::Rgb)?,
            // the alpha channel is skipped by the encoder
            ChannelLayout::RGBA => encoder.encode(&pixels, w, h, ColorType::Rgba)?
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::codecs::jpeg::frame_components;

    #[test]
    fn finds_frame_header() {
        let mut data = vec![0xFF, 0xD8];
        // APP0 with a 4 byte payload
        data.extend_from_slice(&[0xFF, 0xE0, 0, 6, 1, 2, 3, 4]);
        // SOF0, 8 bit, 16x16, one component
        data.extend_from_slice(&[0xFF, 0xC0, 0, 11, 8, 0, 16, 0, 16, 1, 1, 0x11, 0]);
        assert_eq!(frame_components(&data), Some(1));

        data[19] = 3;
        assert_eq!(frame_components(&data), Some(3));

        assert_eq!(frame_components(&data[..12]), None);
        assert_eq!(frame_components(b"not a jpeg"), None);
    }
}
