/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Windows Bitmap, recognized but not supported yet
use folio_core::bytestream::{ByteSink, ByteSource};
use folio_core::log::error;
use folio_core::options::{DecoderOptions, EncoderOptions};

use crate::codecs::ImageFormat;
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::ImageCodec;

pub struct BmpCodec;

impl ImageCodec for BmpCodec {
    fn name(&self) -> &'static str {
        "BMP codec"
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::BMP
    }

    fn decode_inner(
        &self, _: &mut ByteSource, _: &mut Image, _: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        error!("BMP decoding is not implemented");
        Err(ImageErrors::CodecNotImplemented(self.name()))
    }

    fn encode_inner(
        &self, _: &Image, _: &mut ByteSink, _: &EncoderOptions
    ) -> Result<(), ImageErrors> {
        error!("BMP encoding is not implemented");
        Err(ImageErrors::CodecNotImplemented(self.name()))
    }
}
