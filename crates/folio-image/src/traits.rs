/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry points for image codecs
use folio_core::bytestream::{ByteSink, ByteSource, EncodedBlob};
use folio_core::options::{DecoderOptions, EncoderOptions};

use crate::codecs::{decode_boundary, encode_boundary, ImageFormat};
use crate::errors::ImageErrors;
use crate::image::Image;

/// A decoder and encoder pair for a single format
///
/// Codecs are stateless, one instance serves every call and
/// every thread.
///
/// Implementors provide [`decode_inner`](Self::decode_inner) and
/// [`encode_inner`](Self::encode_inner), the provided methods wrap
/// them so that
/// - a failed decode leaves the image empty
/// - a failed encode discards whatever the sink collected in memory
/// - a successful encode finalizes the sink
pub trait ImageCodec: Send + Sync {
    /// Name of the codec, used in logs
    fn name(&self) -> &'static str;

    /// The format this codec reads and writes
    fn format(&self) -> ImageFormat;

    /// Decode from `source` into `image`
    ///
    /// `image` is empty when this is called, implementors may leave
    /// it in any state on error.
    fn decode_inner(
        &self, source: &mut ByteSource, image: &mut Image, options: &DecoderOptions
    ) -> Result<(), ImageErrors>;

    /// Encode `image` into `sink`
    ///
    /// `image` holds pixels when this is called, the sink must not be
    /// finalized by implementors.
    fn encode_inner(
        &self, image: &Image, sink: &mut ByteSink, options: &EncoderOptions
    ) -> Result<(), ImageErrors>;

    fn decode_stream_with_options(
        &self, source: &mut ByteSource, image: &mut Image, options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        decode_boundary(self.name(), image, |image| {
            self.decode_inner(source, image, options)
        })
    }

    /// Decode from a byte source into an empty image
    fn decode_stream(&self, source: &mut ByteSource, image: &mut Image) -> Result<(), ImageErrors> {
        self.decode_stream_with_options(source, image, &DecoderOptions::default())
    }

    fn decode_with_options(
        &self, data: &[u8], image: &mut Image, options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        let mut source = ByteSource::from_slice(data);
        self.decode_stream_with_options(&mut source, image, options)
    }

    /// Decode from memory into an empty image
    fn decode(&self, data: &[u8], image: &mut Image) -> Result<(), ImageErrors> {
        self.decode_with_options(data, image, &DecoderOptions::default())
    }

    fn encode_stream_with_options(
        &self, image: &Image, sink: &mut ByteSink, options: &EncoderOptions
    ) -> Result<(), ImageErrors> {
        encode_boundary(self.name(), image, sink, |image, sink| {
            self.encode_inner(image, sink, options)
        })
    }

    /// Encode into a byte sink, finalizing it on success
    fn encode_stream(&self, image: &Image, sink: &mut ByteSink) -> Result<(), ImageErrors> {
        self.encode_stream_with_options(image, sink, &EncoderOptions::default())
    }

    fn encode_with_options(
        &self, image: &Image, options: &EncoderOptions
    ) -> Result<EncodedBlob, ImageErrors> {
        let mut sink = ByteSink::memory();
        self.encode_stream_with_options(image, &mut sink, options)?;

        sink.into_blob()
            .ok_or(ImageErrors::EncodeErrors(format!("{}: no output", self.name())))
    }

    /// Encode into a new blob
    fn encode(&self, image: &Image) -> Result<EncodedBlob, ImageErrors> {
        self.encode_with_options(image, &EncoderOptions::default())
    }
}
