/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry point for all codecs the library understands
//!
//! Every format routes to a single stateless codec instance,
//! [`codec_for`] hands it out. Formats the library recognizes but
//! cannot read or write have no codec.
//!
//! | format | decode | encode |
//! |--------|--------|--------|
//! | JPEG   | yes    | yes    |
//! | PNG    | yes    | yes    |
//! | GIF    | yes    | yes    |
//! | TGA    | no, placeholder | no, placeholder |
//! | BMP    | no, placeholder | no, placeholder |
//! | TIFF   | no codec | no codec |
use folio_core::bytestream::ByteSink;
use folio_core::file_type::FileType;
use folio_core::layout::ChannelLayout;
use folio_core::log::{error, trace};
use folio_core::options::DecoderOptions;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::ImageCodec;

pub mod bmp;
pub mod gif;
pub mod jpeg;
pub mod png;
pub mod tga;

/// All image formats the library recognizes
///
/// Not every format has a codec, see [`codec_for`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ImageFormat {
    /// Joint Photographic Experts Group
    JPEG,
    /// Portable Network Graphics
    PNG,
    /// Graphics Interchange Format
    GIF,
    /// Truevision TGA
    TGA,
    /// Windows Bitmap Files
    BMP,
    /// Tagged Image File Format
    TIFF,
    /// Any unknown format
    Unknown
}

impl ImageFormat {
    /// Map a file type to the image format it stores
    ///
    /// Archives and documents are not images and map to `Unknown`
    pub const fn from_file_type(file_type: FileType) -> ImageFormat {
        match file_type {
            FileType::JPEG => ImageFormat::JPEG,
            FileType::PNG => ImageFormat::PNG,
            FileType::GIF => ImageFormat::GIF,
            FileType::TGA => ImageFormat::TGA,
            FileType::BMP => ImageFormat::BMP,
            FileType::TIFF => ImageFormat::TIFF,
            _ => ImageFormat::Unknown
        }
    }

    /// Guess the format from a file name extension
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> ImageFormat {
        ImageFormat::from_file_type(FileType::from_path(path))
    }

    /// Return true if a codec is registered for this format
    ///
    /// A registered codec may still be a placeholder that fails every call
    pub fn has_codec(self) -> bool {
        codec_for(self).is_some()
    }
}

/// Carry our limits over to the zune decoders
pub(crate) fn create_options_for_decoder(
    options: &DecoderOptions
) -> zune_core::options::DecoderOptions {
    zune_core::options::DecoderOptions::default()
        .set_max_width(options.max_width())
        .set_max_height(options.max_height())
}

/// Encoder configuration matching `image`, 8 bits per channel
pub(crate) fn create_options_for_encoder(image: &Image) -> zune_core::options::EncoderOptions {
    let colorspace = match image.layout() {
        ChannelLayout::Luma => ColorSpace::Luma,
        ChannelLayout::LumaA => ColorSpace::LumaA,
        ChannelLayout::RGB => ColorSpace::RGB,
        ChannelLayout::RGBA => ColorSpace::RGBA
    };
    let (width, height) = image.dimensions();

    zune_core::options::EncoderOptions::new(width, height, colorspace, BitDepth::Eight)
}

/// Work out the layout of packed decoder output from its size
pub(crate) fn layout_from_output(
    len: usize, width: usize, height: usize
) -> Result<ChannelLayout, ImageErrors> {
    let pixels = width.checked_mul(height).unwrap_or(0);
    if pixels == 0 || len % pixels != 0 {
        return Err(ImageErrors::ImageDecodeErrors(format!(
            "{len} bytes of output don't match {width}x{height} pixels"
        )));
    }
    ChannelLayout::from_components(len / pixels).ok_or_else(|| {
        ImageErrors::ImageDecodeErrors(format!(
            "Unsupported number of channels: {}",
            len / pixels
        ))
    })
}

static JPEG_CODEC: jpeg::JpegCodec = jpeg::JpegCodec;
static PNG_CODEC: png::PngCodec = png::PngCodec;
static GIF_CODEC: gif::GifCodec = gif::GifCodec;
static TGA_CODEC: tga::TgaCodec = tga::TgaCodec;
static BMP_CODEC: bmp::BmpCodec = bmp::BmpCodec;

/// Return the codec handling `format`, or `None` if there is none
pub fn codec_for(format: ImageFormat) -> Option<&'static dyn ImageCodec> {
    match format {
        ImageFormat::JPEG => Some(&JPEG_CODEC),
        ImageFormat::PNG => Some(&PNG_CODEC),
        ImageFormat::GIF => Some(&GIF_CODEC),
        ImageFormat::TGA => Some(&TGA_CODEC),
        ImageFormat::BMP => Some(&BMP_CODEC),
        ImageFormat::TIFF | ImageFormat::Unknown => None
    }
}

/// Run a decode, leaving `image` empty if it fails
///
/// Images already holding pixels are rejected untouched
pub fn decode_boundary<F>(name: &str, image: &mut Image, decode: F) -> Result<(), ImageErrors>
where
    F: FnOnce(&mut Image) -> Result<(), ImageErrors>
{
    if !image.is_empty() {
        error!("{name}: cannot decode into an image which already holds pixels");
        return Err(ImageErrors::ImageNotEmpty);
    }
    if let Err(err) = decode(image) {
        error!("{name}: decoding failed, {err}");
        image.destroy();
        return Err(err);
    }
    trace!("{name}: decoded {}x{} {:?}", image.width(), image.height(), image.layout());

    Ok(())
}

/// Run an encode, finalizing the sink on success and discarding
/// its memory on failure
pub fn encode_boundary<F>(
    name: &str, image: &Image, sink: &mut ByteSink, encode: F
) -> Result<(), ImageErrors>
where
    F: FnOnce(&Image, &mut ByteSink) -> Result<(), ImageErrors>
{
    if image.is_empty() {
        error!("{name}: cannot encode an empty image");
        sink.discard();
        return Err(ImageErrors::NoImageBuffer);
    }
    if let Err(err) = encode(image, sink) {
        error!("{name}: encoding failed, {err}");
        sink.discard();
        return Err(err);
    }
    if let Err(err) = sink.finalize() {
        sink.discard();
        return Err(err.into());
    }
    trace!("{name}: wrote {} bytes", sink.bytes_written());

    Ok(())
}

#[cfg(test)]
mod tests {
    use folio_core::file_type::FileType;

    use folio_core::layout::ChannelLayout;

    use crate::codecs::{codec_for, layout_from_output, ImageFormat};

    #[test]
    fn routing() {
        assert_eq!(codec_for(ImageFormat::JPEG).unwrap().format(), ImageFormat::JPEG);
        assert_eq!(codec_for(ImageFormat::PNG).unwrap().format(), ImageFormat::PNG);
        assert_eq!(codec_for(ImageFormat::GIF).unwrap().format(), ImageFormat::GIF);
        assert_eq!(codec_for(ImageFormat::TGA).unwrap().format(), ImageFormat::TGA);
        assert_eq!(codec_for(ImageFormat::BMP).unwrap().format(), ImageFormat::BMP);
        assert!(codec_for(ImageFormat::TIFF).is_none());
        assert!(codec_for(ImageFormat::Unknown).is_none());
        assert!(!ImageFormat::TIFF.has_codec());
    }

    #[test]
    fn layout_from_size() {
        assert_eq!(layout_from_output(12, 2, 2).unwrap(), ChannelLayout::RGB);
        assert_eq!(layout_from_output(4, 2, 2).unwrap(), ChannelLayout::Luma);
        assert!(layout_from_output(10, 2, 2).is_err());
        assert!(layout_from_output(20, 2, 2).is_err());
        assert!(layout_from_output(0, 0, 2).is_err());
    }

    #[test]
    fn from_file_type() {
        assert_eq!(ImageFormat::from_file_type(FileType::GIF), ImageFormat::GIF);
        assert_eq!(ImageFormat::from_file_type(FileType::CBZ), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_file_type(FileType::PDF), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_path("dir/Photo.JPEG"), ImageFormat::JPEG);
        assert_eq!(ImageFormat::from_path("scan.tif"), ImageFormat::TIFF);
    }
}
