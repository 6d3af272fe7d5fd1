/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This module represents a single image
//!
//! An image is represented as
//!
//! - interleaved 8 bit channels
//!     - in one of four channel layouts
//!         - stored row by row, top to bottom, rows `stride` bytes apart
//!
//! An image either owns exactly `stride * height` zero initialized
//! bytes or owns nothing at all. Pixels are allocated once, by
//! [`Image::create`] or by a decode, and released by [`Image::destroy`].
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use folio_core::bytestream::{BlobSlot, ByteSink, ByteSource, EncodedBlob};
use folio_core::layout::{ChannelLayout, RowAlignment};
use folio_core::log::{error, info, warn};
use folio_core::options::{DecoderOptions, EncoderOptions};

use crate::codecs::{codec_for, ImageFormat};
use crate::errors::ImageErrors;
use crate::traits::ImageCodec;

/// Represents a single image
#[derive(Clone, Eq, PartialEq)]
pub struct Image {
    layout:    ChannelLayout,
    width:     usize,
    height:    usize,
    alignment: RowAlignment,
    stride:    usize,
    pixels:    Option<Vec<u8>>
}

impl Default for Image {
    fn default() -> Self {
        Image::new()
    }
}

impl Debug for Image {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("layout", &self.layout)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("alignment", &self.alignment)
            .field("stride", &self.stride)
            .field("bytes", &self.pixels.as_ref().map_or(0, |x| x.len()))
            .finish()
    }
}

fn codec(format: ImageFormat) -> Result<&'static dyn ImageCodec, ImageErrors> {
    codec_for(format).ok_or(ImageErrors::NoCodecForFormat(format))
}

impl Image {
    /// Create an image holding no pixels
    pub const fn new() -> Image {
        Image {
            layout:    ChannelLayout::RGBA,
            width:     0,
            height:    0,
            alignment: RowAlignment::Packed,
            stride:    0,
            pixels:    None
        }
    }

    /// Allocate zeroed pixels for a `width` x `height` image
    ///
    /// # Errors
    /// - The image already holds pixels
    /// - Width or height is zero
    /// - The size doesn't fit in memory or allocation fails
    ///
    /// # Example
    /// ```
    /// use folio_core::layout::{ChannelLayout, RowAlignment};
    /// use folio_image::image::Image;
    ///
    /// let mut image = Image::new();
    /// image.create(ChannelLayout::RGB, 3, 2, RowAlignment::Align32).unwrap();
    /// // 9 bytes of pixels rounded up to a multiple of 4
    /// assert_eq!(image.stride(), 12);
    /// assert_eq!(image.data().unwrap(), &[0; 24]);
    /// ```
    pub fn create(
        &mut self, layout: ChannelLayout, width: usize, height: usize, alignment: RowAlignment
    ) -> Result<(), ImageErrors> {
        if self.pixels.is_some() {
            error!("cannot create image, image already holds pixels");
            return Err(ImageErrors::ImageNotEmpty);
        }
        if width == 0 || height == 0 {
            error!("cannot create image, invalid dimensions {width}x{height}");
            return Err(ImageErrors::ZeroDimensions(width, height));
        }
        let size = alignment
            .stride_for(layout, width)
            .and_then(|stride| stride.checked_mul(height).map(|size| (stride, size)));

        let Some((stride, size)) = size else {
            error!("cannot create image, {width}x{height} is too large");
            return Err(ImageErrors::TooLargeDimensions(width, height));
        };
        let mut pixels = Vec::new();

        if pixels.try_reserve_exact(size).is_err() {
            error!("cannot create image, out of memory allocating {size} bytes");
            return Err(ImageErrors::OutOfMemory(size));
        }
        pixels.resize(size, 0);

        self.layout = layout;
        self.width = width;
        self.height = height;
        self.alignment = alignment;
        self.stride = stride;
        self.pixels = Some(pixels);

        info!("created {width}x{height} {layout:?} image, stride {stride}");

        Ok(())
    }

    /// Take ownership of packed pixels produced by a decoder
    pub(crate) fn adopt_packed(
        &mut self, layout: ChannelLayout, width: usize, height: usize, pixels: Vec<u8>
    ) -> Result<(), ImageErrors> {
        if self.pixels.is_some() {
            return Err(ImageErrors::ImageNotEmpty);
        }
        if width == 0 || height == 0 {
            return Err(ImageErrors::ZeroDimensions(width, height));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(layout.num_components()))
            .ok_or(ImageErrors::TooLargeDimensions(width, height))?;

        if pixels.len() != expected {
            return Err(ImageErrors::GenericString(format!(
                "Expected {expected} decoded bytes but found {}",
                pixels.len()
            )));
        }
        self.layout = layout;
        self.width = width;
        self.height = height;
        self.alignment = RowAlignment::Packed;
        self.stride = width * layout.num_components();
        self.pixels = Some(pixels);

        Ok(())
    }

    /// Release the pixels and reset every attribute
    ///
    /// Destroying an empty image does nothing
    pub fn destroy(&mut self) {
        if self.pixels.is_some() {
            info!("destroying {}x{} {:?} image", self.width, self.height, self.layout);
        }
        *self = Image::new();
    }

    pub const fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Get image dimensions as a tuple of (width,height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn alignment(&self) -> RowAlignment {
        self.alignment
    }

    /// Distance in bytes between the start of two consecutive rows
    pub const fn stride(&self) -> usize {
        self.stride
    }

    pub const fn is_empty(&self) -> bool {
        self.pixels.is_none()
    }

    /// All pixel bytes including row padding
    pub fn data(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.pixels.as_deref_mut()
    }

    fn row_bytes(&self) -> usize {
        self.width * self.layout.num_components()
    }

    /// Pixels of row `y` without padding
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        Some(&self.data()?[start..start + self.row_bytes()])
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        let end = start + self.row_bytes();
        Some(&mut self.data_mut()?[start..end])
    }

    /// Pixels with row padding removed
    ///
    /// Borrows when the image is packed, copies otherwise
    pub fn packed_pixels(&self) -> Option<Cow<'_, [u8]>> {
        let data = self.data()?;
        let row_bytes = self.row_bytes();

        if self.stride == row_bytes {
            return Some(Cow::Borrowed(data));
        }
        let mut packed = Vec::with_capacity(row_bytes * self.height);
        for row in data.chunks(self.stride).take(self.height) {
            packed.extend_from_slice(&row[..row_bytes]);
        }
        Some(Cow::Owned(packed))
    }

    /// Decode an image stored in memory
    ///
    /// # Errors
    /// - The image already holds pixels
    /// - `bytes` is empty
    /// - `format` has no codec or decoding fails, the image is left empty
    pub fn import_from(&mut self, format: ImageFormat, bytes: &[u8]) -> Result<(), ImageErrors> {
        self.import_from_with_options(format, bytes, &DecoderOptions::default())
    }

    pub fn import_from_with_options(
        &mut self, format: ImageFormat, bytes: &[u8], options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        if !self.is_empty() {
            error!("cannot import image from memory, image already holds pixels");
            return Err(ImageErrors::ImageNotEmpty);
        }
        if bytes.is_empty() {
            error!("cannot import image from memory, input is empty");
            return Err(ImageErrors::EmptyInput);
        }
        let result =
            codec(format).and_then(|codec| codec.decode_with_options(bytes, self, options));

        match result {
            Ok(()) => {
                info!(
                    "imported {format:?} image from memory, {}x{} {:?}",
                    self.width, self.height, self.layout
                );
                Ok(())
            }
            Err(err) => {
                error!("cannot import {format:?} image from memory, {err}");
                Err(err)
            }
        }
    }

    /// Encode the image into a new blob
    pub fn export_to(&self, format: ImageFormat) -> Result<EncodedBlob, ImageErrors> {
        self.export_to_with_options(format, &EncoderOptions::default())
    }

    pub fn export_to_with_options(
        &self, format: ImageFormat, options: &EncoderOptions
    ) -> Result<EncodedBlob, ImageErrors> {
        if self.is_empty() {
            error!("cannot export image to memory, image is empty");
            return Err(ImageErrors::NoImageBuffer);
        }
        let result = codec(format).and_then(|codec| codec.encode_with_options(self, options));

        match result {
            Ok(blob) => {
                info!("exported {format:?} image to memory, {} bytes", blob.len());
                Ok(blob)
            }
            Err(err) => {
                error!("cannot export {format:?} image to memory, {err}");
                Err(err)
            }
        }
    }

    /// Encode the image, storing the result in `slot`
    ///
    /// The previous content of `slot` is released first. On error `slot`
    /// is left as it was.
    pub fn export_into(&self, format: ImageFormat, slot: &mut BlobSlot) -> Result<(), ImageErrors> {
        let blob = self.export_to(format)?;
        slot.set(blob);
        Ok(())
    }

    /// Decode an image from an opened reader
    pub fn load_from_reader(
        &mut self, format: ImageFormat, reader: &mut dyn Read
    ) -> Result<(), ImageErrors> {
        self.load_from_reader_with_options(format, reader, &DecoderOptions::default())
    }

    pub fn load_from_reader_with_options(
        &mut self, format: ImageFormat, reader: &mut dyn Read, options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        if !self.is_empty() {
            error!("cannot load image, image already holds pixels");
            return Err(ImageErrors::ImageNotEmpty);
        }
        let mut source = ByteSource::from_reader(reader);
        let result = codec(format)
            .and_then(|codec| codec.decode_stream_with_options(&mut source, self, options));

        if let Err(err) = result {
            error!("cannot load {format:?} image, {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Encode the image to an opened writer
    ///
    /// The writer is flushed on success
    pub fn save_to_writer(
        &self, format: ImageFormat, writer: &mut dyn Write
    ) -> Result<(), ImageErrors> {
        self.save_to_writer_with_options(format, writer, &EncoderOptions::default())
    }

    pub fn save_to_writer_with_options(
        &self, format: ImageFormat, writer: &mut dyn Write, options: &EncoderOptions
    ) -> Result<(), ImageErrors> {
        if self.is_empty() {
            error!("cannot save image, image is empty");
            return Err(ImageErrors::NoImageBuffer);
        }
        let mut sink = ByteSink::from_writer(writer);
        let result = codec(format)
            .and_then(|codec| codec.encode_stream_with_options(self, &mut sink, options));

        if let Err(err) = result {
            error!("cannot save {format:?} image, {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Decode the file at `path`, the format is taken from its extension
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ImageErrors> {
        self.load_with_options(path, &DecoderOptions::default())
    }

    pub fn load_with_options<P: AsRef<Path>>(
        &mut self, path: P, options: &DecoderOptions
    ) -> Result<(), ImageErrors> {
        let path = path.as_ref();

        if !self.is_empty() {
            error!("cannot load {}, image already holds pixels", path.display());
            return Err(ImageErrors::ImageNotEmpty);
        }
        let format = format_of(path)?;

        let file = File::open(path).map_err(|err| {
            error!("cannot open {}, {err}", path.display());
            err
        })?;
        let mut reader = BufReader::new(file);

        self.load_from_reader_with_options(format, &mut reader, options)?;
        info!(
            "loaded {}, {}x{} {:?}",
            path.display(),
            self.width,
            self.height,
            self.layout
        );
        Ok(())
    }

    /// Encode to the file at `path`, the format is taken from its extension
    ///
    /// The file is replaced atomically: the image is first written to a
    /// temporary file next to `path` which is then renamed over it. If
    /// anything fails the temporary file is removed and `path` is left
    /// untouched.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageErrors> {
        self.save_with_options(path, &EncoderOptions::default())
    }

    pub fn save_with_options<P: AsRef<Path>>(
        &self, path: P, options: &EncoderOptions
    ) -> Result<(), ImageErrors> {
        let path = path.as_ref();

        if self.is_empty() {
            error!("cannot save {}, image is empty", path.display());
            return Err(ImageErrors::NoImageBuffer);
        }
        let format = format_of(path)?;

        if codec_for(format).is_none() {
            error!("cannot save {}, no codec for {format:?}", path.display());
            return Err(ImageErrors::NoCodecForFormat(format));
        }
        let file_name = path
            .file_name()
            .ok_or_else(|| ImageErrors::UnknownFileType(path.display().to_string()))?
            .to_string_lossy()
            .into_owned();

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new(".")
        };
        let previous_permissions = std::fs::metadata(path).ok().map(|x| x.permissions());

        let prefix = format!("{file_name}_");
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // new files get the usual umask filtered mode
            if previous_permissions.is_none() {
                builder.permissions(std::fs::Permissions::from_mode(0o666));
            }
        }

        let mut temp = builder.tempfile_in(directory).map_err(|err| {
            error!("cannot save {}, cannot create temporary file, {err}", path.display());
            err
        })?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.save_to_writer_with_options(format, &mut writer, options)?;
            writer.flush()?;
        }

        if let Some(permissions) = previous_permissions {
            if let Err(err) = temp.as_file().set_permissions(permissions) {
                warn!("cannot keep permissions of {}, {err}", path.display());
            }
        }

        temp.persist(path).map_err(|err| {
            error!("cannot save {}, {}", path.display(), err.error);
            ImageErrors::FileIoErrors(err.error)
        })?;

        info!("saved {}", path.display());
        Ok(())
    }
}

fn format_of(path: &Path) -> Result<ImageFormat, ImageErrors> {
    match ImageFormat::from_path(path) {
        ImageFormat::Unknown => {
            error!("cannot determine image format of {}", path.display());
            Err(ImageErrors::UnknownFileType(path.display().to_string()))
        }
        format => Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use folio_core::layout::{ChannelLayout, RowAlignment, ALL_LAYOUTS};

    use crate::errors::ImageErrors;
    use crate::image::Image;

    #[test]
    fn create_zero_fills_with_aligned_stride() {
        for layout in ALL_LAYOUTS {
            for alignment in [RowAlignment::Packed, RowAlignment::Align32, RowAlignment::Align64] {
                for width in [1, 3, 7, 13] {
                    let mut image = Image::new();
                    image.create(layout, width, 5, alignment).unwrap();

                    let row_bytes = width * layout.num_components();
                    assert!(image.stride() >= row_bytes);
                    assert!(image.stride() < row_bytes + alignment.bytes());
                    assert_eq!(image.stride() % alignment.bytes(), 0);
                    assert_eq!(image.data().unwrap().len(), image.stride() * 5);
                    assert!(image.data().unwrap().iter().all(|&x| x == 0));
                }
            }
        }
    }

    #[test]
    fn create_rejects_bad_input() {
        let mut image = Image::new();
        assert!(matches!(
            image.create(ChannelLayout::RGB, 0, 5, RowAlignment::Packed),
            Err(ImageErrors::ZeroDimensions(0, 5))
        ));
        assert!(matches!(
            image.create(ChannelLayout::RGBA, usize::MAX / 2, 3, RowAlignment::Packed),
            Err(ImageErrors::TooLargeDimensions(..))
        ));
        assert!(image.is_empty());

        image.create(ChannelLayout::Luma, 2, 2, RowAlignment::Packed).unwrap();
        assert!(matches!(
            image.create(ChannelLayout::Luma, 2, 2, RowAlignment::Packed),
            Err(ImageErrors::ImageNotEmpty)
        ));
    }

    #[test]
    fn destroy_twice() {
        let mut image = Image::new();
        image.create(ChannelLayout::LumaA, 4, 4, RowAlignment::Align64).unwrap();

        image.destroy();
        assert_eq!(image, Image::new());
        image.destroy();
        assert_eq!(image, Image::new());
        assert_eq!(image.layout(), ChannelLayout::RGBA);
        assert_eq!(image.dimensions(), (0, 0));
        assert_eq!(image.alignment(), RowAlignment::Packed);
        assert_eq!(image.stride(), 0);
        assert!(image.data().is_none());
    }

    #[test]
    fn rows_and_packing() {
        let mut image = Image::new();
        image.create(ChannelLayout::RGB, 3, 2, RowAlignment::Align64).unwrap();
        assert_eq!(image.stride(), 16);

        image.row_mut(1).unwrap().copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(image.row(0).unwrap(), &[0; 9]);
        assert!(image.row(2).is_none());

        let packed = image.packed_pixels().unwrap();
        assert_eq!(packed.len(), 18);
        assert_eq!(&packed[9..], &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}
