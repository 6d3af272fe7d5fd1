/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder and encoder options
//!
//! All codecs share one [`DecoderOptions`] and one [`EncoderOptions`]
//! so a single configuration can be reused across formats.
//! Each option lists the codecs that respect it.

/// Decoder options
///
/// Not all options are respected by all decoders
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_width:  usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_height: usize
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:  1 << 14,
            max_height: 1 << 14
        }
    }
}

impl DecoderOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_core::options::DecoderOptions;
    /// let opts = DecoderOptions::default().set_max_width(1200);
    /// assert_eq!(opts.max_width(), 1200);
    /// ```
    #[must_use]
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    #[must_use]
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
}

/// Encoder options
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EncoderOptions {
    /// JPEG quality, between 1 and 100
    ///
    /// - Default value: 100
    /// - Respected by: `jpeg`
    jpeg_quality: u8
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self { jpeg_quality: 100 }
    }
}

impl EncoderOptions {
    pub const fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Set the JPEG quality, values are clamped to `1..=100`
    #[must_use]
    pub fn set_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}
