/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use folio_core::bytestream::ByteSink;
use folio_core::layout::ChannelLayout;
use folio_core::log::{error, trace};
use weezl::BitOrder;

use crate::enums::{
    EXTENSION_INTRODUCER, GRAPHICS_CONTROL_LABEL, IMAGE_SEPARATOR, TRAILER
};
use crate::errors::GifEncoderErrors;
use crate::quantize::median_cut;

/// Pixels with an alpha below this value are written transparent,
/// all others opaque
pub const TRANSPARENCY_ALPHA_THRESHOLD: u8 = 127;

/// A single frame GIF encoder
///
/// True color input is reduced to a palette with median cut.
/// When the input carries alpha one palette entry is reserved for
/// fully transparent pixels.
pub struct GifEncoder<'a> {
    pixels: &'a [u8],
    width:  usize,
    height: usize,
    stride: usize,
    layout: ChannelLayout
}

impl<'a> GifEncoder<'a> {
    /// Create an encoder for packed pixels
    pub fn new(
        pixels: &'a [u8], width: usize, height: usize, layout: ChannelLayout
    ) -> GifEncoder<'a> {
        GifEncoder::new_with_stride(pixels, width, height, width * layout.num_components(), layout)
    }

    /// Create an encoder for pixels whose rows are `stride` bytes apart
    pub fn new_with_stride(
        pixels: &'a [u8], width: usize, height: usize, stride: usize, layout: ChannelLayout
    ) -> GifEncoder<'a> {
        GifEncoder {
            pixels,
            width,
            height,
            stride,
            layout
        }
    }

    fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        let row_bytes = self.width * self.layout.num_components();
        self.pixels
            .chunks(self.stride)
            .take(self.height)
            .map(move |row| &row[..row_bytes])
    }

    fn check(&self) -> Result<(), GifEncoderErrors> {
        if !(1..=usize::from(u16::MAX)).contains(&self.width)
            || !(1..=usize::from(u16::MAX)).contains(&self.height)
        {
            return Err(GifEncoderErrors::UnsupportedDimensions(
                self.width,
                self.height
            ));
        }
        let row_bytes = self.width * self.layout.num_components();
        if self.stride < row_bytes {
            return Err(GifEncoderErrors::LengthMismatch(row_bytes, self.stride));
        }
        let expected = self.stride * (self.height - 1) + row_bytes;
        if self.pixels.len() < expected {
            return Err(GifEncoderErrors::LengthMismatch(
                expected,
                self.pixels.len()
            ));
        }
        Ok(())
    }

    /// Palette and one index per pixel
    fn quantize(&self) -> (Vec<[u8; 3]>, Vec<u8>, Option<u8>) {
        let count = self.width * self.height;
        let components = self.layout.num_components();
        let (mut r, mut g, mut b) = (
            Vec::with_capacity(count),
            Vec::with_capacity(count),
            Vec::with_capacity(count)
        );

        for pixel in self.rows().flat_map(|row| row.chunks_exact(components)) {
            if self.layout.is_grayscale() {
                r.push(pixel[0]);
                g.push(pixel[0]);
                b.push(pixel[0]);
            } else {
                r.push(pixel[0]);
                g.push(pixel[1]);
                b.push(pixel[2]);
            }
        }
        let Some(alpha) = self.layout.alpha_position() else {
            let (palette, indices) = median_cut(&r, &g, &b, 256);
            return (palette, indices, None);
        };
        let (mut palette, mut indices) = median_cut(&r, &g, &b, 255);

        let transparent = palette.len() as u8;
        palette.push([0, 0, 0]);

        let pixels = self.rows().flat_map(|row| row.chunks_exact(components));

        for (index, pixel) in indices.iter_mut().zip(pixels) {
            if pixel[alpha] < TRANSPARENCY_ALPHA_THRESHOLD {
                *index = transparent;
            }
        }
        (palette, indices, Some(transparent))
    }

    /// Encode the image, writing the whole file to `sink`
    ///
    /// The sink is neither finalized nor discarded
    pub fn encode(&self, sink: &mut ByteSink) -> Result<(), GifEncoderErrors> {
        self.check()?;

        let (palette, indices, transparent) = self.quantize();

        // smallest table able to hold the palette, at least 2 entries
        let mut bits = 1;
        while (1 << bits) < palette.len() {
            bits += 1;
        }
        trace!(
            "Palette of {} colors, {} bit table, transparent index {:?}",
            palette.len(),
            bits,
            transparent
        );

        if transparent.is_some() {
            sink.write_all_bytes(b"GIF89a")?;
        } else {
            sink.write_all_bytes(b"GIF87a")?;
        }
        // logical screen, global table with color resolution equal to its size
        let flags = 0x80 | ((bits - 1) << 4) | (bits - 1);
        sink.write_all_bytes(&(self.width as u16).to_le_bytes())?;
        sink.write_all_bytes(&(self.height as u16).to_le_bytes())?;
        sink.write_all_bytes(&[flags, transparent.unwrap_or(0), 0])?;

        let mut table = vec![0_u8; 3 << bits];
        for (entry, color) in table.chunks_exact_mut(3).zip(&palette) {
            entry.copy_from_slice(color);
        }
        sink.write_all_bytes(&table)?;

        if let Some(index) = transparent {
            sink.write_all_bytes(&[
                EXTENSION_INTRODUCER,
                GRAPHICS_CONTROL_LABEL,
                4,
                0x01,
                0,
                0,
                index,
                0
            ])?;
        }

        sink.write_all_bytes(&[IMAGE_SEPARATOR, 0, 0, 0, 0])?;
        sink.write_all_bytes(&(self.width as u16).to_le_bytes())?;
        sink.write_all_bytes(&(self.height as u16).to_le_bytes())?;
        sink.write_all_bytes(&[0])?;

        let min_code_size = bits.max(2);
        let compressed = weezl::encode::Encoder::new(BitOrder::Lsb, min_code_size)
            .encode(&indices)
            .map_err(|e| {
                error!("LZW compression failed: {e}");
                GifEncoderErrors::LzwError(e)
            })?;

        sink.write_all_bytes(&[min_code_size])?;
        for block in compressed.chunks(255) {
            sink.write_all_bytes(&[block.len() as u8])?;
            sink.write_all_bytes(block)?;
        }
        sink.write_all_bytes(&[0, TRAILER])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use folio_core::bytestream::ByteSink;
    use folio_core::layout::ChannelLayout;

    use crate::{GifEncoder, GifEncoderErrors};

    fn encode(pixels: &[u8], w: usize, h: usize, layout: ChannelLayout) -> Vec<u8> {
        let mut sink = ByteSink::memory();
        GifEncoder::new(pixels, w, h, layout)
            .encode(&mut sink)
            .unwrap();
        sink.finalize().unwrap();
        sink.into_blob().unwrap().into_vec()
    }

    #[test]
    fn opaque_header() {
        let data = encode(&[255, 0, 0, 0, 0, 255], 2, 1, ChannelLayout::RGB);
        assert_eq!(&data[..6], b"GIF87a");
        // 2x1 screen, global table of 2 entries
        assert_eq!(&data[6..13], &[2, 0, 1, 0, 0x80, 0, 0]);
        assert_eq!(&data[13..19], &[0, 0, 255, 255, 0, 0]);
        assert_eq!(data[19], 0x2C);
        assert_eq!(*data.last().unwrap(), 0x3B);
    }

    #[test]
    fn alpha_header() {
        let pixels = [10, 200, 10, 0];
        let data = encode(&pixels, 2, 1, ChannelLayout::LumaA);
        assert_eq!(&data[..6], b"GIF89a");
        // one color plus the transparent entry
        assert_eq!(data[10], 0x80);
        assert_eq!(data[11], 1, "background index is the transparent index");
        assert_eq!(&data[13..19], &[10, 10, 10, 0, 0, 0]);
        assert_eq!(&data[19..27], &[0x21, 0xF9, 4, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn rejects_bad_input() {
        let mut sink = ByteSink::memory();
        let encoder = GifEncoder::new(&[0; 12], 0, 4, ChannelLayout::RGB);
        assert!(matches!(
            encoder.encode(&mut sink),
            Err(GifEncoderErrors::UnsupportedDimensions(0, 4))
        ));

        let encoder = GifEncoder::new(&[0; 11], 2, 2, ChannelLayout::RGB);
        assert!(matches!(
            encoder.encode(&mut sink),
            Err(GifEncoderErrors::LengthMismatch(12, 11))
        ));

        let wide = vec![0; 70_000];
        let encoder = GifEncoder::new(&wide, 70_000, 1, ChannelLayout::Luma);
        assert!(encoder.encode(&mut sink).is_err());
    }
}
