/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use folio_core::bytestream::ByteSource;
use folio_core::layout::ChannelLayout;
use folio_core::log::{error, trace, warn};
use folio_core::options::DecoderOptions;
use weezl::{BitOrder, LzwStatus};

use crate::enums::{
    RowOrder, EXTENSION_INTRODUCER, GRAPHICS_CONTROL_LABEL, IMAGE_SEPARATOR, TRAILER
};
use crate::errors::GifDecoderErrors;

/// The first image found in the file, still compressed
struct Frame {
    left:          usize,
    top:           usize,
    width:         usize,
    height:        usize,
    order:         RowOrder,
    /// Local table if present, otherwise a copy of the global one
    palette:       Vec<[u8; 3]>,
    min_code_size: u8,
    compressed:    Vec<u8>
}

/// A GIF decoder
///
/// Only the first image of a file is decoded, it is placed on a
/// canvas the size of the logical screen.
///
/// # Example
/// ```no_run
/// use folio_core::bytestream::ByteSource;
/// use folio_gif::GifDecoder;
///
/// let data = std::fs::read("image.gif").unwrap();
/// let mut decoder = GifDecoder::new(ByteSource::from_slice(&data));
/// let pixels = decoder.decode().unwrap();
/// let (w, h) = decoder.dimensions().unwrap();
/// assert_eq!(pixels.len(), w * h * decoder.layout().unwrap().num_components());
/// ```
pub struct GifDecoder<'a> {
    stream:         ByteSource<'a>,
    options:        DecoderOptions,
    width:          usize,
    height:         usize,
    flags:          u8,
    bgindex:        u8,
    ratio:          u8,
    read_headers:   bool,
    global_palette: Vec<[u8; 3]>,
    /// Transparent index from the graphics control extension
    /// preceding the first image
    transparent:    Option<u8>,
    seen_control:   bool,
    frame:          Option<Frame>
}

impl<'a> GifDecoder<'a> {
    pub fn new(source: ByteSource<'a>) -> GifDecoder<'a> {
        GifDecoder::new_with_options(source, DecoderOptions::default())
    }

    pub fn new_with_options(source: ByteSource<'a>, options: DecoderOptions) -> GifDecoder<'a> {
        GifDecoder {
            stream: source,
            options,
            width: 0,
            height: 0,
            flags: 0,
            bgindex: 0,
            ratio: 0,
            read_headers: false,
            global_palette: Vec::new(),
            transparent: None,
            seen_control: false,
            frame: None
        }
    }

    /// Read everything up to and including the compressed data of
    /// the first image
    pub fn decode_headers(&mut self) -> Result<(), GifDecoderErrors> {
        if self.read_headers {
            return Ok(());
        }
        let mut magic = [0; 6];
        self.stream.read_exact_bytes(&mut magic)?;

        if &magic != b"GIF87a" && &magic != b"GIF89a" {
            return Err(GifDecoderErrors::NotAGif);
        }

        self.width = usize::from(self.stream.read_u16_le()?);
        self.height = usize::from(self.stream.read_u16_le()?);

        self.flags = self.stream.read_u8()?;
        self.bgindex = self.stream.read_u8()?;
        self.ratio = self.stream.read_u8()?;

        if self.width == 0 || self.height == 0 {
            return Err(GifDecoderErrors::ZeroDimensions(self.width, self.height));
        }
        if self.width > self.options.max_width() {
            return Err(GifDecoderErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                self.width
            ));
        }
        if self.height > self.options.max_height() {
            return Err(GifDecoderErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                self.height
            ));
        }
        // check if we have a global palette
        if (self.flags & 0x80) > 0 {
            self.global_palette = self.parse_colortable(2 << (self.flags & 7))?;
        }
        trace!("Image width  :{}", self.width);
        trace!("Image height :{}", self.height);
        trace!("Ratio: {}", self.ratio);

        self.frame = Some(self.find_first_frame()?);
        self.read_headers = true;

        Ok(())
    }

    fn parse_colortable(&mut self, num_entries: usize) -> Result<Vec<[u8; 3]>, GifDecoderErrors> {
        let mut raw = vec![0_u8; num_entries * 3];
        self.stream.read_exact_bytes(&mut raw)?;

        Ok(raw.chunks_exact(3).map(|x| [x[0], x[1], x[2]]).collect())
    }

    fn skip_sub_blocks(&mut self) -> Result<(), GifDecoderErrors> {
        loop {
            let length = self.stream.read_u8()?;
            if length == 0 {
                return Ok(());
            }
            self.stream.skip(usize::from(length))?;
        }
    }

    fn parse_extension(&mut self) -> Result<(), GifDecoderErrors> {
        let label = self.stream.read_u8()?;

        if label == GRAPHICS_CONTROL_LABEL {
            let length = usize::from(self.stream.read_u8()?);
            let mut block = [0; 255];
            self.stream.read_exact_bytes(&mut block[..length])?;

            if length >= 4 {
                // several control blocks before one image, the first wins
                if !self.seen_control && (block[0] & 0x01) != 0 {
                    self.transparent = Some(block[3]);
                    trace!("Transparent index: {}", block[3]);
                }
                self.seen_control = true;
            } else {
                warn!("Graphics control extension too short ({length} bytes), ignoring");
            }
            if length == 0 {
                return Ok(());
            }
        } else {
            trace!("Skipping extension {label:#04X}");
        }
        self.skip_sub_blocks()
    }

    fn find_first_frame(&mut self) -> Result<Frame, GifDecoderErrors> {
        loop {
            match self.stream.read_u8()? {
                EXTENSION_INTRODUCER => self.parse_extension()?,
                IMAGE_SEPARATOR => return self.parse_frame(),
                TRAILER => {
                    error!("GIF file ended before any image");
                    return Err(GifDecoderErrors::NoImage);
                }
                _ => return Err(GifDecoderErrors::Static("Unknown block in GIF stream"))
            }
        }
    }

    fn parse_frame(&mut self) -> Result<Frame, GifDecoderErrors> {
        let left = usize::from(self.stream.read_u16_le()?);
        let top = usize::from(self.stream.read_u16_le()?);
        let width = usize::from(self.stream.read_u16_le()?);
        let height = usize::from(self.stream.read_u16_le()?);
        let flags = self.stream.read_u8()?;

        if width == 0 || height == 0 {
            return Err(GifDecoderErrors::ZeroDimensions(width, height));
        }
        if left + width > self.width || top + height > self.height {
            return Err(GifDecoderErrors::FrameOutOfBounds(left, top, width, height));
        }

        let palette = if (flags & 0x80) > 0 {
            self.parse_colortable(2 << (flags & 7))?
        } else {
            self.global_palette.clone()
        };
        if palette.is_empty() {
            return Err(GifDecoderErrors::NoColorTable);
        }

        let min_code_size = self.stream.read_u8()?;
        if !(2..=11).contains(&min_code_size) {
            return Err(GifDecoderErrors::Static("Invalid LZW minimum code size"));
        }

        let mut compressed = Vec::new();
        loop {
            let length = usize::from(self.stream.read_u8()?);
            if length == 0 {
                break;
            }
            let start = compressed.len();
            compressed.resize(start + length, 0);
            self.stream.read_exact_bytes(&mut compressed[start..])?;
        }
        trace!("Frame: {width}x{height} at ({left},{top}), {flags:#04X}");

        Ok(Frame {
            left,
            top,
            width,
            height,
            order: RowOrder::from_flags(flags),
            palette,
            min_code_size,
            compressed
        })
    }

    /// Dimensions of the logical screen, or `None` if headers
    /// haven't been decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.read_headers {
            return Some((self.width, self.height));
        }
        None
    }

    /// The transparent index if it refers to an entry of the
    /// table used by the first image
    fn transparent_index(&self) -> Option<u8> {
        let frame = self.frame.as_ref()?;
        self.transparent
            .filter(|&index| usize::from(index) < frame.palette.len())
    }

    /// Layout of the decoded pixels, `RGBA` when the first image has
    /// a usable transparent index, `RGB` otherwise
    ///
    /// Returns `None` if headers haven't been decoded
    pub fn layout(&self) -> Option<ChannelLayout> {
        if !self.read_headers {
            return None;
        }
        if self.transparent_index().is_some() {
            Some(ChannelLayout::RGBA)
        } else {
            Some(ChannelLayout::RGB)
        }
    }

    /// Size of the buffer needed to hold the decoded pixels packed
    pub fn output_buffer_size(&self) -> Option<usize> {
        let (w, h) = self.dimensions()?;
        w.checked_mul(h)?
            .checked_mul(self.layout()?.num_components())
    }

    /// Background color painted around the first image
    ///
    /// Only a global table provides one, black is the same as no
    /// background since the canvas starts black
    fn background(&self) -> Option<[u8; 3]> {
        let color = *self.global_palette.get(usize::from(self.bgindex))?;
        if color == [0, 0, 0] {
            return None;
        }
        Some(color)
    }

    /// Decode into `out` where consecutive rows are `stride` bytes apart
    ///
    /// The canvas is cleared before the image is drawn
    pub fn decode_into(&mut self, out: &mut [u8], stride: usize) -> Result<(), GifDecoderErrors> {
        self.decode_headers()?;

        let layout = self.layout().ok_or("Headers not decoded")?;
        let components = layout.num_components();
        let row_bytes = self.width * components;

        if stride < row_bytes {
            return Err(GifDecoderErrors::TooSmallSize(row_bytes, stride));
        }
        let needed = stride
            .checked_mul(self.height - 1)
            .and_then(|x| x.checked_add(row_bytes))
            .ok_or(GifDecoderErrors::OverflowError("output size"))?;

        if out.len() < needed {
            return Err(GifDecoderErrors::TooSmallSize(needed, out.len()));
        }
        let background = self.background();
        let transparent = self.transparent_index();
        let frame = self.frame.as_ref().ok_or("Headers not decoded")?;

        // decoding stops once the raster is full, a missing end code is fine
        let pixel_count = frame.width * frame.height;
        let mut raster = vec![0_u8; pixel_count];
        let mut lzw = weezl::decode::Decoder::new(BitOrder::Lsb, frame.min_code_size);
        let mut input = frame.compressed.as_slice();
        let mut filled = 0;

        while filled < pixel_count {
            let result = lzw.decode_bytes(input, &mut raster[filled..]);
            input = &input[result.consumed_in..];
            filled += result.consumed_out;

            match result.status? {
                LzwStatus::Ok if result.consumed_in != 0 || result.consumed_out != 0 => {}
                _ => break
            }
        }
        if filled < pixel_count {
            error!("Truncated GIF raster, expected {pixel_count} indices but found {filled}");
            return Err(GifDecoderErrors::TooSmallSize(pixel_count, filled));
        }
        out.fill(0);

        if let Some(color) = background {
            for (y, row) in out.chunks_mut(stride).take(self.height).enumerate() {
                let inside_rows = y >= frame.top && y < frame.top + frame.height;

                for (x, pixel) in row[..row_bytes].chunks_exact_mut(components).enumerate() {
                    let inside = inside_rows && x >= frame.left && x < frame.left + frame.width;
                    if !inside {
                        pixel[..3].copy_from_slice(&color);
                    }
                }
            }
        }

        let rows = frame.order.rows(frame.height);

        for (indices, dest_y) in raster.chunks_exact(frame.width).zip(rows) {
            let start = (frame.top + dest_y) * stride + frame.left * components;
            let end = start + frame.width * components;

            for (&index, pixel) in indices
                .iter()
                .zip(out[start..end].chunks_exact_mut(components))
            {
                if let Some(color) = frame.palette.get(usize::from(index)) {
                    pixel[..3].copy_from_slice(color);

                    if components == 4 && Some(index) != transparent {
                        pixel[3] = 255;
                    }
                }
            }
        }

        Ok(())
    }

    /// Decode the first image into a new packed buffer
    pub fn decode(&mut self) -> Result<Vec<u8>, GifDecoderErrors> {
        self.decode_headers()?;

        let size = self
            .output_buffer_size()
            .ok_or(GifDecoderErrors::OverflowError("output size"))?;
        let mut out = vec![0; size];
        let stride = self.width * self.layout().map_or(3, |x| x.num_components());

        self.decode_into(&mut out, stride)?;

        Ok(out)
    }
}
