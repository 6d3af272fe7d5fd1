/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A GIF decoder and encoder
//!
//! The decoder materializes the first frame of a file, composed
//! onto the logical screen with the background color and
//! transparency applied.
//!
//! The encoder quantizes true color pixels to a palette of at most
//! 256 entries with median cut and writes a single frame file.
//!
//! # Example
//! ```
//! use folio_core::bytestream::{ByteSink, ByteSource};
//! use folio_core::layout::ChannelLayout;
//! use folio_gif::{GifDecoder, GifEncoder};
//!
//! let pixels = [255, 0, 0, 0, 0, 255];
//! let mut sink = ByteSink::memory();
//! GifEncoder::new(&pixels, 2, 1, ChannelLayout::RGB)
//!     .encode(&mut sink)
//!     .unwrap();
//! sink.finalize().unwrap();
//! let blob = sink.into_blob().unwrap();
//!
//! let mut decoder = GifDecoder::new(ByteSource::from_slice(&blob));
//! assert_eq!(decoder.decode().unwrap(), pixels);
//! ```
mod decoder;
mod encoder;
mod enums;
mod errors;
pub mod quantize;

pub use decoder::GifDecoder;
pub use encoder::{GifEncoder, TRANSPARENCY_ALPHA_THRESHOLD};
pub use errors::{GifDecoderErrors, GifEncoderErrors};
