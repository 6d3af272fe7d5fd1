/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pixel buffers and the codecs that fill and store them
//!
//! An [`Image`](image::Image) holds 8 bit interleaved pixels. It is
//! filled by decoding JPEG, PNG or GIF data from memory, a reader or a
//! file, and stored the same way. Saving to a path replaces the
//! target atomically.
//!
//! # Example
//! ```no_run
//! use folio_core::bytestream::BlobSlot;
//! use folio_image::codecs::ImageFormat;
//! use folio_image::image::Image;
//!
//! let mut image = Image::new();
//! image.load("page.jpg").unwrap();
//!
//! let mut slot = BlobSlot::new();
//! image.export_into(ImageFormat::PNG, &mut slot).unwrap();
//! image.save("page.gif").unwrap();
//! ```
//!
//! # Features
//! - `log`: Log through the [log](https://docs.rs/log) facade, enabled by default
//! - `serde-support`: Serialize image descriptions and formats
pub mod codecs;
pub mod errors;
pub mod image;
mod serde;
pub mod traits;
