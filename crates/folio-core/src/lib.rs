/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by all folio codecs
//!
//! This crate provides a set of core routines shared
//! by the decoders and encoders under the `folio` umbrella
//!
//! It currently contains
//!
//! - A byte source and byte sink which hide whether bytes come from
//!   a file or from memory
//! - A growable memory destination and the owned blob it produces
//! - Channel layout and row alignment information shared by images
//! - Image decoder and encoder options
//! - File type classification from file names
//!
//! # Features
//!  - `log`: Route the crate log macros to the [log](https://docs.rs/log) facade,
//!     enabled by default
//!
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
//!
#![macro_use]

pub mod bytestream;
pub mod file_type;
pub mod layout;
pub mod log;
pub mod options;
pub mod serde;
