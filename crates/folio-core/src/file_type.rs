/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! File type classification from file names
//!
//! The viewer recognizes images, comic book archives and paginated
//! documents by extension only, file contents are never sniffed here.
use std::path::Path;

/// All file types known to the viewer
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FileType {
    /// Joint Photographic Experts Group
    JPEG,
    /// Portable Network Graphics
    PNG,
    /// Truevision TGA
    TGA,
    /// Tagged Image File Format
    TIFF,
    /// Graphics Interchange Format
    GIF,
    /// Windows Bitmap Files
    BMP,
    /// Zip comic book archive
    CBZ,
    /// Rar comic book archive
    CBR,
    /// 7z comic book archive
    CB7,
    /// Tar comic book archive
    CBT,
    /// Portable Document Format
    PDF,
    /// XML Paper Specification
    XPS,
    /// Electronic publication
    EPUB,
    /// Anything else
    Unknown
}

static EXTENSIONS: [(&str, FileType); 15] = [
    (".jpg", FileType::JPEG),
    (".jpeg", FileType::JPEG),
    (".png", FileType::PNG),
    (".tga", FileType::TGA),
    (".tif", FileType::TIFF),
    (".tiff", FileType::TIFF),
    (".gif", FileType::GIF),
    (".bmp", FileType::BMP),
    (".cbz", FileType::CBZ),
    (".cbr", FileType::CBR),
    (".cb7", FileType::CB7),
    (".cbt", FileType::CBT),
    (".pdf", FileType::PDF),
    (".xps", FileType::XPS),
    (".epub", FileType::EPUB)
];

impl FileType {
    /// Classify a file from the extension of its name
    ///
    /// Matching is case insensitive and requires at least one
    /// character before the extension, so a file named `.png`
    /// is [`FileType::Unknown`]
    pub fn from_path<P: AsRef<Path>>(path: P) -> FileType {
        let Some(name) = path.as_ref().file_name() else {
            return FileType::Unknown;
        };
        let name = name.to_string_lossy().to_ascii_lowercase();

        EXTENSIONS
            .iter()
            .find(|(ext, _)| name.len() > ext.len() && name.ends_with(ext))
            .map_or(FileType::Unknown, |(_, file_type)| *file_type)
    }

    pub const fn is_image(self) -> bool {
        matches!(
            self,
            Self::JPEG | Self::PNG | Self::TGA | Self::TIFF | Self::GIF | Self::BMP
        )
    }

    pub const fn is_comic_book(self) -> bool {
        matches!(self, Self::CBZ | Self::CBR | Self::CB7 | Self::CBT)
    }

    pub const fn is_document(self) -> bool {
        matches!(self, Self::PDF | Self::XPS | Self::EPUB)
    }
}

#[cfg(test)]
mod tests {
    use crate::file_type::FileType;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(FileType::from_path("holiday.JPG"), FileType::JPEG);
        assert_eq!(FileType::from_path("holiday.jpeg"), FileType::JPEG);
        assert_eq!(FileType::from_path("/tmp/scan.Png"), FileType::PNG);
        assert_eq!(FileType::from_path("anim.gif"), FileType::GIF);
        assert_eq!(FileType::from_path("page.TIFF"), FileType::TIFF);
        assert_eq!(FileType::from_path("book.epub"), FileType::EPUB);
        assert_eq!(FileType::from_path("volume1.cb7"), FileType::CB7);
    }

    #[test]
    fn bare_or_unknown_extensions() {
        assert_eq!(FileType::from_path(".png"), FileType::Unknown);
        assert_eq!(FileType::from_path("dir/.gif"), FileType::Unknown);
        assert_eq!(FileType::from_path("notes.txt"), FileType::Unknown);
        assert_eq!(FileType::from_path("png"), FileType::Unknown);
        assert_eq!(FileType::from_path(""), FileType::Unknown);
    }

    #[test]
    fn families() {
        assert!(FileType::BMP.is_image());
        assert!(!FileType::CBZ.is_image());
        assert!(FileType::CBR.is_comic_book());
        assert!(FileType::XPS.is_document());
        assert!(!FileType::Unknown.is_document());
    }
}
