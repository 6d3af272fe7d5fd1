/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Channel layout and row alignment of in-memory pixels.

/// All channel layouts an image can be stored in
///
/// Every channel is one byte wide, channels of a pixel are
/// interleaved in the order given by the variant name.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum ChannelLayout {
    /// Grayscale
    Luma,
    /// Grayscale with alpha
    LumaA,
    /// Red, Green, Blue
    RGB,
    /// Red, Green, Blue, Alpha
    #[default]
    RGBA
}

impl ChannelLayout {
    /// Number of channels present for a certain layout
    ///
    /// E.g. RGB returns 3 since it contains R,G and B colors to make up a pixel
    pub const fn num_components(&self) -> usize {
        match self {
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::RGB => 3,
            Self::RGBA => 4
        }
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA | Self::LumaA)
    }

    pub const fn is_grayscale(&self) -> bool {
        matches!(self, Self::LumaA | Self::Luma)
    }

    /// Returns the position of the alpha channel in a pixel
    /// or `None` if the layout carries no alpha
    pub const fn alpha_position(&self) -> Option<usize> {
        match self {
            Self::LumaA => Some(1),
            Self::RGBA => Some(3),
            _ => None
        }
    }

    /// Map a channel count back to its layout
    ///
    /// Returns `None` for counts outside `1..=4`
    pub const fn from_components(components: usize) -> Option<ChannelLayout> {
        match components {
            1 => Some(Self::Luma),
            2 => Some(Self::LumaA),
            3 => Some(Self::RGB),
            4 => Some(Self::RGBA),
            _ => None
        }
    }
}

/// All supported layouts
pub static ALL_LAYOUTS: [ChannelLayout; 4] = [
    ChannelLayout::Luma,
    ChannelLayout::LumaA,
    ChannelLayout::RGB,
    ChannelLayout::RGBA
];

/// Alignment applied to the start of every image row
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum RowAlignment {
    /// Rows follow each other with no padding
    #[default]
    Packed,
    /// Row size is rounded up to a multiple of 4 bytes
    Align32,
    /// Row size is rounded up to a multiple of 8 bytes
    Align64
}

impl RowAlignment {
    /// Number of bytes a row size must be a multiple of
    pub const fn bytes(&self) -> usize {
        match self {
            Self::Packed => 1,
            Self::Align32 => 4,
            Self::Align64 => 8
        }
    }

    /// Compute the stride (bytes per row) of an image with
    /// `width` pixels in `layout`.
    ///
    /// Returns `None` if the computation overflows
    pub fn stride_for(&self, layout: ChannelLayout, width: usize) -> Option<usize> {
        let packed = layout.num_components().checked_mul(width)?;
        let mask = self.bytes() - 1;

        packed.checked_add(mask).map(|x| x & !mask)
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::{ChannelLayout, RowAlignment, ALL_LAYOUTS};

    #[test]
    fn stride_is_rounded_to_alignment() {
        assert_eq!(RowAlignment::Packed.stride_for(ChannelLayout::RGB, 5), Some(15));
        assert_eq!(RowAlignment::Align32.stride_for(ChannelLayout::RGB, 5), Some(16));
        assert_eq!(RowAlignment::Align64.stride_for(ChannelLayout::RGB, 5), Some(16));
        assert_eq!(RowAlignment::Align64.stride_for(ChannelLayout::LumaA, 5), Some(16));
        assert_eq!(RowAlignment::Align32.stride_for(ChannelLayout::RGBA, 3), Some(12));
        assert_eq!(RowAlignment::Align64.stride_for(ChannelLayout::Luma, 1), Some(8));
    }

    #[test]
    fn stride_never_smaller_than_packed_row() {
        for layout in ALL_LAYOUTS {
            for align in [RowAlignment::Packed, RowAlignment::Align32, RowAlignment::Align64] {
                for width in 1..67 {
                    let stride = align.stride_for(layout, width).unwrap();
                    assert!(stride >= layout.num_components() * width);
                    assert_eq!(stride % align.bytes(), 0);
                    assert!(stride - layout.num_components() * width < align.bytes());
                }
            }
        }
    }

    #[test]
    fn stride_overflow_is_reported() {
        assert_eq!(RowAlignment::Packed.stride_for(ChannelLayout::RGBA, usize::MAX), None);
        assert_eq!(RowAlignment::Align64.stride_for(ChannelLayout::Luma, usize::MAX), None);
    }

    #[test]
    fn components_round_trip() {
        for layout in ALL_LAYOUTS {
            assert_eq!(ChannelLayout::from_components(layout.num_components()), Some(layout));
        }
        assert_eq!(ChannelLayout::from_components(0), None);
        assert_eq!(ChannelLayout::from_components(5), None);
    }
}
