/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Block introducers
pub(crate) const EXTENSION_INTRODUCER: u8 = 0x21;
pub(crate) const IMAGE_SEPARATOR: u8 = 0x2C;
pub(crate) const TRAILER: u8 = 0x3B;

/// Extension labels
pub(crate) const GRAPHICS_CONTROL_LABEL: u8 = 0xF9;

/// Order in which the rows of a sub-image are stored
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RowOrder {
    Sequential,
    /// Four passes, starting at rows 0, 4, 2, 1 with steps 8, 8, 4, 2
    Interlaced
}

impl RowOrder {
    pub fn from_flags(flags: u8) -> RowOrder {
        if flags & 0x40 != 0 {
            RowOrder::Interlaced
        } else {
            RowOrder::Sequential
        }
    }

    /// Destination row of every stored row, in storage order
    pub fn rows(self, height: usize) -> Vec<usize> {
        match self {
            RowOrder::Sequential => (0..height).collect(),
            RowOrder::Interlaced => {
                const PASSES: [(usize, usize); 4] = [(0, 8), (4, 8), (2, 4), (1, 2)];

                PASSES
                    .iter()
                    .flat_map(|&(start, step)| (start..height).step_by(step))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::enums::RowOrder;

    #[test]
    fn interlaced_rows_cover_every_row_once() {
        let rows = RowOrder::Interlaced.rows(10);
        assert_eq!(rows, [0, 8, 4, 2, 6, 1, 3, 5, 7, 9]);

        for height in 1..40 {
            let mut rows = RowOrder::Interlaced.rows(height);
            rows.sort_unstable();
            assert_eq!(rows, RowOrder::Sequential.rows(height));
        }
    }

    #[test]
    fn flags() {
        assert_eq!(RowOrder::from_flags(0x40), RowOrder::Interlaced);
        assert_eq!(RowOrder::from_flags(0x87), RowOrder::Sequential);
    }
}
