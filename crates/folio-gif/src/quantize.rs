/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Median cut color quantization
//!
//! Colors are counted in a cube of 32 levels per channel. The cube
//! is split recursively, always cutting the box with the widest
//! channel range at the median pixel along that channel, until
//! the requested number of boxes exists or no box can be split.
//!
//! Each box becomes one palette entry, the mean of the pixels
//! that fell into it.

const BITS: usize = 5;
const LEVELS: usize = 1 << BITS;
const CELLS: usize = LEVELS * LEVELS * LEVELS;

#[inline(always)]
fn cell_of(r: u8, g: u8, b: u8) -> usize {
    let shift = 8 - BITS;
    (usize::from(r >> shift) << (2 * BITS)) | (usize::from(g >> shift) << BITS) | usize::from(b >> shift)
}

#[inline(always)]
fn cell_at(c: [usize; 3]) -> usize {
    (c[0] << (2 * BITS)) | (c[1] << BITS) | c[2]
}

struct Histogram {
    counts: Vec<u32>,
    sums:   Vec<[u64; 3]>
}

/// An axis aligned box of cells, bounds inclusive
#[derive(Copy, Clone, Debug)]
struct ColorBox {
    lo:     [usize; 3],
    hi:     [usize; 3],
    pixels: u64
}

impl ColorBox {
    fn cells(&self) -> impl Iterator<Item = usize> + '_ {
        (self.lo[0]..=self.hi[0]).flat_map(move |r| {
            (self.lo[1]..=self.hi[1])
                .flat_map(move |g| (self.lo[2]..=self.hi[2]).map(move |b| cell_at([r, g, b])))
        })
    }

    /// Widest channel and its range
    fn widest(&self) -> (usize, usize) {
        (0..3)
            .map(|axis| (axis, self.hi[axis] - self.lo[axis]))
            .max_by_key(|&(axis, range)| (range, usize::MAX - axis))
            .unwrap_or((0, 0))
    }

    /// Tighten the bounds around occupied cells
    fn shrink(&mut self, histogram: &Histogram) {
        let mut lo = [LEVELS; 3];
        let mut hi = [0; 3];
        let mut pixels = 0;

        for r in self.lo[0]..=self.hi[0] {
            for g in self.lo[1]..=self.hi[1] {
                for b in self.lo[2]..=self.hi[2] {
                    let count = histogram.counts[cell_at([r, g, b])];
                    if count == 0 {
                        continue;
                    }
                    pixels += u64::from(count);
                    for (axis, v) in [r, g, b].into_iter().enumerate() {
                        lo[axis] = lo[axis].min(v);
                        hi[axis] = hi[axis].max(v);
                    }
                }
            }
        }
        if pixels > 0 {
            self.lo = lo;
            self.hi = hi;
        } else {
            self.hi = self.lo;
        }
        self.pixels = pixels;
    }

    /// Cut at the median along the widest channel
    fn split(&self, histogram: &Histogram) -> (ColorBox, ColorBox) {
        let (axis, _) = self.widest();
        let mut slices = [0_u64; LEVELS];

        for r in self.lo[0]..=self.hi[0] {
            for g in self.lo[1]..=self.hi[1] {
                for b in self.lo[2]..=self.hi[2] {
                    let position = [r, g, b][axis];
                    slices[position] += u64::from(histogram.counts[cell_at([r, g, b])]);
                }
            }
        }
        let half = self.pixels / 2;
        let mut seen = 0;
        let mut cut = self.lo[axis];

        for (position, count) in slices
            .iter()
            .enumerate()
            .take(self.hi[axis] + 1)
            .skip(self.lo[axis])
        {
            seen += count;
            cut = position;
            if seen >= half {
                break;
            }
        }
        // both halves must keep at least one slice
        let cut = cut.min(self.hi[axis] - 1);

        let mut lower = *self;
        let mut upper = *self;
        lower.hi[axis] = cut;
        upper.lo[axis] = cut + 1;
        lower.shrink(histogram);
        upper.shrink(histogram);

        (lower, upper)
    }
}

/// Quantize the planes `r`, `g`, `b` to at most `max_colors` colors
///
/// Returns the palette and one palette index per pixel.
///
/// # Panics
/// If the planes don't have the same length or `max_colors` is not in `1..=256`
pub fn median_cut(r: &[u8], g: &[u8], b: &[u8], max_colors: usize) -> (Vec<[u8; 3]>, Vec<u8>) {
    assert!(r.len() == g.len() && g.len() == b.len(), "Planes differ in length");
    assert!((1..=256).contains(&max_colors), "Palette must hold 1 to 256 colors");

    let mut histogram = Histogram {
        counts: vec![0; CELLS],
        sums:   vec![[0; 3]; CELLS]
    };
    for ((&r, &g), &b) in r.iter().zip(g).zip(b) {
        let cell = cell_of(r, g, b);
        histogram.counts[cell] += 1;
        let sum = &mut histogram.sums[cell];
        sum[0] += u64::from(r);
        sum[1] += u64::from(g);
        sum[2] += u64::from(b);
    }

    let mut first = ColorBox {
        lo:     [0; 3],
        hi:     [LEVELS - 1; 3],
        pixels: 0
    };
    first.shrink(&histogram);
    let mut boxes = vec![first];

    while boxes.len() < max_colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, x)| x.widest().1 > 0)
            .max_by_key(|(_, x)| x.widest().1)
            .map(|(position, _)| position);

        let Some(position) = candidate else {
            break;
        };
        let (lower, upper) = boxes[position].split(&histogram);
        boxes[position] = lower;
        boxes.push(upper);
    }

    let mut lookup = vec![0_u8; CELLS];
    let mut palette = Vec::with_capacity(boxes.len());

    for (index, color_box) in boxes.iter().enumerate() {
        let mut total = [0_u64; 3];
        for cell in color_box.cells() {
            lookup[cell] = index as u8;
            for (t, s) in total.iter_mut().zip(histogram.sums[cell]) {
                *t += s;
            }
        }
        let count = color_box.pixels.max(1);
        palette.push(total.map(|x| ((x + count / 2) / count) as u8));
    }

    let indices = r
        .iter()
        .zip(g)
        .zip(b)
        .map(|((&r, &g), &b)| lookup[cell_of(r, g, b)])
        .collect();

    (palette, indices)
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;

    use crate::quantize::median_cut;

    #[test]
    fn few_colors_are_exact() {
        let r = [255, 0, 0, 255, 7];
        let g = [0, 255, 0, 255, 7];
        let b = [0, 0, 255, 255, 7];
        let (palette, indices) = median_cut(&r, &g, &b, 256);

        assert_eq!(palette.len(), 5);
        for i in 0..5 {
            assert_eq!(palette[usize::from(indices[i])], [r[i], g[i], b[i]]);
        }
    }

    #[test]
    fn single_color() {
        let plane = [42_u8; 64];
        let (palette, indices) = median_cut(&plane, &plane, &plane, 256);
        assert_eq!(palette, [[42, 42, 42]]);
        assert!(indices.iter().all(|&x| x == 0));
    }

    #[test]
    fn respects_color_limit() {
        let mut rng = nanorand::WyRand::new();
        let (mut r, mut g, mut b) = (vec![0_u8; 5000], vec![0_u8; 5000], vec![0_u8; 5000]);
        rng.fill(&mut r);
        rng.fill(&mut g);
        rng.fill(&mut b);

        for limit in [1, 2, 16, 255, 256] {
            let (palette, indices) = median_cut(&r, &g, &b, limit);
            assert!(palette.len() <= limit);
            assert_eq!(indices.len(), r.len());
            assert!(indices.iter().all(|&x| usize::from(x) < palette.len()));
        }
    }

    #[test]
    fn colors_stay_close() {
        let mut rng = nanorand::WyRand::new();
        let (mut r, mut g, mut b) = (vec![0_u8; 3000], vec![0_u8; 3000], vec![0_u8; 3000]);
        rng.fill(&mut r);
        rng.fill(&mut g);
        rng.fill(&mut b);

        let (palette, indices) = median_cut(&r, &g, &b, 256);

        // 256 boxes over a uniform cube are at most a few levels wide
        for i in 0..r.len() {
            let color = palette[usize::from(indices[i])];
            for (c, v) in color.iter().zip([r[i], g[i], b[i]]) {
                assert!(c.abs_diff(v) < 128);
            }
        }
    }
}
