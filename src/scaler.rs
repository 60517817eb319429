// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render an image at any size from a prebuilt index map.
//!
//! No seams are found here.  For a target width T against an original
//! width C, every row keeps the cells whose rank sorts at or above
//! C - T, which is "not yet removed" when shrinking and "already
//! inserted" when growing.

use crate::error::{Error, Result};
use crate::flipper::transpose_image;
use crate::indexmap::{Direction, IndexMap, Rank, ResizeMap};
use crate::PixelGrid;
use image::{ImageBuffer, Pixel};
use log::{trace, warn};

fn gather<P>(image: &PixelGrid<P>, ranks: &IndexMap, original_dim: u32, scale: f64) -> Result<PixelGrid<P>>
where
    P: Pixel + 'static,
{
    let (map_width, height) = ranks.dimensions();
    let floor = ranks.min_width();
    let wanted = (scale * f64::from(original_dim)).round();
    let target = wanted.max(f64::from(floor)).min(f64::from(map_width)) as u32;
    if f64::from(target) != wanted {
        warn!(
            "target width {} is outside the map's range {}..={}; using {}",
            wanted, floor, map_width, target
        );
    }

    let threshold = i64::from(original_dim) - i64::from(target);
    trace!("scaling {} -> {} (threshold {})", original_dim, target, threshold);

    let mut out = ImageBuffer::new(target, height);
    for (y, row) in ranks.rows().enumerate() {
        let y = y as u32;
        let mut kept = 0;
        for (x, rank) in row.iter().enumerate() {
            if rank.order_key() >= threshold {
                if kept == target {
                    kept += 1;
                    break;
                }
                out.put_pixel(kept, y, *image.get_pixel(x as u32, y));
                kept += 1;
            }
        }
        if kept != target {
            return Err(Error::invariant(
                "index map row width",
                format!("row {} selects {} pixels, expected {}", y, kept, target),
            ));
        }
    }
    Ok(out)
}

// The extent of the source a map was built from: the cells in its
// first line along `direction` that were not synthesised.
fn source_extent(ranks: &IndexMap, direction: Direction) -> u32 {
    let (width, height) = ranks.dimensions();
    if width == 0 || height == 0 {
        return 0;
    }
    let line: Vec<Rank> = match direction {
        Direction::Horizontal => ranks.row(0).to_vec(),
        Direction::Vertical => (0..height).map(|y| ranks[(0, y)]).collect(),
    };
    line.iter().filter(|r| !matches!(r, Rank::Inserted(_))).count() as u32
}

/// Render `image` (the enlarged image a resize map was built with) at
/// `scale` times `original_dim` along `direction`.  The target is
/// rounded, then clamped to the range the map supports.
pub fn scale_to<P>(
    image: &PixelGrid<P>,
    ranks: &IndexMap,
    original_dim: u32,
    scale: f64,
    direction: Direction,
) -> Result<PixelGrid<P>>
where
    P: Pixel + 'static,
{
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::invalid("scale", format!("{} is not positive", scale)));
    }
    if image.dimensions() != ranks.dimensions() {
        return Err(Error::invalid(
            "ranks",
            format!(
                "a {:?} index map does not describe a {:?} image",
                ranks.dimensions(),
                image.dimensions()
            ),
        ));
    }
    let extent = source_extent(ranks, direction);
    if extent != original_dim {
        return Err(Error::invalid(
            "original_dim",
            format!(
                "{} does not match the {:?} map, which was built from {} pixels",
                original_dim, direction, extent
            ),
        ));
    }
    match direction {
        Direction::Horizontal => gather(image, ranks, original_dim, scale),
        Direction::Vertical => {
            let flipped = gather(&transpose_image(image), &ranks.transpose(), original_dim, scale)?;
            Ok(transpose_image(&flipped))
        }
    }
}

/// Render one map at several scales.  With the `threaded` feature each
/// scale gets its own thread; the map is only ever read.
#[cfg(feature = "threaded")]
pub fn scale_many<P>(
    image: &PixelGrid<P>,
    ranks: &IndexMap,
    original_dim: u32,
    scales: &[f64],
    direction: Direction,
) -> Vec<Result<PixelGrid<P>>>
where
    P: Pixel + Send + Sync + 'static,
    P::Subpixel: Send + Sync,
{
    let outcome = crossbeam::scope(|scope| {
        let handles: Vec<_> = scales
            .iter()
            .map(|&scale| scope.spawn(move |_| scale_to(image, ranks, original_dim, scale, direction)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect::<Vec<_>>()
    });
    outcome.unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Render one map at several scales, one after another.
#[cfg(not(feature = "threaded"))]
pub fn scale_many<P>(
    image: &PixelGrid<P>,
    ranks: &IndexMap,
    original_dim: u32,
    scales: &[f64],
    direction: Direction,
) -> Vec<Result<PixelGrid<P>>>
where
    P: Pixel + Send + Sync + 'static,
    P::Subpixel: Send + Sync,
{
    scales
        .iter()
        .map(|&scale| scale_to(image, ranks, original_dim, scale, direction))
        .collect()
}

impl<P: Pixel + 'static> ResizeMap<P> {
    /// Render the source image at `scale` times its original extent.
    pub fn scale(&self, scale: f64) -> Result<PixelGrid<P>> {
        scale_to(&self.image, &self.ranks, self.original_dim, scale, self.direction)
    }

    /// The range of extents this map can render.
    pub fn supported_range(&self) -> (u32, u32) {
        match self.direction {
            Direction::Horizontal => (self.ranks.min_width(), self.ranks.width()),
            Direction::Vertical => {
                let flipped = self.ranks.transpose();
                (flipped.min_width(), flipped.width())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexmap::build_resize_map;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn striped(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 23 % 256) as u8, (y * 31 % 256) as u8, ((x ^ y) * 11 % 256) as u8])
        })
    }

    #[test]
    fn threshold_selects_by_rank() {
        let image = GrayImage::from_raw(5, 1, vec![10, 20, 30, 40, 50]).unwrap();
        let ranks = IndexMap::from_vec(
            5,
            1,
            vec![Rank::Kept, Rank::Inserted(1), Rank::Removed(1), Rank::Kept, Rank::Removed(0)],
        )
        .unwrap();
        // Original width 4: two removable, one inserted.
        let at = |scale| scale_to(&image, &ranks, 4, scale, Direction::Horizontal).unwrap().into_raw();
        assert_eq!(at(0.5), vec![10, 40]);
        assert_eq!(at(0.75), vec![10, 30, 40]);
        assert_eq!(at(1.0), vec![10, 30, 40, 50]);
        assert_eq!(at(1.25), vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn targets_outside_the_map_are_clamped() {
        let image = GrayImage::from_raw(3, 1, vec![1, 2, 3]).unwrap();
        let ranks = IndexMap::from_vec(3, 1, vec![Rank::Kept, Rank::Removed(0), Rank::Inserted(1)]).unwrap();
        let tiny = scale_to(&image, &ranks, 2, 0.01, Direction::Horizontal).unwrap();
        assert_eq!(tiny.into_raw(), vec![1]);
        let huge = scale_to(&image, &ranks, 2, 10.0, Direction::Horizontal).unwrap();
        assert_eq!(huge.into_raw(), vec![1, 2, 3]);
    }

    #[test]
    fn non_positive_scales_are_rejected() {
        let image = GrayImage::from_pixel(2, 2, Luma([0]));
        let ranks = IndexMap::new(2, 2);
        for scale in [0.0, -1.0, f64::INFINITY] {
            let err = scale_to(&image, &ranks, 2, scale, Direction::Horizontal).unwrap_err();
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn mismatched_dimension_or_direction_is_rejected() {
        let image = striped(20, 10);
        let map = build_resize_map(&image, 0.5, Direction::Horizontal).unwrap();
        let wrong_dim = scale_to(&map.image, &map.ranks, 100, 1.0, Direction::Horizontal).unwrap_err();
        assert!(wrong_dim.is_invalid_input());
        let wrong_direction = scale_to(&map.image, &map.ranks, 20, 1.0, Direction::Vertical).unwrap_err();
        assert!(wrong_direction.is_invalid_input());
    }

    #[test]
    fn ragged_maps_are_an_internal_error() {
        let image = GrayImage::from_pixel(3, 2, Luma([0]));
        let ranks = IndexMap::from_vec(
            3,
            2,
            vec![Rank::Kept, Rank::Removed(0), Rank::Kept, Rank::Kept, Rank::Kept, Rank::Kept],
        )
        .unwrap();
        let err = scale_to(&image, &ranks, 3, 0.67, Direction::Horizontal).unwrap_err();
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn unit_scale_returns_the_original_image() {
        let image = striped(12, 7);
        let map = build_resize_map(&image, 0.5, Direction::Horizontal).unwrap();
        assert_eq!(map.scale(1.0).unwrap(), image);
    }

    #[test]
    fn vertical_maps_scale_the_height() {
        let image = striped(6, 10);
        let map = build_resize_map(&image, 0.4, Direction::Vertical).unwrap();
        assert_eq!(map.supported_range(), (6, 14));
        assert_eq!(map.scale(1.0).unwrap(), image);
        assert_eq!(map.scale(0.6).unwrap().dimensions(), (6, 6));
        assert_eq!(map.scale(1.3).unwrap().dimensions(), (6, 13));
    }

    #[test]
    fn scaling_is_monotonic() {
        let image = striped(10, 5);
        let map = build_resize_map(&image, 0.6, Direction::Horizontal).unwrap();
        let mut last = 0;
        for step in 1..=30 {
            let width = map.scale(f64::from(step) * 0.06).unwrap().width();
            assert!(width >= last);
            last = width;
        }
        assert_eq!(last, 16);
    }

    #[test]
    fn scale_many_matches_scale_to() {
        let image = striped(8, 4);
        let map = build_resize_map(&image, 0.5, Direction::Horizontal).unwrap();
        let scales = [0.5, 1.0, 1.5];
        let results = scale_many(&map.image, &map.ranks, map.original_dim, &scales, map.direction);
        for (result, &scale) in results.into_iter().zip(scales.iter()) {
            assert_eq!(result.unwrap(), map.scale(scale).unwrap());
        }
    }
}
