// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Precompute where every seam goes, once, so that rescaling later is
//! a lookup instead of a carve.
//!
//! Each cell of the index map carries a `Rank`.  Pixels that the greedy
//! extraction removed get `Removed(k)`, k being the order they went in.
//! Synthetic pixels added while enlarging get `Inserted(k)`, k being
//! the order they were added in.  Everything else is `Kept`.  The
//! ranks sort on a single axis,
//!
//! ```text
//!   Inserted(n) < ... < Inserted(1) < Removed(0) < Removed(1) < ... < Kept
//! ```
//!
//! so that rendering at any width T is a matter of keeping, in each
//! row, the cells that sort at or above `original width - T`.
//!
//! Enlarging happens in two passes to keep the same seam from being
//! duplicated side by side over and over: first the cheapest seams the
//! shrink pass already found are doubled, then a fresh batch is found
//! on the enlarged image and doubled in turn.

use crate::config::CarveConfig;
use crate::error::{Error, Result};
use crate::extractor::{carve_seams, extract_seams, restore_coordinates};
use crate::flipper::transpose_image;
use crate::seam::Seam;
use crate::seamcarver::insert_seam;
use crate::twodmap::TwoDimensionalMap;
use crate::PixelGrid;
use image::{GenericImageView, ImageBuffer, Pixel};
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// When a cell of the index map appears or disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rank {
    /// The k-th synthetic column, counting from 1.
    Inserted(u32),
    /// Removed by the k-th seam, counting from 0.
    Removed(u32),
    /// Never removed by the precomputed batch.
    #[default]
    Kept,
}

impl Rank {
    /// Position on the shared ordering axis: inserted columns are
    /// negative, removed ones their removal order, kept ones infinite.
    pub fn order_key(self) -> i64 {
        match self {
            Rank::Inserted(k) => -i64::from(k),
            Rank::Removed(k) => i64::from(k),
            Rank::Kept => i64::MAX,
        }
    }
}

impl Ord for Rank {
    // `Inserted(0)` shares key 0 with `Removed(0)`; it sorts first so
    // that only equal ranks compare equal.
    fn cmp(&self, other: &Self) -> Ordering {
        let removed = |rank: &Rank| matches!(rank, Rank::Removed(_));
        self.order_key()
            .cmp(&other.order_key())
            .then_with(|| removed(self).cmp(&removed(other)))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub type IndexMap = TwoDimensionalMap<Rank>;

impl TwoDimensionalMap<Rank> {
    /// The distinct removal ranks present in the map.
    pub fn removal_ranks(&self) -> BTreeSet<u32> {
        self.as_slice()
            .iter()
            .filter_map(|r| match r {
                Rank::Removed(k) => Some(*k),
                _ => None,
            })
            .collect()
    }

    /// The distinct insertion ranks present in the map.
    pub fn insertion_ranks(&self) -> BTreeSet<u32> {
        self.as_slice()
            .iter()
            .filter_map(|r| match r {
                Rank::Inserted(k) => Some(*k),
                _ => None,
            })
            .collect()
    }

    /// Width of the narrowest rendering the map supports: the number
    /// of cells per row that are never removed.
    pub fn min_width(&self) -> u32 {
        if self.height == 0 {
            return 0;
        }
        self.row(0).iter().filter(|r| **r == Rank::Kept).count() as u32
    }
}

/// Which way a map resizes: `Horizontal` changes the width by removing
/// and adding vertical seams; `Vertical` changes the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// The extent of an image along this direction.
    pub fn extent(self, (width, height): (u32, u32)) -> u32 {
        match self {
            Direction::Horizontal => width,
            Direction::Vertical => height,
        }
    }
}

/// A built index map together with the enlarged image it indexes.
#[derive(Clone)]
pub struct ResizeMap<P: Pixel> {
    pub direction: Direction,
    /// The source image's extent along `direction`.
    pub original_dim: u32,
    /// The source image enlarged by every inserted seam.
    pub image: PixelGrid<P>,
    /// One rank per pixel of `image`.
    pub ranks: IndexMap,
}

impl<P: Pixel> fmt::Debug for ResizeMap<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeMap")
            .field("direction", &self.direction)
            .field("original_dim", &self.original_dim)
            .field("image", &self.image.dimensions())
            .field("ranks", &self.ranks.dimensions())
            .finish()
    }
}

/// Rank every pixel of a `width`x`height` image by the seam that
/// removes it.  `batch` is a seam batch straight from extraction.
pub fn shrink_map(batch: &[Seam], width: u32, height: u32) -> Result<IndexMap> {
    let restored = restore_coordinates(batch, width, height)?;
    let mut ranks = IndexMap::new(width, height);
    for (k, seam) in restored.iter().enumerate() {
        for (y, &x) in seam.columns().iter().enumerate() {
            let cell = &mut ranks[(x, y as u32)];
            if *cell != Rank::Kept {
                return Err(Error::invariant(
                    "index map ranks",
                    format!("seam {} and {:?} both claim ({}, {})", k, cell, x, y),
                ));
            }
            *cell = Rank::Removed(k as u32);
        }
    }
    Ok(ranks)
}

// Where each seam of a restored batch lands once every seam before it
// has been inserted: a later seam moves right by one for every earlier
// insertion at or left of it.
fn insertion_positions(batch: &[Seam]) -> Vec<Seam> {
    batch
        .iter()
        .enumerate()
        .map(|(i, seam)| {
            seam.columns()
                .iter()
                .enumerate()
                .map(|(y, &x)| {
                    let shift = batch[..i]
                        .iter()
                        .filter(|earlier| earlier.columns()[y] <= x)
                        .count() as u32;
                    x + shift
                })
                .collect::<Vec<u32>>()
                .into()
        })
        .collect()
}

/// Duplicate every seam of `batch` (in the image's own coordinates)
/// into the image alone.
pub fn enlarge_image<P>(image: &PixelGrid<P>, batch: &[Seam]) -> Result<PixelGrid<P>>
where
    P: Pixel + 'static,
{
    insertion_positions(batch)
        .iter()
        .try_fold(image.clone(), |grown, seam| insert_seam(&grown, seam))
}

/// Duplicate every seam of `batch` (in the image's own coordinates)
/// into both the image and its index map.  The k-th duplicate gets
/// `Rank::Inserted(start + k)`.
pub fn enlarge_map<P>(
    image: &PixelGrid<P>,
    ranks: &IndexMap,
    batch: &[Seam],
    start: u32,
) -> Result<(PixelGrid<P>, IndexMap)>
where
    P: Pixel + 'static,
{
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
    if start == 0 {
        return Err(Error::invalid("start", "insertion ranks count from 1"));
    }

    let mut image = image.clone();
    let mut ranks = ranks.clone();
    for (k, seam) in insertion_positions(batch).iter().enumerate() {
        image = insert_seam(&image, seam)?;
        ranks = ranks.with_seam_inserted(seam, Rank::Inserted(start + k as u32));
    }
    Ok((image, ranks))
}

/// Confirm every row holds each removal rank below `removed` and each
/// insertion rank from 1 to `inserted` exactly once.
pub fn verify_ranks(ranks: &IndexMap, removed: u32, inserted: u32) -> Result<()> {
    let expected_kept = (ranks.width as usize)
        .checked_sub(removed as usize + inserted as usize)
        .ok_or_else(|| {
            Error::invariant(
                "index map ranks",
                format!(
                    "{} ranks cannot fit in rows {} wide",
                    removed + inserted,
                    ranks.width
                ),
            )
        })?;
    for (y, row) in ranks.rows().enumerate() {
        let mut seen_removed = vec![false; removed as usize];
        let mut seen_inserted = vec![false; inserted as usize + 1];
        let mut kept = 0;
        for rank in row {
            let slot = match *rank {
                Rank::Removed(k) if k < removed => &mut seen_removed[k as usize],
                Rank::Inserted(k) if k >= 1 && k <= inserted => &mut seen_inserted[k as usize],
                Rank::Kept => {
                    kept += 1;
                    continue;
                }
                other => {
                    return Err(Error::invariant(
                        "index map ranks",
                        format!("row {} holds out-of-range {:?}", y, other),
                    ))
                }
            };
            if *slot {
                return Err(Error::invariant(
                    "index map ranks",
                    format!("row {} holds {:?} twice", y, rank),
                ));
            }
            *slot = true;
        }
        if kept != expected_kept {
            return Err(Error::invariant(
                "index map ranks",
                format!("row {} keeps {} pixels, expected {}", y, kept, expected_kept),
            ));
        }
    }
    Ok(())
}

fn check_build_scale(scale: f64) -> Result<()> {
    if !(scale.is_finite() && scale > 0.0 && scale < 1.0) {
        return Err(Error::invalid(
            "scale",
            format!("{} is outside (0, 1)", scale),
        ));
    }
    Ok(())
}

// The horizontal builder; vertical maps come through here transposed.
fn build_horizontal<P>(
    image: &PixelGrid<P>,
    count: u32,
    config: &CarveConfig,
) -> Result<(PixelGrid<P>, IndexMap)>
where
    P: Pixel + 'static,
{
    let (width, height) = image.dimensions();
    let (batch, _) = carve_seams(image, count)?;
    let ranks = shrink_map(&batch, width, height)?;

    let first = config.first_pass(count);
    let second = count - first;
    debug!(
        "enlarging {}x{} by {} reused and {} fresh seams",
        width, height, first, second
    );

    // The cheapest `first` removal seams, in source coordinates.
    let reused = restore_coordinates(&batch[..first as usize], width, height)?;
    let (image, ranks) = enlarge_map(image, &ranks, &reused, 1)?;

    let (grown_width, _) = image.dimensions();
    let fresh = extract_seams(&image, second)?;
    let fresh = restore_coordinates(&fresh, grown_width, height)?;
    let (image, ranks) = enlarge_map(&image, &ranks, &fresh, first + 1)?;

    verify_ranks(&ranks, count, count)?;
    Ok((image, ranks))
}

/// Build a resize map for `image` that can render it anywhere from
/// `(1 - scale)` to `(1 + scale)` times its size along `direction`.
pub fn build_resize_map<I, P>(image: &I, scale: f64, direction: Direction) -> Result<ResizeMap<P>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    build_resize_map_with(image, scale, direction, &CarveConfig::default())
}

/// `build_resize_map` with explicit tunables.
pub fn build_resize_map_with<I, P>(
    image: &I,
    scale: f64,
    direction: Direction,
    config: &CarveConfig,
) -> Result<ResizeMap<P>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    config.validate()?;
    check_build_scale(scale)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::invalid(
            "image",
            format!("cannot build a resize map for a {}x{} image", width, height),
        ));
    }

    let original_dim = direction.extent((width, height));
    let count = (scale * f64::from(original_dim)).floor() as u32;
    debug!(
        "building {:?} resize map for {}x{}: {} seams",
        direction, width, height, count
    );

    let (image, ranks) = match direction {
        Direction::Horizontal => {
            let source = ImageBuffer::from_fn(width, height, |x, y| image.get_pixel(x, y));
            build_horizontal(&source, count, config)?
        }
        Direction::Vertical => {
            let (image, ranks) = build_horizontal(&transpose_image(image), count, config)?;
            (transpose_image(&image), ranks.transpose())
        }
    };

    Ok(ResizeMap {
        direction,
        original_dim,
        image,
        ranks,
    })
}
