// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Erase a rectangle from an image and close the gap.
//!
//! The pixels under the rectangle are given a strongly negative
//! energy, so that every seam the solver finds runs through them.
//! Seams are cut until nothing of the rectangle is left, and then the
//! image is stretched back to its original width with the same
//! two-pass duplication the index map builder uses.

use crate::config::CarveConfig;
use crate::energy::calculate_energy;
use crate::error::{Error, Result};
use crate::extractor::{extract_seams, restore_coordinates};
use crate::indexmap::enlarge_image;
use crate::seamcarver::remove_seam;
use crate::seamfinder::find_min_seam;
use crate::twodmap::TwoDimensionalMap;
use crate::PixelGrid;
use image::{GenericImageView, ImageBuffer, Pixel};
use log::{debug, trace};

/// A rectangle given by inclusive corner coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: u32,
    pub x2: u32,
    pub y1: u32,
    pub y2: u32,
}

impl Rect {
    pub fn new(x1: u32, x2: u32, y1: u32, y2: u32) -> Self {
        Rect { x1, x2, y1, y2 }
    }

    pub fn check_within(&self, width: u32, height: u32) -> Result<()> {
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(Error::invalid(
                "rect",
                format!("corners of {:?} are out of order", self),
            ));
        }
        if self.x2 >= width || self.y2 >= height {
            return Err(Error::invalid(
                "rect",
                format!("{:?} does not fit a {}x{} image", self, width, height),
            ));
        }
        Ok(())
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }
}

/// Pixels flagged for removal.
pub type Mask = TwoDimensionalMap<bool>;

impl TwoDimensionalMap<bool> {
    /// A `width`x`height` mask with the rectangle's pixels set.
    pub fn from_rect(width: u32, height: u32, rect: Rect) -> Result<Mask> {
        rect.check_within(width, height)?;
        Ok(TwoDimensionalMap::from_fn(width, height, |x, y| rect.contains(x, y)))
    }

    /// How many pixels are still flagged.
    pub fn count_set(&self) -> usize {
        self.as_slice().iter().filter(|&&m| m).count()
    }
}

// Grow `image` by `count` columns, in chunks small enough that each
// batch of seams can be extracted from the current image.
fn grow<P: Pixel + 'static>(mut image: PixelGrid<P>, count: u32) -> Result<PixelGrid<P>> {
    let mut remaining = count;
    while remaining > 0 {
        let (width, height) = image.dimensions();
        let chunk = remaining.min(width.saturating_sub(1));
        if chunk == 0 {
            return Err(Error::invalid(
                "image",
                format!("cannot grow a {}x{} image by duplicating seams", width, height),
            ));
        }
        let batch = extract_seams(&image, chunk)?;
        let batch = restore_coordinates(&batch, width, height)?;
        image = enlarge_image(&image, &batch)?;
        remaining -= chunk;
    }
    Ok(image)
}

/// Remove everything under `rect` and return an image of the original
/// size.
pub fn remove_object<I, P>(image: &I, rect: Rect) -> Result<PixelGrid<P>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    remove_object_with(image, rect, &CarveConfig::default())
}

/// `remove_object` with explicit tunables.
pub fn remove_object_with<I, P>(image: &I, rect: Rect, config: &CarveConfig) -> Result<PixelGrid<P>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    config.validate()?;
    let (width, height) = image.dimensions();
    let mut mask = Mask::from_rect(width, height, rect)?;
    let mut working: PixelGrid<P> = ImageBuffer::from_fn(width, height, |x, y| image.get_pixel(x, y));

    let mut removed = 0;
    while mask.count_set() > 0 {
        if working.width() <= 2 {
            return Err(Error::invalid(
                "rect",
                format!("{:?} leaves too little of a {}-wide image to refill", rect, width),
            ));
        }
        let mut energy = calculate_energy(&working)?;
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask[(x, y)] {
                    energy[(x, y)] = config.object_energy;
                }
            }
        }
        let seam = find_min_seam(&working, &energy)?;
        trace!("object seam {}: {:?}", removed, seam.columns());
        working = remove_seam(&working, &seam)?;
        mask = remove_seam(&mask, &seam)?;
        removed += 1;
    }

    let first = config.first_pass(removed);
    debug!(
        "removed {:?} with {} seams; refilling {} + {}",
        rect,
        removed,
        first,
        removed - first
    );
    let working = grow(working, first)?;
    grow(working, removed - first)
}
