// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cut a seam out of a grid, or stitch a new one in.
//!
//! Removal works on anything laid out in rows (images, masks, index
//! maps) through the `SeamGrid` trait.  Insertion synthesizes new
//! pixel values, so it is only defined for images.  Both produce a
//! fresh grid and leave their input alone.

use crate::error::{Error, Result};
use crate::seam::Seam;
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, ImageBuffer, Pixel};
use num_traits::{NumCast, ToPrimitive};

/// A rectangular grid that can lose a column along a seam.
pub trait SeamGrid: Sized {
    fn grid_dimensions(&self) -> (u32, u32);

    /// Remove one cell per row at the seam's column.  The seam has
    /// already been checked against the grid's dimensions.
    fn without_checked_seam(&self, seam: &Seam) -> Self;
}

impl<P: Pixel + 'static> SeamGrid for ImageBuffer<P, Vec<P::Subpixel>> {
    fn grid_dimensions(&self) -> (u32, u32) {
        self.dimensions()
    }

    // The pixels left of the seam keep their address; the pixels right
    // of it slide over by one.
    fn without_checked_seam(&self, seam: &Seam) -> Self {
        let (width, height) = self.dimensions();
        let mut imgbuf = ImageBuffer::new(width - 1, height);
        for (y, &cut) in seam.columns().iter().enumerate() {
            let y = y as u32;
            for x in 0..width {
                if x != cut {
                    imgbuf.put_pixel(if x < cut { x } else { x - 1 }, y, *self.get_pixel(x, y));
                }
            }
        }
        imgbuf
    }
}

impl<T: Default + Copy> SeamGrid for TwoDimensionalMap<T> {
    fn grid_dimensions(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn without_checked_seam(&self, seam: &Seam) -> Self {
        self.without_seam(seam)
    }
}

fn check_grid(seam: &Seam, (width, height): (u32, u32)) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid(
            "grid",
            format!("cannot carve a {}x{} grid", width, height),
        ));
    }
    seam.check_within(width, height)
}

/// Remove a seam from an image, mask, or map.  The result is exactly
/// one column narrower.
pub fn remove_seam<G: SeamGrid>(grid: &G, seam: &Seam) -> Result<G> {
    check_grid(seam, grid.grid_dimensions())?;
    Ok(grid.without_checked_seam(seam))
}

// The mean of two pixels, channel by channel, truncated back into the
// subpixel type.
fn average<P: Pixel>(left: &P, right: &P) -> P {
    left.map2(right, |l, r| {
        let mean = (l.to_f64().unwrap_or(0.0) + r.to_f64().unwrap_or(0.0)) / 2.0;
        NumCast::from(mean).unwrap_or(l)
    })
}

/// Insert a new column at the seam's position in every row.  The new
/// pixel is the mean of its left and right neighbours (the pixel that
/// used to sit at the seam's column moves one to the right); at column
/// zero the missing left neighbour is the pixel itself.
pub fn insert_seam<I, P>(image: &I, seam: &Seam) -> Result<ImageBuffer<P, Vec<P::Subpixel>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    let (width, height) = image.dimensions();
    check_grid(seam, (width, height))?;

    let mut imgbuf = ImageBuffer::new(width + 1, height);
    for (y, &at) in seam.columns().iter().enumerate() {
        let y = y as u32;
        for x in 0..width {
            imgbuf.put_pixel(if x < at { x } else { x + 1 }, y, image.get_pixel(x, y));
        }
        let left = image.get_pixel(if at == 0 { 0 } else { at - 1 }, y);
        let right = image.get_pixel(at, y);
        imgbuf.put_pixel(at, y, average(&left, &right));
    }
    Ok(imgbuf)
}
