// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pull a batch of seams out of an image, one at a time.
//!
//! Finding the N cheapest seams jointly is intractable, so we do the
//! usual greedy thing: find the cheapest seam, cut it out, recompute
//! the energy of what's left, repeat.  Each seam in the batch is
//! therefore in the coordinates of the narrower image it was found
//! in, and `restore_coordinates` is needed to put a batch back on the
//! image it came from.

use crate::energy::calculate_energy;
use crate::error::{Error, Result};
use crate::seam::{Seam, SeamBatch};
use crate::seamcarver::remove_seam;
use crate::seamfinder::find_min_seam;
use image::{GenericImageView, ImageBuffer, Pixel};
use log::{debug, trace};

/// Extract `count` seams, returning the batch and the image left
/// after all of them have been cut out.
pub fn carve_seams<I, P>(image: &I, count: u32) -> Result<(SeamBatch, ImageBuffer<P, Vec<P::Subpixel>>)>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::invalid(
            "image",
            format!("cannot extract seams from a {}x{} image", width, height),
        ));
    }
    if count >= width {
        return Err(Error::invalid(
            "count",
            format!("{} seams requested from an image {} wide", count, width),
        ));
    }

    debug!("extracting {} seams from a {}x{} image", count, width, height);
    let mut working = ImageBuffer::from_fn(width, height, |x, y| image.get_pixel(x, y));
    let mut batch = SeamBatch::with_capacity(count as usize);
    for step in 0..count {
        let energy = calculate_energy(&working)?;
        let seam = find_min_seam(&working, &energy)?;
        trace!("seam {}: {:?}", step, seam.columns());
        working = remove_seam(&working, &seam)?;
        batch.push(seam);
    }
    Ok((batch, working))
}

/// Extract `count` seams, each in the coordinates of the image as it
/// stood when that seam was found.
pub fn extract_seams<I, P>(image: &I, count: u32) -> Result<SeamBatch>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    carve_seams(image, count).map(|(batch, _)| batch)
}

/// Translate a batch from extraction-time coordinates back into the
/// coordinates of the `width`-wide grid it was extracted from.
///
/// Seams are walked in extraction order.  Every row keeps the list of
/// source columns still present; a seam's column indexes into that
/// list, and the addressed source column is then struck from it, which
/// bumps every later seam at or past it one column to the right.  The
/// result is a new batch; the input is untouched.
pub fn restore_coordinates(batch: &[Seam], width: u32, height: u32) -> Result<SeamBatch> {
    let mut remaining: Vec<Vec<u32>> = (0..height).map(|_| (0..width).collect()).collect();
    batch
        .iter()
        .enumerate()
        .map(|(step, seam)| {
            if seam.len() != height as usize {
                return Err(Error::invalid(
                    "batch",
                    format!("seam {} has {} rows, expected {}", step, seam.len(), height),
                ));
            }
            seam.columns()
                .iter()
                .zip(remaining.iter_mut())
                .enumerate()
                .map(|(y, (&col, row))| {
                    if (col as usize) < row.len() {
                        Ok(row.remove(col as usize))
                    } else {
                        Err(Error::invariant(
                            "seam batch coordinates",
                            format!(
                                "seam {} row {} addresses column {} of {} left",
                                step,
                                y,
                                col,
                                row.len()
                            ),
                        ))
                    }
                })
                .collect::<Result<Vec<u32>>>()
                .map(Seam::from)
        })
        .collect()
}
