// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seams: one column index per row, top to bottom.

use crate::error::{Error, Result};
use image::{GenericImageView, ImageBuffer, Pixel};

/// A near-vertical path of pixels, one column per row.  Seams coming
/// out of the solver are connected (adjacent rows differ by at most
/// one column); seams whose coordinates have been restored into a
/// larger grid generally are not, and the transforms don't require it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam(Vec<u32>);

/// An ordered run of seams.  Each seam is expressed in the coordinates
/// of the grid as it stood when that seam was extracted, i.e. after
/// every earlier seam in the batch had been removed.
pub type SeamBatch = Vec<Seam>;

impl Seam {
    pub fn columns(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the seam can address a grid of the given size: one entry
    /// per row, every column below `width`.
    pub fn check_within(&self, width: u32, height: u32) -> Result<()> {
        if self.0.len() != height as usize {
            return Err(Error::invalid(
                "seam",
                format!("{} entries for a grid {} rows high", self.0.len(), height),
            ));
        }
        match self.0.iter().enumerate().find(|(_, &x)| x >= width) {
            Some((y, x)) => Err(Error::invalid(
                "seam",
                format!("row {} addresses column {} of a {}-wide grid", y, x, width),
            )),
            None => Ok(()),
        }
    }

    /// Check that each row's column is within one of the row above.
    pub fn check_connected(&self) -> Result<()> {
        match self
            .0
            .windows(2)
            .position(|pair| (i64::from(pair[0]) - i64::from(pair[1])).abs() > 1)
        {
            Some(y) => Err(Error::invariant(
                "seam connectivity",
                format!(
                    "rows {} and {} jump from column {} to {}",
                    y,
                    y + 1,
                    self.0[y],
                    self.0[y + 1]
                ),
            )),
            None => Ok(()),
        }
    }
}

impl From<Vec<u32>> for Seam {
    fn from(columns: Vec<u32>) -> Self {
        Seam(columns)
    }
}

/// Paint a seam onto a copy of an image.  Handy for seeing where the
/// carver is about to cut.
pub fn draw_seam<I, P>(image: &I, seam: &Seam, paint: P) -> Result<ImageBuffer<P, Vec<P::Subpixel>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    let (width, height) = image.dimensions();
    seam.check_within(width, height)?;
    let mut out = ImageBuffer::from_fn(width, height, |x, y| image.get_pixel(x, y));
    for (y, &x) in seam.columns().iter().enumerate() {
        out.put_pixel(x, y as u32, paint);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn range_check_names_the_row() {
        let seam = Seam::from(vec![0, 1, 4]);
        assert!(seam.check_within(5, 3).is_ok());
        let err = seam.check_within(4, 3).unwrap_err();
        assert_eq!(
            err,
            Error::invalid("seam", "row 2 addresses column 4 of a 4-wide grid")
        );
        assert!(seam.check_within(5, 4).is_err());
    }

    #[test]
    fn connectivity_allows_single_steps_only() {
        assert!(Seam::from(vec![2, 1, 1, 2]).check_connected().is_ok());
        let err = Seam::from(vec![2, 1, 3]).check_connected().unwrap_err();
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn drawing_marks_only_the_seam() {
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 10, 10]));
        let seam = Seam::from(vec![1, 2]);
        let drawn = draw_seam(&image, &seam, Rgb([0, 0, 0])).unwrap();
        assert_eq!(drawn.get_pixel(1, 0), &Rgb([0, 0, 0]));
        assert_eq!(drawn.get_pixel(2, 1), &Rgb([0, 0, 0]));
        assert_eq!(drawn.get_pixel(0, 0), &Rgb([10, 10, 10]));
        assert_eq!(drawn.get_pixel(1, 1), &Rgb([10, 10, 10]));
    }

    #[test]
    fn drawing_rejects_a_seam_for_another_image() {
        let image = ImageBuffer::from_pixel(2, 2, Luma([0u8]));
        assert!(draw_seam(&image, &Seam::from(vec![0]), Luma([255])).is_err());
    }
}
