// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest seam through an energy map.
//!
//! The classic Avidan & Shamir (2007) dynamic program: the cost of
//! reaching a cell is its own energy plus the cheapest of the three
//! cells above it.  At the left and right borders the out-of-range
//! neighbour is replaced by the border cell itself, which can never
//! beat the border cell, so replicating and excluding the missing
//! neighbour pick the same parent.  Ties go to the leftmost
//! candidate, both when choosing a parent and when choosing where the
//! seam ends.

use crate::energy::{calculate_energy, EnergyGrid};
use crate::error::{Error, Result};
use crate::seam::Seam;
use crate::twodmap::{EnergyAndBackPointer, TwoDimensionalMap};
use image::GenericImageView;

/// Given an energy map, return the column of each row's pixel in the
/// cheapest top-to-bottom seam.
pub fn energy_to_vertical_seam(energy: &EnergyGrid) -> Result<Seam> {
    let (width, height) = energy.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::invalid(
            "energy",
            format!("no seam runs through a {}x{} grid", width, height),
        ));
    }
    let mut target: TwoDimensionalMap<EnergyAndBackPointer<i64>> =
        TwoDimensionalMap::new(width, height);

    // Populate the first row with their native energies.
    for x in 0..width {
        target[(x, 0)].energy = energy[(x, 0)];
    }

    let maxwidth = width - 1;
    // For every subsequent row, populate the target cell with the sum
    // of the *lowest adjacent upper energy* and the *x coordinate of
    // that energy*.  `min_by_key` keeps the first of equal minima.
    for y in 1..height {
        for x in 0..width {
            let range = cq!(x == 0, 0, x - 1)..=cq!(x == maxwidth, maxwidth, x + 1);
            let parent_x = range
                .min_by_key(|px| target[(*px, y - 1)].energy)
                .unwrap_or(x);
            target[(x, y)] = EnergyAndBackPointer {
                energy: energy[(x, y)] + target[(parent_x, y - 1)].energy,
                parent: parent_x,
            };
        }
    }

    // Find the x coordinate of the bottommost seam with the least energy.
    let mut seam_col = (0..width)
        .min_by_key(|x| target[(*x, height - 1)].energy)
        .unwrap_or(0);

    // Working backwards, generate a vec of x coordinates that map to
    // the seam, reverse and return.
    let columns: Vec<u32> = (0..height)
        .rev()
        .fold(Vec::<u32>::with_capacity(height as usize), |mut acc, y| {
            acc.push(seam_col);
            seam_col = target[(seam_col, y)].parent;
            acc
        })
        .into_iter()
        .rev()
        .collect();

    let seam = Seam::from(columns);
    seam.check_connected()?;
    Ok(seam)
}

/// Given an energy map, return the row of each column's pixel in the
/// cheapest left-to-right seam.
pub fn energy_to_horizontal_seam(energy: &EnergyGrid) -> Result<Seam> {
    energy_to_vertical_seam(&energy.transpose())
}

/// The minimum vertical seam of an image, given an energy map already
/// computed (and perhaps doctored) for it.
pub fn find_min_seam<I>(image: &I, energy: &EnergyGrid) -> Result<Seam>
where
    I: GenericImageView,
{
    if image.dimensions() != energy.dimensions() {
        let (iw, ih) = image.dimensions();
        return Err(Error::invalid(
            "energy",
            format!(
                "a {}x{} energy map does not describe a {}x{} image",
                energy.width, energy.height, iw, ih
            ),
        ));
    }
    energy_to_vertical_seam(energy)
}

/// This trait defines how we will return seams from an image.  It's a
/// primitive interface, just enough to make room for more than one
/// energy function.
pub trait SeamFinder {
    /// Request a top-to-bottom seam, one column per row.
    fn find_vertical_seam(&self) -> Result<Seam>;

    /// Request a left-to-right seam, one row per column.
    fn find_horizontal_seam(&self) -> Result<Seam>;
}

/// The basic seam engine: holds an image reference and solves over its
/// gradient energy.
pub struct GradientSeams<'a, I: GenericImageView> {
    image: &'a I,
}

impl<'a, I: GenericImageView> GradientSeams<'a, I> {
    /// Takes a reference to an image, and holds onto it.
    pub fn new(image: &'a I) -> Self {
        GradientSeams { image }
    }
}

impl<'a, I> SeamFinder for GradientSeams<'a, I>
where
    I: GenericImageView,
    I::Pixel: 'static,
{
    fn find_vertical_seam(&self) -> Result<Seam> {
        energy_to_vertical_seam(&calculate_energy(self.image)?)
    }

    fn find_horizontal_seam(&self) -> Result<Seam> {
        energy_to_horizontal_seam(&calculate_energy(self.image)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma};

    const ENERGY_DATA: [i64; 20] = [9, 9, 0, 9, 9, 9, 1, 9, 8, 9, 9, 9, 9, 9, 0, 9, 9, 9, 0, 9];

    fn energies() -> EnergyGrid {
        TwoDimensionalMap::from_vec(5, 4, ENERGY_DATA.to_vec()).unwrap()
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        let seam = energy_to_vertical_seam(&energies()).unwrap();
        assert_eq!(seam.columns(), &[2, 3, 4, 3]);
    }

    #[test]
    fn energy_grid_to_horizontal_seam() {
        let seam = energy_to_horizontal_seam(&energies()).unwrap();
        assert_eq!(seam.columns(), &[0, 1, 0, 1, 2]);
    }

    #[test]
    fn ties_go_to_the_leftmost_column() {
        let flat = TwoDimensionalMap::from_vec(3, 3, vec![4i64; 9]).unwrap();
        assert_eq!(energy_to_vertical_seam(&flat).unwrap().columns(), &[0, 0, 0]);
    }

    #[test]
    fn negative_energies_attract_the_seam() {
        let mut grid = TwoDimensionalMap::from_vec(4, 3, vec![1i64; 12]).unwrap();
        grid[(3, 0)] = -100;
        grid[(2, 1)] = -100;
        grid[(1, 2)] = -100;
        assert_eq!(energy_to_vertical_seam(&grid).unwrap().columns(), &[3, 2, 1]);
    }

    #[test]
    fn bright_column_between_dim_ones_is_the_cheapest() {
        let image = GrayImage::from_fn(4, 4, |x, _| Luma([[0, 1, 200, 1][x as usize]]));
        let energy = calculate_energy(&image).unwrap();
        let seam = find_min_seam(&image, &energy).unwrap();
        assert_eq!(seam.columns(), &[2, 2, 2, 2]);
    }

    #[test]
    fn mismatched_energy_is_rejected() {
        let image: ImageBuffer<Luma<u8>, _> = ImageBuffer::new(3, 4);
        assert!(find_min_seam(&image, &energies()).unwrap_err().is_invalid_input());
    }

    #[test]
    fn empty_grids_have_no_seam() {
        let empty: EnergyGrid = TwoDimensionalMap::new(0, 0);
        assert!(energy_to_vertical_seam(&empty).is_err());
    }

    #[test]
    fn finder_returns_seams_in_both_directions() {
        let image = GrayImage::from_fn(6, 5, |x, y| Luma([((x * 37 + y * 11) % 256) as u8]));
        let finder = GradientSeams::new(&image);
        let vertical = finder.find_vertical_seam().unwrap();
        let horizontal = finder.find_horizontal_seam().unwrap();
        assert_eq!(vertical.len(), 5);
        assert_eq!(horizontal.len(), 6);
        assert!(vertical.check_within(6, 5).is_ok());
        assert!(horizontal.check_within(5, 6).is_ok());
    }

    #[test]
    fn horizontal_seams_match_the_transposed_image() {
        let image = GrayImage::from_fn(7, 4, |x, y| Luma([((x * x * 5 + y * 29) % 256) as u8]));
        let flipped = crate::flipper::transpose_image(&image);
        let horizontal = GradientSeams::new(&image).find_horizontal_seam().unwrap();
        let vertical = GradientSeams::new(&flipped).find_vertical_seam().unwrap();
        assert_eq!(horizontal, vertical);
    }
}
