// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The energy of a pixel is the sum of the absolute horizontal and
//! vertical first derivatives of the image's luminance at that pixel,
//! each taken as a central difference.  At the borders the missing
//! neighbour is replaced by the pixel itself.  Energies are in the
//! units of the image's subpixel type; for 8-bit images a single
//! pixel scores between 0 and 510.

use crate::error::{Error, Result};
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, GrayImage, Luma, Pixel};
use itertools::iproduct;
use num_traits::NumCast;

/// The per-pixel importance of an image.  Signed, because object
/// removal pushes masked cells below zero.
pub type EnergyGrid = TwoDimensionalMap<i64>;

#[inline]
fn luma<P: Pixel>(p: &P) -> i64 {
    NumCast::from(p.to_luma().0[0]).unwrap_or(0)
}

/// Compute the energy of every pixel in an image.
pub fn calculate_energy<I, P>(image: &I) -> Result<EnergyGrid>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::invalid(
            "image",
            format!("cannot compute the energy of a {}x{} image", width, height),
        ));
    }
    let (mw, mh) = (width - 1, height - 1);

    // Convert once; every luma value gets read four times below.
    let lumas = TwoDimensionalMap::from_vec(
        width,
        height,
        iproduct!(0..height, 0..width)
            .map(|(y, x)| luma(&image.get_pixel(x, y)))
            .collect(),
    )?;

    TwoDimensionalMap::from_vec(
        width,
        height,
        iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                let current = lumas[(x, y)];
                let (left, right, up, down) = (
                    cq!(x == 0, current, lumas[(x - 1, y)]),
                    cq!(x >= mw, current, lumas[(x + 1, y)]),
                    cq!(y == 0, current, lumas[(x, y - 1)]),
                    cq!(y >= mh, current, lumas[(x, y + 1)]),
                );
                (right - left).abs() + (down - up).abs()
            })
            .collect(),
    )
}

/// Render an energy map as a grayscale image, the brightest pixel
/// being the most energetic.  Negative energies render black.
pub fn energy_to_image(energy: &EnergyGrid) -> GrayImage {
    let factor = energy.as_slice().iter().copied().max().unwrap_or(0).max(1);
    GrayImage::from_fn(energy.width, energy.height, |x, y| {
        let e = energy[(x, y)].max(0);
        Luma([(e * 255 / factor) as u8])
    })
}
