// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image dimensional flipper
//!
//! A proxy for the ImageRS `GenericImageView` trait that maps the
//! width to the original height, and vice versa, as well as every x
//! to y and vice versa.
//!
//! Everything in the carver is written in terms of vertical seams and
//! changing widths.  Looking at an image through a `Transposed` turns
//! every horizontal seam into a vertical one, so height changes come
//! for free by flipping on the way in and flipping back on the way
//! out.

use image::{GenericImageView, ImageBuffer, Pixel};

pub struct Transposed<'a, I: GenericImageView> {
    pub image: &'a I,
}

impl<'a, I: GenericImageView> Transposed<'a, I> {
    pub fn new(image: &'a I) -> Self {
        Transposed { image }
    }
}

impl<'a, I: GenericImageView> GenericImageView for Transposed<'a, I> {
    type Pixel = I::Pixel;

    fn dimensions(&self) -> (u32, u32) {
        let (x, y) = self.image.dimensions();
        (y, x)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        self.image.get_pixel(y, x)
    }
}

/// Materialize the transpose of an image into a fresh buffer.
pub fn transpose_image<I, P>(image: &I) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
{
    let flipped = Transposed::new(image);
    let (width, height) = flipped.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| flipped.get_pixel(x, y))
}
