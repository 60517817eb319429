// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The basic two-dimensional field.
//!
//! An addressable H×W grid holding one of the several kinds of value
//! the carver deals in: an `i64` energy, a `bool` mask bit, a `Rank`
//! for the index map, or an energy + parent address for the seam
//! digraph.  Images themselves stay in `image::ImageBuffer`; everything
//! derived from them lives here.

use crate::error::{Error, Result};
use crate::seam::Seam;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    pub(crate) width: u32,
    pub(crate) height: u32,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new map with every cell set to the content type's
    /// default.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: u32, height: u32, data: Vec<P>) -> Result<Self> {
        if data.len() != width as usize * height as usize {
            return Err(Error::invalid(
                "data",
                format!(
                    "{} cells cannot fill a {}x{} map",
                    data.len(),
                    width,
                    height
                ),
            ));
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// Build a map by asking `f` for the value at every `(x, y)`.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        TwoDimensionalMap {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.  This
    // particular variant is the same one used in image.rs.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// One row of the map, left to right.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Every row of the map, top to bottom.  An empty-width map yields
    /// nothing.
    pub fn rows(&self) -> impl Iterator<Item = &[P]> + '_ {
        self.data.chunks(self.width.max(1) as usize)
    }

    /// All cells in row-major order.
    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// Swap the axes: the cell at `(x, y)` moves to `(y, x)`.
    pub fn transpose(&self) -> Self {
        TwoDimensionalMap::from_fn(self.height, self.width, |x, y| self[(y, x)])
    }

    // Callers validate the seam against this map first; see
    // `seamcarver::remove_seam`.
    pub(crate) fn without_seam(&self, seam: &Seam) -> Self {
        let mut data = Vec::with_capacity(self.data.len() - self.height as usize);
        for (row, &col) in self.rows().zip(seam.columns()) {
            let col = col as usize;
            data.extend_from_slice(&row[..col]);
            data.extend_from_slice(&row[col + 1..]);
        }
        TwoDimensionalMap {
            width: self.width - 1,
            height: self.height,
            data,
        }
    }

    // Place `value` at the seam's column in every row, pushing the
    // rest of the row one to the right.  The seam may address one past
    // the last column, which appends.
    pub(crate) fn with_seam_inserted(&self, seam: &Seam, value: P) -> Self {
        let mut data = Vec::with_capacity(self.data.len() + self.height as usize);
        for (row, &col) in self.rows().zip(seam.columns()) {
            let col = col as usize;
            data.extend_from_slice(&row[..col]);
            data.push(value);
            data.extend_from_slice(&row[col..]);
        }
        TwoDimensionalMap {
            width: self.width + 1,
            height: self.height,
            data,
        }
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

/// One cell of the cumulative-cost table: the cheapest energy of any
/// seam ending here, and the column in the row above it came from.
#[derive(Default, Debug, Copy, Clone)]
pub(crate) struct EnergyAndBackPointer<P: Default + Copy> {
    pub energy: P,
    pub parent: u32,
}
