// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tunables for the carver.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarveConfig {
    /// Share of an enlargement produced by the first duplication pass;
    /// the rest comes from seams found afresh on the enlarged image.
    pub enlarge_split: f64,
    /// Energy forced onto pixels marked for removal.
    pub object_energy: i64,
    /// Share of the image a session precomputes seams for when the
    /// caller doesn't say.
    pub build_scale: f64,
}

impl Default for CarveConfig {
    fn default() -> Self {
        CarveConfig {
            enlarge_split: 0.6,
            object_energy: -1000,
            build_scale: 0.8,
        }
    }
}

impl CarveConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.enlarge_split) {
            return Err(Error::invalid(
                "enlarge_split",
                format!("{} is outside [0, 1]", self.enlarge_split),
            ));
        }
        if self.object_energy >= 0 {
            return Err(Error::invalid(
                "object_energy",
                format!("{} would not attract seams", self.object_energy),
            ));
        }
        if !(self.build_scale > 0.0 && self.build_scale < 1.0) {
            return Err(Error::invalid(
                "build_scale",
                format!("{} is outside (0, 1)", self.build_scale),
            ));
        }
        Ok(())
    }

    /// How many of `total` new columns the first enlargement pass makes.
    pub fn first_pass(&self, total: u32) -> u32 {
        ((f64::from(total) * self.enlarge_split).floor() as u32).min(total)
    }
}
