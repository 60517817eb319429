// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image resizing by seam carving.
//!
//! Seams are found once per image and recorded in an index map; after
//! that the image can be rendered at any width (or height) within the
//! map's range without carving again.  Object removal carves through a
//! masked rectangle and stretches the image back to size.

extern crate image;

#[macro_use]
pub mod ternary;

pub mod config;
pub mod energy;
pub mod error;
pub mod extractor;
pub mod flipper;
pub mod indexmap;
pub mod objectremoval;
pub mod scaler;
pub mod seam;
pub mod seamcarver;
pub mod seamfinder;
pub mod session;
pub mod twodmap;

/// An owned image: the grid the carver reads, cuts and grows.
pub type PixelGrid<P> = image::ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>;

pub use config::CarveConfig;
pub use energy::{calculate_energy, energy_to_image, EnergyGrid};
pub use error::{Error, Result};
pub use extractor::{carve_seams, extract_seams, restore_coordinates};
pub use indexmap::{build_resize_map, build_resize_map_with, Direction, IndexMap, Rank, ResizeMap};
pub use objectremoval::{remove_object, remove_object_with, Mask, Rect};
pub use scaler::{scale_many, scale_to};
pub use seam::{draw_seam, Seam, SeamBatch};
pub use seamcarver::{insert_seam, remove_seam, SeamGrid};
pub use seamfinder::{find_min_seam, GradientSeams, SeamFinder};
pub use session::{ResizeSession, SessionStore};
pub use twodmap::TwoDimensionalMap;
