// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sessions: one source image and the resize maps built for it.
//!
//! A resize map is only good for the exact image it was built from, so
//! the session owns both and throws the maps away whenever the source
//! changes.  Building needs `&mut self`, which keeps two builds for the
//! same image from ever running at once; scaling only reads.

use crate::config::CarveConfig;
use crate::error::{Error, Result};
use crate::indexmap::{build_resize_map_with, Direction, ResizeMap};
use crate::objectremoval::{remove_object_with, Rect};
use crate::PixelGrid;
use image::Pixel;
use log::info;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

pub struct ResizeSession<P: Pixel> {
    source: PixelGrid<P>,
    config: CarveConfig,
    horizontal: Option<ResizeMap<P>>,
    vertical: Option<ResizeMap<P>>,
}

impl<P: Pixel> std::fmt::Debug for ResizeSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeSession")
            .field("source", &self.source.dimensions())
            .field("config", &self.config)
            .field("horizontal", &self.horizontal)
            .field("vertical", &self.vertical)
            .finish()
    }
}

impl<P: Pixel + 'static> ResizeSession<P> {
    pub fn new(source: PixelGrid<P>) -> Result<Self> {
        Self::with_config(source, CarveConfig::default())
    }

    pub fn with_config(source: PixelGrid<P>, config: CarveConfig) -> Result<Self> {
        config.validate()?;
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::invalid(
                "source",
                format!("cannot open a session on a {}x{} image", width, height),
            ));
        }
        Ok(ResizeSession {
            source,
            config,
            horizontal: None,
            vertical: None,
        })
    }

    pub fn source(&self) -> &PixelGrid<P> {
        &self.source
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    /// Swap in a new source image.  Maps built for the old one are
    /// dropped.
    pub fn replace_source(&mut self, source: PixelGrid<P>) -> Result<()> {
        *self = Self::with_config(source, self.config)?;
        Ok(())
    }

    fn slot(&mut self, direction: Direction) -> &mut Option<ResizeMap<P>> {
        match direction {
            Direction::Horizontal => &mut self.horizontal,
            Direction::Vertical => &mut self.vertical,
        }
    }

    /// Build (or rebuild) the map for one direction.
    pub fn build(&mut self, direction: Direction, scale: f64) -> Result<&ResizeMap<P>> {
        let map = build_resize_map_with(&self.source, scale, direction, &self.config)?;
        let (lo, hi) = map.supported_range();
        info!("built {:?} map: {}..={} pixels", direction, lo, hi);
        Ok(self.slot(direction).insert(map))
    }

    /// Build the map for one direction at the configured build scale.
    pub fn build_default(&mut self, direction: Direction) -> Result<&ResizeMap<P>> {
        let scale = self.config.build_scale;
        self.build(direction, scale)
    }

    pub fn map(&self, direction: Direction) -> Option<&ResizeMap<P>> {
        match direction {
            Direction::Horizontal => self.horizontal.as_ref(),
            Direction::Vertical => self.vertical.as_ref(),
        }
    }

    /// Render the source at `scale` along `direction` from the map
    /// already built for it.
    pub fn scale(&self, direction: Direction, scale: f64) -> Result<PixelGrid<P>> {
        self.map(direction)
            .ok_or_else(|| {
                Error::invalid(
                    "direction",
                    format!("no {:?} map has been built for this image", direction),
                )
            })?
            .scale(scale)
    }

    /// Remove a rectangle from the source, returning a new image of the
    /// same size.  The session's own source is left alone.
    pub fn remove_object(&self, rect: Rect) -> Result<PixelGrid<P>> {
        remove_object_with(&self.source, rect, &self.config)
    }
}

/// Sessions keyed by whatever identifies an image to the caller.
pub struct SessionStore<K, P: Pixel> {
    sessions: HashMap<K, ResizeSession<P>>,
}

impl<K: Eq + Hash, P: Pixel + 'static> SessionStore<K, P> {
    pub fn new() -> Self {
        SessionStore {
            sessions: HashMap::new(),
        }
    }

    /// Open a session for `key`, replacing any earlier one.
    pub fn open(&mut self, key: K, source: PixelGrid<P>) -> Result<&mut ResizeSession<P>> {
        self.open_with(key, source, CarveConfig::default())
    }

    /// `open` with explicit tunables for the new session.
    pub fn open_with(
        &mut self,
        key: K,
        source: PixelGrid<P>,
        config: CarveConfig,
    ) -> Result<&mut ResizeSession<P>> {
        let session = ResizeSession::with_config(source, config)?;
        Ok(match self.sessions.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.insert(session);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(session),
        })
    }

    pub fn get(&self, key: &K) -> Option<&ResizeSession<P>> {
        self.sessions.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut ResizeSession<P>> {
        self.sessions.get_mut(key)
    }

    pub fn close(&mut self, key: &K) -> Option<ResizeSession<P>> {
        self.sessions.remove(key)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<K: Eq + Hash, P: Pixel + 'static> Default for SessionStore<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn picture(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 29 % 256) as u8, (y * 17 % 256) as u8, (x * y % 256) as u8])
        })
    }

    #[test]
    fn scaling_needs_a_built_map() {
        let mut session = ResizeSession::new(picture(10, 6)).unwrap();
        let err = session.scale(Direction::Horizontal, 0.5).unwrap_err();
        assert!(err.is_invalid_input());

        session.build(Direction::Horizontal, 0.5).unwrap();
        assert_eq!(session.scale(Direction::Horizontal, 0.5).unwrap().dimensions(), (5, 6));
        assert!(session.scale(Direction::Vertical, 0.5).is_err());
    }

    #[test]
    fn default_build_uses_the_configured_scale() {
        let mut session = ResizeSession::new(picture(10, 5)).unwrap();
        let map = session.build_default(Direction::Vertical).unwrap();
        assert_eq!(map.supported_range(), (1, 9));
    }

    #[test]
    fn replacing_the_source_drops_its_maps() {
        let mut session = ResizeSession::new(picture(8, 4)).unwrap();
        session.build(Direction::Horizontal, 0.5).unwrap();
        session.replace_source(picture(6, 6)).unwrap();
        assert!(session.map(Direction::Horizontal).is_none());
        assert_eq!(session.source().dimensions(), (6, 6));
    }

    #[test]
    fn empty_sources_are_rejected() {
        assert!(ResizeSession::new(RgbImage::new(0, 4)).is_err());
    }

    #[test]
    fn store_keys_sessions_by_image() {
        let mut store: SessionStore<&str, Rgb<u8>> = SessionStore::new();
        store.open("beach", picture(8, 4)).unwrap();
        store.open("road", picture(5, 5)).unwrap().build(Direction::Vertical, 0.4).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(&"road").unwrap().map(Direction::Vertical).is_some());
        assert!(store.get(&"beach").unwrap().map(Direction::Vertical).is_none());

        store.open("road", picture(5, 5)).unwrap();
        assert!(store.get(&"road").unwrap().map(Direction::Vertical).is_none());
        assert!(store.close(&"beach").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_sessions_keep_their_config() {
        let mut store = SessionStore::new();
        let config = CarveConfig {
            build_scale: 0.5,
            ..CarveConfig::default()
        };
        let session = store.open_with(7, picture(10, 4), config).unwrap();
        assert_eq!(session.config(), &config);
        assert_eq!(session.build_default(Direction::Horizontal).unwrap().supported_range(), (5, 15));

        let bad = CarveConfig {
            enlarge_split: 2.0,
            ..CarveConfig::default()
        };
        assert!(store.open_with(8, picture(4, 4), bad).unwrap_err().is_invalid_input());
        assert!(store.get(&8).is_none());
    }

    #[test]
    fn object_removal_leaves_the_source_alone() {
        let session = ResizeSession::new(picture(9, 6)).unwrap();
        let out = session.remove_object(Rect::new(3, 4, 1, 3)).unwrap();
        assert_eq!(out.dimensions(), (9, 6));
        assert_eq!(session.source(), &picture(9, 6));
    }
}
