// SPDX-License-Identifier: GPL-3.0-only

//! Render caches owned by one renderer.
//!
//! Outline surfaces are keyed by outline id, with separate maps for the
//! normal and the pressed look. The keyboard composite and the computed
//! font sizes are cached alongside and all of it is dropped together.

use std::collections::HashMap;

use crate::model::OutlineId;
use crate::renderer::sizing::FontSizes;

#[derive(Debug)]
pub struct RenderCache<S> {
    outlines: HashMap<OutlineId, S>,
    pressed_outlines: HashMap<OutlineId, S>,
    keyboard: Option<S>,
    font_sizes: Option<FontSizes>,
    generation: u64,
}

impl<S> Default for RenderCache<S> {
    fn default() -> Self {
        Self {
            outlines: HashMap::new(),
            pressed_outlines: HashMap::new(),
            keyboard: None,
            font_sizes: None,
            generation: 0,
        }
    }
}

impl<S: Clone> RenderCache<S> {
    pub fn new() -> Self {
        Self::default()
    }

    fn outline_map(&mut self, pressed: bool) -> &mut HashMap<OutlineId, S> {
        if pressed {
            &mut self.pressed_outlines
        } else {
            &mut self.outlines
        }
    }

    pub fn outline(&self, oref: OutlineId, pressed: bool) -> Option<S> {
        let map = if pressed {
            &self.pressed_outlines
        } else {
            &self.outlines
        };
        map.get(&oref).cloned()
    }

    pub fn insert_outline(&mut self, oref: OutlineId, pressed: bool, surface: S) {
        self.outline_map(pressed).insert(oref, surface);
    }

    pub fn keyboard(&self) -> Option<S> {
        self.keyboard.clone()
    }

    pub fn set_keyboard(&mut self, surface: S) {
        self.keyboard = Some(surface);
    }

    pub fn font_sizes(&self) -> Option<FontSizes> {
        self.font_sizes
    }

    pub fn set_font_sizes(&mut self, sizes: FontSizes) {
        self.font_sizes = Some(sizes);
    }

    pub fn num_outlines(&self) -> usize {
        self.outlines.len() + self.pressed_outlines.len()
    }

    /// Incremented by every [`invalidate`](Self::invalidate).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops every cached artifact.
    pub fn invalidate(&mut self) {
        self.outlines.clear();
        self.pressed_outlines.clear();
        self.keyboard = None;
        self.font_sizes = None;
        self.generation += 1;
        tracing::debug!("Render cache invalidated (generation {})", self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_and_normal_are_separate() {
        let mut cache = RenderCache::new();
        cache.insert_outline(OutlineId(1), false, "normal");
        cache.insert_outline(OutlineId(1), true, "pressed");

        assert_eq!(cache.outline(OutlineId(1), false), Some("normal"));
        assert_eq!(cache.outline(OutlineId(1), true), Some("pressed"));
        assert_eq!(cache.outline(OutlineId(2), false), None);
        assert_eq!(cache.num_outlines(), 2);
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let mut cache = RenderCache::new();
        cache.insert_outline(OutlineId(1), false, 1);
        cache.set_keyboard(2);

        cache.invalidate();

        assert_eq!(cache.num_outlines(), 0);
        assert_eq!(cache.keyboard(), None);
        assert_eq!(cache.generation(), 1);
    }
}
