// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard renderer.
//!
//! The renderer turns a [`Keyboard`] into geometry a drawing backend can
//! paint: the scaled keyboard size, absolute and rotated key bounds, label
//! placement and font sizes. It also answers pointer hit-tests against the
//! rotated key shapes, and caches what the backend produced.
//!
//! # Architecture
//!
//! - **geometry**: key bounds, rotated quads, hit-testing and key transforms.
//! - **sizing**: allocation scale, border inset and label font sizes.
//! - **cache**: per-outline surfaces, keyboard composite and font sizes.
//! - **backend**: the [`DrawingBackend`] trait and the display-list backend.
//! - **scene**: values handed to backends (labels, key and section scenes).
//! - **theme**: colors and the derived border color.
//!
//! # Invalidation
//!
//! [`Renderer::new`] subscribes to the keyboard. Any change of the global
//! symbol index, and any child added or removed, drops every cached artifact.
//! So does a change of scale in [`Renderer::set_allocation_size`]. Other
//! mutations (bounds, section angles, symbol matrices) are not observed;
//! call [`Renderer::invalidate`] after making them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use oskboard::renderer::{DisplayListBackend, Renderer};
//!
//! let mut renderer = Renderer::new(&mut keyboard, DisplayListBackend::new(), config);
//! renderer.set_allocation_size(&keyboard, 800.0, 300.0)?;
//!
//! let surface = renderer.render_keyboard(&keyboard)?;
//! if let Some(key) = renderer.find_key_by_position(&keyboard, x, y) {
//!     keyboard.on_key_pressed(key)?;
//! }
//! ```

pub mod backend;
pub mod cache;
pub mod geometry;
pub mod scene;
pub mod sizing;
pub mod theme;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::RendererConfig;
use crate::model::{Bounds, KeyId, Keyboard, KeyboardEvent, Listening, Point, SubscriptionId};

pub use backend::{
    DisplayList, DisplayListBackend, DrawOp, DrawingBackend, OutlineRequest, OutlineStyle,
    TextExtents,
};
pub use cache::RenderCache;
pub use scene::{
    KeyFace, KeyLabel, KeyScene, KeyTransform, KeyboardScene, RenderedKey, SectionScene,
};
pub use sizing::FontSizes;
pub use theme::Color;

// ============================================================================
// Errors
// ============================================================================

/// Error type for renderer operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Allocation width or height is not positive
    InvalidAllocation { width: f64, height: f64 },
    /// The keyboard has no area, so no scale fits it
    EmptyKeyboard,
    /// `render_keyboard` was called before `set_allocation_size`
    NoAllocation,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidAllocation { width, height } => {
                write!(f, "invalid allocation size {}x{}", width, height)
            }
            RenderError::EmptyKeyboard => write!(f, "keyboard has no area"),
            RenderError::NoAllocation => write!(f, "no allocation size set"),
        }
    }
}

impl std::error::Error for RenderError {}

// ============================================================================
// Renderer
// ============================================================================

/// Events after which cached artifacts no longer match the keyboard.
fn invalidates(event: &KeyboardEvent) -> bool {
    matches!(
        event,
        KeyboardEvent::SymbolIndexChanged { .. }
            | KeyboardEvent::ChildAdded { .. }
            | KeyboardEvent::ChildRemoved { .. }
    )
}

/// Geometry engine and render cache for one keyboard.
///
/// Operations take the keyboard the renderer was created for. The renderer
/// does not own it, so the host keeps mutating the keyboard (pressing keys,
/// changing the symbol index) between renderer calls.
pub struct Renderer<B: DrawingBackend> {
    backend: B,
    config: RendererConfig,
    scale: f64,
    allocation: Option<(f64, f64)>,
    cache: Rc<RefCell<RenderCache<B::Surface>>>,
    subscription: SubscriptionId,
}

impl<B: DrawingBackend> fmt::Debug for Renderer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("scale", &self.scale)
            .field("allocation", &self.allocation)
            .field("generation", &self.cache_generation())
            .finish()
    }
}

impl<B: DrawingBackend> Renderer<B> {
    /// Creates a renderer for `keyboard` at scale 1.0.
    ///
    /// The renderer subscribes to the keyboard's events to invalidate its
    /// caches. The subscription lapses on the first event after the renderer
    /// is dropped, or immediately with [`Renderer::detach`].
    pub fn new(keyboard: &mut Keyboard, backend: B, config: RendererConfig) -> Self {
        let cache = Rc::new(RefCell::new(RenderCache::new()));
        let weak = Rc::downgrade(&cache);

        let subscription = keyboard.subscribe(move |event| {
            let Some(cache) = weak.upgrade() else {
                return Listening::Stop;
            };
            if invalidates(event) {
                if let Ok(mut cache) = cache.try_borrow_mut() {
                    cache.invalidate();
                }
            }
            Listening::Continue
        });

        Self {
            backend,
            config,
            scale: 1.0,
            allocation: None,
            cache,
            subscription,
        }
    }

    /// Unsubscribes from `keyboard` and returns the backend.
    pub fn detach(self, keyboard: &mut Keyboard) -> B {
        keyboard.unsubscribe(self.subscription);
        self.backend
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Replaces the configuration and drops cached artifacts.
    pub fn set_config(&mut self, config: RendererConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn allocation(&self) -> Option<(f64, f64)> {
        self.allocation
    }

    // ------------------------------------------------------------------------
    // Size and scale
    // ------------------------------------------------------------------------

    /// Sets the area the keyboard is drawn into.
    ///
    /// The scale becomes `min(width / keyboard.width, height /
    /// keyboard.height)`. Caches are dropped only if the scale changed.
    pub fn set_allocation_size(
        &mut self,
        keyboard: &Keyboard,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderError::InvalidAllocation { width, height });
        }
        let scale = sizing::calculate_scale(keyboard.bounds(), width, height)
            .ok_or(RenderError::EmptyKeyboard)?;

        self.allocation = Some((width, height));
        if scale != self.scale {
            tracing::debug!("Renderer scale {} -> {}", self.scale, scale);
            self.scale = scale;
            self.invalidate();
        }
        Ok(())
    }

    /// Keyboard size at the current scale.
    pub fn get_size(&self, keyboard: &Keyboard) -> (f64, f64) {
        let bounds = keyboard.bounds();
        (bounds.width * self.scale, bounds.height * self.scale)
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    /// Bounds of `key` in output coordinates, optionally rotated by its
    /// section angle. `None` for keys not in a section.
    pub fn get_key_bounds(&self, keyboard: &Keyboard, key: KeyId, rotate: bool) -> Option<Bounds> {
        geometry::key_bounds(keyboard, key, self.scale, rotate)
    }

    /// Key under the point `(x, y)` in output coordinates.
    pub fn find_key_by_position(&self, keyboard: &Keyboard, x: f64, y: f64) -> Option<KeyId> {
        geometry::find_key_at(keyboard, self.scale, Point::new(x, y))
    }

    /// Transform for painting `key` alone at an extra `scale`.
    pub fn get_key_transform(
        &self,
        keyboard: &Keyboard,
        key: KeyId,
        scale: f64,
        rotate: bool,
    ) -> Option<KeyTransform> {
        geometry::key_transform(keyboard, key, self.scale, scale, rotate)
    }

    // ------------------------------------------------------------------------
    // Caching
    // ------------------------------------------------------------------------

    /// Drops every cached artifact.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().invalidate();
    }

    /// Number of invalidations so far.
    pub fn cache_generation(&self) -> u64 {
        self.cache.borrow().generation()
    }

    /// Number of cached outline surfaces (normal and pressed).
    pub fn cached_outlines(&self) -> usize {
        self.cache.borrow().num_outlines()
    }

    /// Label font sizes, computed once per cache generation.
    pub fn font_sizes(&self, keyboard: &Keyboard) -> FontSizes {
        if let Some(sizes) = self.cache.borrow().font_sizes() {
            return sizes;
        }
        let sizes = sizing::calculate_font_sizes(keyboard, &self.backend, &self.config);
        tracing::debug!("Font sizes: {:?}", sizes);
        self.cache.borrow_mut().set_font_sizes(sizes);
        sizes
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    fn outline_surface(&mut self, keyboard: &Keyboard, key: KeyId, pressed: bool) -> Option<B::Surface> {
        let oref = keyboard.key(key)?.oref();
        if oref.is_none() {
            return None;
        }
        if let Some(surface) = self.cache.borrow().outline(oref, pressed) {
            return Some(surface);
        }

        let outline = keyboard.get_outline(oref)?;
        let bounds = keyboard.element(key)?.bounds();
        let border_width = self.config.border_width;
        let inset = sizing::border_inset_scale(bounds, border_width);

        let points: Vec<Point> = outline
            .points()
            .iter()
            .map(|point| point.scaled(self.scale * inset))
            .collect();
        let half_border = border_width / 2.0 * self.scale;

        let style = OutlineStyle {
            fill: if pressed {
                self.config.pressed_background
            } else {
                self.config.background
            },
            border: theme::border_color(self.config.background, self.config.foreground),
            border_width: border_width * self.scale,
            corner_radius: outline.corner_radius() * self.scale * inset,
        };
        let surface = self.backend.render_outline(&OutlineRequest {
            width: bounds.width * self.scale,
            height: bounds.height * self.scale,
            origin: Point::new(half_border, half_border),
            points: &points,
            style,
        });

        self.cache
            .borrow_mut()
            .insert_outline(oref, pressed, surface.clone());
        Some(surface)
    }

    /// Outline surface of `key` in its current pressed state.
    ///
    /// Surfaces are cached per outline id and pressed state. `None` for keys
    /// without a registered outline.
    pub fn render_key_outline(&mut self, keyboard: &Keyboard, key: KeyId) -> Option<B::Surface> {
        let pressed = keyboard.key(key)?.is_pressed();
        self.outline_surface(keyboard, key, pressed)
    }

    /// Label of `key`'s current symbol, sized and centered for the key.
    ///
    /// `None` if the key has no symbol or the symbol has no label.
    pub fn render_key_label(&self, keyboard: &Keyboard, key: KeyId) -> Option<KeyLabel> {
        let symbol = keyboard.symbol_for_key(key)?;
        let text = symbol.label.as_deref()?;
        let bounds = keyboard.element(key)?.bounds();

        let fonts = self.font_sizes(keyboard);
        let inset = sizing::border_inset_scale(bounds, self.config.border_width);
        let property = sizing::text_property(symbol.category, &self.config);

        let font_size = fonts.for_category(symbol.category) * self.scale * inset;
        let max_width = bounds.width * self.scale * inset;
        let extents = self.backend.measure_text(text, font_size);
        let text_width = if property.ellipsize {
            extents.width.min(max_width)
        } else {
            extents.width
        };

        Some(KeyLabel {
            text: text.to_string(),
            font_size,
            max_width,
            ellipsize: property.ellipsize,
            position: Point::new(
                (bounds.width * self.scale - text_width) / 2.0,
                (bounds.height * self.scale - extents.height) / 2.0,
            ),
            color: self.config.foreground,
        })
    }

    /// Icon when the symbol names one, otherwise its label.
    fn key_face(&self, keyboard: &Keyboard, key: KeyId) -> KeyFace {
        if let Some(name) = keyboard
            .symbol_for_key(key)
            .and_then(|symbol| symbol.icon_name.clone())
        {
            return KeyFace::Icon { name };
        }
        self.render_key_label(keyboard, key)
            .map(KeyFace::Label)
            .unwrap_or(KeyFace::Blank)
    }

    /// Renders `key` alone: outline, face and the transform to paint it
    /// with at an extra `scale`.
    ///
    /// `None` for detached keys or a negative `scale`.
    pub fn render_key(
        &mut self,
        keyboard: &Keyboard,
        key: KeyId,
        scale: f64,
        rotate: bool,
    ) -> Option<RenderedKey<B::Surface>> {
        if scale < 0.0 {
            return None;
        }
        let pressed = keyboard.key(key)?.is_pressed();
        let bounds = self.get_key_bounds(keyboard, key, false)?;
        let transform = self.get_key_transform(keyboard, key, scale, rotate)?;

        let outline = self.outline_surface(keyboard, key, pressed);
        let face = self.key_face(keyboard, key);

        Some(RenderedKey {
            scene: KeyScene {
                key,
                bounds,
                outline,
                face,
            },
            transform,
        })
    }

    /// Composite of the whole keyboard, reused until the cache is
    /// invalidated. Keys are drawn released.
    pub fn render_keyboard(&mut self, keyboard: &Keyboard) -> Result<B::Surface, RenderError> {
        if self.allocation.is_none() {
            return Err(RenderError::NoAllocation);
        }
        if let Some(surface) = self.cache.borrow().keyboard() {
            return Ok(surface);
        }

        let keyboard_bounds = keyboard.bounds();
        let mut sections = Vec::new();

        for section in keyboard.sections() {
            let Some(element) = keyboard.element(section) else {
                continue;
            };
            let section_bounds = element.bounds();
            let angle = keyboard
                .section(section)
                .map(|s| f64::from(s.angle()))
                .unwrap_or(0.0);

            let mut keys = Vec::new();
            for key in keyboard.section_keys(section) {
                let Some(element) = keyboard.element(key) else {
                    continue;
                };
                let bounds = element.bounds().scaled(self.scale);
                let outline = self.outline_surface(keyboard, key, false);
                let face = self.key_face(keyboard, key);
                keys.push(KeyScene {
                    key,
                    bounds,
                    outline,
                    face,
                });
            }

            sections.push(SectionScene {
                section,
                origin: Point::new(
                    keyboard_bounds.x + section_bounds.x,
                    keyboard_bounds.y + section_bounds.y,
                )
                .scaled(self.scale),
                angle,
                keys,
            });
        }

        let (width, height) = self.get_size(keyboard);
        let scene = KeyboardScene {
            width,
            height,
            background: self.config.background,
            foreground: self.config.foreground,
            sections,
        };

        let surface = self.backend.render_keyboard(&scene);
        tracing::debug!(
            "Rendered keyboard {}x{} ({} sections)",
            width,
            height,
            scene.sections.len()
        );
        self.cache.borrow_mut().set_keyboard(surface.clone());
        Ok(surface)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Orientation, Outline, SectionId, Symbol, SymbolCategory, SymbolMatrix};

    const EPSILON: f64 = 1e-9;

    /// One section at the origin with one row of `count` 40x40 keys.
    fn row_keyboard(count: usize) -> (Keyboard, SectionId, Vec<KeyId>) {
        let mut keyboard = Keyboard::new();
        keyboard.set_bounds(Bounds::new(0.0, 0.0, 40.0 * count as f64, 40.0));
        let oref = keyboard.add_outline(&Outline::rectangle(40.0, 40.0, 2.0).unwrap());

        let section = keyboard.create_section();
        keyboard
            .element_mut(section)
            .unwrap()
            .set_bounds(Bounds::new(0.0, 0.0, 40.0 * count as f64, 40.0));
        keyboard
            .section_mut(section)
            .unwrap()
            .add_row(count, Orientation::Horizontal);

        let keys = (0..count)
            .map(|column| {
                let key = keyboard.create_key(section, column, 0).unwrap();
                keyboard
                    .element_mut(key)
                    .unwrap()
                    .set_bounds(Bounds::new(40.0 * column as f64, 0.0, 40.0, 40.0));
                let k = keyboard.key_mut(key).unwrap();
                k.set_oref(oref);
                k.set_symbol_matrix(SymbolMatrix::from_levels([
                    Symbol::letter('a'),
                    Symbol::letter('A'),
                ]));
                key
            })
            .collect();

        (keyboard, section, keys)
    }

    /// Keyboard with a rotated section of three keys away from the edges.
    fn rotated_keyboard(angle: i32) -> (Keyboard, Vec<KeyId>) {
        let mut keyboard = Keyboard::new();
        keyboard.set_bounds(Bounds::new(0.0, 0.0, 300.0, 300.0));
        let section = keyboard.create_section();
        keyboard
            .element_mut(section)
            .unwrap()
            .set_bounds(Bounds::new(150.0, 150.0, 120.0, 40.0));
        let s = keyboard.section_mut(section).unwrap();
        s.set_angle(angle);
        s.add_row(3, Orientation::Horizontal);

        let keys = (0..3)
            .map(|column| {
                let key = keyboard.create_key(section, column, 0).unwrap();
                keyboard
                    .element_mut(key)
                    .unwrap()
                    .set_bounds(Bounds::new(40.0 * column as f64, 0.0, 40.0, 40.0));
                key
            })
            .collect();
        (keyboard, keys)
    }

    fn renderer(keyboard: &mut Keyboard) -> Renderer<DisplayListBackend> {
        Renderer::new(keyboard, DisplayListBackend::new(), RendererConfig::default())
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Test 1: Two 40x40 keys in one row resolve by position.
    #[test]
    fn test_two_key_row_hit_test() {
        let (mut keyboard, _, keys) = row_keyboard(2);
        let renderer = renderer(&mut keyboard);

        assert_eq!(renderer.find_key_by_position(&keyboard, 10.0, 10.0), Some(keys[0]));
        assert_eq!(renderer.find_key_by_position(&keyboard, 50.0, 10.0), Some(keys[1]));
        assert_eq!(
            renderer.find_key_by_position(&keyboard, 90.0, 10.0),
            None,
            "point right of the keyboard"
        );
        assert_eq!(renderer.find_key_by_position(&keyboard, -1.0, 10.0), None);
    }

    /// Test 2: Hit-testing the center of a rotated key finds that key.
    #[test]
    fn test_hit_test_rotated_centroids() {
        for angle in [0, 15, -15, 90] {
            let (mut keyboard, keys) = rotated_keyboard(angle);
            let renderer = renderer(&mut keyboard);

            for &key in &keys {
                let center = renderer.get_key_bounds(&keyboard, key, true).unwrap().center();
                assert_eq!(
                    renderer.find_key_by_position(&keyboard, center.x, center.y),
                    Some(key),
                    "angle {} key {}",
                    angle,
                    key
                );
            }
        }
    }

    /// Test 3: Rotation by 0 or 360 degrees leaves bounds unchanged.
    #[test]
    fn test_rotation_identity_angles() {
        let (mut keyboard, keys) = rotated_keyboard(0);
        let renderer = renderer(&mut keyboard);
        let plain = renderer.get_key_bounds(&keyboard, keys[1], false).unwrap();
        let rotated = renderer.get_key_bounds(&keyboard, keys[1], true).unwrap();
        assert_eq!(plain, rotated);

        let (mut full_turn, keys) = rotated_keyboard(360);
        let renderer = self::renderer(&mut full_turn);
        let rotated = renderer.get_key_bounds(&full_turn, keys[1], true).unwrap();
        assert!(
            rotated.approx_eq(&plain, 1e-6),
            "360 degrees: {:?} vs {:?}",
            rotated,
            plain
        );
    }

    /// Test 4: Bounds are stable across calls and follow the scale.
    #[test]
    fn test_key_bounds_idempotent_and_scaled() {
        let (mut keyboard, _, keys) = row_keyboard(2);
        let mut renderer = renderer(&mut keyboard);

        let first = renderer.get_key_bounds(&keyboard, keys[1], false).unwrap();
        let second = renderer.get_key_bounds(&keyboard, keys[1], false).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Bounds::new(40.0, 0.0, 40.0, 40.0));

        renderer.set_allocation_size(&keyboard, 160.0, 200.0).unwrap();
        assert!((renderer.scale() - 2.0).abs() < EPSILON);
        assert_eq!(renderer.get_size(&keyboard), (160.0, 80.0));
        assert_eq!(
            renderer.get_key_bounds(&keyboard, keys[1], false).unwrap(),
            Bounds::new(80.0, 0.0, 80.0, 80.0)
        );
        assert_eq!(
            renderer.find_key_by_position(&keyboard, 100.0, 20.0),
            Some(keys[1])
        );
    }

    /// Test 5: Allocation errors.
    #[test]
    fn test_set_allocation_size_errors() {
        let (mut keyboard, _, _) = row_keyboard(2);
        let mut renderer = renderer(&mut keyboard);

        assert!(matches!(
            renderer.set_allocation_size(&keyboard, 0.0, 10.0),
            Err(RenderError::InvalidAllocation { .. })
        ));

        let mut empty = Keyboard::new();
        let mut empty_renderer = self::renderer(&mut empty);
        assert_eq!(
            empty_renderer.set_allocation_size(&empty, 100.0, 100.0),
            Err(RenderError::EmptyKeyboard)
        );
        assert_eq!(
            empty_renderer.render_keyboard(&empty),
            Err(RenderError::NoAllocation)
        );
    }

    // ========================================================================
    // Caching
    // ========================================================================

    /// Test 6: Keys sharing an outline share one cached surface.
    #[test]
    fn test_outline_cache_shared_by_oref() {
        let (mut keyboard, _, keys) = row_keyboard(3);
        let mut renderer = renderer(&mut keyboard);

        let first = renderer.render_key_outline(&keyboard, keys[0]).unwrap();
        let second = renderer.render_key_outline(&keyboard, keys[2]).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(renderer.backend().outlines_rendered(), 1);

        keyboard.on_key_pressed(keys[0]).unwrap();
        renderer.render_key_outline(&keyboard, keys[0]).unwrap();
        assert_eq!(
            renderer.backend().outlines_rendered(),
            2,
            "pressed look is cached separately"
        );
        assert_eq!(renderer.cached_outlines(), 2);
    }

    /// Test 7: A symbol-index change forces a new composite.
    #[test]
    fn test_symbol_index_change_invalidates_composite() {
        let (mut keyboard, _, _) = row_keyboard(2);
        let mut renderer = renderer(&mut keyboard);
        renderer.set_allocation_size(&keyboard, 80.0, 40.0).unwrap();

        let before = renderer.render_keyboard(&keyboard).unwrap();
        let again = renderer.render_keyboard(&keyboard).unwrap();
        assert!(Rc::ptr_eq(&before, &again), "composite is reused");
        assert_eq!(before.texts(), vec!["a", "a"]);

        let generation = renderer.cache_generation();
        keyboard.set_symbol_index(0, 1).unwrap();
        assert_eq!(renderer.cache_generation(), generation + 1);

        let after = renderer.render_keyboard(&keyboard).unwrap();
        assert!(!Rc::ptr_eq(&before, &after));
        assert_eq!(after.texts(), vec!["A", "A"]);
        assert_eq!(renderer.backend().keyboards_rendered(), 2);
    }

    /// Test 8: Same scale keeps the cache; a new scale drops it.
    #[test]
    fn test_allocation_invalidates_only_on_scale_change() {
        let (mut keyboard, _, _) = row_keyboard(2);
        let mut renderer = renderer(&mut keyboard);

        renderer.set_allocation_size(&keyboard, 80.0, 40.0).unwrap();
        let generation = renderer.cache_generation();
        renderer.set_allocation_size(&keyboard, 80.0, 100.0).unwrap();
        assert_eq!(renderer.cache_generation(), generation, "scale still 1.0");

        renderer.set_allocation_size(&keyboard, 160.0, 80.0).unwrap();
        assert_eq!(renderer.cache_generation(), generation + 1);
    }

    /// Test 9: Dropped renderers stop listening.
    #[test]
    fn test_dropped_renderer_unsubscribes() {
        let (mut keyboard, _, _) = row_keyboard(1);
        let listeners = keyboard.num_listeners();

        let renderer = renderer(&mut keyboard);
        assert_eq!(keyboard.num_listeners(), listeners + 1);
        drop(renderer);

        keyboard.set_symbol_index(0, 1).unwrap();
        assert_eq!(keyboard.num_listeners(), listeners);

        let renderer = self::renderer(&mut keyboard);
        renderer.detach(&mut keyboard);
        assert_eq!(keyboard.num_listeners(), listeners);
    }

    // ========================================================================
    // Labels
    // ========================================================================

    /// Test 10: Letter labels are centered and key names are smaller.
    #[test]
    fn test_key_labels() {
        let (mut keyboard, _, keys) = row_keyboard(2);
        keyboard
            .key_mut(keys[1])
            .unwrap()
            .set_symbol_matrix(SymbolMatrix::from_levels([Symbol::from_keysym_name(
                "Escape",
            )]));
        let renderer = renderer(&mut keyboard);

        let fonts = renderer.font_sizes(&keyboard);
        let letter = renderer.render_key_label(&keyboard, keys[0]).unwrap();
        let name = renderer.render_key_label(&keyboard, keys[1]).unwrap();

        assert_eq!(letter.text, "a");
        assert!(!letter.ellipsize);
        let inset = sizing::border_inset_scale(Bounds::new(0.0, 0.0, 40.0, 40.0), 1.0);
        assert!((letter.font_size - fonts.letter * inset).abs() < EPSILON);

        assert_eq!(name.text, "Esc");
        assert!(name.ellipsize);
        assert!((name.font_size - letter.font_size * 0.5).abs() < EPSILON);

        let extents = renderer.backend().measure_text("a", letter.font_size);
        assert!((letter.position.x - (40.0 - extents.width) / 2.0).abs() < EPSILON);
    }

    /// Test 11: Icons replace labels in rendered keys.
    #[test]
    fn test_render_key_with_icon() {
        let (mut keyboard, _, keys) = row_keyboard(1);
        keyboard
            .key_mut(keys[0])
            .unwrap()
            .set_symbol_matrix(SymbolMatrix::from_levels([Symbol::new("Return")
                .with_category(SymbolCategory::Function)
                .with_icon_name("go-next")]));
        let mut renderer = renderer(&mut keyboard);

        let rendered = renderer.render_key(&keyboard, keys[0], 1.0, false).unwrap();
        assert_eq!(
            rendered.scene.face,
            KeyFace::Icon {
                name: "go-next".to_string()
            }
        );
        assert!(rendered.scene.outline.is_some());
        assert_eq!(rendered.transform, KeyTransform::IDENTITY);
        assert!(renderer.render_key(&keyboard, keys[0], -1.0, false).is_none());
    }
}
