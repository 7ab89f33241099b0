// SPDX-License-Identifier: GPL-3.0-only

//! Key placement in output coordinates.
//!
//! A key's bounds are relative to its section, and the section's bounds to
//! the keyboard. Sections rotate their keys about the section origin. These
//! functions compose the three levels and apply the renderer scale.

use crate::model::geometry::point_in_quad;
use crate::model::{Bounds, KeyId, Keyboard, Point};
use crate::renderer::scene::KeyTransform;

/// Origin (keyboard offset included, unscaled) and angle of the section
/// holding `key`.
fn section_frame(keyboard: &Keyboard, key: KeyId) -> Option<(Point, f64)> {
    let section = keyboard.section_of(key)?;
    let keyboard_bounds = keyboard.bounds();
    let section_bounds = keyboard.element(section)?.bounds();
    let angle = f64::from(keyboard.section(section)?.angle());

    let origin = Point::new(
        keyboard_bounds.x + section_bounds.x,
        keyboard_bounds.y + section_bounds.y,
    );
    Some((origin, angle))
}

/// Bounds of `key` in output coordinates.
///
/// Without `rotate` this is the key rectangle offset by its section and the
/// keyboard. With `rotate` the four corners are first rotated about the
/// section origin by the section angle and the result is their axis-aligned
/// bounding box. Returns `None` for keys that are not in a section.
pub fn key_bounds(keyboard: &Keyboard, key: KeyId, scale: f64, rotate: bool) -> Option<Bounds> {
    let (origin, angle) = section_frame(keyboard, key)?;
    let bounds = keyboard.element(key)?.bounds();

    if !rotate {
        return Some(bounds.translated(origin.x, origin.y).scaled(scale));
    }

    let corners = bounds.corners().map(|corner| corner.rotated(angle));
    let rotated = Bounds::enclosing(&corners)?;
    Some(rotated.translated(origin.x, origin.y).scaled(scale))
}

/// The rotated key rectangle as a quad in output coordinates, corners in
/// top-left, top-right, bottom-right, bottom-left order.
pub fn key_quad(keyboard: &Keyboard, key: KeyId, scale: f64) -> Option<[Point; 4]> {
    let (origin, angle) = section_frame(keyboard, key)?;
    let bounds = keyboard.element(key)?.bounds();

    Some(bounds.corners().map(|corner| {
        corner
            .rotated(angle)
            .translated(origin.x, origin.y)
            .scaled(scale)
    }))
}

/// Finds the key whose rotated quad contains `point`.
///
/// Points outside the scaled keyboard bounds are rejected first. Sections
/// and keys are searched in child order; the first hit wins.
pub fn find_key_at(keyboard: &Keyboard, scale: f64, point: Point) -> Option<KeyId> {
    if !keyboard.bounds().scaled(scale).contains(point) {
        return None;
    }

    keyboard.sections().find_map(|section| {
        keyboard
            .section_keys(section)
            .find(|&key| key_quad(keyboard, key, scale).is_some_and(|quad| point_in_quad(point, &quad)))
    })
}

/// Transform for painting `key` alone into a surface of its rotated bounds.
///
/// With `rotate` the key is shifted so its rotated shape stays inside the
/// surface: by `-width * sin(angle)` vertically for negative sines, by
/// `height * sin(angle)` horizontally otherwise.
pub fn key_transform(
    keyboard: &Keyboard,
    key: KeyId,
    renderer_scale: f64,
    scale: f64,
    rotate: bool,
) -> Option<KeyTransform> {
    let (_, angle) = section_frame(keyboard, key)?;
    let bounds = key_bounds(keyboard, key, renderer_scale, false)?;

    if !rotate {
        return Some(KeyTransform {
            scale,
            ..KeyTransform::IDENTITY
        });
    }

    let s = angle.to_radians().sin();
    let translate = if s < 0.0 {
        Point::new(0.0, -bounds.width * s)
    } else {
        Point::new(bounds.height * s, 0.0)
    };

    Some(KeyTransform {
        scale,
        translate,
        angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Orientation;

    fn rotated_keyboard(angle: i32) -> (Keyboard, KeyId) {
        let mut keyboard = Keyboard::new();
        keyboard.set_bounds(Bounds::new(0.0, 0.0, 200.0, 200.0));
        let section = keyboard.create_section();
        keyboard
            .element_mut(section)
            .unwrap()
            .set_bounds(Bounds::new(100.0, 100.0, 50.0, 20.0));
        let s = keyboard.section_mut(section).unwrap();
        s.set_angle(angle);
        s.add_row(1, Orientation::Horizontal);
        let key = keyboard.create_key(section, 0, 0).unwrap();
        keyboard
            .element_mut(key)
            .unwrap()
            .set_bounds(Bounds::new(0.0, 0.0, 50.0, 20.0));
        (keyboard, key)
    }

    /// Test 1: A quarter turn swaps the key's extent about the section origin.
    #[test]
    fn test_rotated_bounds_quarter_turn() {
        let (keyboard, key) = rotated_keyboard(90);
        let bounds = key_bounds(&keyboard, key, 1.0, true).unwrap();

        assert!(
            bounds.approx_eq(&Bounds::new(80.0, 100.0, 20.0, 50.0), 1e-9),
            "got {:?}",
            bounds
        );
    }

    /// Test 2: Transform shifts right for positive angles, down for negative.
    #[test]
    fn test_key_transform_translation() {
        let (keyboard, key) = rotated_keyboard(90);
        let transform = key_transform(&keyboard, key, 1.0, 1.0, true).unwrap();
        assert!((transform.translate.x - 20.0).abs() < 1e-9);
        assert_eq!(transform.translate.y, 0.0);

        let (keyboard, key) = rotated_keyboard(-90);
        let transform = key_transform(&keyboard, key, 1.0, 1.0, true).unwrap();
        assert_eq!(transform.translate.x, 0.0);
        assert!((transform.translate.y - 50.0).abs() < 1e-9);

        let plain = key_transform(&keyboard, key, 1.0, 2.0, false).unwrap();
        assert_eq!(plain.scale, 2.0);
        assert_eq!(plain.angle, 0.0);
    }

    /// Test 3: Detached keys have no placement.
    #[test]
    fn test_detached_key_has_no_bounds() {
        let (mut keyboard, key) = rotated_keyboard(0);
        let section = keyboard.section_of(key).unwrap();
        keyboard.remove_child(section, key).unwrap();

        assert!(key_bounds(&keyboard, key, 1.0, false).is_none());
        assert!(key_quad(&keyboard, key, 1.0).is_none());
    }
}
