// SPDX-License-Identifier: GPL-3.0-only

//! Symbols carried by keys.
//!
//! A [`Symbol`] is an opaque leaf value supplied by the layout: a name, an
//! optional display label, a category used to pick the label font and a
//! modifier mask. A symbol with a non-empty mask is a modifier symbol and
//! drives the keyboard's modifier state machine.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not};

use serde::{Deserialize, Serialize};
use xkbcommon::xkb;
use xkbcommon::xkb::Keysym;
use xkbcommon::xkb::keysyms::KEY_NoSymbol;

/// Bit set of keyboard modifiers, using X11 bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierMask(pub u32);

impl ModifierMask {
    pub const EMPTY: ModifierMask = ModifierMask(0);
    pub const SHIFT: ModifierMask = ModifierMask(1 << 0);
    pub const LOCK: ModifierMask = ModifierMask(1 << 1);
    pub const CONTROL: ModifierMask = ModifierMask(1 << 2);
    pub const MOD1: ModifierMask = ModifierMask(1 << 3);
    pub const MOD2: ModifierMask = ModifierMask(1 << 4);
    pub const MOD3: ModifierMask = ModifierMask(1 << 5);
    pub const MOD4: ModifierMask = ModifierMask(1 << 6);
    pub const MOD5: ModifierMask = ModifierMask(1 << 7);
    pub const SUPER: ModifierMask = ModifierMask(1 << 26);
    pub const HYPER: ModifierMask = ModifierMask(1 << 27);
    pub const META: ModifierMask = ModifierMask(1 << 28);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: ModifierMask) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn intersects(self, other: ModifierMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for ModifierMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ModifierMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for ModifierMask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitXor for ModifierMask {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for ModifierMask {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: &[(ModifierMask, &str)] = &[
            (ModifierMask::SHIFT, "Shift"),
            (ModifierMask::LOCK, "Lock"),
            (ModifierMask::CONTROL, "Control"),
            (ModifierMask::MOD1, "Mod1"),
            (ModifierMask::MOD2, "Mod2"),
            (ModifierMask::MOD3, "Mod3"),
            (ModifierMask::MOD4, "Mod4"),
            (ModifierMask::MOD5, "Mod5"),
            (ModifierMask::SUPER, "Super"),
            (ModifierMask::HYPER, "Hyper"),
            (ModifierMask::META, "Meta"),
        ];

        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(mask, _)| self.contains(*mask))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

/// Category of a symbol, used to select label font size and eliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolCategory {
    /// Printable characters
    Letter,
    /// Function keys such as Return or BackSpace
    Function,
    /// Named keys whose label is a word (Shift, Control, ...)
    Keyname,
    User0,
    User1,
    User2,
    User3,
    User4,
    #[default]
    Unknown,
}

/// A symbol attached to one cell of a key's symbol matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub category: SymbolCategory,
    #[serde(default, skip_serializing_if = "mask_is_empty")]
    pub modifier_mask: ModifierMask,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Printable character symbol; the label is the character itself.
    pub fn letter(c: char) -> Self {
        Self {
            name: c.to_string(),
            label: Some(c.to_string()),
            category: SymbolCategory::Letter,
            ..Self::default()
        }
    }

    /// Builds a symbol from an X keysym name, filling in the modifier mask,
    /// category and label.
    ///
    /// Named keys such as `Return` or `Shift_L` take their label from a
    /// small override table. Other names are resolved through xkbcommon;
    /// keysyms with a printable character (`eacute`, `Cyrillic_a`,
    /// `U00E9`) become letters labelled with that character. Anything else
    /// keeps the `Unknown` category and uses the name as label.
    pub fn from_keysym_name(name: &str) -> Self {
        let modifier_mask = modifier_for_keysym_name(name);
        let (label, category) = match KEYSYM_LABELS.iter().find(|(keysym, _, _)| *keysym == name) {
            Some((_, label, category)) => ((*label).to_string(), *category),
            None => match keysym_char(name) {
                Some(c) => (c.to_string(), SymbolCategory::Letter),
                None => (name.to_string(), SymbolCategory::Unknown),
            },
        };

        Self {
            name: name.to_string(),
            label: Some(label),
            category,
            modifier_mask,
            icon_name: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: SymbolCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_modifier_mask(mut self, mask: ModifierMask) -> Self {
        self.modifier_mask = mask;
        self
    }

    #[must_use]
    pub fn with_icon_name(mut self, icon_name: impl Into<String>) -> Self {
        self.icon_name = Some(icon_name.into());
        self
    }

    /// Returns `true` if pressing this symbol affects modifier state.
    pub fn is_modifier(&self) -> bool {
        !self.modifier_mask.is_empty()
    }

    /// Display label, falling back to the symbol name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

fn mask_is_empty(mask: &ModifierMask) -> bool {
    mask.is_empty()
}

/// Printable character produced by the keysym called `name`.
///
/// A name that is itself a single character stands for that character.
fn keysym_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c);
    }

    let no_symbol: Keysym = KEY_NoSymbol.into();
    let mut keysym = xkb::keysym_from_name(name, xkb::KEYSYM_NO_FLAGS);
    if keysym == no_symbol {
        keysym = xkb::keysym_from_name(name, xkb::KEYSYM_CASE_INSENSITIVE);
    }
    if keysym == no_symbol {
        return None;
    }

    char::from_u32(xkb::keysym_to_utf32(keysym)).filter(|c| *c != '\0' && !c.is_control())
}

/// Labels and categories for named keys, taking precedence over the
/// xkbcommon lookup.
const KEYSYM_LABELS: &[(&str, &str, SymbolCategory)] = &[
    ("BackSpace", "\u{232b}", SymbolCategory::Function),
    ("Tab", "\u{21e5}", SymbolCategory::Function),
    ("Return", "\u{23ce}", SymbolCategory::Function),
    ("Escape", "Esc", SymbolCategory::Keyname),
    ("Delete", "Del", SymbolCategory::Keyname),
    ("space", " ", SymbolCategory::Keyname),
    ("Left", "\u{2190}", SymbolCategory::Function),
    ("Up", "\u{2191}", SymbolCategory::Function),
    ("Right", "\u{2192}", SymbolCategory::Function),
    ("Down", "\u{2193}", SymbolCategory::Function),
    ("Shift_L", "Shift", SymbolCategory::Keyname),
    ("Shift_R", "Shift", SymbolCategory::Keyname),
    ("Caps_Lock", "Caps", SymbolCategory::Keyname),
    ("Shift_Lock", "Shift Lock", SymbolCategory::Keyname),
    ("ISO_Level3_Shift", "AltGr", SymbolCategory::Keyname),
    ("Control_L", "Ctrl", SymbolCategory::Keyname),
    ("Control_R", "Ctrl", SymbolCategory::Keyname),
    ("Alt_L", "Alt", SymbolCategory::Keyname),
    ("Alt_R", "Alt", SymbolCategory::Keyname),
    ("Meta_L", "Meta", SymbolCategory::Keyname),
    ("Meta_R", "Meta", SymbolCategory::Keyname),
    ("Super_L", "Super", SymbolCategory::Keyname),
    ("Super_R", "Super", SymbolCategory::Keyname),
    ("Hyper_L", "Hyper", SymbolCategory::Keyname),
    ("Hyper_R", "Hyper", SymbolCategory::Keyname),
];

/// Modifier affected by a keysym, or an empty mask for ordinary keysyms.
pub fn modifier_for_keysym_name(name: &str) -> ModifierMask {
    match name {
        "Shift_L" | "Shift_R" | "Caps_Lock" | "Shift_Lock" => ModifierMask::SHIFT,
        "ISO_Level3_Shift" => ModifierMask::MOD5,
        "Control_L" | "Control_R" => ModifierMask::CONTROL,
        "Alt_L" | "Alt_R" => ModifierMask::MOD1,
        "Meta_L" | "Meta_R" => ModifierMask::META,
        "Super_L" | "Super_R" => ModifierMask::SUPER,
        "Hyper_L" | "Hyper_R" => ModifierMask::HYPER,
        _ => ModifierMask::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_operations() {
        let m = ModifierMask::SHIFT | ModifierMask::MOD5;
        assert!(m.contains(ModifierMask::SHIFT));
        assert!(!m.contains(ModifierMask::CONTROL));
        assert_eq!(m & !ModifierMask::SHIFT, ModifierMask::MOD5);
        assert_eq!(m ^ ModifierMask::SHIFT, ModifierMask::MOD5);
        assert!(!ModifierMask::EMPTY.contains(ModifierMask::EMPTY));
        assert_eq!(m.to_string(), "Shift+Mod5");
        assert_eq!(ModifierMask::EMPTY.to_string(), "none");
    }

    #[test]
    fn test_keysym_modifier_table() {
        assert_eq!(modifier_for_keysym_name("Shift_L"), ModifierMask::SHIFT);
        assert_eq!(modifier_for_keysym_name("Caps_Lock"), ModifierMask::SHIFT);
        assert_eq!(modifier_for_keysym_name("ISO_Level3_Shift"), ModifierMask::MOD5);
        assert_eq!(modifier_for_keysym_name("Alt_R"), ModifierMask::MOD1);
        assert_eq!(modifier_for_keysym_name("a"), ModifierMask::EMPTY);
    }

    #[test]
    fn test_from_keysym_name() {
        let shift = Symbol::from_keysym_name("Shift_L");
        assert!(shift.is_modifier());
        assert_eq!(shift.category, SymbolCategory::Keyname);
        assert_eq!(shift.display_label(), "Shift");

        let a = Symbol::from_keysym_name("a");
        assert_eq!(a.category, SymbolCategory::Letter);
        assert!(!a.is_modifier());

        let odd = Symbol::from_keysym_name("XF86AudioMute");
        assert_eq!(odd.category, SymbolCategory::Unknown);
        assert_eq!(odd.display_label(), "XF86AudioMute");

        let unknown = Symbol::from_keysym_name("NotAKeysymAtAll");
        assert_eq!(unknown.category, SymbolCategory::Unknown);
        assert_eq!(unknown.display_label(), "NotAKeysymAtAll");
    }

    #[test]
    fn test_from_keysym_name_printable() {
        for (name, label) in [
            ("eacute", "\u{e9}"),
            ("adiaeresis", "\u{e4}"),
            ("Cyrillic_a", "\u{430}"),
            ("U00E9", "\u{e9}"),
            ("semicolon", ";"),
        ] {
            let symbol = Symbol::from_keysym_name(name);
            assert_eq!(symbol.name, name);
            assert_eq!(symbol.label.as_deref(), Some(label), "label of {}", name);
            assert_eq!(symbol.category, SymbolCategory::Letter, "category of {}", name);
            assert!(!symbol.is_modifier());
        }

        let enter = Symbol::from_keysym_name("Return");
        assert_eq!(enter.category, SymbolCategory::Function);
        assert_eq!(enter.display_label(), "\u{23ce}");
    }

    #[test]
    fn test_symbol_json_shape() {
        let json = serde_json::to_value(Symbol::letter('q')).unwrap();
        assert_eq!(json["name"], "q");
        assert_eq!(json["category"], "letter");
        assert!(json.get("modifier_mask").is_none());

        let parsed: Symbol =
            serde_json::from_str(r#"{"name":"Shift_L","modifier_mask":1}"#).unwrap();
        assert_eq!(parsed.modifier_mask, ModifierMask::SHIFT);
        assert_eq!(parsed.category, SymbolCategory::Unknown);
    }
}
