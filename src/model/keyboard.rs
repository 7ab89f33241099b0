// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard: root of the element tree.
//!
//! The keyboard owns every node in an arena indexed by [`ElementId`]. The
//! root node (the keyboard itself) holds sections and each section holds
//! keys. Parent links are plain ids, so the tree never owns itself through
//! back-references.
//!
//! Besides the tree, the keyboard owns the outline registry, the global
//! symbol index and the modifier state machine. Key presses bubble through
//! the listener registry synchronously:
//!
//! 1. `KeyPressed` with [`EventOrigin::Key`]
//! 2. `KeyPressed` with [`EventOrigin::Section`] (if the key is attached)
//! 3. `KeyPressed` with [`EventOrigin::Keyboard`] (if the section is attached)
//! 4. modifier update
//! 5. `SymbolIndexChanged` (if the level moved)
//!
//! # Example
//!
//! ```rust,ignore
//! let mut keyboard = Keyboard::new();
//! let oref = keyboard.add_outline(&Outline::rectangle(40.0, 40.0, 2.0)?);
//! let section = keyboard.create_section();
//! keyboard.section_mut(section).unwrap().add_row(2, Orientation::Horizontal);
//! let key = keyboard.create_key(section, 0, 0)?;
//! keyboard.key_mut(key).unwrap().set_oref(oref);
//! keyboard.on_key_pressed(key)?;
//! ```

use crate::error::ModelError;
use crate::model::container::Container;
use crate::model::element::{Element, ElementId, SymbolIndex};
use crate::model::event::{EventOrigin, KeyboardEvent, Listeners, Listening, SubscriptionId};
use crate::model::geometry::{Bounds, Point};
use crate::model::key::{Key, KeyId};
use crate::model::modifier::{ModifierBehavior, ModifierState};
use crate::model::outline::{Outline, OutlineId, OutlineTable};
use crate::model::section::{Section, SectionId};
use crate::model::symbol::{ModifierMask, Symbol};

// ============================================================================
// Arena nodes
// ============================================================================

#[derive(Debug, Clone)]
enum NodeKind {
    Root(Container),
    Section(Section),
    Key(Key),
}

impl NodeKind {
    fn describe(&self) -> &'static str {
        match self {
            NodeKind::Root(_) => "keyboard",
            NodeKind::Section(_) => "section",
            NodeKind::Key(_) => "key",
        }
    }

    fn container(&self) -> Option<&Container> {
        match self {
            NodeKind::Root(container) => Some(container),
            NodeKind::Section(section) => Some(section.keys()),
            NodeKind::Key(_) => None,
        }
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        match self {
            NodeKind::Root(container) => Some(container),
            NodeKind::Section(section) => Some(section.keys_mut()),
            NodeKind::Key(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    kind: NodeKind,
}

// ============================================================================
// Keyboard
// ============================================================================

/// Root of the element tree.
#[derive(Debug)]
pub struct Keyboard {
    nodes: Vec<Node>,
    outlines: OutlineTable,
    group: i32,
    level: i32,
    modifiers: ModifierState,
    listeners: Listeners,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    /// Creates an empty keyboard with zero bounds and momentary modifiers.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                element: Element::new(),
                kind: NodeKind::Root(Container::new()),
            }],
            outlines: OutlineTable::new(),
            group: 0,
            level: 0,
            modifiers: ModifierState::default(),
            listeners: Listeners::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------------

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn alloc(&mut self, kind: NodeKind) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node {
            element: Element::new(),
            kind,
        });
        id
    }

    /// The keyboard's own element data (name, bounds, override).
    pub fn root(&self) -> &Element {
        &self.nodes[ElementId::ROOT.index()].element
    }

    pub fn element(&self, id: impl Into<ElementId>) -> Option<&Element> {
        self.node(id.into()).map(|node| &node.element)
    }

    pub fn element_mut(&mut self, id: impl Into<ElementId>) -> Option<&mut Element> {
        self.node_mut(id.into()).map(|node| &mut node.element)
    }

    /// Keyboard bounds, relative to whatever hosts the keyboard.
    pub fn bounds(&self) -> Bounds {
        self.root().bounds()
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.nodes[ElementId::ROOT.index()].element.set_bounds(bounds);
    }

    /// Number of nodes ever created, including detached ones and the root.
    pub fn num_elements(&self) -> usize {
        self.nodes.len()
    }

    // ------------------------------------------------------------------------
    // Outline registry
    // ------------------------------------------------------------------------

    /// Registers a copy of `outline` and returns its id (1-based, dense).
    pub fn add_outline(&mut self, outline: &Outline) -> OutlineId {
        let id = self.outlines.add(outline);
        tracing::debug!("Registered outline {} ({} points)", id, outline.num_points());
        id
    }

    /// Looks up an outline; `None` for id 0 or past the end of the table.
    pub fn get_outline(&self, oref: OutlineId) -> Option<&Outline> {
        self.outlines.get(oref)
    }

    pub fn outlines(&self) -> &OutlineTable {
        &self.outlines
    }

    // ------------------------------------------------------------------------
    // Sections and keys
    // ------------------------------------------------------------------------

    /// Creates a section with no rows and appends it to the keyboard.
    pub fn create_section(&mut self) -> SectionId {
        let id = self.alloc(NodeKind::Section(Section::default()));
        self.attach(ElementId::ROOT, id);
        SectionId(id)
    }

    /// Creates a key at `(column, row)` of `section` and appends it.
    ///
    /// Fails if the section does not exist or the position lies outside its
    /// row grid.
    pub fn create_key(
        &mut self,
        section: SectionId,
        column: usize,
        row: usize,
    ) -> Result<KeyId, ModelError> {
        self.section(section)
            .ok_or_else(|| ModelError::unknown(section, "section"))?
            .check_position(column, row)?;

        let id = self.alloc(NodeKind::Key(Key::at(column, row)));
        self.attach(section.element(), id);
        Ok(KeyId(id))
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        match &self.node(id.element())?.kind {
            NodeKind::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        match &mut self.node_mut(id.element())?.kind {
            NodeKind::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn key(&self, id: KeyId) -> Option<&Key> {
        match &self.node(id.element())?.kind {
            NodeKind::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn key_mut(&mut self, id: KeyId) -> Option<&mut Key> {
        match &mut self.node_mut(id.element())?.kind {
            NodeKind::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Typed handle for `id` if it names a section.
    pub fn as_section(&self, id: ElementId) -> Option<SectionId> {
        self.section(SectionId(id)).map(|_| SectionId(id))
    }

    /// Typed handle for `id` if it names a key.
    pub fn as_key(&self, id: ElementId) -> Option<KeyId> {
        self.key(KeyId(id)).map(|_| KeyId(id))
    }

    /// Attached sections in child order.
    pub fn sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.children(ElementId::ROOT)
            .iter()
            .filter_map(|&id| self.as_section(id))
    }

    /// Keys of `section` in child order.
    pub fn section_keys(&self, section: SectionId) -> impl Iterator<Item = KeyId> + '_ {
        self.children(section.element())
            .iter()
            .filter_map(|&id| self.as_key(id))
    }

    /// Every attached key, section by section.
    pub fn keys(&self) -> impl Iterator<Item = (SectionId, KeyId)> + '_ {
        self.sections().flat_map(move |section| {
            self.section_keys(section).map(move |key| (section, key))
        })
    }

    /// Section currently holding `key`.
    pub fn section_of(&self, key: KeyId) -> Option<SectionId> {
        let parent = self.element(key)?.parent()?;
        self.as_section(parent)
    }

    /// First attached key with `keycode`.
    pub fn find_key_by_keycode(&self, keycode: u32) -> Option<KeyId> {
        self.keys()
            .map(|(_, key)| key)
            .find(|&key| self.key(key).is_some_and(|k| k.keycode() == keycode))
    }

    // ------------------------------------------------------------------------
    // Container operations
    // ------------------------------------------------------------------------

    fn attach(&mut self, parent: ElementId, child: ElementId) {
        if let Some(container) = self.nodes[parent.index()].kind.container_mut() {
            container.push(child);
        }
        self.nodes[child.index()].element.set_parent(Some(parent));
        self.listeners
            .emit(&KeyboardEvent::ChildAdded { parent, child });
    }

    /// Appends `child` to the container `parent`.
    ///
    /// The keyboard accepts sections and sections accept keys. Fails if the
    /// child already has a parent.
    pub fn add_child(
        &mut self,
        parent: impl Into<ElementId>,
        child: impl Into<ElementId>,
    ) -> Result<(), ModelError> {
        let parent = parent.into();
        let child = child.into();

        let parent_node = self
            .node(parent)
            .ok_or_else(|| ModelError::unknown(parent, "container"))?;
        let child_node = self
            .node(child)
            .ok_or_else(|| ModelError::unknown(child, "element"))?;

        let fits = matches!(
            (&parent_node.kind, &child_node.kind),
            (NodeKind::Root(_), NodeKind::Section(_)) | (NodeKind::Section(_), NodeKind::Key(_))
        );
        if !fits {
            let expected = match parent_node.kind {
                NodeKind::Root(_) => "section",
                NodeKind::Section(_) => "key",
                NodeKind::Key(_) => "no children",
            };
            return Err(ModelError::ChildKindMismatch {
                parent,
                child,
                expected,
            });
        }

        if let Some(current) = child_node.element.parent() {
            return Err(ModelError::ChildHasParent {
                child,
                parent: current,
            });
        }

        self.attach(parent, child);
        Ok(())
    }

    /// Detaches `child` from `parent`.
    ///
    /// The node stays in the arena with no parent and may be added again.
    pub fn remove_child(
        &mut self,
        parent: impl Into<ElementId>,
        child: impl Into<ElementId>,
    ) -> Result<(), ModelError> {
        let parent = parent.into();
        let child = child.into();

        let node = self
            .node_mut(parent)
            .ok_or_else(|| ModelError::unknown(parent, "container"))?;
        let removed = node
            .kind
            .container_mut()
            .is_some_and(|container| container.remove(child));
        if !removed {
            return Err(ModelError::NotAChild { parent, child });
        }

        if let Some(node) = self.node_mut(child) {
            node.element.set_parent(None);
        }
        self.listeners
            .emit(&KeyboardEvent::ChildRemoved { parent, child });
        Ok(())
    }

    /// Children of `parent` in insertion order; empty for keys and unknown ids.
    pub fn children(&self, parent: impl Into<ElementId>) -> &[ElementId] {
        self.node(parent.into())
            .and_then(|node| node.kind.container())
            .map(Container::children)
            .unwrap_or(&[])
    }

    pub fn foreach_child(&self, parent: impl Into<ElementId>, f: impl FnMut(ElementId)) {
        self.children(parent).iter().copied().for_each(f);
    }

    /// First child of `parent` for which `predicate` holds.
    pub fn find_child(
        &self,
        parent: impl Into<ElementId>,
        mut predicate: impl FnMut(ElementId, &Element) -> bool,
    ) -> Option<ElementId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.element(id).is_some_and(|element| predicate(id, element)))
    }

    /// Position of `id` in the keyboard's coordinate space, obtained by
    /// summing bounds origins up the parent chain (root included).
    pub fn get_absolute_position(&self, id: impl Into<ElementId>) -> Option<Point> {
        let mut current = Some(id.into());
        let mut position = Point::new(0.0, 0.0);
        let mut steps = 0;

        while let Some(id) = current {
            let element = self.element(id)?;
            let bounds = element.bounds();
            position = position.translated(bounds.x, bounds.y);
            current = element.parent();

            steps += 1;
            if steps > self.nodes.len() {
                return None;
            }
        }

        Some(position)
    }

    // ------------------------------------------------------------------------
    // Symbol index
    // ------------------------------------------------------------------------

    /// Sets the global group and level.
    ///
    /// Both must be non-negative. Emits `SymbolIndexChanged` when the pair
    /// actually changes.
    pub fn set_symbol_index(&mut self, group: i32, level: i32) -> Result<(), ModelError> {
        if group < 0 || level < 0 {
            return Err(ModelError::InvalidIndex { group, level });
        }
        self.update_symbol_index(group, level);
        Ok(())
    }

    pub fn get_symbol_index(&self) -> SymbolIndex {
        SymbolIndex::new(self.group, self.level)
    }

    pub fn group(&self) -> i32 {
        self.group
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    fn update_symbol_index(&mut self, group: i32, level: i32) {
        if (group, level) == (self.group, self.level) {
            return;
        }
        tracing::debug!(
            "Symbol index ({}, {}) -> ({}, {})",
            self.group,
            self.level,
            group,
            level
        );
        self.group = group;
        self.level = level;
        self.listeners
            .emit(&KeyboardEvent::SymbolIndexChanged { group, level });
    }

    /// Group/level that applies to `id`.
    ///
    /// Each component comes from the nearest element (starting at `id`) that
    /// overrides it, else from the keyboard's global index.
    pub fn effective_symbol_index(&self, id: impl Into<ElementId>) -> SymbolIndex {
        let mut group = None;
        let mut level = None;
        let mut current = Some(id.into());
        let mut steps = 0;

        while let Some(id) = current {
            let Some(element) = self.element(id) else {
                break;
            };
            if group.is_none() && element.group() >= 0 {
                group = Some(element.group());
            }
            if level.is_none() && element.level() >= 0 {
                level = Some(element.level());
            }
            if group.is_some() && level.is_some() {
                break;
            }
            current = element.parent();

            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
        }

        SymbolIndex::new(group.unwrap_or(self.group), level.unwrap_or(self.level))
    }

    /// Symbol `key` currently shows, falling back to `(0, 0)` when the
    /// effective index lies outside its matrix.
    pub fn symbol_for_key(&self, key: KeyId) -> Option<&Symbol> {
        let index = self.effective_symbol_index(key);
        let group = usize::try_from(index.group).unwrap_or(0);
        let level = usize::try_from(index.level).unwrap_or(0);
        self.key(key)?.symbol_with_fallback(group, level, 0, 0)
    }

    // ------------------------------------------------------------------------
    // Modifier state machine
    // ------------------------------------------------------------------------

    pub fn get_modifiers(&self) -> ModifierMask {
        self.modifiers.modifiers()
    }

    pub fn get_modifier_behavior(&self) -> ModifierBehavior {
        self.modifiers.behavior()
    }

    /// Changes how modifier keys affect the state. Current bits are kept.
    pub fn set_modifier_behavior(&mut self, behavior: ModifierBehavior) {
        self.modifiers.set_behavior(behavior);
    }

    /// Clears every modifier and recomputes the level.
    pub fn reset_modifiers(&mut self) {
        if self.modifiers.reset() {
            self.apply_modifier_level();
        }
    }

    fn apply_modifier_level(&mut self) {
        tracing::debug!("Modifiers now {}", self.modifiers.modifiers());
        let level = self.modifiers.level();
        self.update_symbol_index(self.group, level);
    }

    fn modifier_mask_for(&self, key: KeyId) -> ModifierMask {
        self.symbol_for_key(key)
            .map(|symbol| symbol.modifier_mask)
            .unwrap_or(ModifierMask::EMPTY)
    }

    /// Emits the bubbling sequence for a key event. Returns `true` if the
    /// event reached the keyboard level.
    fn bubble(&mut self, key: KeyId, make: fn(KeyId, EventOrigin) -> KeyboardEvent) -> bool {
        self.listeners.emit(&make(key, EventOrigin::Key));

        let Some(section) = self.section_of(key) else {
            return false;
        };
        self.listeners.emit(&make(key, EventOrigin::Section(section)));

        let attached = self
            .element(section)
            .and_then(Element::parent)
            .is_some_and(|parent| parent == ElementId::ROOT);
        if attached {
            self.listeners.emit(&make(key, EventOrigin::Keyboard));
        }
        attached
    }

    /// Presses `key`: sets its pressed flag, bubbles `KeyPressed` and feeds
    /// the modifier state machine.
    ///
    /// With [`ModifierBehavior::Latch`], pressing a key whose symbol carries
    /// no modifier clears the latched bits once the press has bubbled.
    pub fn on_key_pressed(&mut self, key: KeyId) -> Result<(), ModelError> {
        self.key_mut(key)
            .ok_or_else(|| ModelError::unknown(key, "key"))?
            .set_pressed(true);

        if !self.bubble(key, |key, origin| KeyboardEvent::KeyPressed { key, origin }) {
            return Ok(());
        }

        let mask = self.modifier_mask_for(key);
        let changed = if mask.is_empty() {
            self.modifiers.clear_latched()
        } else {
            self.modifiers.press(mask)
        };
        if changed {
            self.apply_modifier_level();
        }
        Ok(())
    }

    /// Releases `key`. Only momentary modifiers clear on release.
    pub fn on_key_released(&mut self, key: KeyId) -> Result<(), ModelError> {
        self.key_mut(key)
            .ok_or_else(|| ModelError::unknown(key, "key"))?
            .set_pressed(false);

        if !self.bubble(key, |key, origin| KeyboardEvent::KeyReleased { key, origin }) {
            return Ok(());
        }

        let mask = self.modifier_mask_for(key);
        if self.modifiers.release(mask) {
            self.apply_modifier_level();
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------------

    /// Registers `listener` for every keyboard event.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&KeyboardEvent) -> Listening + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn num_listeners(&self) -> usize {
        self.listeners.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
