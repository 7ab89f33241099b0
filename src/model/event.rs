// SPDX-License-Identifier: GPL-3.0-only

//! Synchronous keyboard notifications.
//!
//! Listeners are plain closures registered on the keyboard. Events are
//! delivered in registration order, on the caller's stack, before the
//! mutating call returns. A key press bubbles as three `KeyPressed` events
//! (origin key, then section, then keyboard), followed by the modifier
//! update and, if the symbol index moved, a `SymbolIndexChanged` event.

use std::fmt;

use crate::model::element::ElementId;
use crate::model::key::KeyId;
use crate::model::section::SectionId;

/// Level of the tree that (re-)emitted a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOrigin {
    Key,
    Section(SectionId),
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    KeyPressed { key: KeyId, origin: EventOrigin },
    KeyReleased { key: KeyId, origin: EventOrigin },
    /// The keyboard's global `(group, level)` changed.
    SymbolIndexChanged { group: i32, level: i32 },
    ChildAdded { parent: ElementId, child: ElementId },
    ChildRemoved { parent: ElementId, child: ElementId },
}

/// Returned by a listener to stay subscribed or drop out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listening {
    Continue,
    Stop,
}

/// Token identifying a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&KeyboardEvent) -> Listening>;

/// Ordered list of listeners.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Removes a subscription; returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        before != self.entries.len()
    }

    /// Delivers `event` to every listener, dropping those that return
    /// [`Listening::Stop`].
    pub fn emit(&mut self, event: &KeyboardEvent) {
        self.entries
            .retain_mut(|(_, listener)| listener(event) == Listening::Continue);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
