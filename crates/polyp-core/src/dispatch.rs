//! Keyboard command dispatch.
//!
//! Physical key names (`F12`, `F1`, ...) resolve to logical [`Key`]s through
//! [`KeyBindings`]; a [`KeyEvent`] (logical key plus modifiers) maps to exactly
//! one [`Command`], which the [`Dispatcher`] runs against a [`SessionStore`].
//!
//! | Event               | Command            |
//! |---------------------|--------------------|
//! | next-patient        | `NavigateNext`     |
//! | shift+next-patient  | `NavigatePrevious` |
//! | mark-adenomatous    | `Increment(Adenomatous)` |
//! | mark-serrated       | `Increment(Serrated)` |
//! | scan-page           | `Scan`             |
//! | reset               | `ResetPatient`     |
//! | ctrl+reset          | `ResetAll`         |

use std::collections::BTreeMap;
use std::fmt;

use polyp_model::Category;
use tracing::debug;

use crate::error::DispatchError;
use crate::session::SessionStore;

/// Logical keys understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    NextPatient,
    MarkAdenomatous,
    MarkSerrated,
    ScanPage,
    Reset,
}

impl Key {
    pub const ALL: [Key; 5] = [
        Key::NextPatient,
        Key::MarkAdenomatous,
        Key::MarkSerrated,
        Key::ScanPage,
        Key::Reset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::NextPatient => "next-patient",
            Key::MarkAdenomatous => "mark-adenomatous",
            Key::MarkSerrated => "mark-serrated",
            Key::ScanPage => "scan-page",
            Key::Reset => "reset",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Parse a chord such as `F12`, `shift+F12` or `Ctrl+F4`.
    ///
    /// Modifier and key names are case-insensitive. `control` is accepted as
    /// an alias for `ctrl`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty chord, an unknown modifier or a key name
    /// with no binding.
    pub fn parse(chord: &str, bindings: &KeyBindings) -> Result<Self, DispatchError> {
        let mut parts: Vec<&str> = chord.split('+').map(str::trim).collect();
        let name = parts.pop().unwrap_or_default();
        if name.is_empty() {
            return Err(DispatchError::EmptyChord);
        }
        let mut modifiers = Modifiers::NONE;
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                _ => return Err(DispatchError::UnknownModifier(part.to_string())),
            }
        }
        let key = bindings
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownKey(name.to_string()))?;
        Ok(Self::new(key, modifiers))
    }
}

/// Physical key name to logical key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    by_name: BTreeMap<String, Key>,
}

impl Default for KeyBindings {
    /// Function-key layout: F12 next, F1 adenomatous, F2 serrated, F3 scan,
    /// F4 reset.
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind("F12", Key::NextPatient);
        bindings.bind("F1", Key::MarkAdenomatous);
        bindings.bind("F2", Key::MarkSerrated);
        bindings.bind("F3", Key::ScanPage);
        bindings.bind("F4", Key::Reset);
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            by_name: BTreeMap::new(),
        }
    }

    /// Bind `name` to `key`, replacing any earlier binding for that name.
    pub fn bind(&mut self, name: &str, key: Key) {
        self.by_name.insert(name.trim().to_ascii_lowercase(), key);
    }

    pub fn lookup(&self, name: &str) -> Option<Key> {
        self.by_name.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// Names bound to `key`, in sorted order.
    pub fn names_for(&self, key: Key) -> impl Iterator<Item = &str> + '_ {
        self.by_name
            .iter()
            .filter(move |(_, bound)| **bound == key)
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NavigateNext,
    NavigatePrevious,
    Increment(Category),
    Scan,
    ResetPatient,
    ResetAll,
}

impl Command {
    pub fn from_event(event: &KeyEvent) -> Self {
        match event.key {
            Key::NextPatient if event.modifiers.shift => Command::NavigatePrevious,
            Key::NextPatient => Command::NavigateNext,
            Key::MarkAdenomatous => Command::Increment(Category::Adenomatous),
            Key::MarkSerrated => Command::Increment(Category::Serrated),
            Key::ScanPage => Command::Scan,
            Key::Reset if event.modifiers.ctrl => Command::ResetAll,
            Key::Reset => Command::ResetPatient,
        }
    }
}

/// Supplies the currently visible page text. Read again on every scan.
pub trait PageSource {
    fn visible_text(&self) -> String;
}

impl PageSource for &str {
    fn visible_text(&self) -> String {
        (*self).to_string()
    }
}

impl PageSource for String {
    fn visible_text(&self) -> String {
        self.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    bindings: KeyBindings,
}

impl Dispatcher {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Run the command for `event` against `store`.
    ///
    /// # Errors
    ///
    /// Propagates session errors raised under the reject policies.
    pub fn dispatch(
        &self,
        store: &mut SessionStore,
        event: &KeyEvent,
        page: &dyn PageSource,
    ) -> Result<Command, DispatchError> {
        let command = Command::from_event(event);
        let current = store.current().get();
        debug!(key = %event.key, ?command, patient = current, "dispatch");
        match command {
            Command::NavigateNext => {
                store.navigate_next();
            }
            Command::NavigatePrevious => {
                store.navigate_previous();
            }
            Command::Increment(category) => {
                store.increment(current, category)?;
            }
            Command::Scan => {
                store.scan(current, &page.visible_text())?;
            }
            Command::ResetPatient => {
                store.reset_patient(current)?;
            }
            Command::ResetAll => store.reset_all(),
        }
        Ok(command)
    }

    /// Parse `chord` with this dispatcher's bindings and run it.
    ///
    /// # Errors
    ///
    /// Parse failures and session errors.
    pub fn dispatch_chord(
        &self,
        store: &mut SessionStore,
        chord: &str,
        page: &dyn PageSource,
    ) -> Result<Command, DispatchError> {
        let event = KeyEvent::parse(chord, &self.bindings)?;
        self.dispatch(store, &event, page)
    }
}
