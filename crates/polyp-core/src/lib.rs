//! Polyp counter engine.
//!
//! Report text flows through [`normalize`], is counted per category by a
//! [`Classifier`] built from the [`PatternRegistry`], and the counts land in
//! the patient records owned by a [`SessionStore`]. A [`Dispatcher`] maps key
//! events onto store operations.

pub mod classify;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod patterns;
pub mod session;

pub use classify::{Classifier, compile_set, count_with, term_source};
pub use dispatch::{Command, Dispatcher, Key, KeyBindings, KeyEvent, Modifiers, PageSource};
pub use error::{DispatchError, PatternError, SessionError};
pub use normalize::normalize;
pub use patterns::{PatternRegistry, adenomatous_polyps, serrated_polyps};
pub use session::{
    IgnoreReason, NoopSave, Outcome, RefreshListener, RemoteUpdate, SaveHook, SessionStore,
};
