//! Translation service adapter.
//!
//! * [`Translator`] — async trait implemented by translation backends.
//! * [`HttpTranslator`] — REST adapter for any endpoint speaking the
//!   `/translate_a/single` wire format.
//! * [`TranslateError`] — error variants for translation calls.

pub mod client;

pub use client::{HttpTranslator, TranslateError, Translator};
