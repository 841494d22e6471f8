//! # Interaction narratives
//!
//! Turns every drug-gene interaction of a report into a short plain-language
//! explanation. A [`TextGenerator`] is asked first; whenever it fails, times
//! out, is cancelled or is switched off, a deterministic narrative chosen by
//! risk tier is used instead. Narratives are never empty.

pub mod cancel;
pub mod error;
pub mod fallback;
pub mod fanout;
pub mod generator;
pub mod http;
pub mod prompt;

pub use cancel::{CancelHandle, CancelSignal};
pub use error::GenerationError;
pub use fallback::fallback_text;
pub use fanout::{NarrativeConfig, NarrativeGenerator};
pub use generator::{DisabledGenerator, TextGenerator};
pub use http::{DEFAULT_API_KEY_ENV, HttpGeneratorConfig, HttpTextGenerator};
pub use prompt::{NarrativeContext, Prompt};
