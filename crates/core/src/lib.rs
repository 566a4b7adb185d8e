//! Poetry Muse core: persona lookup, poem generation, keyword emotion
//! scoring, and read-aloud support. Presentation, history, and archiving
//! live in the `muse-service` crate.

pub mod emotion;
pub mod llm_client;
pub mod speech;
pub mod style;

pub use emotion::{Emotion, EmotionProfile};
pub use llm_client::{GenerationError, Muse, OllamaClient, OllamaConfig, PoemGenerator};
pub use speech::{SpeechBackend, SpeechJob, Speaker};
pub use style::StylePersona;
