//! Этапы конвейера: диаризация с переводом, синтез сегментов,
//! сборка таймлайна.

pub mod synthesis;
pub mod timeline;
pub mod transcribe;

pub use synthesis::SegmentSynthesizer;
pub use timeline::{TimelineAssembler, TimelineEntry};
pub use transcribe::{process_recording, Diarizer, SpeechTranslator};
