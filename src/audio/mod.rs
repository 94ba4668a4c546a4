//! Работа с аудиоданными: PCM-дорожки, кодирование и декодирование форматов.

pub mod format;
pub mod track;

pub use track::AudioTrack;
