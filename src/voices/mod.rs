//! Управление голосами: каталог, загрузка, кэш ресурсов синтеза.

pub mod cache;
pub mod catalog;
pub mod downloader;
pub mod engine;

pub use cache::VoiceAssetCache;
pub use engine::{ExecutionMode, VoiceLoader, VoiceModel, VoiceResource};
