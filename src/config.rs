//! Конфигурация конвейера.

use std::path::PathBuf;

/// Конфигурация сборщика таймлайна
#[derive(Clone, Debug)]
pub struct AssemblerConfig {
    /// Частота дискретизации результата, если ни один сегмент не дал аудио
    pub fallback_sample_rate: u32,
    /// Пересэмплировать ли дорожки с несовпадающей нативной частотой.
    ///
    /// По умолчанию выключено: дорожка добавляется как есть с предупреждением
    /// в логе. Это сохраняет поведение исходной реализации и задокументировано
    /// как известное ограничение.
    pub resample_mismatched: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            fallback_sample_rate: 22050,
            resample_mismatched: false,
        }
    }
}

/// Конфигурация конвейера
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Директория с локально установленными голосами
    pub voices_dir: PathBuf,
    /// Директория для финальных аудиофайлов
    pub output_dir: PathBuf,
    /// Частота дискретизации, к которой приводится входная запись
    /// перед диаризацией (модели ожидают 16 кГц моно)
    pub decode_sample_rate: u32,
    /// Настройки сборщика таймлайна
    pub assembler: AssemblerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            voices_dir: PathBuf::from("voices"),
            output_dir: PathBuf::from("output"),
            decode_sample_rate: 16000,
            assembler: AssemblerConfig::default(),
        }
    }
}
