//! Модуль обработки ошибок библиотеки voicenova
//!
//! Этот модуль содержит типы ошибок, которые могут возникнуть при работе конвейера.

use thiserror::Error;

/// Ошибки конвейера voicenova
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Файлы запрошенного голоса не найдены локально
    #[error("Voice '{0}' is not available locally")]
    VoiceUnavailable(String),

    /// Ни один из запрошенных голосов не удалось загрузить
    #[error("None of the requested voices could be resolved")]
    AllVoicesUnavailable,

    /// Ошибка движка синтеза речи для конкретной пары текст/голос
    #[error("Speech synthesis error: {0}")]
    SynthesisFailure(String),

    /// Диаризация не дала ни одного сегмента
    #[error("No speech segments to process")]
    NoSegments,

    /// Недопустимая пара языков для модели перевода
    #[error("Translation is only supported to or from English, got '{src}' -> '{target}'")]
    UnsupportedLanguagePair { src: String, target: String },

    /// Ошибка диаризации
    #[error("Diarization error: {0}")]
    Diarization(String),

    /// Ошибка перевода
    #[error("Translation error: {0}")]
    Translation(String),

    /// Ошибка загрузки голоса из удаленного каталога
    #[error("Voice download error: {0}")]
    Download(String),

    /// Ошибка аудио-обработки
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// Ошибка WAV-кодирования
    #[error("WAV encoding error: {0}")]
    WavEncoding(#[from] hound::Error),

    /// Ошибка WAV-декодирования
    #[error("WAV decoding error: {0}")]
    WavDecoding(hound::Error),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка HTTP запроса
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Другая ошибка
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Тип Result для всей библиотеки
pub type Result<T> = std::result::Result<T, PipelineError>;
