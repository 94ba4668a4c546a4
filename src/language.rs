//! Поддерживаемые языки перевода.
//!
//! Модель перевода работает только в паре с английским: либо исходный,
//! либо целевой язык должен быть "en".

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{PipelineError, Result};

/// Таблица поддерживаемых языков: отображаемое имя -> двухбуквенный код
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("French", "fr"),
    ("German", "de"),
    ("Spanish", "es"),
    ("Italian", "it"),
    ("Portuguese", "pt"),
    ("Dutch", "nl"),
    ("Polish", "pl"),
    ("Russian", "ru"),
    ("Swedish", "sv"),
    ("Ukrainian", "uk"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Finnish", "fi"),
    ("Greek", "el"),
    ("Hungarian", "hu"),
    ("Latvian", "lv"),
    ("Romanian", "ro"),
    ("Slovak", "sk"),
    ("Slovenian", "sl"),
];

static LANGUAGE_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SUPPORTED_LANGUAGES.iter().copied().collect());

/// Возвращает код языка по отображаемому имени.
pub fn language_code(name: &str) -> Option<&'static str> {
    LANGUAGE_INDEX.get(name).copied()
}

/// Проверяет, что пара языков поддерживается моделью перевода.
///
/// Оба кода не могут одновременно отличаться от "en".
pub fn validate_language_pair(source: &str, target: &str) -> Result<()> {
    if source != "en" && target != "en" {
        return Err(PipelineError::UnsupportedLanguagePair {
            src: source.to_string(),
            target: target.to_string(),
        });
    }
    Ok(())
}
