//! Общие типы данных конвейера: сегменты, реплики диаризации,
//! назначение голосов по спикерам.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Одна реплика спикера после диаризации и перевода.
///
/// Времена заданы в секундах относительно таймлайна исходной записи.
/// Сегменты создаются один раз (диаризация + перевод) и далее неизменны.
/// Порядок следования не гарантирован: диаризация может выдавать реплики
/// не по хронологии, сборщик таймлайна сортирует рабочую копию сам.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    /// Начальное время в секундах
    pub start: f32,
    /// Конечное время в секундах
    pub end: f32,
    /// Стабильная метка спикера (например, "SPEAKER_00")
    pub speaker: String,
    /// Переведенный текст для озвучивания; может быть пустым
    pub translated_text: String,
}

impl Segment {
    /// Создает новый сегмент
    pub fn new(start: f32, end: f32, speaker: impl Into<String>, translated_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker: speaker.into(),
            translated_text: translated_text.into(),
        }
    }

    /// Длительность исходной реплики в секундах
    pub fn original_duration(&self) -> f32 {
        self.end - self.start
    }
}

/// Реплика, выданная диаризацией, еще без текста.
#[derive(Clone, Debug)]
pub struct DiarizedTurn {
    /// Начальное время в секундах
    pub start: f32,
    /// Конечное время в секундах
    pub end: f32,
    /// Метка спикера
    pub speaker: String,
}

/// Назначение голоса каждому спикеру.
///
/// Спикер без записи в карте пропускается при синтезе.
pub type VoiceMapping = HashMap<String, String>;

/// Возвращает отсортированный список уникальных меток спикеров.
pub fn distinct_speakers(segments: &[Segment]) -> Vec<String> {
    let mut speakers: Vec<String> = segments.iter().map(|s| s.speaker.clone()).collect();
    speakers.sort();
    speakers.dedup();
    speakers
}

/// Сортирует сегменты по возрастанию начального времени.
pub fn sort_chronologically(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal));
}
