//! # Сборка таймлайна
//!
//! Модуль восстанавливает одну непрерывную аудиодорожку из независимо
//! синтезированных сегментов и вычисленных пауз между ними.
//!
//! ## Алгоритм
//!
//! Сегменты обрабатываются в хронологическом порядке (рабочая копия
//! сортируется по началу — порядок на входе не гарантирован). Курсор
//! хранит конец уже собранной дорожки в секундах:
//!
//! 1. `gap = начало сегмента - курсор`. Положительный gap заполняется
//!    тишиной. Отрицательный (перекрытие или предыдущий синтез длиннее
//!    исходного слота) не обрезается и не микшируется — сегмент
//!    добавляется встык, gap приравнивается к нулю.
//! 2. Добавляется синтезированная дорожка сегмента (или ничего, если
//!    голос не назначен либо синтез не удался — дыру закроет gap
//!    следующего сегмента).
//! 3. `курсор = начало сегмента + длительность синтезированной дорожки`.
//!    Курсор следует за синтезированной длительностью, а не за исходным
//!    концом сегмента: переведенная речь почти никогда не совпадает по
//!    длине с оригиналом, и накопленный дрейф относительно исходной
//!    записи — осознанное поведение.
//!
//! Дорожки с несовпадающей нативной частотой по умолчанию добавляются
//! как есть (известное ограничение, см. [`crate::config::AssemblerConfig`]).

use std::cmp::Ordering;

use log::{debug, warn};

use crate::audio::{format, AudioTrack};
use crate::config::AssemblerConfig;
use crate::error::Result;
use crate::segment::Segment;

/// Фрагмент таймлайна: сегмент и его синтезированная дорожка.
///
/// `None` означает пропуск (голос не назначен или синтез не удался) и
/// обрабатывается так же, как пустая дорожка.
#[derive(Debug)]
pub struct TimelineEntry {
    /// Сегмент исходной записи
    pub segment: Segment,
    /// Синтезированная дорожка (если есть)
    pub track: Option<AudioTrack>,
}

/// Сборщик таймлайна.
pub struct TimelineAssembler {
    config: AssemblerConfig,
}

impl TimelineAssembler {
    /// Создает сборщик с заданной конфигурацией
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Собирает одну непрерывную дорожку из фрагментов таймлайна.
    ///
    /// Частота дискретизации результата берется из первой непустой
    /// дорожки в хронологическом порядке.
    pub fn assemble(&self, mut entries: Vec<TimelineEntry>) -> Result<AudioTrack> {
        entries.sort_by(|a, b| {
            a.segment
                .start
                .partial_cmp(&b.segment.start)
                .unwrap_or(Ordering::Equal)
        });

        let sample_rate = entries
            .iter()
            .filter_map(|e| e.track.as_ref())
            .find(|t| !t.is_empty())
            .map(|t| t.sample_rate)
            .unwrap_or(self.config.fallback_sample_rate);

        let mut output = AudioTrack::new(sample_rate);
        let mut cursor: f32 = 0.0;

        for entry in &entries {
            let segment = &entry.segment;

            let gap = segment.start - cursor;
            if gap > 0.0 {
                output.append_silence(gap);
            } else if gap < 0.0 {
                debug!(
                    "Segment at {:.2}s overlaps assembled audio by {:.2}s, appending back-to-back",
                    segment.start, -gap
                );
            }

            let mut appended_duration = 0.0;
            if let Some(track) = &entry.track {
                if !track.is_empty() {
                    if track.sample_rate == sample_rate {
                        output.append_samples(&track.samples);
                        appended_duration = track.duration_seconds();
                    } else if self.config.resample_mismatched {
                        let resampled =
                            format::resample(&track.samples, track.sample_rate, sample_rate)?;
                        appended_duration = resampled.len() as f32 / sample_rate as f32;
                        output.append_samples(&resampled);
                    } else {
                        // Известное ограничение: без пересэмплирования дорожка
                        // звучит с неверной скоростью
                        warn!(
                            "Track at {:.2}s has native rate {} Hz, output is {} Hz; appending verbatim",
                            segment.start, track.sample_rate, sample_rate
                        );
                        output.append_samples(&track.samples);
                        appended_duration = track.samples.len() as f32 / sample_rate as f32;
                    }
                }
            }

            cursor = segment.start + appended_duration;
        }

        Ok(output)
    }
}
