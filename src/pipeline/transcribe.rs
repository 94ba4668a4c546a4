//! Этап диаризации и перевода исходной записи.
//!
//! Модели диаризации и перевода — внешние коллабораторы за трейтами:
//! конвейер готовит для них данные (нормализованная запись, нарезанные
//! реплики) и собирает результат в упорядоченный список сегментов.

use std::path::Path;

use async_trait::async_trait;
use log::info;
use tokio::sync::mpsc::Sender;

use crate::audio::format;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::language::validate_language_pair;
use crate::progress::{send_progress, ProgressUpdate};
use crate::segment::{DiarizedTurn, Segment};

/// Коллаборатор диаризации: разбивает запись на реплики спикеров.
///
/// Реплики могут приходить не в хронологическом порядке и с перекрытиями;
/// непрерывное покрытие записи не гарантируется.
#[async_trait]
pub trait Diarizer: Send + Sync {
    /// Диаризует запись на заданное число спикеров
    async fn diarize(&self, audio_path: &Path, expected_speakers: usize) -> Result<Vec<DiarizedTurn>>;
}

/// Коллаборатор перевода: транскрибирует и переводит фрагмент записи.
#[async_trait]
pub trait SpeechTranslator: Send + Sync {
    /// Переводит речь из файла-фрагмента с исходного языка на целевой
    async fn transcribe_translate(
        &self,
        chunk_path: &Path,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String>;
}

/// Выполняет диаризацию и перевод исходной записи.
///
/// Запись декодируется в моно и приводится к частоте
/// `config.decode_sample_rate`; каждая реплика вырезается и передается
/// переводчику через временный WAV-файл (файлы удаляются вместе с
/// директорией при выходе из функции на любом пути).
///
/// Возвращает сегменты в порядке выдачи диаризации (не обязательно
/// хронологическом); пустая выдача диаризации дает пустой список, а не
/// ошибку.
pub async fn process_recording(
    audio_path: &Path,
    expected_speakers: usize,
    source_lang: &str,
    target_lang: &str,
    diarizer: &dyn Diarizer,
    translator: &dyn SpeechTranslator,
    config: &PipelineConfig,
    progress_sender: &Option<Sender<ProgressUpdate>>,
) -> Result<Vec<Segment>> {
    validate_language_pair(source_lang, target_lang)?;

    info!("Preprocessing audio ({} Hz, mono)...", config.decode_sample_rate);
    let (samples, source_rate) = format::decode_audio_file(audio_path)?;
    let samples = if source_rate != config.decode_sample_rate {
        format::resample(&samples, source_rate, config.decode_sample_rate)?
    } else {
        samples
    };
    let rate = config.decode_sample_rate;

    // Временная директория переживает весь этап и удаляется при выходе
    let temp_dir = tempfile::tempdir()?;
    let normalized_path = temp_dir.path().join("normalized_input.wav");
    format::encode_wav(&samples, rate, &normalized_path)?;

    info!("Diarization in progress...");
    send_progress(progress_sender, ProgressUpdate::Diarization).await;
    let turns = diarizer.diarize(&normalized_path, expected_speakers).await?;

    if turns.is_empty() {
        info!("No speech segments were detected");
        return Ok(Vec::new());
    }

    info!("Translating {} segments...", turns.len());
    let total = turns.len();
    let mut segments = Vec::with_capacity(total);

    for (i, turn) in turns.iter().enumerate() {
        send_progress(
            progress_sender,
            ProgressUpdate::Translation {
                current: i + 1,
                total,
            },
        )
        .await;

        let start_index = ((turn.start * rate as f32) as usize).min(samples.len());
        let end_index = ((turn.end * rate as f32) as usize).clamp(start_index, samples.len());
        let chunk = &samples[start_index..end_index];

        let chunk_path = temp_dir.path().join(format!("chunk_{}.wav", i));
        format::encode_wav(chunk, rate, &chunk_path)?;

        let translated_text = translator
            .transcribe_translate(&chunk_path, source_lang, target_lang)
            .await?;

        segments.push(Segment {
            start: turn.start,
            end: turn.end,
            speaker: turn.speaker.clone(),
            translated_text,
        });
    }

    Ok(segments)
}
