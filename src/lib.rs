//! Основной файл библиотеки voicenova
//!
//! Библиотека переозвучивает многоголосую запись на другом языке:
//! разбивает запись на реплики спикеров, переводит каждую реплику,
//! синтезирует перевод назначенным голосом и собирает одну непрерывную
//! дорожку с сохранением исходной временной структуры разговора.
//!
//! Модели диаризации, перевода и синтеза — внешние коллабораторы за
//! трейтами ([`pipeline::Diarizer`], [`pipeline::SpeechTranslator`],
//! [`voices::VoiceLoader`]); конвейер отвечает за порядок, тайминги,
//! паузы и кэширование голосовых ресурсов.

pub mod audio;
pub mod config;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod progress;
pub mod segment;
pub mod voices;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

pub use config::{AssemblerConfig, PipelineConfig};
pub use error::{PipelineError, Result};
pub use progress::ProgressUpdate;
pub use segment::{DiarizedTurn, Segment, VoiceMapping};

use crate::pipeline::transcribe::{self, Diarizer, SpeechTranslator};
use crate::pipeline::{SegmentSynthesizer, TimelineAssembler, TimelineEntry};
use crate::progress::send_progress;
use crate::segment::distinct_speakers;
use crate::voices::{VoiceAssetCache, VoiceLoader, VoiceResource};

/// Конвейер переозвучивания.
///
/// Держит конфигурацию и загрузчик голосов; каждый вызов
/// [`synthesize_and_combine`](Self::synthesize_and_combine) — один
/// независимый запуск со своим кэшем голосов и своим именем выходного
/// файла.
pub struct ReassemblyPipeline {
    /// Конфигурация конвейера
    config: PipelineConfig,
    /// Загрузчик голосовых ресурсов (движок синтеза)
    voice_loader: Arc<dyn VoiceLoader>,
    /// Отправитель обновлений прогресса
    progress_sender: Option<Sender<ProgressUpdate>>,
}

impl ReassemblyPipeline {
    /// Создает конвейер с указанной конфигурацией
    pub fn new(config: PipelineConfig, voice_loader: Arc<dyn VoiceLoader>) -> Self {
        Self {
            config,
            voice_loader,
            progress_sender: None,
        }
    }

    /// Создает конвейер с отправителем обновлений прогресса
    pub fn with_progress_sender(
        config: PipelineConfig,
        voice_loader: Arc<dyn VoiceLoader>,
        sender: Sender<ProgressUpdate>,
    ) -> Self {
        Self {
            config,
            voice_loader,
            progress_sender: Some(sender),
        }
    }

    /// Первый шаг: диаризация и перевод исходной записи.
    ///
    /// Возвращает сегменты в порядке выдачи диаризации; пустой список
    /// означает, что речь не обнаружена.
    pub async fn process_recording(
        &self,
        audio_path: &Path,
        expected_speakers: usize,
        source_lang: &str,
        target_lang: &str,
        diarizer: &dyn Diarizer,
        translator: &dyn SpeechTranslator,
    ) -> Result<Vec<Segment>> {
        transcribe::process_recording(
            audio_path,
            expected_speakers,
            source_lang,
            target_lang,
            diarizer,
            translator,
            &self.config,
            &self.progress_sender,
        )
        .await
    }

    /// Второй шаг: синтез речи и сборка финальной дорожки.
    ///
    /// Спикеры без назначенного голоса и сегменты с неудавшимся синтезом
    /// становятся тишиной; запуск падает только на пустом входе или когда
    /// не удалось загрузить ни один из запрошенных голосов.
    pub async fn synthesize_and_combine(
        &self,
        segments: &[Segment],
        voice_mapping: &VoiceMapping,
    ) -> Result<PathBuf> {
        if segments.is_empty() {
            return Err(PipelineError::NoSegments);
        }

        send_progress(&self.progress_sender, ProgressUpdate::Started).await;
        info!("Synthesizing speech and combining audio...");

        // Шаг 1: загружаем каждый запрошенный голос ровно один раз
        let mut cache = VoiceAssetCache::new(self.config.voices_dir.clone(), Arc::clone(&self.voice_loader));
        let mut voices: HashMap<String, Arc<dyn VoiceResource>> = HashMap::new();
        let mut requested_voices = 0;

        for speaker in distinct_speakers(segments) {
            let voice_id = match voice_mapping.get(&speaker).filter(|id| !id.is_empty()) {
                Some(id) => id,
                // Спикер без назначенного голоса — его сегменты станут тишиной
                None => continue,
            };
            requested_voices += 1;

            match cache.resolve(voice_id) {
                Ok(resource) => {
                    voices.insert(speaker, resource);
                }
                Err(e) => {
                    warn!(
                        "Voice '{}' for speaker '{}' could not be resolved: {} — segments will be silent",
                        voice_id, speaker, e
                    );
                }
            }
        }

        if requested_voices > 0 && voices.is_empty() {
            return Err(PipelineError::AllVoicesUnavailable);
        }

        // Шаг 2: синтезируем каждый сегмент в порядке поступления
        let mut synthesizer = SegmentSynthesizer::new();
        let total = segments.len();
        let mut entries = Vec::with_capacity(total);

        for (i, segment) in segments.iter().enumerate() {
            send_progress(
                &self.progress_sender,
                ProgressUpdate::Synthesis {
                    current: i + 1,
                    total,
                },
            )
            .await;

            let track = voices
                .get(&segment.speaker)
                .and_then(|voice| synthesizer.synthesize(&segment.translated_text, voice));

            entries.push(TimelineEntry {
                segment: segment.clone(),
                track,
            });
        }

        // Шаг 3: собираем таймлайн в хронологическом порядке
        send_progress(&self.progress_sender, ProgressUpdate::Assembling).await;
        let assembler = TimelineAssembler::new(self.config.assembler.clone());
        let combined = assembler.assemble(entries)?;

        // Шаг 4: сохраняем результат; имя файла уникально для запуска,
        // параллельные запуски не затирают друг друга
        send_progress(&self.progress_sender, ProgressUpdate::Encoding).await;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let output_path = self
            .config
            .output_dir
            .join(format!("translated_conversation_{}.wav", Uuid::new_v4()));
        audio::format::encode_wav(&combined.samples, combined.sample_rate, &output_path)?;

        send_progress(&self.progress_sender, ProgressUpdate::Finished).await;
        info!(
            "Reassembly finished: {} ({:.2}s, {} voices loaded)",
            output_path.display(),
            combined.duration_seconds(),
            cache.loaded_count()
        );

        Ok(output_path)
    }
}

/// Публичный API для удобного использования: один запуск с настройками
/// по умолчанию.
pub async fn synthesize_and_combine(
    segments: &[Segment],
    voice_mapping: &VoiceMapping,
    voice_loader: Arc<dyn VoiceLoader>,
) -> Result<PathBuf> {
    let pipeline = ReassemblyPipeline::new(PipelineConfig::default(), voice_loader);
    pipeline.synthesize_and_combine(segments, voice_mapping).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::{ExecutionMode, VoiceModel};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    struct FakeVoice {
        voice_id: String,
        sample_rate: u32,
    }

    impl VoiceResource for FakeVoice {
        fn voice_id(&self) -> &str {
            &self.voice_id
        }

        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn synthesize(&self, _text: &str) -> Result<Vec<f32>> {
            // Ровно одна секунда речи на любую реплику
            Ok(vec![0.5; self.sample_rate as usize])
        }
    }

    struct FakeLoader {
        load_count: AtomicUsize,
    }

    impl FakeLoader {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                load_count: AtomicUsize::new(0),
            })
        }
    }

    impl VoiceLoader for FakeLoader {
        fn load(&self, model: &VoiceModel, _mode: ExecutionMode) -> Result<Arc<dyn VoiceResource>> {
            self.load_count.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FakeVoice {
                voice_id: model.voice_id.clone(),
                sample_rate: model.sample_rate,
            }))
        }
    }

    fn install_fake_voice(dir: &Path, voice_id: &str) {
        std::fs::write(dir.join(format!("{}.onnx", voice_id)), b"model").unwrap();
        std::fs::write(
            dir.join(format!("{}.onnx.json", voice_id)),
            r#"{"audio": {"sample_rate": 22050}}"#,
        )
        .unwrap();
    }

    fn test_config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            voices_dir: root.join("voices"),
            output_dir: root.join("output"),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_empty_segments_fail_without_io() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let output_dir = config.output_dir.clone();
        let pipeline = ReassemblyPipeline::new(config, FakeLoader::new());

        let err = pipeline
            .synthesize_and_combine(&[], &VoiceMapping::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::NoSegments));
        // Выходная директория даже не создавалась
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn test_all_voices_unavailable() {
        let dir = tempdir().unwrap();
        let pipeline = ReassemblyPipeline::new(test_config(dir.path()), FakeLoader::new());

        let segments = vec![Segment::new(0.0, 2.0, "S0", "Bonjour")];
        let mut mapping = VoiceMapping::new();
        mapping.insert("S0".to_string(), "fr_FR-siwis-medium".to_string());

        let err = pipeline
            .synthesize_and_combine(&segments, &mapping)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::AllVoicesUnavailable));
    }

    #[tokio::test]
    async fn test_end_to_end_reassembly() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.voices_dir).unwrap();
        install_fake_voice(&config.voices_dir, "fr_FR-siwis-medium");
        install_fake_voice(&config.voices_dir, "fr_FR-gilles-low");

        let loader = FakeLoader::new();
        let (tx, mut rx) = mpsc::channel(100);
        let pipeline =
            ReassemblyPipeline::with_progress_sender(config, loader.clone(), tx);

        let segments = vec![
            Segment::new(0.0, 2.0, "S0", "Bonjour"),
            Segment::new(2.5, 4.0, "S1", "Salut"),
        ];
        let mut mapping = VoiceMapping::new();
        mapping.insert("S0".to_string(), "fr_FR-siwis-medium".to_string());
        mapping.insert("S1".to_string(), "fr_FR-gilles-low".to_string());

        let output_path = pipeline
            .synthesize_and_combine(&segments, &mapping)
            .await
            .unwrap();

        assert!(output_path.exists());
        assert_eq!(loader.load_count.load(Ordering::SeqCst), 2);

        // Синтез каждой реплики длится 1с: реплика S0 (1с), пауза до 2.5с
        // (1.5с тишины), реплика S1 (1с) — всего 3.5с
        let (samples, rate) = audio::format::decode_wav_file(&output_path).unwrap();
        assert_eq!(rate, 22050);
        assert_eq!(samples.len(), (3.5 * 22050.0) as usize);

        // Середина — измеримая тишина
        let gap = &samples[22050..22050 + (1.5 * 22050.0) as usize];
        assert!(audio::format::compute_rms(gap) < 0.0001);

        // Прогресс дошел от Started до Finished
        drop(pipeline);
        let mut saw_started = false;
        let mut saw_finished = false;
        let mut synthesis_updates = 0;
        while let Some(update) = rx.recv().await {
            match update {
                ProgressUpdate::Started => saw_started = true,
                ProgressUpdate::Finished => saw_finished = true,
                ProgressUpdate::Synthesis { .. } => synthesis_updates += 1,
                _ => {}
            }
        }
        assert!(saw_started);
        assert!(saw_finished);
        assert_eq!(synthesis_updates, 2);
    }

    #[tokio::test]
    async fn test_partial_voice_availability_degrades_to_silence() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.voices_dir).unwrap();
        install_fake_voice(&config.voices_dir, "fr_FR-siwis-medium");

        let pipeline = ReassemblyPipeline::new(config, FakeLoader::new());

        let segments = vec![
            Segment::new(0.0, 2.0, "S0", "Bonjour"),
            Segment::new(2.5, 4.0, "S1", "Salut"),
        ];
        let mut mapping = VoiceMapping::new();
        mapping.insert("S0".to_string(), "fr_FR-siwis-medium".to_string());
        // Голос S1 не установлен локально
        mapping.insert("S1".to_string(), "fr_FR-gilles-low".to_string());

        let output_path = pipeline
            .synthesize_and_combine(&segments, &mapping)
            .await
            .unwrap();

        // Реплика S0 (1с) + тишина до начала S1 (1.5с); пропущенный S1
        // аудио не добавляет, но двигает курсор до своего начала
        let (samples, rate) = audio::format::decode_wav_file(&output_path).unwrap();
        assert_eq!(samples.len(), (2.5 * rate as f32) as usize);
    }

    #[tokio::test]
    async fn test_speaker_without_mapping_is_skipped() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.voices_dir).unwrap();
        install_fake_voice(&config.voices_dir, "fr_FR-siwis-medium");

        let pipeline = ReassemblyPipeline::new(config, FakeLoader::new());

        let segments = vec![
            Segment::new(0.0, 2.0, "S0", "Bonjour"),
            Segment::new(3.0, 4.0, "S1", "Salut"),
        ];
        // S1 вообще не упомянут в назначении голосов
        let mut mapping = VoiceMapping::new();
        mapping.insert("S0".to_string(), "fr_FR-siwis-medium".to_string());

        let output_path = pipeline
            .synthesize_and_combine(&segments, &mapping)
            .await
            .unwrap();

        let (samples, rate) = audio::format::decode_wav_file(&output_path).unwrap();
        // 1с речи + 2с тишины до начала S1
        assert_eq!(samples.len(), (3.0 * rate as f32) as usize);
        let tail = &samples[rate as usize..];
        assert!(audio::format::compute_rms(tail) < 0.0001);
    }
}
