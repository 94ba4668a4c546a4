//! Интерфейс движка синтеза речи.
//!
//! Сам движок — внешний коллаборатор: конвейер видит только загруженный
//! голосовой ресурс, умеющий превращать текст в PCM-семплы. Конкретная
//! реализация подставляется вызывающим кодом через трейт [`VoiceLoader`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Режим исполнения голосовой модели
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Аппаратное ускорение (GPU)
    Accelerated,
    /// Обычное исполнение на CPU
    Cpu,
}

impl ExecutionMode {
    /// Определяет доступный режим исполнения для текущей платформы.
    ///
    /// Выбор делается один раз на кэш голосов, а не на каждый вызов.
    pub fn detect() -> Self {
        // На macOS предпочитаем Metal
        if cfg!(target_os = "macos") {
            info!("macOS detected - using accelerated voice execution");
            return ExecutionMode::Accelerated;
        }

        if cfg!(feature = "cuda") {
            info!("CUDA feature enabled - using accelerated voice execution");
            return ExecutionMode::Accelerated;
        }

        if cfg!(feature = "vulkan") {
            info!("Vulkan feature enabled - using accelerated voice execution");
            return ExecutionMode::Accelerated;
        }

        info!("No hardware acceleration detected - using CPU voice execution");
        ExecutionMode::Cpu
    }
}

/// Секция "audio" файла метаданных голоса
#[derive(Debug, Clone, Deserialize)]
struct VoiceAudioSection {
    #[serde(default = "default_sample_rate")]
    sample_rate: u32,
}

impl Default for VoiceAudioSection {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

fn default_sample_rate() -> u32 {
    22050
}

/// Файл метаданных голоса (лежит рядом с весами модели)
#[derive(Debug, Clone, Deserialize)]
struct VoiceConfigFile {
    #[serde(default)]
    audio: VoiceAudioSection,
}

/// Локальные файлы одной голосовой модели.
///
/// Голос считается установленным, когда рядом лежат оба файла:
/// веса модели `<id>.onnx` и метаданные `<id>.onnx.json`.
#[derive(Debug, Clone)]
pub struct VoiceModel {
    /// Идентификатор голоса (например, "fr_FR-siwis-medium")
    pub voice_id: String,
    /// Путь к файлу весов модели
    pub model_path: PathBuf,
    /// Путь к файлу метаданных
    pub config_path: PathBuf,
    /// Нативная частота дискретизации голоса
    pub sample_rate: u32,
}

impl VoiceModel {
    /// Находит файлы голоса в директории и читает его метаданные.
    ///
    /// Возвращает [`PipelineError::VoiceUnavailable`], если любой из двух
    /// файлов отсутствует.
    pub fn locate(voices_dir: &Path, voice_id: &str) -> Result<Self> {
        if voice_id.is_empty() {
            return Err(PipelineError::VoiceUnavailable(voice_id.to_string()));
        }

        let model_path = voices_dir.join(format!("{}.onnx", voice_id));
        let config_path = voices_dir.join(format!("{}.onnx.json", voice_id));

        if !model_path.exists() || !config_path.exists() {
            return Err(PipelineError::VoiceUnavailable(voice_id.to_string()));
        }

        let config_text = std::fs::read_to_string(&config_path)?;
        let config: VoiceConfigFile = serde_json::from_str(&config_text)?;

        Ok(Self {
            voice_id: voice_id.to_string(),
            model_path,
            config_path,
            sample_rate: config.audio.sample_rate,
        })
    }
}

/// Загруженный голосовой ресурс, привязанный к одному голосу.
///
/// Дорогой в создании (загружает файл модели), дешевый в повторном
/// использовании.
pub trait VoiceResource: Send + Sync {
    /// Идентификатор голоса
    fn voice_id(&self) -> &str;

    /// Нативная частота дискретизации синтезируемой речи
    fn sample_rate(&self) -> u32;

    /// Синтезирует речь для текста, возвращая моно PCM-семплы
    fn synthesize(&self, text: &str) -> Result<Vec<f32>>;
}

/// Загрузчик голосовых ресурсов — шов для подстановки движка синтеза.
pub trait VoiceLoader: Send + Sync {
    /// Загружает модель в память в заданном режиме исполнения
    fn load(&self, model: &VoiceModel, mode: ExecutionMode) -> Result<Arc<dyn VoiceResource>>;
}
