//! Кэш голосовых ресурсов в рамках одного запуска конвейера.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::error::Result;
use crate::voices::engine::{ExecutionMode, VoiceLoader, VoiceModel, VoiceResource};

/// Кэш загруженных голосов.
///
/// Каждый голос материализуется не более одного раза за запуск: повторный
/// `resolve` возвращает уже загруженный ресурс. Вытеснения нет — число
/// голосов ограничено числом спикеров. Кэш живет в пределах одного
/// запуска и не рассчитан на конкурентные вызовы `resolve`; при переходе
/// к многопоточности потребуется блокировка на идентификатор голоса,
/// чтобы два потока не загрузили один голос дважды.
pub struct VoiceAssetCache {
    /// Директория с установленными голосами
    voices_dir: PathBuf,
    /// Режим исполнения, выбранный один раз при создании кэша
    mode: ExecutionMode,
    /// Загрузчик голосовых ресурсов
    loader: Arc<dyn VoiceLoader>,
    /// Загруженные ресурсы по идентификатору голоса
    loaded: HashMap<String, Arc<dyn VoiceResource>>,
}

impl VoiceAssetCache {
    /// Создает кэш, определяя режим исполнения для текущей платформы
    pub fn new(voices_dir: PathBuf, loader: Arc<dyn VoiceLoader>) -> Self {
        Self::with_mode(voices_dir, loader, ExecutionMode::detect())
    }

    /// Создает кэш с явно заданным режимом исполнения
    pub fn with_mode(voices_dir: PathBuf, loader: Arc<dyn VoiceLoader>, mode: ExecutionMode) -> Self {
        Self {
            voices_dir,
            mode,
            loader,
            loaded: HashMap::new(),
        }
    }

    /// Возвращает загруженный ресурс голоса, загружая его при первом обращении.
    ///
    /// Наличие файлов голоса перепроверяется даже если вызывающий код уже
    /// валидировал их: отсутствие дает [`crate::error::PipelineError::VoiceUnavailable`],
    /// а не падение посреди запуска.
    pub fn resolve(&mut self, voice_id: &str) -> Result<Arc<dyn VoiceResource>> {
        if let Some(resource) = self.loaded.get(voice_id) {
            return Ok(Arc::clone(resource));
        }

        let model = VoiceModel::locate(&self.voices_dir, voice_id)?;
        info!(
            "Loading voice '{}' ({:?} mode, {} Hz)",
            voice_id, self.mode, model.sample_rate
        );

        let resource = self.loader.load(&model, self.mode)?;
        self.loaded.insert(voice_id.to_string(), Arc::clone(&resource));
        Ok(resource)
    }

    /// Количество загруженных голосов
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}
