//! Загрузка голосов из удаленного каталога.
//!
//! Голос материализуется парой файлов в локальной директории:
//! веса модели `<id>.onnx` и метаданные `<id>.onnx.json`. Наличие обоих
//! файлов — единственный признак установленности голоса.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use reqwest::Client;

use crate::error::{PipelineError, Result};

/// Базовый URL удаленного каталога голосов
const VOICE_CATALOG_BASE_URL: &str = "https://huggingface.co/rhasspy/piper-voices/resolve/main";

/// Таймаут на скачивание одного файла
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Возвращает пути к файлам весов и метаданных голоса.
pub fn voice_file_paths(voices_dir: &Path, voice_id: &str) -> (PathBuf, PathBuf) {
    let model_path = voices_dir.join(format!("{}.onnx", voice_id));
    let config_path = voices_dir.join(format!("{}.onnx.json", voice_id));
    (model_path, config_path)
}

/// Проверяет, установлен ли голос локально (оба файла на месте).
pub fn is_voice_installed(voices_dir: &Path, voice_id: &str) -> bool {
    if voice_id.is_empty() {
        return false;
    }
    let (model_path, config_path) = voice_file_paths(voices_dir, voice_id);
    model_path.exists() && config_path.exists()
}

/// Строит URL файла весов голоса в удаленном каталоге.
///
/// Имя голоса имеет вид `<локаль>-<имя>-<качество>`, файл лежит по пути
/// `<язык>/<локаль>/<имя>/<качество>/<голос>.onnx`.
pub fn voice_download_url(voice_id: &str) -> Result<String> {
    let mut parts = voice_id.splitn(3, '-');
    let locale = parts.next().unwrap_or("");
    let name = parts.next().unwrap_or("");
    let quality = parts.next().unwrap_or("");

    if locale.len() < 2 || name.is_empty() || quality.is_empty() {
        return Err(PipelineError::Download(format!(
            "Malformed voice name: '{}'",
            voice_id
        )));
    }

    let lang = &locale[..2];
    Ok(format!(
        "{}/{}/{}/{}/{}/{}.onnx",
        VOICE_CATALOG_BASE_URL, lang, locale, name, quality, voice_id
    ))
}

/// Проверяет наличие голоса локально и скачивает его при необходимости.
///
/// Повторных попыток нет: первая ошибка сети или каталога возвращается
/// вызывающему как [`PipelineError::Download`].
pub async fn ensure_voice_local(voices_dir: &Path, voice_id: &str) -> Result<()> {
    if voice_id.is_empty() {
        return Err(PipelineError::Download("Empty voice name".to_string()));
    }

    tokio::fs::create_dir_all(voices_dir).await?;

    if is_voice_installed(voices_dir, voice_id) {
        info!("Voice '{}' is already installed", voice_id);
        return Ok(());
    }

    info!("Downloading voice '{}'...", voice_id);

    let model_url = voice_download_url(voice_id)?;
    let config_url = format!("{}.json", model_url);
    let (model_path, config_path) = voice_file_paths(voices_dir, voice_id);

    let client = Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?;

    download_file(&client, &model_url, &model_path).await?;
    download_file(&client, &config_url, &config_path).await?;

    // Скачивание прошло, проверяем что файлы действительно на месте
    if !is_voice_installed(voices_dir, voice_id) {
        return Err(PipelineError::Download(format!(
            "Voice '{}' files are missing after download",
            voice_id
        )));
    }

    info!("Voice '{}' downloaded to {}", voice_id, voices_dir.display());
    Ok(())
}

async fn download_file(client: &Client, url: &str, target: &Path) -> Result<()> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::Download(format!(
            "Server returned status {} for {}",
            status, url
        )));
    }

    let bytes = response.bytes().await?;
    tokio::fs::write(target, &bytes).await?;

    info!("Downloaded {} ({} bytes)", target.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_voice_download_url() {
        let url = voice_download_url("fr_FR-siwis-medium").unwrap();
        assert_eq!(
            url,
            "https://huggingface.co/rhasspy/piper-voices/resolve/main/fr/fr_FR/siwis/medium/fr_FR-siwis-medium.onnx"
        );
    }

    #[test]
    fn test_voice_download_url_malformed() {
        assert!(voice_download_url("siwis").is_err());
        assert!(voice_download_url("").is_err());
        assert!(voice_download_url("fr_FR-siwis").is_err());
    }

    #[test]
    fn test_is_voice_installed() {
        let dir = tempdir().unwrap();
        assert!(!is_voice_installed(dir.path(), "fr_FR-siwis-medium"));
        assert!(!is_voice_installed(dir.path(), ""));

        std::fs::write(dir.path().join("fr_FR-siwis-medium.onnx"), b"model").unwrap();
        // Одних весов недостаточно
        assert!(!is_voice_installed(dir.path(), "fr_FR-siwis-medium"));

        std::fs::write(dir.path().join("fr_FR-siwis-medium.onnx.json"), b"{}").unwrap();
        assert!(is_voice_installed(dir.path(), "fr_FR-siwis-medium"));
    }

    #[tokio::test]
    async fn test_ensure_voice_local_short_circuits_when_installed() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("fr_FR-siwis-medium.onnx"), b"model").unwrap();
        std::fs::write(dir.path().join("fr_FR-siwis-medium.onnx.json"), b"{}").unwrap();

        // Уже установленный голос не требует сети
        ensure_voice_local(dir.path(), "fr_FR-siwis-medium").await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_voice_local_rejects_empty_name() {
        let dir = tempdir().unwrap();
        let err = ensure_voice_local(dir.path(), "").await.unwrap_err();
        assert!(matches!(err, PipelineError::Download(_)));
    }
}
