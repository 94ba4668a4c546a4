//! Обновления прогресса для отправки клиенту.

use tokio::sync::mpsc::Sender;

/// Обновление прогресса выполнения конвейера
#[derive(Debug, Clone)]
pub enum ProgressUpdate {
    /// Началась обработка
    Started,
    /// Диаризация записи
    Diarization,
    /// Перевод реплики
    Translation {
        /// Текущая реплика
        current: usize,
        /// Общее количество реплик
        total: usize,
    },
    /// Синтез речи для сегмента
    Synthesis {
        /// Текущий сегмент
        current: usize,
        /// Общее количество сегментов
        total: usize,
    },
    /// Склейка таймлайна
    Assembling,
    /// Кодирование финального файла
    Encoding,
    /// Обработка завершена
    Finished,
}

/// Асинхронно отправляет обновление прогресса.
///
/// Отсутствие получателя или закрытый канал не считаются ошибкой.
pub async fn send_progress(sender: &Option<Sender<ProgressUpdate>>, update: ProgressUpdate) {
    if let Some(sender) = sender {
        let _ = sender.send(update).await;
    }
}
