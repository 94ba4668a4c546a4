//! Аудио дорожка: накапливаемая последовательность PCM-семплов.

/// Моно PCM-дорожка с фиксированной частотой дискретизации.
///
/// Используется и как результат синтеза одного сегмента, и как
/// накапливаемый финальный продукт сборки таймлайна.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    /// Семплы PCM (f32) в диапазоне [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Частота дискретизации (например, 16000, 22050, 44100)
    pub sample_rate: u32,
}

impl AudioTrack {
    /// Создает пустую дорожку с заданной частотой дискретизации
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// Создает дорожку из готовых семплов
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// Количество семплов в дорожке
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Проверяет, пуста ли дорожка
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Длительность дорожки в секундах
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Добавляет тишину заданной длительности в конец дорожки
    pub fn append_silence(&mut self, seconds: f32) {
        if seconds <= 0.0 {
            return;
        }
        let count = (seconds * self.sample_rate as f32).round() as usize;
        self.samples.extend(std::iter::repeat(0.0).take(count));
    }

    /// Добавляет семплы другой дорожки в конец.
    ///
    /// Частоты дискретизации должен согласовать вызывающий код.
    pub fn append_samples(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
    }
}
