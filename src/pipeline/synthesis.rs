//! Синтез речи для отдельных сегментов.

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use crate::audio::AudioTrack;
use crate::voices::VoiceResource;

/// Синтезатор сегментов с кэшем отрендеренных реплик.
///
/// Одинаковые реплики одного голоса синтезируются один раз за запуск.
pub struct SegmentSynthesizer {
    /// Отрендеренные семплы по ключу (текст, голос)
    rendered: HashMap<String, Vec<f32>>,
}

impl SegmentSynthesizer {
    /// Создает новый синтезатор
    pub fn new() -> Self {
        Self {
            rendered: HashMap::new(),
        }
    }

    /// Синтезирует текст заданным голосом.
    ///
    /// Пустой текст дает пустую дорожку, не обращаясь к движку. Ошибка
    /// движка логируется и дает `None`: сегмент будет пропущен с тишиной
    /// на уровне сборщика, а не уронит весь запуск.
    pub fn synthesize(&mut self, text: &str, voice: &Arc<dyn VoiceResource>) -> Option<AudioTrack> {
        let text = text.trim();
        if text.is_empty() {
            return Some(AudioTrack::new(voice.sample_rate()));
        }

        let key = cache_key(text, voice.voice_id());
        if let Some(samples) = self.rendered.get(&key) {
            return Some(AudioTrack::from_samples(samples.clone(), voice.sample_rate()));
        }

        match voice.synthesize(text) {
            Ok(samples) => {
                self.rendered.insert(key, samples.clone());
                Some(AudioTrack::from_samples(samples, voice.sample_rate()))
            }
            Err(e) => {
                warn!(
                    "Speech synthesis failed for voice '{}': {} — segment will be skipped",
                    voice.voice_id(),
                    e
                );
                None
            }
        }
    }
}

impl Default for SegmentSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Ключ кэша для пары (текст, голос)
fn cache_key(text: &str, voice_id: &str) -> String {
    let mut hasher = md5::Context::new();
    hasher.consume(text.as_bytes());
    hasher.consume(voice_id.as_bytes());
    format!("{:x}", hasher.compute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeVoice {
        voice_id: String,
        sample_rate: u32,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeVoice {
        fn new(voice_id: &str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                voice_id: voice_id.to_string(),
                sample_rate: 22050,
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl VoiceResource for FakeVoice {
        fn voice_id(&self) -> &str {
            &self.voice_id
        }

        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn synthesize(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PipelineError::SynthesisFailure("engine exploded".to_string()))
            } else {
                Ok(vec![0.5; self.sample_rate as usize])
            }
        }
    }

    #[test]
    fn test_empty_text_gives_empty_track() {
        let voice = FakeVoice::new("fr_FR-siwis-medium", false);
        let mut synthesizer = SegmentSynthesizer::new();

        let track = synthesizer
            .synthesize("   ", &(voice.clone() as Arc<dyn VoiceResource>))
            .unwrap();

        assert!(track.is_empty());
        assert_eq!(track.sample_rate, 22050);
        // Движок не вызывался
        assert_eq!(voice.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_engine_failure_yields_none() {
        let voice = FakeVoice::new("fr_FR-siwis-medium", true);
        let mut synthesizer = SegmentSynthesizer::new();

        let track = synthesizer.synthesize("Bonjour", &(voice as Arc<dyn VoiceResource>));

        assert!(track.is_none());
    }

    #[test]
    fn test_repeated_text_renders_once() {
        let voice = FakeVoice::new("fr_FR-siwis-medium", false);
        let mut synthesizer = SegmentSynthesizer::new();
        let resource = voice.clone() as Arc<dyn VoiceResource>;

        let first = synthesizer.synthesize("Bonjour", &resource).unwrap();
        let second = synthesizer.synthesize("Bonjour", &resource).unwrap();

        assert_eq!(voice.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.samples, second.samples);
    }
}
