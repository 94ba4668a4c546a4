//! # Кодирование и декодирование аудио
//!
//! Модуль для преобразования аудиофайлов в PCM-семплы и обратно.
//!
//! ## Основные возможности
//!
//! - Декодирование входной записи популярных форматов (WAV, MP3, AAC, FLAC, OGG)
//! - Кодирование PCM данных в WAV формат (32 бит с плавающей точкой, моно)
//! - Микширование многоканального аудио в моно
//! - Пересэмплирование через sinc-интерполяцию (Rubato)
//! - Вычисление аудио-метрик (RMS)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{info, warn};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::probe::Hint;

use crate::error::{PipelineError, Result};

/// Вычисляет длительность аудио в секундах по количеству семплов.
pub fn duration_in_seconds(sample_count: usize, sample_rate: u32) -> f32 {
    if sample_rate == 0 {
        return 0.0;
    }
    sample_count as f32 / sample_rate as f32
}

/// Декодирует аудиофайл в моно PCM-семплы.
///
/// WAV обрабатывается специализированным декодером hound, остальные
/// форматы (MP3, M4A, AAC, FLAC, OGG) — универсальным декодером Symphonia.
/// Многоканальное аудио микшируется в моно усреднением каналов.
///
/// # Возвращает
///
/// Кортеж из вектора PCM-семплов (f32) и частоты дискретизации (u32)
pub fn decode_audio_file<P: AsRef<Path>>(file_path: P) -> Result<(Vec<f32>, u32)> {
    let file_path = file_path.as_ref();
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "wav" => decode_wav_file(file_path),

        "mp3" | "m4a" | "aac" | "flac" | "ogg" => {
            let mut file = File::open(file_path).map_err(PipelineError::Io)?;
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer).map_err(PipelineError::Io)?;

            let cursor = std::io::Cursor::new(buffer);
            let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

            let mut hint = Hint::new();
            hint.with_extension(&extension);

            let probed = symphonia::default::get_probe()
                .format(&hint, mss, &Default::default(), &Default::default())
                .map_err(|e| {
                    PipelineError::AudioProcessing(format!("Failed to probe audio format: {}", e))
                })?;

            let mut format = probed.format;
            let track = format
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
                .ok_or_else(|| {
                    PipelineError::AudioProcessing("No audio track found in file".to_string())
                })?;

            let mut decoder = symphonia::default::get_codecs()
                .make(&track.codec_params, &Default::default())
                .map_err(|e| {
                    PipelineError::AudioProcessing(format!("Failed to create decoder: {}", e))
                })?;

            let track_id = track.id;
            let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
            let channels = track.codec_params.channels.unwrap_or_default().count();

            let mut pcm_data = Vec::new();

            while let Ok(packet) = format.next_packet() {
                if packet.track_id() != track_id {
                    continue;
                }

                match decoder.decode(&packet) {
                    Ok(decoded) => {
                        let mut sample_buf =
                            SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                        sample_buf.copy_planar_ref(decoded);
                        let samples = sample_buf.samples();

                        // Сводим каналы в моно, если их больше одного
                        if channels > 1 {
                            let frames_per_channel = samples.len() / channels;
                            for frame in 0..frames_per_channel {
                                let mut sum = 0.0;
                                for ch in 0..channels {
                                    sum += samples[ch * frames_per_channel + frame];
                                }
                                pcm_data.push(sum / channels as f32);
                            }
                        } else {
                            pcm_data.extend_from_slice(samples);
                        }
                    }
                    Err(e) => {
                        // Пропускаем проблемный пакет и продолжаем
                        warn!("Failed to decode audio packet: {}", e);
                        continue;
                    }
                }
            }

            info!(
                "Decoded {} samples from {} at {} Hz",
                pcm_data.len(),
                file_path.display(),
                sample_rate
            );
            Ok((pcm_data, sample_rate))
        }

        _ => Err(PipelineError::AudioProcessing(format!(
            "Unsupported audio format: {}",
            extension
        ))),
    }
}

/// Декодирует WAV-файл в моно PCM-семплы.
///
/// Поддерживает целочисленные форматы 16/24/32 бит и 32 бит с плавающей
/// точкой. Многоканальное аудио сводится в моно.
pub fn decode_wav_file<P: AsRef<Path>>(file_path: P) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(file_path.as_ref()).map_err(PipelineError::WavDecoding)?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;

    let pcm_data: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map_err(PipelineError::WavDecoding))
            .collect::<Result<Vec<i16>>>()?
            .into_iter()
            .map(|s| s as f32 / 32768.0)
            .collect(),
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map_err(PipelineError::WavDecoding))
            .collect::<Result<Vec<i32>>>()?
            .into_iter()
            .map(|s| s as f32 / 8388608.0)
            .collect(),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map_err(PipelineError::WavDecoding))
            .collect::<Result<Vec<i32>>>()?
            .into_iter()
            .map(|s| s as f32 / 2147483648.0)
            .collect(),
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map_err(PipelineError::WavDecoding))
            .collect::<Result<Vec<f32>>>()?,
        _ => {
            return Err(PipelineError::AudioProcessing(format!(
                "Unsupported WAV format: {:?}, {} bits",
                spec.sample_format, spec.bits_per_sample
            )));
        }
    };

    let channels = spec.channels as usize;
    if channels > 1 {
        let mut mono_data = Vec::with_capacity(pcm_data.len() / channels);
        for chunk in pcm_data.chunks(channels) {
            mono_data.push(chunk.iter().sum::<f32>() / channels as f32);
        }
        Ok((mono_data, sample_rate))
    } else {
        Ok((pcm_data, sample_rate))
    }
}

/// Кодирует PCM-семплы в WAV-файл (моно, 32 бит с плавающей точкой).
pub fn encode_wav<P: AsRef<Path>>(pcm_data: &[f32], sample_rate: u32, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(output_path, spec)?;

    for &sample in pcm_data {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;

    info!(
        "Saved WAV file: {} ({} samples, {} Hz)",
        output_path.display(),
        pcm_data.len(),
        sample_rate
    );
    Ok(())
}

/// Пересэмплирует моно PCM-семплы с одной частоты дискретизации на другую.
///
/// Использует sinc-интерполяцию Rubato с обработкой блоками; последний
/// неполный блок дополняется нулями, результат обрезается до ожидаемой
/// длины.
pub fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;

    // Параметры sinc-интерполяции для высокого качества
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let chunk_size = 1024;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, chunk_size, 1)
        .map_err(|e| PipelineError::AudioProcessing(format!("Resampler init error: {}", e)))?;

    let expected = (input.len() as f64 * ratio).round() as usize;
    let mut output = Vec::with_capacity(expected + chunk_size);

    let mut pos = 0;
    while pos < input.len() {
        let end = (pos + chunk_size).min(input.len());
        let mut chunk = input[pos..end].to_vec();
        chunk.resize(chunk_size, 0.0);

        let frames = resampler
            .process(&[chunk], None)
            .map_err(|e| PipelineError::AudioProcessing(format!("Resampling error: {}", e)))?;

        output.extend_from_slice(&frames[0]);
        pos = end;
    }

    output.truncate(expected);
    Ok(output)
}

/// Вычисляет среднеквадратичное значение (RMS) для массива семплов.
pub fn compute_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
