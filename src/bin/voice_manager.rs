//! Менеджер голосов: просмотр каталога и загрузка голосов в локальную
//! директорию.

use std::env;
use std::process;

use voicenova::config::PipelineConfig;
use voicenova::language;
use voicenova::voices::{catalog, downloader};

fn print_usage() {
    eprintln!("Usage: voice_manager <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  languages            list supported languages");
    eprintln!("  list <lang-code>     list catalog voices for a language");
    eprintln!("  installed            list locally installed voices by language");
    eprintln!("  download <voice-id>  download a voice if not installed");
}

#[tokio::main]
async fn main() -> voicenova::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = PipelineConfig::default();

    match args.get(1).map(String::as_str) {
        Some("languages") => {
            for (name, code) in language::SUPPORTED_LANGUAGES {
                println!("{:<4} {}", code, name);
            }
        }
        Some("list") => {
            let Some(lang_code) = args.get(2) else {
                print_usage();
                process::exit(1);
            };
            let voices = catalog::voices_for_language(lang_code);
            if voices.is_empty() {
                println!("No known voices for language '{}'", lang_code);
            }
            for voice in voices {
                println!("{}", voice);
            }
        }
        Some("installed") => {
            let grouped = catalog::installed_voices(&config.voices_dir)?;
            if grouped.is_empty() {
                println!("No voices installed in {}", config.voices_dir.display());
            }
            for (lang, voices) in grouped {
                println!("{}: {}", lang, voices.join(", "));
            }
        }
        Some("download") => {
            let Some(voice_id) = args.get(2) else {
                print_usage();
                process::exit(1);
            };
            downloader::ensure_voice_local(&config.voices_dir, voice_id).await?;
            println!("Voice '{}' is ready", voice_id);
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}
