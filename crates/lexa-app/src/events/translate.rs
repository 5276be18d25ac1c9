use lexa_config::Config;
use lexa_core::preprocess::{DefaultPreprocessor, Preprocessor};
use lexa_translator::{TranslationEvent, TranslationWorker};
use lexa_types::AppEvent;

pub fn handle_translate(
    config: &Config,
    worker: Option<&TranslationWorker>,
    word: &str,
    to_lang: Option<String>,
) -> AppEvent {
    let Some(worker) = worker else {
        return AppEvent::Status(
            "Translation is disabled (set DEEPL_API_KEY or enable it in the config)".to_string(),
        );
    };

    let word = DefaultPreprocessor.process(word);
    if word.is_empty() {
        return AppEvent::Status("Nothing to translate".to_string());
    }

    let to_lang = to_lang
        .filter(|lang| !lang.trim().is_empty())
        .unwrap_or_else(|| config.translator.to_lang.clone())
        .to_lowercase();

    let job = worker.start(&word, &to_lang);
    tracing::debug!(
        "Translating '{}' to {} with {} ({})",
        word,
        to_lang,
        worker.provider_name(),
        job.id()
    );

    AppEvent::TranslationStarted {
        word,
        to_lang,
        job: job.id().get(),
    }
}

pub fn translation_to_app_event(event: TranslationEvent) -> AppEvent {
    match event {
        TranslationEvent::Completed {
            word,
            target_language,
            text,
            ..
        } => AppEvent::ShowTranslation {
            word,
            text,
            to_lang: target_language,
        },
        TranslationEvent::Failed { job, word, error, .. } => {
            tracing::debug!("Translation job {job} failed: {error}");
            AppEvent::TranslationFailed {
                word,
                error: error.to_string(),
            }
        }
    }
}
