//! Language utilities for locale code handling
//!
//! Output documents are named after .NET culture names such as `fr-FR`,
//! `sr-Cyrl-BA` or `ca-ES-valencia`. The primary subtag must be an
//! ISO 639-1 (2-letter) or ISO 639-3 (3-letter) code; the remaining
//! subtags are script, region and variant identifiers.

use anyhow::{Result, anyhow};
use isolang::Language;

use crate::app_config::LanguageSpec;

/// Return the primary (language) subtag of a locale code
pub fn primary_subtag(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Validate a culture name used for output file naming
pub fn validate_locale_code(code: &str) -> Result<Language> {
    let trimmed = code.trim();
    if trimmed.is_empty() || trimmed != code {
        return Err(anyhow!("Invalid locale code: '{}'", code));
    }

    let primary = primary_subtag(code).to_lowercase();
    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Unknown language subtag '{}' in locale code '{}'", primary, code))?;

    for subtag in code.split('-').skip(1) {
        let valid_len = (2..=8).contains(&subtag.len());
        if !valid_len || !subtag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("Invalid subtag '{}' in locale code '{}'", subtag, code));
        }
    }

    Ok(language)
}

/// The languages the desktop add-in ships with
pub fn default_languages() -> Vec<LanguageSpec> {
    const TABLE: &[(&str, &str)] = &[
        ("Afrikaans", "af"),
        ("Albanian", "sq"),
        ("Amharic", "am"),
        ("Arabic", "ar"),
        ("Armenian", "hy"),
        ("Assamese", "as"),
        ("Azerbaijani - Latin script", "az-Latn"),
        ("Bangla (India)", "bn-IN"),
        ("Basque", "eu"),
        ("Belarusian", "be"),
        ("Bosnian - Latin script", "bs-Latn"),
        ("Bulgarian", "bg"),
        ("Catalan", "ca"),
        ("Chinese (Simplified)", "zh-Hans"),
        ("Chinese (Traditional)", "zh-Hant"),
        ("Croatian", "hr"),
        ("Czech", "cs"),
        ("Danish", "da"),
        ("Dutch", "nl"),
        ("Estonian", "et"),
        ("Filipino", "fil"),
        ("Finnish", "fi"),
        ("French (Canada)", "fr-CA"),
        ("French (France)", "fr-FR"),
        ("Galician", "gl"),
        ("Georgian", "ka"),
        ("German", "de"),
        ("Greek", "el"),
        ("Gujarati", "gu"),
        ("Hebrew", "he"),
        ("Hindi", "hi"),
        ("Hungarian", "hu"),
        ("Icelandic", "is"),
        ("Indonesian", "id"),
        ("Irish Gaelic", "ga"),
        ("Italian", "it"),
        ("Japanese", "ja"),
        ("Kannada", "kn"),
        ("Kazakh", "kk"),
        ("Khmer", "km"),
        ("Konkani", "kok"),
        ("Korean", "ko"),
        ("Latvian", "lv"),
        ("Lithuanian", "lt"),
        ("Luxembourgish", "lb"),
        ("Macedonian (North Macedonia)", "mk"),
        ("Malay", "ms"),
        ("Malayalam", "ml"),
        ("Maltese", "mt"),
        ("Māori", "mi"),
        ("Marathi", "mr"),
        ("Nepali", "ne"),
        ("Norwegian (Bokmål)", "nb"),
        ("Norwegian (Nynorsk)", "nn"),
        ("Odia", "or"),
        ("Persian (Farsi)", "fa"),
        ("Polish", "pl"),
        ("Portuguese (Brazil)", "pt-BR"),
        ("Portuguese (Portugal)", "pt-PT"),
        ("Punjabi (India)", "pa-IN"),
        ("Romanian", "ro"),
        ("Russian", "ru"),
        ("Scottish Gaelic", "gd"),
        ("Serbian - Cyrillic script", "sr-Cyrl"),
        ("Serbian - Cyrillic script (Bosnia and Herzegovina)", "sr-Cyrl-BA"),
        ("Serbian - Latin script", "sr-Latn"),
        ("Slovak", "sk"),
        ("Slovenian", "sl"),
        ("Spanish (Mexico)", "es-MX"),
        ("Spanish (Spain)", "es-ES"),
        ("Swedish", "sv"),
        ("Tamil (India)", "ta-IN"),
        ("Tatar", "tt"),
        ("Telugu", "te"),
        ("Thai", "th"),
        ("Turkish", "tr"),
        ("Ukrainian", "uk"),
        ("Urdu", "ur"),
        ("Uyghur", "ug"),
        ("Uzbek - Latin script", "uz-Latn"),
        ("Valencian", "ca-ES-valencia"),
        ("Vietnamese", "vi"),
        ("Welsh", "cy"),
    ];

    TABLE
        .iter()
        .map(|(name, code)| LanguageSpec::new(*name, *code))
        .collect()
}
