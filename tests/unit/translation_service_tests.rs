/*!
 * Tests for the provider-backed translation service
 */

use anyhow::Result;

use resxai::app_config::{TranslationConfig, TranslationProvider};
use resxai::errors::TranslationError;
use resxai::providers::mock::MockProvider;
use resxai::translation::{TextTranslator, TranslationService};

fn texts(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Test that a well-behaved provider yields one translation per text
#[tokio::test]
async fn test_translateBatch_withWorkingProvider_shouldReturnTranslationsInOrder() -> Result<()> {
    let mock = MockProvider::working();
    let service = TranslationService::with_mock(TranslationConfig::default(), mock.clone());

    let result = service
        .translate_batch(&texts(&["OK", "About\nthis tool", "Tools"]), "French (France)")
        .await?;

    assert_eq!(
        result,
        vec![
            "[French (France)] OK",
            "[French (France)] About this tool",
            "[French (France)] Tools",
        ]
    );
    assert_eq!(mock.request_count(), 1);
    assert_eq!(service.provider_name(), "Mock");
    Ok(())
}

/// Test that an empty batch makes no provider request
#[tokio::test]
async fn test_translateBatch_withNoTexts_shouldNotCallProvider() -> Result<()> {
    let mock = MockProvider::working();
    let service = TranslationService::with_mock(TranslationConfig::default(), mock.clone());

    let result = service.translate_batch(&[], "German").await?;
    assert!(result.is_empty());
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

/// Test that a missing line fails the whole batch
#[tokio::test]
async fn test_translateBatch_withShortReply_shouldFailWithCountMismatch() {
    let service = TranslationService::with_mock(TranslationConfig::default(), MockProvider::dropping_last());

    let result = service.translate_batch(&texts(&["A", "B", "C"]), "German").await;
    assert!(matches!(
        result,
        Err(TranslationError::CountMismatch { expected: 3, actual: 2 })
    ));
}

/// Test that swapped lines fail the whole batch
#[tokio::test]
async fn test_translateBatch_withReorderedReply_shouldFailWithOrderMismatch() {
    let service = TranslationService::with_mock(TranslationConfig::default(), MockProvider::reordering());

    let result = service.translate_batch(&texts(&["A", "B"]), "German").await;
    assert!(matches!(
        result,
        Err(TranslationError::OrderMismatch { position: 1, found: 2 })
    ));
}

/// Test that provider failures surface as provider errors
#[tokio::test]
async fn test_translateBatch_withFailingProvider_shouldReturnProviderError() {
    let service = TranslationService::with_mock(TranslationConfig::default(), MockProvider::failing());

    let result = service.translate_batch(&texts(&["A"]), "German").await;
    assert!(matches!(result, Err(TranslationError::Provider(_))));
}

/// Test that an empty reply is rejected
#[tokio::test]
async fn test_translateBatch_withEmptyReply_shouldFail() {
    let service = TranslationService::with_mock(TranslationConfig::default(), MockProvider::empty());

    let result = service.translate_batch(&texts(&["A"]), "German").await;
    assert!(matches!(result, Err(TranslationError::EmptyResponse)));
}

/// Test that the rendered prompts reach the provider
#[tokio::test]
async fn test_translateBatch_shouldSendNumberedPromptWithLanguage() -> Result<()> {
    let mock = MockProvider::working().with_custom_response(|request| {
        if request.system_prompt.contains("into German.")
            && request.user_prompt.contains("\n\n1. OK\n2. Cancel\n\n")
            && request.user_prompt.ends_with("Target language: 'German'")
        {
            "1. OK\n2. Abbrechen".to_string()
        } else {
            String::new()
        }
    });
    let service = TranslationService::with_mock(TranslationConfig::default(), mock);

    let result = service.translate_batch(&texts(&["OK", "Cancel"]), "German").await?;
    assert_eq!(result, vec!["OK", "Abbrechen"]);
    Ok(())
}

/// Test that services are built for every configured provider
#[test]
fn test_new_shouldBuildEveryProvider() -> Result<()> {
    for provider in [
        TranslationProvider::OpenAI,
        TranslationProvider::Anthropic,
        TranslationProvider::Ollama,
        TranslationProvider::LMStudio,
    ] {
        let mut config = TranslationConfig::default();
        config.provider = provider.clone();
        let service = TranslationService::new(config)?;
        assert_eq!(service.provider_name(), provider.display_name());
    }
    Ok(())
}
