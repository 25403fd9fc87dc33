/*!
 * Mock provider implementations for testing.
 *
 * The mock answers numbered-list prompts the way a well-behaved model would,
 * or breaks the reply in a controlled way:
 * - `MockProvider::working()` - Echoes every numbered line, tagged with the language
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::dropping_last()` - Omits the last line of the reply
 * - `MockProvider::reordering()` - Swaps the first two lines of the reply
 * - `MockProvider::empty()` - Returns an empty reply
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// System prompt sent with the request
    pub system_prompt: String,
    /// Numbered list of texts to translate
    pub user_prompt: String,
    /// Target language name
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with one line per input line
    Working,
    /// Always fails with an error
    Failing,
    /// Answers one line short
    DropLast,
    /// Answers with the first two lines swapped
    Reorder,
    /// Returns empty response
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of requests received, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers one line short
    pub fn dropping_last() -> Self {
        Self::new(MockBehavior::DropLast)
    }

    /// Create a mock that swaps the first two answer lines
    pub fn reordering() -> Self {
        Self::new(MockBehavior::Reorder)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom response generator, used instead of the echo reply
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Numbered lines of the user prompt, as `(ordinal, text)`
    pub fn numbered_lines(prompt: &str) -> Vec<(usize, String)> {
        prompt
            .lines()
            .filter_map(|line| {
                let (number, text) = line.split_once(". ")?;
                let ordinal = number.trim().parse::<usize>().ok()?;
                Some((ordinal, text.to_string()))
            })
            .collect()
    }

    /// Reply lines echoing each numbered input as `N. [language] text`
    fn echo_lines(request: &MockRequest) -> Vec<String> {
        Self::numbered_lines(&request.user_prompt)
            .into_iter()
            .map(|(ordinal, text)| format!("{}. [{}] {}", ordinal, request.target_language, text))
            .collect()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        if let Some(generator) = self.custom_response {
            return Ok(MockResponse { text: generator(&request) });
        }

        let text = match self.behavior {
            MockBehavior::Working => Self::echo_lines(&request).join("\n"),
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                });
            }
            MockBehavior::DropLast => {
                let mut lines = Self::echo_lines(&request);
                lines.pop();
                lines.join("\n")
            }
            MockBehavior::Reorder => {
                let mut lines = Self::echo_lines(&request);
                if lines.len() > 1 {
                    lines.swap(0, 1);
                }
                lines.join("\n")
            }
            MockBehavior::Empty => String::new(),
        };

        Ok(MockResponse { text })
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
