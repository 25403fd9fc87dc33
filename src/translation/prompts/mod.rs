/*!
 * Prompts for numbered-list batch translation.
 *
 * One request carries every text of a language job as a numbered list;
 * the model is asked to answer with the same numbering, one line each.
 */

/// Default system prompt. Placeholder: `{target_language}`
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional software localizer translating user interface strings into {target_language}. \
Translate every numbered line of the user's message. \
Answer with exactly one line per input line, keeping the same numbering and order. \
Keep placeholders such as {0}, &-accelerators and trailing punctuation. \
Do not add explanations, notes or blank lines.";

/// Instruction heading the numbered list
const USER_PROMPT_HEADER: &str =
    "Translate the following text into the target language. Each translated line must match the numbering and order of the input:";

/// System prompt template with a `{target_language}` placeholder
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Render the template for a target language.
    pub fn render(&self, target_language: &str) -> String {
        self.template.replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

/// Build the user message: header, numbered lines, then the target language
pub fn build_user_prompt(numbered_lines: &[String], target_language: &str) -> String {
    let mut prompt = String::with_capacity(
        USER_PROMPT_HEADER.len() + numbered_lines.iter().map(|l| l.len() + 1).sum::<usize>() + 64,
    );
    prompt.push_str(USER_PROMPT_HEADER);
    prompt.push_str("\n\n");
    prompt.push_str(&numbered_lines.join("\n"));
    prompt.push_str("\n\nTarget language: '");
    prompt.push_str(target_language);
    prompt.push('\'');
    prompt
}
