//! translate::prompts
//!
//! Prompt text sent to the language model.

use super::language::Language;
use super::traits::ContentKind;

/// System message fixing the response shape.
pub const SYSTEM_PROMPT: &str = "You translate Jupyter notebook cells. \
Respond with a single JSON object with these keys: \
\"translated_content\" (string, required): the translated cell, formatting preserved; \
\"source_language\" (string, optional): the detected source language; \
\"translation_notes\" (string, optional): anything the reader should know; \
\"metadata\" (object, optional): extra details such as confidence. \
Return nothing outside the JSON object.";

const MARKDOWN_TEMPLATE: &str = "You are a specialized translator for Jupyter notebook markdown content.
Translate the content while:
1. Preserving all markdown syntax (headers, lists, bold, italic, code blocks, etc.)
2. Maintaining the original formatting and structure
3. Keeping any code snippets or technical terms unchanged
4. Preserving any links, references, or citations

Translate the following markdown to {language}:

{content}";

const CODE_TEMPLATE: &str = "You are a specialized translator for code comments and docstrings.
Translate only the comments and docstrings while:
1. Preserving all code functionality
2. Maintaining the original code structure
3. Keeping all variable names, function names, and other code elements unchanged
4. Preserving any special formatting in comments

Translate only the comments and docstrings in the following code to {language}:

{content}";

/// Markers that signal a code cell has something to translate.
pub const CODE_COMMENT_MARKERS: [&str; 3] = ["#", "\"\"\"", "'''"];

/// Whether a code cell contains comments or docstrings.
pub fn has_translatable_code(content: &str) -> bool {
    CODE_COMMENT_MARKERS
        .iter()
        .any(|marker| content.contains(marker))
}

/// Render the user prompt for one cell.
pub fn render(kind: ContentKind, language: Language, content: &str) -> String {
    let template = match kind {
        ContentKind::Markdown => MARKDOWN_TEMPLATE,
        ContentKind::Code => CODE_TEMPLATE,
    };
    // content last so braces inside it are never treated as placeholders
    template
        .replacen("{language}", language.name(), 1)
        .replacen("{content}", content, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_prompt_names_language_and_embeds_content() {
        let prompt = render(ContentKind::Markdown, Language::German, "# Hello");
        assert!(prompt.contains("markdown to German:"));
        assert!(prompt.ends_with("# Hello"));
    }

    #[test]
    fn code_prompt_targets_comments() {
        let prompt = render(ContentKind::Code, Language::Japanese, "x = 1  # one");
        assert!(prompt.contains("comments and docstrings in the following code to Japanese"));
        assert!(prompt.ends_with("x = 1  # one"));
    }

    #[test]
    fn content_with_placeholder_text_is_untouched() {
        let prompt = render(ContentKind::Markdown, Language::French, "use {language} here");
        assert!(prompt.ends_with("use {language} here"));
    }

    #[test]
    fn detects_comments_and_docstrings() {
        assert!(has_translatable_code("x = 1  # set x"));
        assert!(has_translatable_code("def f():\n    \"\"\"Doc.\"\"\"\n"));
        assert!(has_translatable_code("'''block'''"));
        assert!(!has_translatable_code("print(1)"));
    }
}
