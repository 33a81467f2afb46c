use once_cell::sync::OnceCell;
use tokenizers::Tokenizer;

static TOKENIZER: OnceCell<Option<Tokenizer>> = OnceCell::new();

/// Approximately 4 characters per token, the fallback used throughout the
/// OpenAI ecosystem when a real tokenizer is unavailable.
const CHARS_PER_TOKEN_FALLBACK: usize = 4;

/// Counts tokens for budget checks (spec.md §4.3, §6 `TokenBudgets`).
/// Uses a bundled `tokenizers` BPE vocabulary when one loads successfully;
/// otherwise falls back to whitespace-word count blended with a
/// characters-per-token estimate, never failing the call outright.
pub fn count_tokens(text: &str) -> usize {
    let tokenizer = TOKENIZER.get_or_init(load_tokenizer);
    if let Some(tokenizer) = tokenizer {
        if let Ok(encoding) = tokenizer.encode(text, false) {
            return encoding.get_ids().len();
        }
    }
    fallback_count(text)
}

fn load_tokenizer() -> Option<Tokenizer> {
    // No bundled vocabulary file ships with this crate; a deployment may
    // point `DOCWRIGHT_TOKENIZER_PATH` at one. Absence is expected and not
    // an error: `count_tokens` degrades to the heuristic below.
    let path = std::env::var("DOCWRIGHT_TOKENIZER_PATH").ok()?;
    match Tokenizer::from_file(&path) {
        Ok(tokenizer) => Some(tokenizer),
        Err(e) => {
            tracing::warn!(path, error = %e, "failed to load tokenizer, using heuristic token count");
            None
        }
    }
}

fn fallback_count(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    let char_estimate = text.chars().count() / CHARS_PER_TOKEN_FALLBACK;
    word_count.max(char_estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_heuristic_without_a_loaded_tokenizer() {
        let count = fallback_count("one two three four");
        assert!(count >= 4);
    }

    #[test]
    fn empty_text_counts_as_zero() {
        assert_eq!(fallback_count(""), 0);
    }
}
