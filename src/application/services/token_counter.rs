use std::sync::LazyLock;
use tiktoken_rs::CoreBPE;

static TOKENIZER: LazyLock<CoreBPE> = LazyLock::new(|| {
    tiktoken_rs::cl100k_base().expect("Failed to initialize cl100k_base tokenizer")
});

pub fn count_tokens(text: &str) -> usize {
    TOKENIZER.encode_with_special_tokens(text).len()
}

/// Keeps leading passages while their joined token count stays within `max_tokens`.
///
/// The first passage is always kept so a single oversized match still reaches the model.
pub fn take_within_budget<'a>(
    passages: impl IntoIterator<Item = &'a str>,
    separator: &str,
    max_tokens: usize,
) -> Vec<&'a str> {
    let separator_tokens = count_tokens(separator);
    let mut used = 0;
    let mut kept = Vec::new();

    for passage in passages {
        let cost = count_tokens(passage) + if kept.is_empty() { 0 } else { separator_tokens };
        if !kept.is_empty() && used + cost > max_tokens {
            break;
        }
        used += cost;
        kept.push(passage);
    }

    kept
}
