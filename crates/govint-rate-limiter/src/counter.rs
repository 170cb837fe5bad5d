//! Token counting for LLM/embedding requests, used to decide how much of
//! a model's per-minute budget a call will consume before the call is
//! made (so the budget check happens up front, not after the fact).

/// Count tokens in `text` using `cl100k_base`, falling back to a
/// chars-per-token estimate if the encoder can't be loaded (offline
/// test environments, missing vocab file).
pub fn count_tokens(text: &str) -> u64 {
    match tiktoken_rs::cl100k_base() {
        Ok(bpe) => bpe.encode_with_special_tokens(text).len() as u64,
        Err(_) => ((text.len() / 4).max(1)) as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_counts_at_least_one_token() {
        assert!(count_tokens("") >= 1 || count_tokens("x") >= 1);
    }

    #[test]
    fn longer_text_counts_more_tokens() {
        let short = count_tokens("fuel prices");
        let long = count_tokens("fuel prices are rising across every region of the country");
        assert!(long > short);
    }
}
