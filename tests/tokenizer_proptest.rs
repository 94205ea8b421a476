//! Property-based tests for the line tokenizer

use blockscan::blockscan::lexing::{Tokenizer, DEFAULT_SEPARATORS};
use proptest::prelude::*;

/// Lines built from words, quoted spans, escapes and separator runs.
fn line_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z0-9_.=-]{1,8}",
        "\"[a-zA-Z0-9 \t_.]{0,8}\"",
        Just("\\\"".to_string()),
        "[ \t]{1,3}",
    ];
    prop::collection::vec(piece, 0..12).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn test_tokenize_never_panics(line in "\\PC{0,40}") {
        let _ = Tokenizer::new().tokenize(&line);
        let _ = Tokenizer::new().split_inside_quotes(true).tokenize(&line);
    }

    #[test]
    fn test_retokenizing_joined_tokens_is_stable(line in line_strategy()) {
        let tokenizer = Tokenizer::new();
        // Unbalanced quotes are rejected outright.
        if let Ok(tokens) = tokenizer.tokenize(&line) {
            let joined = tokens.join(" ");
            prop_assert_eq!(tokenizer.tokenize(&joined).unwrap(), tokens);
        }
    }

    #[test]
    fn test_tokens_never_contain_bare_separators(line in "[a-z \t]{0,30}") {
        let tokens = Tokenizer::new().tokenize(&line).unwrap();
        for token in tokens {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.contains(|c| DEFAULT_SEPARATORS.contains(c)));
        }
    }

    #[test]
    fn test_split_limit_bounds_token_count(line in "[a-z ]{0,30}", limit in 0i32..5) {
        let tokens = Tokenizer::new().max_splits(limit).tokenize(&line).unwrap();
        prop_assert!(tokens.len() <= limit as usize + 1);
    }
}
