//! Rule text tokenization.
//!
//! Rule bodies are compared token-wise, never byte-wise: a token is a
//! maximal run of word characters (underscore is a separator), lowercased,
//! with a trailing `+` kept so `GPLv2+` and `GPLv2` stay distinct.
//! Corpus-level comparisons run over dense `u32` ids interned through a
//! [`TokenDictionary`].

use std::collections::HashMap;

use anyhow::Result;
use regex::Regex;

/// Splits rule text into comparison tokens.
pub struct Tokenizer {
    word_re: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        Ok(Tokenizer {
            word_re: Regex::new(r"[^\W_]+\+?[^\W_]*")?,
        })
    }

    /// Lowercased tokens of `text`, in order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.word_re
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Interns token strings to dense ids, first come first numbered.
#[derive(Debug, Default)]
pub struct TokenDictionary {
    ids: HashMap<String, u32>,
}

impl TokenDictionary {
    pub fn new() -> Self {
        TokenDictionary::default()
    }

    /// Id of `token`, allocating the next id on first sight.
    pub fn intern(&mut self, token: &str) -> u32 {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.ids.len() as u32;
        self.ids.insert(token.to_string(), id);
        id
    }
}
