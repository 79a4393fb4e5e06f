//! # Tokenizers
//!
//! The aligner only needs, for a text, the ordered token ids and their
//! character offsets, with `(0, 0)` for special tokens. [`OffsetTokenizer`]
//! is that contract; [`SubwordTokenizer`] backs it with a HuggingFace
//! `tokenizer.json`, and [`WordTokenizer`] is a dependency-free splitter
//! for offline use.

use std::path::Path;

use tokenizers::{Tokenizer as HfTokenizer, TruncationParams};

use crate::error::{Result, SkillnerError};

/// Default maximum sequence length, including special tokens.
pub const DEFAULT_MAX_LENGTH: usize = 384;

/// Token ids and character offsets for one text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenizedText {
    pub ids: Vec<u32>,
    /// `(start, end)` character offsets per token; `start == end` marks a
    /// special token.
    pub offsets: Vec<(usize, usize)>,
    pub attention_mask: Vec<u32>,
}

impl TokenizedText {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Anything that can split text into offset-carrying tokens.
pub trait OffsetTokenizer {
    /// Tokenize `text`, adding special tokens and truncating to the
    /// tokenizer's maximum length.
    fn encode(&self, text: &str) -> Result<TokenizedText>;
}

/// A HuggingFace tokenizer configured for labeling.
pub struct SubwordTokenizer {
    inner: HfTokenizer,
    max_length: usize,
}

impl SubwordTokenizer {
    /// Load a `tokenizer.json` and truncate encodings to `max_length`.
    pub fn from_file<P: AsRef<Path>>(path: P, max_length: usize) -> Result<Self> {
        let inner = HfTokenizer::from_file(path.as_ref())
            .map_err(|e| SkillnerError::Tokenizer(e.to_string()))?;
        Self::from_tokenizer(inner, max_length)
    }

    /// Wrap an already-built tokenizer.
    pub fn from_tokenizer(mut inner: HfTokenizer, max_length: usize) -> Result<Self> {
        inner.with_padding(None);
        inner
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| SkillnerError::Tokenizer(e.to_string()))?;
        Ok(Self { inner, max_length })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl OffsetTokenizer for SubwordTokenizer {
    fn encode(&self, text: &str) -> Result<TokenizedText> {
        let encoding = self
            .inner
            .encode_char_offsets(text, true)
            .map_err(|e| SkillnerError::Tokenizer(e.to_string()))?;

        Ok(TokenizedText {
            ids: encoding.get_ids().to_vec(),
            offsets: encoding.get_offsets().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
        })
    }
}

/// A token extracted by [`WordTokenizer`] with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text content
    pub text: String,
    /// Start character position in the original string
    pub start: usize,
    /// End character position in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Id of the leading boundary marker.
pub const CLS_ID: u32 = 101;
/// Id of the trailing boundary marker.
pub const SEP_ID: u32 = 102;
const WORD_VOCAB_SIZE: u32 = 30522;
const FIRST_WORD_ID: u32 = 1000;

/// Whitespace/punctuation tokenizer with BERT-style boundary markers.
///
/// Runs of alphanumeric characters form one token, every other
/// non-whitespace character is a token of its own. Ids are stable hash
/// buckets of the lower-cased token.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    max_length: usize,
}

impl WordTokenizer {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(2),
        }
    }

    /// Split `input` into word and punctuation tokens, without markers.
    ///
    /// # Examples
    /// ```
    /// use skillner_core::tagging::tokenizer::WordTokenizer;
    ///
    /// let tokens = WordTokenizer::default().tokenize("React, Node.js");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, vec!["React", ",", "Node", ".", "js"]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word: Option<(usize, String)> = None;

        for (pos, c) in input.chars().enumerate() {
            if c.is_alphanumeric() {
                word.get_or_insert_with(|| (pos, String::new())).1.push(c);
                continue;
            }
            if let Some((start, text)) = word.take() {
                push_token(&mut tokens, text, start, pos);
            }
            if !c.is_whitespace() {
                push_token(&mut tokens, c.to_string(), pos, pos + 1);
            }
        }

        if let Some((start, text)) = word.take() {
            let end = start + text.chars().count();
            push_token(&mut tokens, text, start, end);
        }

        tokens
    }

    fn word_id(text: &str) -> u32 {
        // FNV-1a
        let mut hash: u32 = 0x811c_9dc5;
        for byte in text.to_lowercase().bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
        FIRST_WORD_ID + hash % (WORD_VOCAB_SIZE - FIRST_WORD_ID)
    }
}

fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    let index = tokens.len();
    tokens.push(Token {
        text,
        start,
        end,
        index,
    });
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl OffsetTokenizer for WordTokenizer {
    fn encode(&self, text: &str) -> Result<TokenizedText> {
        let words = self.tokenize(text);
        let keep = words.len().min(self.max_length - 2);

        let mut out = TokenizedText::default();
        out.ids.push(CLS_ID);
        out.offsets.push((0, 0));
        for token in &words[..keep] {
            out.ids.push(Self::word_id(&token.text));
            out.offsets.push((token.start, token.end));
        }
        out.ids.push(SEP_ID);
        out.offsets.push((0, 0));
        out.attention_mask = vec![1; out.ids.len()];
        Ok(out)
    }
}
