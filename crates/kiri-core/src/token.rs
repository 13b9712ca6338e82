//! Recognized tokens, the per-sentence token queue and its stream view.

use std::collections::VecDeque;

use serde::Serialize;

use crate::dict::{WordAttributes, WorkDictionary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Known,
    Unknown,
}

/// One token, positioned in characters within the sentence text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedToken {
    pub id: u32,
    pub offset: usize,
    pub length: usize,
    /// Number of positions this token spans; 1 for plain tokens.
    pub position_length: usize,
    /// Set on the original node emitted on top of its decomposition.
    pub overlay: bool,
    pub token_type: TokenType,
}

/// Tokens of one sentence together with the dictionary they refer to.
///
/// Consumed once, by draining it through [`TokenQueue::into_stream`].
#[derive(Debug)]
pub struct TokenQueue {
    text: String,
    /// Byte offset of every char boundary, including the end.
    byte_offsets: Vec<usize>,
    tokens: VecDeque<RecognizedToken>,
    dictionary: WorkDictionary,
}

impl TokenQueue {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let byte_offsets = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self {
            text,
            byte_offsets,
            tokens: VecDeque::new(),
            dictionary: WorkDictionary::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &RecognizedToken> {
        self.tokens.iter()
    }

    pub fn dictionary(&self) -> &WorkDictionary {
        &self.dictionary
    }

    pub(crate) fn dictionary_mut(&mut self) -> &mut WorkDictionary {
        &mut self.dictionary
    }

    pub(crate) fn push(&mut self, token: RecognizedToken) {
        self.tokens.push_back(token);
    }

    /// Char at `offset` in the sentence text.
    pub(crate) fn char_at(&self, offset: usize) -> Option<char> {
        let start = *self.byte_offsets.get(offset)?;
        self.text[start..].chars().next()
    }

    /// Text covered by `token`, clamped to the sentence.
    pub fn term(&self, token: &RecognizedToken) -> &str {
        let last = self.byte_offsets.len() - 1;
        let start = token.offset.min(last);
        let end = (token.offset + token.length).min(last);
        &self.text[self.byte_offsets[start]..self.byte_offsets[end]]
    }

    pub fn into_stream(self) -> TokenStream<IdentityOffsets> {
        self.into_stream_with(IdentityOffsets)
    }

    pub fn into_stream_with<C: OffsetCorrector>(self, corrector: C) -> TokenStream<C> {
        TokenStream {
            queue: self,
            corrector,
        }
    }
}

/// Maps offsets in the analyzed text back to the caller's original text.
pub trait OffsetCorrector {
    fn correct(&self, offset: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOffsets;

impl OffsetCorrector for IdentityOffsets {
    fn correct(&self, offset: usize) -> usize {
        offset
    }
}

impl<F: Fn(usize) -> usize> OffsetCorrector for F {
    fn correct(&self, offset: usize) -> usize {
        self(offset)
    }
}

/// Flat record handed to the downstream pipeline for each token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAttributes {
    pub term: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position_increment: usize,
    pub position_length: usize,
    pub token_type: TokenType,
    #[serde(flatten)]
    pub word: WordAttributes,
}

/// Drains a [`TokenQueue`] front to back.
#[derive(Debug)]
pub struct TokenStream<C> {
    queue: TokenQueue,
    corrector: C,
}

impl<C: OffsetCorrector> Iterator for TokenStream<C> {
    type Item = TokenAttributes;

    fn next(&mut self) -> Option<TokenAttributes> {
        let token = self.queue.tokens.pop_front()?;
        let (position_increment, position_length) = if token.overlay {
            (0, token.position_length)
        } else {
            (1, 1)
        };
        Some(TokenAttributes {
            term: self.queue.term(&token).to_string(),
            start_offset: self.corrector.correct(token.offset),
            end_offset: self.corrector.correct(token.offset + token.length),
            position_increment,
            position_length,
            token_type: token.token_type,
            word: self.queue.dictionary.attributes(token.id),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.queue.len();
        (n, Some(n))
    }
}

impl<C: OffsetCorrector> ExactSizeIterator for TokenStream<C> {}
