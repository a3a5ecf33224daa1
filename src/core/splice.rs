//! Offset-tracking splicer for translation call literals.
//!
//! Call sites are located against the *original* source text. Every
//! replacement changes the buffer length, so each later site is shifted by
//! the running offset before it is touched. A pluggable [`CallGuard`] checks
//! that the shifted position still looks like a translation call; a mismatch
//! means the offset has desynchronized and the whole pass is aborted.

use std::ops::Range;

use thiserror::Error;

use crate::core::catalog::Lookup;

/// Prefix every default translation call starts with (`__('text')`).
pub const DEFAULT_CALL_PREFIX: &str = "__";

/// A located translation call in the original source text.
///
/// Both ranges are half-open UTF-8 byte ranges into the *unmodified* buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// The whole invocation, e.g. `__('text')`.
    pub range: Range<usize>,
    /// The literal argument including its quotes, e.g. `'text'`.
    pub argument_range: Range<usize>,
    /// Quote character delimiting the literal.
    pub quote: char,
}

impl CallSite {
    pub fn new(range: Range<usize>, argument_range: Range<usize>, quote: char) -> Self {
        Self {
            range,
            argument_range,
            quote,
        }
    }

    /// A site whose replacement covers only the quoted literal itself.
    pub fn literal(argument_range: Range<usize>, quote: char) -> Self {
        Self {
            range: argument_range.clone(),
            argument_range,
            quote,
        }
    }

    /// The message key carried by this site in `source`: the literal
    /// without its quotes, escaped quotes unescaped.
    pub fn key(&self, source: &str) -> Option<String> {
        source
            .get(self.argument_range.clone())
            .and_then(|literal| unquote(literal, self.quote))
    }

    fn is_well_formed(&self) -> bool {
        self.range.start <= self.argument_range.start
            && self.argument_range.start < self.argument_range.end
            && self.argument_range.end <= self.range.end
    }
}

/// Why the running offset was found to be out of sync with the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriftReason {
    #[error("expected a translation call, found `{found}`")]
    GuardMismatch { found: String },
    #[error("call site starts before the end of the previous replacement (byte {previous_end})")]
    OutOfOrder { previous_end: usize },
    #[error("call site lies outside the buffer ({len} bytes)")]
    OutOfBounds { len: usize },
}

/// Fatal splice failures. No partial output is usable after either.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("translation offset drift at call site #{index} (byte {position}): {reason}")]
    Drift {
        index: usize,
        position: usize,
        reason: DriftReason,
    },
    #[error("malformed string literal at call site #{index} (byte {position}): {reason}")]
    MalformedLiteral {
        index: usize,
        position: usize,
        reason: String,
    },
}

impl SpliceError {
    /// Index of the call site the pass stopped at.
    pub fn index(&self) -> usize {
        match self {
            SpliceError::Drift { index, .. } | SpliceError::MalformedLiteral { index, .. } => {
                *index
            }
        }
    }

    pub fn is_drift(&self) -> bool {
        matches!(self, SpliceError::Drift { .. })
    }
}

/// Checks that a shifted call position still looks like a call expression.
pub trait CallGuard {
    fn check(&self, buffer: &str, at: usize, site: &CallSite) -> bool;
}

/// Accepts positions where the buffer continues with a fixed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixGuard {
    prefix: String,
}

impl PrefixGuard {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for PrefixGuard {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_PREFIX)
    }
}

impl CallGuard for PrefixGuard {
    fn check(&self, buffer: &str, at: usize, _site: &CallSite) -> bool {
        buffer
            .get(at..)
            .is_some_and(|rest| rest.starts_with(self.prefix.as_str()))
    }
}

/// Accepts positions holding the site's opening quote.
///
/// Used for sites built with [`CallSite::literal`], where only the quoted
/// argument is replaced and the surrounding call is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteGuard;

impl CallGuard for QuoteGuard {
    fn check(&self, buffer: &str, at: usize, site: &CallSite) -> bool {
        buffer
            .get(at..)
            .is_some_and(|rest| rest.starts_with(site.quote))
    }
}

/// A key with no catalog entry, by call site index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    pub index: usize,
    pub key: String,
}

/// One processed call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceStep {
    pub key: String,
    /// `len(replacement) - len(original call)`.
    pub delta: isize,
    /// Accumulated offset after this site.
    pub offset: isize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceOutput {
    pub text: String,
    pub missing: Vec<MissingKey>,
    pub steps: Vec<SpliceStep>,
}

/// Replaces translation call literals using a [`CallGuard`] as drift check.
#[derive(Debug, Clone, Default)]
pub struct Splicer<G = PrefixGuard> {
    guard: G,
}

impl<G: CallGuard> Splicer<G> {
    pub fn with_guard(guard: G) -> Self {
        Self { guard }
    }

    /// Replace every call site in `original` with its quoted translation.
    ///
    /// Sites must be sorted by `range.start` and must not overlap. Keys with
    /// no translation fall back to the original text and are reported in
    /// [`SpliceOutput::missing`].
    pub fn splice<L: Lookup + ?Sized>(
        &self,
        original: &str,
        sites: &[CallSite],
        lookup: &L,
    ) -> Result<SpliceOutput, SpliceError> {
        let mut buffer = original.to_owned();
        let mut offset: isize = 0;
        let mut previous_end = 0;
        let mut missing = Vec::new();
        let mut steps = Vec::with_capacity(sites.len());

        for (index, site) in sites.iter().enumerate() {
            if !site.is_well_formed() {
                return Err(SpliceError::MalformedLiteral {
                    index,
                    position: site.range.start,
                    reason: "argument range is not inside the call range".to_string(),
                });
            }

            let drift = |position: usize, reason: DriftReason| SpliceError::Drift {
                index,
                position,
                reason,
            };
            let out_of_bounds = DriftReason::OutOfBounds { len: buffer.len() };

            let (Some(start), Some(end)) = (
                shift(site.range.start, offset),
                shift(site.range.end, offset),
            ) else {
                return Err(drift(site.range.start, out_of_bounds));
            };
            if end > buffer.len() || !buffer.is_char_boundary(end) {
                return Err(drift(start, out_of_bounds));
            }
            if start < previous_end {
                return Err(drift(start, DriftReason::OutOfOrder { previous_end }));
            }
            if !self.guard.check(&buffer, start, site) {
                let found = buffer
                    .get(start..)
                    .map(|rest| rest.chars().take(8).collect())
                    .unwrap_or_default();
                return Err(drift(start, DriftReason::GuardMismatch { found }));
            }

            let literal = shift(site.argument_range.start, offset)
                .zip(shift(site.argument_range.end, offset))
                .and_then(|(arg_start, arg_end)| buffer.get(arg_start..arg_end))
                .ok_or_else(|| SpliceError::MalformedLiteral {
                    index,
                    position: start,
                    reason: "argument range is not on character boundaries".to_string(),
                })?;
            let key = unquote(literal, site.quote).ok_or_else(|| SpliceError::MalformedLiteral {
                index,
                position: start,
                reason: format!("expected a literal delimited by {}", site.quote),
            })?;

            let translated = lookup.lookup(&key);
            let replacement = quote(translated.unwrap_or(&key), site.quote);
            if translated.is_none() {
                missing.push(MissingKey {
                    index,
                    key: key.clone(),
                });
            }

            buffer.replace_range(start..end, &replacement);

            let delta = replacement.len() as isize - site.range.len() as isize;
            offset += delta;
            previous_end = start + replacement.len();
            steps.push(SpliceStep { key, delta, offset });
        }

        Ok(SpliceOutput {
            text: buffer,
            missing,
            steps,
        })
    }
}

/// Splice with the default `__` prefix guard.
pub fn splice<L: Lookup + ?Sized>(
    original: &str,
    sites: &[CallSite],
    lookup: &L,
) -> Result<SpliceOutput, SpliceError> {
    Splicer::<PrefixGuard>::default().splice(original, sites, lookup)
}

fn shift(position: usize, offset: isize) -> Option<usize> {
    position.checked_add_signed(offset)
}

/// Strip the quotes of a literal and unescape occurrences of that quote.
fn unquote(literal: &str, quote: char) -> Option<String> {
    let inner = literal.strip_prefix(quote)?.strip_suffix(quote)?;
    Some(inner.replace(&format!("\\{quote}"), &quote.to_string()))
}

/// Escape unescaped occurrences of `quote` and wrap the text in it.
///
/// A trailing unpaired backslash is doubled so it cannot escape the closing
/// quote.
fn quote(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    out.push(quote);
    let mut previous = None;
    for c in text.chars() {
        if c == quote && previous != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        previous = Some(c);
    }
    let trailing = text.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        out.push('\\');
    }
    out.push(quote);
    out
}
