//! Periodic-commit hint parsing and validation.
//!
//! The only surface syntax this crate owns is the leading hint clause:
//!
//! ```text
//! USING PERIODIC COMMIT [batch-size] <query body>
//! ```
//!
//! The query body itself is opaque text owned by the query planner; this
//! module extracts and validates the hint and hands the rest through.
//!
//! Validation is entirely static: it touches no transaction or counter
//! state, so a rejected query leaves no trace behind.

use crate::config::DEFAULT_BATCH_SIZE;
use crate::error::{Error, Result};
use crate::exec::context::QueryContext;

/// A validated periodic-commit hint.
///
/// Invariant: when a batch size is present it is strictly positive; the
/// parser rejects anything else before a hint is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicCommitHint {
    batch_size: Option<u64>,
}

impl PeriodicCommitHint {
    /// A hint that uses the implementation-default batch size.
    #[must_use]
    pub const fn default_size() -> Self {
        Self { batch_size: None }
    }

    /// A hint with an explicit batch size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] if `size` is zero, so the positivity
    /// invariant holds no matter how a hint is constructed.
    pub fn with_batch_size(size: u64) -> Result<Self> {
        if size == 0 {
            return Err(Error::Syntax(
                "periodic commit batch size must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(Self { batch_size: Some(size) })
    }

    /// The explicit batch size, if one was given.
    #[must_use]
    pub const fn batch_size(&self) -> Option<u64> {
        self.batch_size
    }

    /// The batch size to run with, falling back to [`DEFAULT_BATCH_SIZE`].
    #[must_use]
    pub const fn effective_batch_size(&self) -> u64 {
        match self.batch_size {
            Some(size) => size,
            None => DEFAULT_BATCH_SIZE,
        }
    }
}

/// The outcome of splitting a query into its optional hint and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuery<'a> {
    /// The periodic-commit hint, if the query carried one.
    pub hint: Option<PeriodicCommitHint>,
    /// The remainder of the query, owned by the downstream planner.
    pub body: &'a str,
}

/// Split a query into its optional periodic-commit hint and body.
///
/// Keyword matching is case-insensitive. A token after `COMMIT` that looks
/// numeric is taken as the batch size; anything else starts the query body.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if `USING` is not followed by `PERIODIC COMMIT`,
/// or if an explicit batch size is present but not a positive integer.
pub fn parse_query(input: &str) -> Result<ParsedQuery<'_>> {
    let Some(rest) = strip_keyword(input, "USING") else {
        return Ok(ParsedQuery { hint: None, body: input.trim_start() });
    };

    let rest = strip_keyword(rest, "PERIODIC")
        .and_then(|rest| strip_keyword(rest, "COMMIT"))
        .ok_or_else(|| Error::Syntax("expected PERIODIC COMMIT after USING".to_string()))?;

    let rest = rest.trim_start();
    let (token, after_token) = leading_token(rest);

    // A leading digit or sign means the token is meant as a batch size.
    let looks_numeric =
        token.starts_with('-') || token.chars().next().is_some_and(|c| c.is_ascii_digit());

    if !looks_numeric {
        return Ok(ParsedQuery { hint: Some(PeriodicCommitHint::default_size()), body: rest });
    }

    match token.parse::<i64>() {
        Ok(size) if size > 0 => Ok(ParsedQuery {
            hint: Some(PeriodicCommitHint::with_batch_size(size as u64)?),
            body: after_token.trim_start(),
        }),
        Ok(size) => Err(Error::Syntax(format!(
            "periodic commit batch size must be a positive integer, got {size}"
        ))),
        Err(_) => {
            Err(Error::Syntax(format!("invalid periodic commit batch size: '{token}'")))
        }
    }
}

/// Validate a hint against the caller's execution context.
///
/// Runs before any transaction is opened; a failure here is guaranteed to be
/// side-effect free.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the query performs no writes, or
/// [`Error::TransactionState`] if the caller already holds an explicit open
/// transaction. The write check is evaluated first.
pub fn validate_hint(_hint: &PeriodicCommitHint, ctx: &QueryContext) -> Result<()> {
    if !ctx.is_updating() {
        return Err(Error::Syntax("periodic commit requires an updating query".to_string()));
    }
    if ctx.in_explicit_transaction() {
        return Err(Error::TransactionState(
            "periodic commit cannot be used inside an open transaction".to_string(),
        ));
    }
    Ok(())
}

/// Strip a leading keyword, case-insensitively.
///
/// The keyword must be delimited by whitespace or end of input.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let trimmed = input.trim_start();
    if trimmed.len() < keyword.len() {
        return None;
    }
    let (head, rest) = trimmed.split_at(keyword.len());
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return None;
    }
    Some(rest)
}

/// Split off the first whitespace-delimited token.
fn leading_token(input: &str) -> (&str, &str) {
    match input.find(char::is_whitespace) {
        Some(end) => input.split_at(end),
        None => (input, ""),
    }
}
