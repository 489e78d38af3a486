//! # Code-Analysis Seam
//!
//! Resolving an "automatic" output request needs to know which symbols a
//! block's code introduces. That analysis lives outside this crate — it
//! depends on the language the blocks are written in. The [`SymbolSource`]
//! trait is the seam: production hosts plug in a real analyzer, tests use
//! [`StaticSymbols`].

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A name a code block defines or binds, as reported by the host's
/// code-analysis facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroducedSymbol {
    pub name: String,
}

impl IntroducedSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Abstract interface to the host's code analyzer.
///
/// Implementations must preserve source order and report duplicates as
/// encountered. Unparsable code is an error; this crate never recovers from
/// it.
pub trait SymbolSource {
    fn find_introduced_symbols(&self, code: &str) -> Result<Vec<IntroducedSymbol>>;
}

/// A [`SymbolSource`] returning a fixed symbol list regardless of code.
///
/// For tests and host harnesses; the analysis counterpart of an in-memory
/// store.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbols {
    symbols: Vec<IntroducedSymbol>,
    failure: Option<String>,
}

impl StaticSymbols {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: names.into_iter().map(IntroducedSymbol::new).collect(),
            failure: None,
        }
    }

    /// A source that fails every lookup with the given message, for
    /// exercising error propagation.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            symbols: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

impl SymbolSource for StaticSymbols {
    fn find_introduced_symbols(&self, _code: &str) -> Result<Vec<IntroducedSymbol>> {
        match &self.failure {
            Some(message) => Err(crate::error::LitmarkError::Analysis(message.clone())),
            None => Ok(self.symbols.clone()),
        }
    }
}
