//! # Expression Resolution
//!
//! A format requested with a bare `true` carries no expression list — it
//! means "show whatever this block introduces". This module materializes
//! those automatic requests by asking the host's [`SymbolSource`] for the
//! symbols the block's code defines.

use crate::error::Result;
use crate::model::{AttributeDerivatives, OutputFormat};
use crate::symbols::SymbolSource;

/// Replace automatic output requests with the symbols `code` introduces.
///
/// Every format in `output_formats` other than `Literate` that has no entry
/// in `output_expressions_by_format` receives the full introduced-name list,
/// in source order. Explicit entries and `Literate` are left untouched, so
/// resolving an already-resolved record changes nothing.
///
/// Returns a structurally new record; `derivatives` itself is never mutated.
/// Analysis failures from the symbol source propagate unhandled.
pub fn resolve_expressions<S: SymbolSource>(
    derivatives: &AttributeDerivatives,
    code: &str,
    symbols: &S,
) -> Result<AttributeDerivatives> {
    let introduced_names: Vec<String> = symbols
        .find_introduced_symbols(code)?
        .into_iter()
        .map(|symbol| symbol.name)
        .collect();

    let mut resolved = derivatives.clone();
    for format in &derivatives.output_formats {
        if *format != OutputFormat::Literate
            && !resolved.output_expressions_by_format.contains_key(format)
        {
            resolved
                .output_expressions_by_format
                .insert(*format, introduced_names.clone());
        }
    }
    Ok(resolved)
}
