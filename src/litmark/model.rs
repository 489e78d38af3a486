use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An output representation a literate block can request.
///
/// Serialized as the single-letter names the rendering pipeline uses on the
/// wire: `l`, `v`, `r`, `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Echo the block's source code. Presence-only: never carries an
    /// expression list.
    #[serde(rename = "l")]
    Literate,
    /// Render expression results as visualizations.
    #[serde(rename = "v")]
    Visualize,
    /// Print expression results as raw text.
    #[serde(rename = "r")]
    Raw,
    /// Print expression results as JSON.
    #[serde(rename = "j")]
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            OutputFormat::Literate => "l",
            OutputFormat::Visualize => "v",
            OutputFormat::Raw => "r",
            OutputFormat::Json => "j",
        };
        write!(f, "{}", letter)
    }
}

/// The directives derived from one block's attribute bag.
///
/// Created once per block by [`crate::directives::derive_directives`],
/// optionally replaced by a structurally new record by
/// [`crate::resolve::resolve_expressions`], then handed to the host
/// rendering engine. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDerivatives {
    /// The evaluation context this block's bindings live in. Non-empty and
    /// trimmed; `"default"` unless the block names or isolates a context.
    pub context_name: String,

    /// Requested output formats, in the order their triggering attributes
    /// appeared in the bag.
    pub output_formats: Vec<OutputFormat>,

    /// Explicit expression lists per format. A format present in
    /// `output_formats` but absent here means "automatic — resolve from the
    /// block's code". Never contains [`OutputFormat::Literate`].
    pub output_expressions_by_format: BTreeMap<OutputFormat, Vec<String>>,

    /// Stable block identifier, carried through from the `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Context this block's context chains from, carried through from the
    /// `follows` attribute (or set by the `siding` shorthand).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follows: Option<String>,

    /// Whether the visualize output should be interactive. Present only if
    /// the `interactive` attribute was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
}

impl AttributeDerivatives {
    /// An empty record bound to `context_name`, with no formats requested.
    pub fn new(context_name: impl Into<String>) -> Self {
        Self {
            context_name: context_name.into(),
            output_formats: Vec::new(),
            output_expressions_by_format: BTreeMap::new(),
            id: None,
            follows: None,
            interactive: None,
        }
    }

    /// True if `format` was requested without an explicit expression list,
    /// i.e. its expressions still need resolving from the block's code.
    pub fn is_automatic(&self, format: OutputFormat) -> bool {
        format != OutputFormat::Literate
            && self.output_formats.contains(&format)
            && !self.output_expressions_by_format.contains_key(&format)
    }
}
