//! # Directive Derivation
//!
//! Maps a block's attribute bag to an [`AttributeDerivatives`] record, or to
//! `None` when the block is not a literate block at all. A block counts as
//! literate exactly when at least one of `literate`/`visualize`/`raw`/`json`
//! (or a shorthand alias) is present.
//!
//! Derivation is a single pass over the bag in insertion order. Order is
//! observable in two ways: requested output formats keep the order their
//! attributes appeared in, and a `literate=false` aborts derivation the
//! moment it is encountered, overriding any marker seen earlier.

use crate::attributes::{AttrValue, AttributeBag};
use crate::context::ContextAllocator;
use crate::model::{AttributeDerivatives, OutputFormat};

/// Derive output directives from a block's attribute bag.
///
/// The caller's bag is never mutated; derivation works on a copy with
/// shorthand aliases normalized. Consumes at most one name from `contexts`,
/// and only when the block requests isolation.
///
/// Returns `None` for non-literate blocks — a normal outcome, not an error.
pub fn derive_directives(
    attributes: &AttributeBag,
    contexts: &ContextAllocator,
) -> Option<AttributeDerivatives> {
    let mut attrs = attributes.clone();
    attrs.normalize_aliases();

    // The siding shorthand expands before anything reads `follows`, so it
    // overwrites a directly-set `follows` value. Either spelling being
    // exactly `true` fires it, so scan every entry: a bag can carry both
    // `s` and `siding`, which collapse to duplicate keys above.
    let siding = attrs
        .iter()
        .any(|(key, value)| key == "siding" && matches!(value, AttrValue::Bool(true)));
    if siding {
        attrs.set("isolated", true);
        attrs.set("follows", "default");
    }

    // Isolation wins over an explicitly named context.
    if attrs.get("isolated").is_some_and(AttrValue::is_truthy) {
        let minted = contexts.mint();
        attrs.set("context", minted);
    }

    let context_name = match attrs.get("context") {
        Some(value) => normalize_expression(value),
        None => "default".to_string(),
    };
    let mut result = AttributeDerivatives::new(context_name);
    result.id = attrs.get("id").map(carried_string);
    result.follows = attrs.get("follows").map(carried_string);

    let hide = matches!(attrs.get("hide"), Some(AttrValue::Bool(true)));

    let mut saw_literate_marker = false;
    for (key, value) in attrs.iter() {
        match key {
            "literate" => {
                if matches!(value, AttrValue::Bool(false)) {
                    return None;
                }
                saw_literate_marker = true;
                let hidden = matches!(value, AttrValue::Str(s) if s == "hidden");
                if !hidden && !hide {
                    result.output_formats.push(OutputFormat::Literate);
                }
            }
            "visualize" => {
                saw_literate_marker = true;
                add_output_expressions(&mut result, OutputFormat::Visualize, value);
            }
            "raw" => {
                saw_literate_marker = true;
                add_output_expressions(&mut result, OutputFormat::Raw, value);
            }
            "json" => {
                saw_literate_marker = true;
                add_output_expressions(&mut result, OutputFormat::Json, value);
            }
            "interactive" => {
                result.interactive = Some(value.is_truthy());
            }
            _ => {}
        }
    }

    if saw_literate_marker {
        Some(result)
    } else {
        None
    }
}

/// Record one output request on the record under construction.
///
/// `true` requests the format with its expression list left for later
/// resolution; a list or single value requests it with those expressions;
/// an empty list requests nothing.
fn add_output_expressions(
    result: &mut AttributeDerivatives,
    format: OutputFormat,
    value: &AttrValue,
) {
    let mut expressions: Vec<String> = Vec::new();
    match value {
        AttrValue::List(items) => {
            expressions.extend(items.iter().map(|item| item.trim().to_string()));
        }
        AttrValue::Bool(true) => {}
        other => expressions.push(normalize_expression(other)),
    }

    if !expressions.is_empty() || matches!(value, AttrValue::Bool(true)) {
        result.output_formats.push(format);
    }
    if !expressions.is_empty() {
        result.output_expressions_by_format.insert(format, expressions);
    }
}

/// String-coerce a value and trim surrounding whitespace.
fn normalize_expression(value: &AttrValue) -> String {
    value.to_string().trim().to_string()
}

// `id` and `follows` pass through untrimmed.
fn carried_string(value: &AttrValue) -> String {
    match value {
        AttrValue::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(bag: &AttributeBag) -> Option<AttributeDerivatives> {
        derive_directives(bag, &ContextAllocator::new())
    }

    #[test]
    fn test_bag_without_literate_markers_is_not_a_literate_block() {
        let mut bag = AttributeBag::new();
        bag.set("context", "main").set("id", "b1").set("isolated", true);
        assert_eq!(derive(&bag), None);

        assert_eq!(derive(&AttributeBag::new()), None);
    }

    #[test]
    fn test_literate_false_aborts_before_other_markers() {
        let mut bag = AttributeBag::new();
        bag.set("literate", false).set("visualize", true);
        assert_eq!(derive(&bag), None);
    }

    #[test]
    fn test_literate_false_aborts_after_other_markers() {
        // The abort fires per-key during iteration, so it also wins when a
        // marker was already seen.
        let mut bag = AttributeBag::new();
        bag.set("visualize", true).set("literate", false);
        assert_eq!(derive(&bag), None);
    }

    #[test]
    fn test_visualize_true_requests_automatic_output() {
        let mut bag = AttributeBag::new();
        bag.set("visualize", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.context_name, "default");
        assert_eq!(record.output_formats, vec![OutputFormat::Visualize]);
        assert!(record.output_expressions_by_format.is_empty());
        assert!(record.is_automatic(OutputFormat::Visualize));
    }

    #[test]
    fn test_visualize_list_pins_expressions() {
        let mut bag = AttributeBag::new();
        bag.set("visualize", vec!["a", "b"]);

        let record = derive(&bag).unwrap();
        assert_eq!(record.output_formats, vec![OutputFormat::Visualize]);
        assert_eq!(
            record.output_expressions_by_format[&OutputFormat::Visualize],
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_single_value_becomes_one_element_list() {
        let mut bag = AttributeBag::new();
        bag.set("raw", " total ");

        let record = derive(&bag).unwrap();
        assert_eq!(record.output_formats, vec![OutputFormat::Raw]);
        assert_eq!(
            record.output_expressions_by_format[&OutputFormat::Raw],
            vec!["total".to_string()]
        );
    }

    #[test]
    fn test_empty_list_requests_nothing() {
        let mut bag = AttributeBag::new();
        bag.set("literate", true).set("json", Vec::<String>::new());

        let record = derive(&bag).unwrap();
        assert_eq!(record.output_formats, vec![OutputFormat::Literate]);
        assert!(record.output_expressions_by_format.is_empty());
    }

    #[test]
    fn test_formats_keep_attribute_order() {
        let mut bag = AttributeBag::new();
        bag.set("json", true).set("literate", true).set("visualize", true);

        let record = derive(&bag).unwrap();
        assert_eq!(
            record.output_formats,
            vec![OutputFormat::Json, OutputFormat::Literate, OutputFormat::Visualize]
        );
    }

    #[test]
    fn test_shorthand_aliases_match_canonical_keys() {
        let mut short = AttributeBag::new();
        short.set("l", true).set("v", vec!["a"]).set("r", true).set("j", true);
        let mut long = AttributeBag::new();
        long.set("literate", true)
            .set("visualize", vec!["a"])
            .set("raw", true)
            .set("json", true);

        assert_eq!(derive(&short), derive(&long));
    }

    #[test]
    fn test_literate_hidden_skips_source_echo() {
        let mut bag = AttributeBag::new();
        bag.set("literate", "hidden").set("raw", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.output_formats, vec![OutputFormat::Raw]);
    }

    #[test]
    fn test_hide_suppresses_source_echo() {
        let mut bag = AttributeBag::new();
        bag.set("literate", true).set("hide", true);

        let record = derive(&bag).unwrap();
        assert!(!record.output_formats.contains(&OutputFormat::Literate));
    }

    #[test]
    fn test_hide_must_be_exactly_true() {
        let mut bag = AttributeBag::new();
        bag.set("literate", true).set("hide", "yes");

        let record = derive(&bag).unwrap();
        assert_eq!(record.output_formats, vec![OutputFormat::Literate]);
    }

    #[test]
    fn test_context_name_is_trimmed() {
        let mut bag = AttributeBag::new();
        bag.set("context", "  scratch  ").set("visualize", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.context_name, "scratch");
    }

    #[test]
    fn test_isolated_overrides_explicit_context() {
        let contexts = ContextAllocator::new();
        let mut bag = AttributeBag::new();
        bag.set("isolated", true).set("context", "foo").set("visualize", true);

        let first = derive_directives(&bag, &contexts).unwrap();
        let second = derive_directives(&bag, &contexts).unwrap();

        assert!(first.context_name.starts_with("_autogenerated__"));
        assert!(second.context_name.starts_with("_autogenerated__"));
        assert_ne!(first.context_name, second.context_name);
    }

    #[test]
    fn test_allocator_untouched_without_isolation() {
        let contexts = ContextAllocator::new();
        let mut bag = AttributeBag::new();
        bag.set("visualize", true);
        derive_directives(&bag, &contexts).unwrap();

        // The next mint is still the first counter value.
        assert_eq!(contexts.mint(), "_autogenerated__0");
    }

    #[test]
    fn test_siding_expands_to_isolated_follows_default() {
        let mut siding = AttributeBag::new();
        siding.set("s", true).set("literate", true);
        let mut explicit = AttributeBag::new();
        explicit
            .set("isolated", true)
            .set("follows", "default")
            .set("literate", true);

        let from_siding = derive(&siding).unwrap();
        let from_explicit = derive(&explicit).unwrap();

        assert_eq!(from_siding.follows, Some("default".to_string()));
        assert_eq!(from_siding.follows, from_explicit.follows);
        assert!(from_siding.context_name.starts_with("_autogenerated__"));
        assert!(from_explicit.context_name.starts_with("_autogenerated__"));
    }

    #[test]
    fn test_siding_fires_when_either_spelling_is_true() {
        // Both spellings in one bag: the `true` one wins even when the
        // other is `false`.
        let mut bag = AttributeBag::new();
        bag.set("s", false).set("siding", true).set("literate", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.follows, Some("default".to_string()));
        assert!(record.context_name.starts_with("_autogenerated__"));

        let mut bag = AttributeBag::new();
        bag.set("siding", false).set("s", true).set("literate", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.follows, Some("default".to_string()));
        assert!(record.context_name.starts_with("_autogenerated__"));
    }

    #[test]
    fn test_siding_false_alone_does_not_fire() {
        let mut bag = AttributeBag::new();
        bag.set("s", false).set("literate", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.follows, None);
        assert_eq!(record.context_name, "default");
    }

    #[test]
    fn test_siding_overwrites_explicit_follows() {
        let mut bag = AttributeBag::new();
        bag.set("follows", "earlier").set("siding", true).set("literate", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.follows, Some("default".to_string()));
    }

    #[test]
    fn test_id_and_follows_carry_through() {
        let mut bag = AttributeBag::new();
        bag.set("id", "block-7")
            .set("follows", "setup")
            .set("visualize", true);

        let record = derive(&bag).unwrap();
        assert_eq!(record.id, Some("block-7".to_string()));
        assert_eq!(record.follows, Some("setup".to_string()));
    }

    #[test]
    fn test_interactive_is_boolean_coerced() {
        let mut bag = AttributeBag::new();
        bag.set("visualize", true).set("interactive", "yes");
        assert_eq!(derive(&bag).unwrap().interactive, Some(true));

        let mut bag = AttributeBag::new();
        bag.set("visualize", true).set("interactive", 0);
        assert_eq!(derive(&bag).unwrap().interactive, Some(false));

        let mut bag = AttributeBag::new();
        bag.set("visualize", true);
        assert_eq!(derive(&bag).unwrap().interactive, None);
    }

    #[test]
    fn test_numeric_expression_is_string_coerced() {
        let mut bag = AttributeBag::new();
        bag.set("raw", 42);

        let record = derive(&bag).unwrap();
        assert_eq!(
            record.output_expressions_by_format[&OutputFormat::Raw],
            vec!["42".to_string()]
        );
    }

    #[test]
    fn test_caller_bag_is_not_mutated() {
        let mut bag = AttributeBag::new();
        bag.set("s", true).set("v", true);
        let before = bag.clone();

        derive(&bag).unwrap();
        assert_eq!(bag, before);
    }
}
