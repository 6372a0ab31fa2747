//! Usage text built from the option table.
//!
//! Options are listed in the schema's canonical display order, each with its
//! argument placeholder, description, exclusivity note and documented
//! example.
//!
//! # Examples
//!
//! ```
//! use supconv_core::{OptionSchema, render_usage};
//!
//! let usage = render_usage(&OptionSchema::standard(), "supconv");
//! assert!(usage.starts_with("Usage: supconv [options]"));
//! assert!(usage.contains("  -S, --scale <x,y>"));
//! assert!(usage.contains("Example: --scale 2.0,1.5"));
//! ```

use crate::{OptionSchema, OptionSpec};

const DESCRIPTION_INDENT: &str = "        ";

/// Renders the full usage text.
pub fn render_usage(schema: &OptionSchema, program: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("Usage: {program} [options]\n\nOptions:\n"));

    for spec in schema.display_order() {
        out.push_str(&format!("  {}\n", synopsis(spec)));
        for line in spec.description.lines() {
            out.push_str(&format!("{DESCRIPTION_INDENT}{line}\n"));
        }
        if let Some(group) = schema.group_of(spec.key) {
            let others: Vec<String> = group
                .members
                .iter()
                .filter(|key| **key != spec.key)
                .filter_map(|key| schema.get(*key))
                .map(OptionSpec::display_name)
                .collect();
            out.push_str(&format!(
                "{DESCRIPTION_INDENT}Cannot be combined with {}.\n",
                others.join(", ")
            ));
        }
        if let Some(example) = &spec.example {
            out.push_str(&format!(
                "{DESCRIPTION_INDENT}Example: {} {example}\n",
                spec.display_name()
            ));
        }
    }

    out
}

/// `-c, --name <arg>`, with the placeholder bracketed when optional.
pub fn synopsis(spec: &OptionSpec) -> String {
    let mut line = format!("-{}, --{}", spec.short, spec.long);
    if let Some(arg) = &spec.arg_name {
        if spec.optional_arg {
            line.push_str(&format!(" [<{arg}>]"));
        } else {
            line.push_str(&format!(" <{arg}>"));
        }
    }
    line
}

/// One argument vector per option, in display order, built from the
/// documented example values.
///
/// Flags and optional-argument options without an example appear bare.
pub fn documented_examples(schema: &OptionSchema) -> Vec<Vec<String>> {
    schema
        .display_order()
        .filter(|spec| spec.example.is_some() || spec.is_flag() || spec.optional_arg)
        .map(|spec| {
            let mut tokens = vec![spec.display_name()];
            tokens.extend(spec.example.clone());
            tokens
        })
        .collect()
}
