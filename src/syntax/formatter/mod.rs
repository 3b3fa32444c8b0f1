//! Printer for the structural notation
//!
//! Renders a concrete [`Root`] back to source text. The output always
//! re-parses to the same tree: arguments go on the header line when they
//! fit, otherwise each one gets its own `. ` item line, and nested groups
//! are always written as items.

mod options;

pub use options::FormatOptions;

use crate::parser::{Abstraction, Argument, Group, Root, RootItem, Section, Target, Token};

/// Print a concrete tree
pub fn format_root(root: &Root, options: &FormatOptions) -> String {
    let mut out = String::new();
    for (i, item) in root.items.iter().enumerate() {
        if i > 0 {
            out.push_str(&options.group_separator());
        }
        match item {
            RootItem::BlockComment(token) => out.push_str(&token.text),
            RootItem::Group(group) => {
                if let Some(id) = &group.id {
                    out.push_str(&id.text);
                    out.push('\n');
                }
                write_sections(&mut out, &group.sections, 0, options);
                // Sections end with a new line; the separator adds the rest
                if out.ends_with('\n') {
                    out.pop();
                }
            }
        }
    }
    out.push('\n');
    out
}

/// Write sections of a group whose first section starts at `column`.
///
/// The caller has already written the indentation (or `. `) of the first
/// section.
fn write_sections(out: &mut String, sections: &[Section], column: usize, options: &FormatOptions) {
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push_str(&options.indent(column));
        }
        write_section(out, section, column, options);
    }
}

fn write_section(out: &mut String, section: &Section, column: usize, options: &FormatOptions) {
    out.push_str(&section.name.text);
    out.push(':');

    let inline = inline_arguments(&section.args);
    let fits = inline.as_ref().is_some_and(|text| {
        let header = column + section.name.text.chars().count() + 2 + text.chars().count();
        text.is_empty() || (header <= options.print_width && !text.contains('\n'))
    });

    match inline {
        Some(text) if fits => {
            if !text.is_empty() {
                out.push(' ');
                out.push_str(&text);
            }
            out.push('\n');
        }
        _ => {
            out.push('\n');
            for arg in &section.args {
                out.push_str(&options.indent(column));
                out.push_str(". ");
                match &arg.target {
                    Target::Group(group) => write_sections(out, &group.sections, column + 2, options),
                    target => {
                        out.push_str(&render_target(target));
                        out.push('\n');
                    }
                }
            }
        }
    }
}

/// Arguments joined on one line, or `None` when any of them is a group
fn inline_arguments(args: &[Argument]) -> Option<String> {
    let rendered: Option<Vec<String>> = args
        .iter()
        .map(|arg| match &arg.target {
            Target::Group(_) => None,
            target => Some(render_target(target)),
        })
        .collect();
    rendered.map(|parts| parts.join(", "))
}

/// Render a non-group target on a single line
pub fn render_target(target: &Target) -> String {
    match target {
        Target::Literal(token) | Target::Invalid(token) => token.text.to_string(),
        Target::Group(group) => render_group_inline(group),
        Target::Tuple(tuple) => {
            let items: Vec<String> = tuple.items.iter().map(render_target).collect();
            format!("({})", items.join(", "))
        }
        Target::Assignment(assignment) => {
            format!("{} := {}", assignment.lhs.text, render_target(&assignment.rhs))
        }
        Target::Abstraction(abstraction) => render_abstraction(abstraction),
        Target::Aggregate(aggregate) => {
            let items: Vec<String> = aggregate.items.iter().map(render_core).collect();
            format!("{{{}}}", items.join(", "))
        }
        Target::Mapping(mapping) => format!("{} = {}", mapping.name.text, mapping.value.text),
    }
}

fn render_group_inline(group: &Group) -> String {
    group
        .sections
        .iter()
        .map(|s| s.name.text.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_abstraction(abstraction: &Abstraction) -> String {
    let mut text = if abstraction.is_enclosed {
        let mut text = format!("{{{}}}", render_core(abstraction));
        if let Some(outer) = &abstraction.outer_subparams {
            text.push('_');
            text.push_str(&render_sub_params(outer));
        }
        text
    } else {
        render_core(abstraction)
    };
    if abstraction.is_varargs {
        text.push_str("...");
    }
    text
}

/// `name`, `name_sub`, `name_{a, b}(x, y)`
fn render_core(abstraction: &Abstraction) -> String {
    let mut text = abstraction.name.text.to_string();
    if let Some(sub) = &abstraction.subparams {
        text.push('_');
        text.push_str(&render_sub_params(sub));
    }
    if let Some(params) = &abstraction.params {
        text.push('(');
        text.push_str(&join_tokens(params));
        text.push(')');
    }
    text
}

fn render_sub_params(names: &[Token]) -> String {
    if names.len() == 1 {
        names[0].text.to_string()
    } else {
        format!("{{{}}}", join_tokens(names))
    }
}

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_structure;

    fn reformat(text: &str, options: &FormatOptions) -> String {
        let (root, errors) = parse_structure(text);
        assert!(errors.is_empty(), "{:?}", errors);
        format_root(&root, options)
    }

    #[test]
    fn test_inline_arguments() {
        let text = "Defines: f(x)\nmeans: 'x'\n";
        assert_eq!(reformat(text, &FormatOptions::default()), text);
    }

    #[test]
    fn test_nested_groups_print_as_items() {
        let text = "[x]\nTheorem:\nthen:\n. forAll: y\n  then: 'y = y'\n";
        assert_eq!(reformat(text, &FormatOptions::default()), text);
    }

    #[test]
    fn test_narrow_width_moves_arguments_to_items() {
        let options = FormatOptions {
            print_width: 10,
            ..FormatOptions::default()
        };
        let out = reformat("given: alpha, beta\n", &options);
        assert_eq!(out, "given:\n. alpha\n. beta\n");
        let (root, errors) = parse_structure(&out);
        assert!(errors.is_empty());
        let (original, _) = parse_structure("given: alpha, beta\n");
        assert_eq!(
            render_target(&group_arg(&root, 1)),
            render_target(&group_arg(&original, 1))
        );
    }

    #[test]
    fn test_groups_are_separated_by_blank_lines() {
        let options = FormatOptions {
            blank_lines_between_groups: 2,
            ..FormatOptions::default()
        };
        let out = reformat("A: x\n\nB: y\n", &options);
        assert_eq!(out, "A: x\n\n\nB: y\n");
    }

    #[test]
    fn test_render_abstractions() {
        let out = reformat("A: {x_{i, j}}_{i}..., f(a,b), {a, b}\n", &FormatOptions::default());
        assert_eq!(out, "A: {x_{i, j}}_i..., f(a, b), {a, b}\n");
    }

    fn group_arg(root: &Root, index: usize) -> Target {
        match &root.items[0] {
            RootItem::Group(group) => group.sections[0].args[index].target.clone(),
            RootItem::BlockComment(_) => panic!("expected a group"),
        }
    }
}
