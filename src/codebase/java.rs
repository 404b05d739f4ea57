//! Java type extraction using tree-sitter.

use std::path::Path;

use smallvec::SmallVec;
use tree_sitter::{Node, Parser};

use super::{
    find_child_by_kind, javadoc, node_text, with_java_parser, Location, SourceType, MARKER,
};

/// Extract all type declarations from Java source code.
///
/// Types are returned in source order, nested types directly after their
/// enclosing type. Any syntax error fails the whole file.
pub fn extract(path: &Path, content: &str) -> Result<SmallVec<[SourceType; 4]>, String> {
    with_java_parser(|parser| extract_with(parser, path, content))?
}

fn extract_with(
    parser: &mut Parser,
    path: &Path,
    content: &str,
) -> Result<SmallVec<[SourceType; 4]>, String> {
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| "failed to parse".to_string())?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error(root).map_or(root.start_position().row, |n| n.start_position().row);
        return Err(format!("syntax error at line {}", line + 1));
    }

    let mut types = SmallVec::new();
    extract_from_node(root, path, content, &mut types);
    Ok(types)
}

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

fn extract_from_node(
    node: Node,
    path: &Path,
    content: &str,
    types: &mut SmallVec<[SourceType; 4]>,
) {
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if is_type_declaration(child.kind()) {
            if let Some(ty) = extract_type(child, path, content) {
                tracing::trace!(
                    name = %ty.name,
                    line = ty.location.start_line,
                    marked = ty.has_marker,
                    documented = ty.documentation.is_some(),
                    "found type"
                );
                types.push(ty);
            }
        }
        // Types nest in class bodies, enum bodies, method bodies and
        // anonymous classes alike.
        if child.named_child_count() > 0 {
            extract_from_node(child, path, content, types);
        }
    }
}

fn extract_type(node: Node, path: &Path, content: &str) -> Option<SourceType> {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, content).to_string())?;

    let marker = find_marker(node, content);

    Some(SourceType {
        name,
        term: marker.as_ref().and_then(|m| m.term.clone()),
        has_marker: marker.is_some(),
        documentation: attached_javadoc(node, content),
        path: path.to_path_buf(),
        location: Location::new(node.start_position().row + 1, node.end_position().row + 1),
    })
}

/// A glossary marker found on a declaration.
struct Marker {
    term: Option<String>,
}

/// Look for the glossary marker among the declaration's modifiers.
fn find_marker(node: Node, content: &str) -> Option<Marker> {
    let modifiers = find_child_by_kind(node, "modifiers")?;

    modifiers
        .children(&mut modifiers.walk())
        .filter(|c| c.kind() == "marker_annotation" || c.kind() == "annotation")
        .find(|annotation| {
            annotation
                .child_by_field_name("name")
                .map(|n| simple_name(node_text(n, content)))
                .is_some_and(|name| name == MARKER)
        })
        .map(|annotation| Marker {
            term: annotation
                .child_by_field_name("arguments")
                .and_then(|args| marker_term(args, content)),
        })
}

/// Last segment of a possibly qualified name.
fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name).trim()
}

/// The term override in `@GlossaryTerm("...")` or `@GlossaryTerm(value = "...")`.
fn marker_term(args: Node, content: &str) -> Option<String> {
    let literal = find_child_by_kind(args, "string_literal").or_else(|| {
        args.children(&mut args.walk())
            .filter(|c| c.kind() == "element_value_pair")
            .find(|pair| {
                pair.child_by_field_name("key")
                    .is_some_and(|k| node_text(k, content) == "value")
            })
            .and_then(|pair| pair.child_by_field_name("value"))
            .filter(|v| v.kind() == "string_literal")
    })?;

    let value = string_value(node_text(literal, content));
    let term = value.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}

/// Value of a string literal or text block, given its source text.
fn string_value(literal: &str) -> String {
    if let Some(body) = literal
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        // Content starts after the line break that follows the opening quotes.
        let body = body.split_once('\n').map_or(body, |(_, rest)| rest);
        return unescape(&strip_indent(body));
    }

    let body = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(literal);
    unescape(body)
}

/// Remove the indentation shared by all non-blank lines of a text block and
/// trailing whitespace from every line.
fn strip_indent(body: &str) -> String {
    let indent = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    body.lines()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode Java escape sequences.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('s') => out.push(' '),
            Some('\n') => {}
            Some('u') => out.push(unicode_escape(&mut chars)),
            Some(first @ '0'..='7') => {
                let max_digits = if first <= '3' { 3 } else { 2 };
                let mut value = first.to_digit(8).unwrap_or(0);
                for _ in 1..max_digits {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

/// Decode the rest of a `\uXXXX` escape, joining surrogate pairs.
fn unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars>) -> char {
    let Some(high) = hex_code_unit(chars) else {
        return char::REPLACEMENT_CHARACTER;
    };

    if (0xD800..0xDC00).contains(&high) {
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
            if let Some(low @ 0xDC00..=0xDFFF) = hex_code_unit(&mut lookahead) {
                *chars = lookahead;
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Four hex digits of a unicode escape; Java allows repeated `u`s before them.
fn hex_code_unit(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<u32> {
    while chars.peek() == Some(&'u') {
        chars.next();
    }
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok()
}

/// Find the Javadoc attached to a declaration.
///
/// Walks back over the comments preceding the declaration. Each step must
/// land on the line directly above, so a blank line detaches everything
/// before it. The nearest Javadoc block wins; ordinary comments in between
/// are stepped over.
fn attached_javadoc(node: Node, content: &str) -> Option<String> {
    let mut next_row = node.start_position().row;
    let mut prev = node.prev_sibling();

    while let Some(sibling) = prev {
        let kind = sibling.kind();
        if kind != "block_comment" && kind != "line_comment" {
            break;
        }
        if sibling.end_position().row + 1 < next_row {
            break;
        }

        let text = node_text(sibling, content);
        if kind == "block_comment" && javadoc::is_javadoc(text) {
            return javadoc::description(text);
        }

        next_row = sibling.start_position().row;
        prev = sibling.prev_sibling();
    }

    leading_javadoc(node, content)
}

/// Javadoc parsed as the first child of the declaration or of its modifiers.
fn leading_javadoc(node: Node, content: &str) -> Option<String> {
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        match child.kind() {
            "block_comment" if javadoc::is_javadoc(node_text(child, content)) => {
                return javadoc::description(node_text(child, content));
            }
            "block_comment" | "line_comment" => continue,
            "modifiers" => return leading_javadoc(child, content),
            _ => return None,
        }
    }

    None
}

/// Depth-first search for the first error or missing node.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error())
        .find_map(first_error)
}
