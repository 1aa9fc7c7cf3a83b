//! Symbol extraction from PHP stub files.
//!
//! Stubs are parsed with tree-sitter-php and walked once. Collected:
//!
//! - `const` declarations outside class-like bodies, namespace-qualified
//! - `define('NAME', ...)` calls with a literal name and at least two arguments
//! - class, interface and trait declarations (all reported as classes)
//! - function definitions, namespace-qualified

use super::ExcludeList;
use crate::core::DevkitError;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace, warn};
use tree_sitter::{Node, Parser};

/// Newer stubs declare a global `readonly()` function, a reserved word the
/// grammar rejects; it is renamed for parsing and restored afterwards.
const READONLY_DECLARATION: &str = "function readonly(";
const READONLY_PLACEHOLDER_DECLARATION: &str = "function x_stubfix_readonly(";
const READONLY_PLACEHOLDER: &str = "x_stubfix_readonly";

/// Parse `source` and collect its declared symbols. `file` only labels errors.
pub fn parse_stub(source: &str, file: &str) -> Result<ExcludeList, DevkitError> {
    let source = source.replace(READONLY_DECLARATION, READONLY_PLACEHOLDER_DECLARATION);
    let source = blank_enum_constants(&source);

    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_php::language_php()).map_err(|e| {
        DevkitError::StubParseError {
            file: file.to_string(),
            reason: format!("failed to load the PHP grammar: {e}"),
        }
    })?;

    let tree = parser.parse(&source, None).ok_or_else(|| DevkitError::StubParseError {
        file: file.to_string(),
        reason: "parser produced no syntax tree".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        warn!("{file} contains syntax errors; symbols inside broken regions may be missed");
    }

    let mut collector = Collector {
        source: &source,
        names: ExcludeList::default(),
    };
    collector.visit_children(root, "", false);

    debug!(
        "{file}: {} constants, {} classes, {} functions",
        collector.names.constants.len(),
        collector.names.classes.len(),
        collector.names.functions.len()
    );
    Ok(collector.names)
}

/// Replace `const` declarations inside enum bodies with spaces.
///
/// The grammar predates enum constants and recovers from them by dropping the
/// enclosing namespace for everything that follows. Enum constants are never
/// collected, so blanking them keeps the rest of the file intact. Newlines are
/// kept so positions in warnings still line up.
fn blank_enum_constants(source: &str) -> String {
    static ENUM_HEADER: OnceLock<Regex> = OnceLock::new();
    static MODIFIERS: OnceLock<Regex> = OnceLock::new();
    let header = ENUM_HEADER.get_or_init(|| {
        Regex::new(r"(?i)\benum\s+\w+[^{;()]*\{").expect("enum header pattern is valid")
    });
    if !header.is_match(source) {
        return source.to_string();
    }
    let modifiers = MODIFIERS.get_or_init(|| {
        Regex::new(r"(?i)(?:\b(?:final|public|protected|private)\s+)*$")
            .expect("modifier pattern is valid")
    });

    let bytes = source.as_bytes();
    let code = code_mask(bytes);
    let mut out = bytes.to_vec();

    for found in header.find_iter(source) {
        if !code[found.start()] || !code[found.end() - 1] {
            continue;
        }

        let mut depth = 1usize;
        let mut floor = found.end();
        let mut i = found.end();
        while i < bytes.len() && depth > 0 {
            if !code[i] {
                i += 1;
                continue;
            }
            match bytes[i] {
                b'{' => depth += 1,
                b'}' => depth -= 1,
                b';' if depth == 1 => floor = i + 1,
                b'c' | b'C' if depth == 1 && is_keyword_at(bytes, i, b"const") => {
                    let start = modifiers
                        .find(&source[floor..i])
                        .map_or(i, |m| floor + m.start());
                    let end = (i..bytes.len())
                        .find(|&j| code[j] && bytes[j] == b';')
                        .unwrap_or(bytes.len() - 1);
                    for byte in &mut out[start..=end] {
                        if *byte != b'\n' {
                            *byte = b' ';
                        }
                    }
                    floor = end + 1;
                    i = end;
                }
                _ => {}
            }
            if depth == 1 && bytes[i] == b'}' {
                floor = i + 1;
            }
            i += 1;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn is_keyword_at(bytes: &[u8], at: usize, keyword: &[u8]) -> bool {
    let is_ident = |b: &u8| b.is_ascii_alphanumeric() || *b == b'_' || *b >= 0x80;
    bytes.get(at..at + keyword.len()).is_some_and(|w| w.eq_ignore_ascii_case(keyword))
        && !at.checked_sub(1).and_then(|p| bytes.get(p)).is_some_and(is_ident)
        && !bytes.get(at + keyword.len()).is_some_and(is_ident)
}

/// `true` for bytes that are PHP code rather than a comment or string literal.
fn code_mask(bytes: &[u8]) -> Vec<bool> {
    let mut mask = vec![true; bytes.len()];
    let mut i = 0;
    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        let end = match (bytes[i], next) {
            (b'/', Some(b'/')) => line_end(bytes, i),
            (b'#', n) if n != Some(b'[') => line_end(bytes, i),
            (b'/', Some(b'*')) => bytes
                .get(i + 2..)
                .and_then(|rest| rest.windows(2).position(|w| w == b"*/"))
                .map_or(bytes.len(), |p| i + 2 + p + 2),
            (quote @ (b'\'' | b'"' | b'`'), _) => quoted_end(bytes, i, quote),
            _ => {
                i += 1;
                continue;
            }
        };
        mask[i..end].fill(false);
        i = end;
    }
    mask
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().position(|&b| b == b'\n').map_or(bytes.len(), |p| from + p)
}

fn quoted_end(bytes: &[u8], from: usize, quote: u8) -> usize {
    let mut j = from + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

struct Collector<'s> {
    source: &'s str,
    names: ExcludeList,
}

impl Collector<'_> {
    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// Visit the children of `node` in order, tracking unbraced
    /// `namespace Foo;` statements that apply to the siblings after them.
    fn visit_children(&mut self, node: Node<'_>, namespace: &str, in_class_body: bool) {
        let mut current = namespace.to_string();
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();

        for child in children {
            if child.kind() == "namespace_definition" {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| self.text(n).trim_start_matches('\\').to_string())
                    .unwrap_or_default();
                match child.child_by_field_name("body") {
                    Some(body) => self.visit_children(body, &name, false),
                    None => current = name,
                }
                continue;
            }
            self.visit(child, &current, in_class_body);
        }
    }

    fn visit(&mut self, node: Node<'_>, namespace: &str, in_class_body: bool) {
        match node.kind() {
            "const_declaration" if !in_class_body => {
                let mut cursor = node.walk();
                let elements: Vec<Node<'_>> = node
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() == "const_element")
                    .collect();
                for element in elements {
                    let mut element_cursor = element.walk();
                    let name = element
                        .named_children(&mut element_cursor)
                        .find(|c| c.kind() == "name")
                        .map(|n| self.text(n).to_string());
                    if let Some(name) = name {
                        self.push_constant(qualify(namespace, &name));
                    }
                }
            }
            "function_call_expression" => {
                if let Some(name) = self.define_name(node) {
                    self.push_constant(name);
                }
            }
            "class_declaration" | "interface_declaration" | "trait_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let fqn = qualify(namespace, self.text(name));
                    trace!("{}: {fqn}", node.kind());
                    self.names.classes.push(fqn);
                }
            }
            "function_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let name = match self.text(name) {
                        READONLY_PLACEHOLDER => "readonly",
                        other => other,
                    };
                    let fqn = qualify(namespace, name);
                    trace!("function: {fqn}");
                    self.names.functions.push(fqn);
                }
            }
            _ => {}
        }

        let in_class_body = in_class_body
            || matches!(node.kind(), "declaration_list" | "enum_declaration_list");
        self.visit_children(node, namespace, in_class_body);
    }

    fn push_constant(&mut self, name: String) {
        trace!("constant: {name}");
        self.names.constants.push(name);
    }

    /// Name defined by a `define('NAME', value)` call, if `node` is one.
    fn define_name(&self, node: Node<'_>) -> Option<String> {
        let function = node.child_by_field_name("function")?;
        if !self.text(function).trim_start_matches('\\').eq_ignore_ascii_case("define") {
            return None;
        }

        let arguments = node.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        let args: Vec<Node<'_>> =
            arguments.named_children(&mut cursor).filter(|c| c.kind() == "argument").collect();
        if args.len() < 2 {
            return None;
        }

        let mut arg_cursor = args[0].walk();
        let literal = args[0].named_children(&mut arg_cursor).last()?;
        string_literal_value(literal.kind(), self.text(literal))
    }
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}\\{name}")
    }
}

/// Value of a PHP string literal without interpolation, `None` otherwise.
fn string_literal_value(kind: &str, text: &str) -> Option<String> {
    let text = text.strip_prefix(['b', 'B']).unwrap_or(text);
    match kind {
        "string" => {
            let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
            Some(inner.replace("\\\\", "\\").replace("\\'", "'"))
        }
        "encapsed_string" => {
            let inner = text.strip_prefix('"')?.strip_suffix('"')?;
            if inner.contains('$') {
                return None;
            }
            Some(unescape_double_quoted(inner))
        }
        _ => None,
    }
}

fn unescape_double_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('$') => out.push('$'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
