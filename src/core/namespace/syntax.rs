//! C# syntax tree access for namespace declarations.
//!
//! Parses source text with tree-sitter-c-sharp, locates the first namespace
//! declaration and prints the text back with that declaration's name
//! replaced. Everything outside the name's byte range is emitted unchanged.

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{Error, Result};

const UTF8_BOM: char = '\u{FEFF}';

/// Node kinds that declare a namespace, block-scoped and file-scoped.
const NAMESPACE_KINDS: &[&str] = &[
    "namespace_declaration",
    "file_scoped_namespace_declaration",
];

/// Trivia that may appear inside a qualified name: comments and whitespace.
static NAME_TRIVIA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*|\s+").unwrap());

/// A namespace declaration found in a parsed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Declared name with comments and whitespace removed.
    pub name: String,
    /// Byte range of the name node in the BOM-stripped text.
    pub name_range: Range<usize>,
}

/// A parsed C# source file.
pub struct SourceTree {
    label: String,
    text: String,
    bom: bool,
    tree: Tree,
}

impl SourceTree {
    /// Parse `content`. Syntax errors do not fail here (tree-sitter always
    /// produces a tree); call [`SourceTree::ensure_valid`] to reject them.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let label = path.display().to_string();
        let (bom, text) = match content.strip_prefix(UTF8_BOM) {
            Some(rest) => (true, rest.to_string()),
            None => (false, content.to_string()),
        };

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| Error::internal_unexpected(format!("load C# grammar: {}", e)))?;

        let no_tree =
            || Error::source_parse_failed(label.clone(), None, Some("parser produced no tree".into()));

        let mut tree = parser.parse(&text, None).ok_or_else(no_tree)?;

        // Namespace headers split across `#if` branches do not parse as
        // written. Retry on the first branch of every conditional group; the
        // view has the same byte offsets, so ranges still index `text`.
        if tree.root_node().has_error() {
            if let Some(view) = first_branch_view(&text) {
                let retry = parser.parse(&view, None).ok_or_else(no_tree)?;
                if !retry.root_node().has_error() {
                    tree = retry;
                }
            }
        }

        Ok(Self {
            label,
            text,
            bom,
            tree,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Fail with a parse error pointing at the first error or missing node.
    pub fn ensure_valid(&self) -> Result<()> {
        if !self.has_errors() {
            return Ok(());
        }

        let position = first_error_node(self.tree.root_node()).map(|node| {
            let point = node.start_position();
            (point.row + 1, point.column + 1)
        });

        Err(Error::source_parse_failed(
            self.label.clone(),
            position,
            Some("source contains syntax errors".to_string()),
        ))
    }

    /// The first namespace declaration in document order.
    ///
    /// Pre-order traversal reaches an enclosing declaration before any
    /// declaration nested inside it, so the result is always outermost.
    pub fn namespace(&self) -> Option<NamespaceDecl> {
        let node = find_namespace_node(self.tree.root_node())?;
        let name_node = node.child_by_field_name("name")?;
        let name_range = name_node.byte_range();
        let raw = &self.text[name_range.clone()];

        Some(NamespaceDecl {
            name: normalize_name(raw),
            name_range,
        })
    }

    /// Print the source with `decl`'s name replaced by `new_name`.
    pub fn with_namespace(&self, decl: &NamespaceDecl, new_name: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + new_name.len() + UTF8_BOM.len_utf8());
        if self.bom {
            out.push(UTF8_BOM);
        }
        out.push_str(&self.text[..decl.name_range.start]);
        out.push_str(new_name);
        out.push_str(&self.text[decl.name_range.end..]);
        out
    }
}

fn find_namespace_node(node: Node<'_>) -> Option<Node<'_>> {
    if NAMESPACE_KINDS.contains(&node.kind()) {
        return Some(node);
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(found) = find_namespace_node(child) {
            return Some(found);
        }
    }
    None
}

fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    Some(node)
}

/// The text as seen when every `#if` takes its first branch.
///
/// Conditional directive lines and inactive branch lines are blanked to
/// spaces, keeping line breaks, so every byte offset is unchanged. `None`
/// when the text has no conditional directives.
fn first_branch_view(text: &str) -> Option<String> {
    // One entry per open `#if`: true once its first branch has ended.
    let mut groups: Vec<bool> = Vec::new();
    let mut view = String::with_capacity(text.len());
    let mut found = false;

    for line in text.split_inclusive('\n') {
        let keyword = line
            .trim_start()
            .strip_prefix('#')
            .map(|rest| {
                rest.trim_start()
                    .split(|c: char| !c.is_ascii_alphabetic())
                    .next()
                    .unwrap_or("")
            });

        let is_conditional = match keyword {
            Some("if") => {
                groups.push(false);
                true
            }
            Some("elif") | Some("else") => {
                if let Some(past_first) = groups.last_mut() {
                    *past_first = true;
                }
                true
            }
            Some("endif") => {
                groups.pop();
                true
            }
            _ => false,
        };
        found |= is_conditional;

        let active = groups.iter().all(|past_first| !past_first);
        if is_conditional || !active {
            view.extend(line.bytes().map(|b| match b {
                b'\n' | b'\r' => b as char,
                _ => ' ',
            }));
        } else {
            view.push_str(line);
        }
    }

    found.then_some(view)
}

/// Strip comments and whitespace from a qualified name (`A . /*x*/ B` → `A.B`).
pub fn normalize_name(raw: &str) -> String {
    NAME_TRIVIA.replace_all(raw, "").into_owned()
}
