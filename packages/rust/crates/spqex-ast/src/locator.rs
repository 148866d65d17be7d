//! Literal locator.
//!
//! Walks the whole tree and collects the string literals assigned to the
//! query field of a statement struct literal. Only the syntactic shape is
//! checked; nothing is resolved.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::unit::{LiteralKind, LiteralSite, SiteId, SourcePosition, SourceUnit};

/// Shape of the struct literal field whose value is extracted.
///
/// The default targets `<pkg>.Statement{SQL: ...}` with `fmt.Sprintf`
/// templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetShape {
    /// Last segment of the qualified struct type (`Statement`).
    pub type_name: String,
    /// Field holding the query (`SQL`).
    pub field_name: String,
    /// Package of the format call (`fmt`).
    pub format_package: String,
    /// Function of the format call (`Sprintf`).
    pub format_function: String,
}

impl Default for TargetShape {
    fn default() -> Self {
        Self {
            type_name: "Statement".to_string(),
            field_name: "SQL".to_string(),
            format_package: "fmt".to_string(),
            format_function: "Sprintf".to_string(),
        }
    }
}

/// Expression kinds the locator distinguishes.
enum Expr<'tree> {
    StringLiteral(Node<'tree>),
    Call(Node<'tree>),
    Other,
}

impl<'tree> Expr<'tree> {
    fn of(node: Node<'tree>) -> Self {
        match node.kind() {
            "interpreted_string_literal" | "raw_string_literal" => Self::StringLiteral(node),
            "call_expression" => Self::Call(node),
            _ => Self::Other,
        }
    }
}

impl SourceUnit {
    /// Locate every matching literal, in source order.
    ///
    /// Calling this again rebuilds the arena and drops recorded overwrites.
    pub fn locate_sites(&mut self, shape: &TargetShape) -> Vec<SiteId> {
        let sites = find_sites(self.tree().root_node(), self.source(), shape);
        tracing::debug!(
            path = %self.path().display(),
            count = sites.len(),
            "located literal sites"
        );
        self.install_sites(sites)
    }
}

fn find_sites(root: Node<'_>, source: &str, shape: &TargetShape) -> Vec<LiteralSite> {
    let mut sites = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.kind() == "composite_literal" && is_target_type(node, source, shape) {
            collect_field_sites(node, source, shape, &mut sites);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return sites;
            }
        }
    }
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn is_target_type(literal: Node<'_>, source: &str, shape: &TargetShape) -> bool {
    let Some(ty) = literal.child_by_field_name("type") else {
        return false;
    };
    ty.kind() == "qualified_type"
        && ty
            .child_by_field_name("name")
            .is_some_and(|name| text(name, source) == shape.type_name)
}

fn collect_field_sites(
    literal: Node<'_>,
    source: &str,
    shape: &TargetShape,
    sites: &mut Vec<LiteralSite>,
) {
    let Some(body) = literal.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for element in body.named_children(&mut cursor) {
        if element.kind() != "keyed_element" {
            continue;
        }
        let Some((key, value)) = key_value(element) else {
            continue;
        };
        if !matches!(key.kind(), "identifier" | "field_identifier")
            || text(key, source) != shape.field_name
        {
            continue;
        }
        if let Some(site) = match_value(value, source, shape) {
            sites.push(site);
        }
    }
}

fn match_value(value: Node<'_>, source: &str, shape: &TargetShape) -> Option<LiteralSite> {
    match Expr::of(value) {
        Expr::StringLiteral(lit) => Some(site_for(lit, source, LiteralKind::Plain)),
        Expr::Call(call) if is_format_call(call, source, shape) => {
            let arguments = call.child_by_field_name("arguments")?;
            match Expr::of(first_named(arguments)?) {
                Expr::StringLiteral(lit) => Some(site_for(lit, source, LiteralKind::Format)),
                Expr::Call(_) | Expr::Other => None,
            }
        }
        Expr::Call(_) | Expr::Other => None,
    }
}

fn is_format_call(call: Node<'_>, source: &str, shape: &TargetShape) -> bool {
    let Some(function) = call.child_by_field_name("function") else {
        return false;
    };
    if function.kind() != "selector_expression" {
        return false;
    }
    let operand = function.child_by_field_name("operand");
    let field = function.child_by_field_name("field");
    match (operand, field) {
        (Some(operand), Some(field)) => {
            operand.kind() == "identifier"
                && text(operand, source) == shape.format_package
                && text(field, source) == shape.format_function
        }
        _ => false,
    }
}

/// Key and value of a keyed element, unwrapped from `literal_element`.
fn key_value(element: Node<'_>) -> Option<(Node<'_>, Node<'_>)> {
    let (key, value) = match (
        element.child_by_field_name("key"),
        element.child_by_field_name("value"),
    ) {
        (Some(key), Some(value)) => (key, value),
        // Older grammars do not name the two halves.
        _ => {
            let mut cursor = element.walk();
            let mut named = element
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment");
            (named.next()?, named.next()?)
        }
    };
    Some((unwrap_element(key), unwrap_element(value)))
}

fn unwrap_element(node: Node<'_>) -> Node<'_> {
    if node.kind() == "literal_element" {
        first_named(node).unwrap_or(node)
    } else {
        node
    }
}

fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    found
}

fn site_for(literal: Node<'_>, source: &str, kind: LiteralKind) -> LiteralSite {
    LiteralSite::new(
        literal.byte_range(),
        SourcePosition::from_point(literal.start_position()),
        text(literal, source).to_string(),
        kind,
    )
}
