//! Whole-file assembly from per-node emissions.
//!
//! `assemble` walks the IR in order, asks the target adapter to emit each
//! node, and records a classification per node in the [`EmitTrace`]:
//!
//! - Mapped: emitted with no caveats.
//! - Warned: emitted, but with an advisory annotation for review.
//! - Unconvertible: no target equivalent; a blocking annotation is emitted
//!   and the original construct is preserved commented out.
//!
//! Node order in equals node order out; order encodes execution order and is
//! never permuted here.

use hamlet_common::annotations;
use hamlet_ir::{Node, TestFile};

use crate::{catalog_entry_for, FrameworkAdapter, NodeEmission};

/// Per-node classification distribution recorded during emission.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeClass {
    Mapped,
    Warned,
    Unconvertible,
}

#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub class: NodeClass,
    pub kind: &'static str,
    /// 1-based source line of the node's provenance span.
    pub line: u32,
}

#[derive(Clone, Debug, Default)]
pub struct EmitTrace {
    pub records: Vec<NodeRecord>,
}

impl EmitTrace {
    pub fn record(&mut self, class: NodeClass, node: &Node) {
        self.records.push(NodeRecord {
            class,
            kind: node.kind_name(),
            line: node.span().line,
        });
    }

    pub fn mapped(&self) -> usize {
        self.count(NodeClass::Mapped)
    }

    pub fn warned(&self) -> usize {
        self.count(NodeClass::Warned)
    }

    pub fn unconvertible(&self) -> usize {
        self.count(NodeClass::Unconvertible)
    }

    fn count(&self, class: NodeClass) -> usize {
        self.records.iter().filter(|r| r.class == class).count()
    }
}

/// The original text for a node, for `Original:` annotation lines.
pub fn original_text<'a>(node: &'a Node, source: &'a str) -> &'a str {
    let sliced = node.span().slice(source);
    if !sliced.is_empty() {
        return sliced;
    }
    match node {
        Node::Raw(raw) => &raw.text,
        _ => node.kind_name(),
    }
}

/// Emit `node` through `adapter`, producing annotated output lines and a
/// classification. Containers are handled by [`assemble`]; this covers one
/// construct.
pub fn emit_leaf<A: FrameworkAdapter + ?Sized>(
    adapter: &A,
    node: &Node,
    source: &str,
) -> (String, NodeClass) {
    match adapter.emit_node(node) {
        NodeEmission::Emitted {
            code,
            advisory: None,
        } => (code, NodeClass::Mapped),
        NodeEmission::Emitted {
            code,
            advisory: Some(message),
        } => {
            let original = original_text(node, source);
            let mut out = annotations::advisory(&message, original);
            out.push('\n');
            out.push_str(&code);
            (out, NodeClass::Warned)
        }
        NodeEmission::NotSupported => {
            let original = original_text(node, source);
            let block = match catalog_entry_for(adapter, node) {
                Some(entry) => {
                    annotations::blocking(entry.id, entry.message, original, entry.manual_action)
                }
                None => annotations::blocking(
                    "NO-EQUIVALENT",
                    &format!(
                        "{} construct has no direct {} equivalent",
                        node.kind_name(),
                        adapter.name()
                    ),
                    original,
                    "port this construct manually",
                ),
            };
            (block, NodeClass::Unconvertible)
        }
    }
}

/// Assemble a complete target-framework file from the IR.
pub fn assemble<A: FrameworkAdapter + ?Sized>(
    adapter: &A,
    file: &TestFile,
    source: &str,
    trace: &mut EmitTrace,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    for comment in &file.leading_comments {
        lines.push(format!("// {}", comment.text));
    }

    let mut emitted_imports: Vec<String> = Vec::new();
    for import in &file.imports {
        let node = Node::Import(import.clone());
        let (code, class) = emit_leaf(adapter, &node, source);
        trace.record(class, &node);
        for line in code.lines() {
            emitted_imports.push(line.to_string());
        }
    }
    for required in adapter.required_imports() {
        // Match on the module specifier, not the whole line, so a mapped
        // source import already covering the module suppresses the default.
        let module = crate::scan::string_arg(required)
            .map(|(s, _)| format!("'{s}'"))
            .unwrap_or_else(|| (*required).to_string());
        if !emitted_imports.iter().any(|l| l.contains(&module)) {
            emitted_imports.insert(0, (*required).to_string());
        }
    }
    let had_header = !lines.is_empty() || !emitted_imports.is_empty();
    lines.extend(emitted_imports);
    if had_header {
        lines.push(String::new());
    }

    emit_items(adapter, &file.items, source, 0, trace, &mut lines);

    // Drop a trailing blank separator left by an empty body.
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn emit_items<A: FrameworkAdapter + ?Sized>(
    adapter: &A,
    items: &[Node],
    source: &str,
    depth: usize,
    trace: &mut EmitTrace,
    lines: &mut Vec<String>,
) {
    let indent = "  ".repeat(depth);
    for node in items {
        match node {
            Node::Suite(suite) => {
                emit_container(adapter, node, &suite.children, true, source, depth, trace, lines);
            }
            Node::Case(case) => {
                emit_container(adapter, node, &case.body, false, source, depth, trace, lines);
            }
            Node::Hook(hook) => {
                emit_container(adapter, node, &hook.body, false, source, depth, trace, lines);
            }
            _ => {
                let (code, class) = emit_leaf(adapter, node, source);
                trace.record(class, node);
                push_indented(lines, &indent, &code);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_container<A: FrameworkAdapter + ?Sized>(
    adapter: &A,
    node: &Node,
    children: &[Node],
    is_suite: bool,
    source: &str,
    depth: usize,
    trace: &mut EmitTrace,
    lines: &mut Vec<String>,
) {
    let indent = "  ".repeat(depth);
    let (code, class) = emit_leaf(adapter, node, source);
    trace.record(class, node);
    push_indented(lines, &indent, &code);
    if class == NodeClass::Unconvertible {
        // The opener could not be translated; preserve the children too,
        // commented out, so nothing is silently dropped.
        comment_out_subtree(children, source, &indent, trace, lines);
        return;
    }
    emit_items(adapter, children, source, depth + 1, trace, lines);
    let footer = if is_suite {
        adapter.suite_footer()
    } else {
        adapter.case_footer()
    };
    lines.push(format!("{indent}{footer}"));
}

fn comment_out_subtree(
    children: &[Node],
    source: &str,
    indent: &str,
    trace: &mut EmitTrace,
    lines: &mut Vec<String>,
) {
    for child in children {
        trace.record(NodeClass::Unconvertible, child);
        let original = original_text(child, source);
        lines.push(format!("{indent}{}", annotations::comment_out(original)));
        match child {
            Node::Suite(s) => comment_out_subtree(&s.children, source, indent, trace, lines),
            Node::Case(c) => comment_out_subtree(&c.body, source, indent, trace, lines),
            Node::Hook(h) => comment_out_subtree(&h.body, source, indent, trace, lines),
            _ => {}
        }
    }
}

fn push_indented(lines: &mut Vec<String>, indent: &str, code: &str) {
    for line in code.lines() {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{indent}{line}"));
        }
    }
}
