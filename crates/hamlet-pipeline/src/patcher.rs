//! In-place IR patching of the original source.
//!
//! Used when the target adapter cannot assemble a whole file
//! (`ir_emission()` is false). Instead of regenerating the document, each
//! IR node is re-emitted through the target adapter and spliced back into
//! the original text at its provenance span. Everything between spans —
//! blank lines, raw statements, closers, indentation — survives verbatim,
//! which keeps diffs reviewable at the cost of never restructuring.

use hamlet_frameworks::emit::{emit_leaf, EmitTrace, NodeClass};
use hamlet_frameworks::{scan, FrameworkAdapter};
use hamlet_ir::{Node, Span, TestFile};

struct Patch {
    span: Span,
    replacement: String,
}

/// Patch `source` node by node toward `target`. Returns the patched text
/// and the per-node trace, or `None` when the IR carries nothing to patch.
pub fn patch_source(
    target: &dyn FrameworkAdapter,
    file: &TestFile,
    source: &str,
) -> Option<(String, EmitTrace)> {
    if file.imports.is_empty() && file.items.is_empty() {
        return None;
    }

    let mut trace = EmitTrace::default();
    let mut patches: Vec<Patch> = Vec::new();

    for import in &file.imports {
        let node = Node::Import(import.clone());
        collect_patch(target, &node, source, &mut trace, &mut patches);
    }
    collect_items(target, &file.items, source, &mut trace, &mut patches);

    // Splice back to front so earlier spans stay valid.
    patches.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    let mut code = source.to_string();
    for patch in &patches {
        let start = patch.span.start as usize;
        let end = patch.span.end as usize;
        if end > code.len() || start > end {
            continue;
        }
        let indent = line_indent(source, start);
        code.replace_range(start..end, &reindent(&patch.replacement, indent));
    }

    Some((prepend_required_imports(target, code), trace))
}

fn collect_items(
    target: &dyn FrameworkAdapter,
    items: &[Node],
    source: &str,
    trace: &mut EmitTrace,
    patches: &mut Vec<Patch>,
) {
    for node in items {
        collect_patch(target, node, source, trace, patches);
        match node {
            Node::Suite(suite) => collect_items(target, &suite.children, source, trace, patches),
            Node::Case(case) => collect_items(target, &case.body, source, trace, patches),
            Node::Hook(hook) => collect_items(target, &hook.body, source, trace, patches),
            _ => {}
        }
    }
}

fn collect_patch(
    target: &dyn FrameworkAdapter,
    node: &Node,
    source: &str,
    trace: &mut EmitTrace,
    patches: &mut Vec<Patch>,
) {
    let span = node.span();
    if span.is_empty() {
        return;
    }
    let (replacement, class) = emit_leaf(target, node, source);
    trace.record(class, node);
    // Identity emissions still count as mapped, but need no splice.
    if class == NodeClass::Mapped && replacement == span.slice(source) {
        return;
    }
    // Containers only own their opener line; the original closer below the
    // children is kept as-is, so the replacement must not add one.
    patches.push(Patch { span, replacement });
}

/// Indentation of the line containing byte offset `at`.
fn line_indent(source: &str, at: usize) -> &str {
    let line_start = source[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    &source[line_start..at]
}

/// Continuation lines of a multi-line replacement pick up the indentation
/// of the patched line; the first line splices after the existing indent.
fn reindent(replacement: &str, indent: &str) -> String {
    let mut out = String::new();
    for (i, line) in replacement.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}

fn prepend_required_imports(target: &dyn FrameworkAdapter, code: String) -> String {
    let mut missing: Vec<&'static str> = Vec::new();
    for required in target.required_imports() {
        let module = scan::string_arg(required)
            .map(|(s, _)| format!("'{s}'"))
            .unwrap_or_else(|| (*required).to_string());
        if !code.contains(&module) {
            missing.push(required);
        }
    }
    if missing.is_empty() {
        return code;
    }
    let mut out = missing.join("\n");
    out.push('\n');
    out.push_str(&code);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamlet_frameworks::registry::FrameworkRegistry;

    fn adapter(name: &str) -> std::sync::Arc<dyn FrameworkAdapter> {
        FrameworkRegistry::with_builtins()
            .get(name)
            .expect("known adapter")
    }

    #[test]
    fn test_patch_preserves_raw_lines_and_closers() {
        let jest = adapter("jest");
        let mocha = adapter("mocha");
        let source = "describe('math', () => {\n  const x = 1 + 1;\n\n  test('adds', () => {\n    expect(x).toBe(2);\n  });\n});\n";
        let file = jest.parse(source).expect("parses");
        let (code, trace) = patch_source(mocha.as_ref(), &file, source).expect("patchable");
        assert!(code.contains("it('adds'"));
        assert!(code.contains("expect(x).to.equal(2);"));
        assert!(code.contains("const x = 1 + 1;"));
        assert!(code.contains("\n\n"));
        assert!(code.ends_with("});\n"));
        assert!(trace.mapped() > 0);
    }

    #[test]
    fn test_patch_keeps_original_indentation() {
        let jest = adapter("jest");
        let mocha = adapter("mocha");
        let source =
            "describe('a', () => {\n    test('b', () => {\n        expect(1).toBe(1);\n    });\n});\n";
        let file = jest.parse(source).expect("parses");
        let (code, _) = patch_source(mocha.as_ref(), &file, source).expect("patchable");
        assert!(code.contains("\n    it('b'"));
        assert!(code.contains("\n        expect(1).to.equal(1);"));
    }

    #[test]
    fn test_empty_ir_yields_none() {
        let mocha = adapter("mocha");
        let file = TestFile::default();
        assert!(patch_source(mocha.as_ref(), &file, "").is_none());
    }
}
