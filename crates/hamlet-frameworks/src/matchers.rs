//! Framework-neutral matcher vocabulary and the per-framework tables that
//! translate in and out of it.
//!
//! An [`Assertion`](hamlet_ir::Assertion) stores a matcher id from this
//! vocabulary; parsers that cannot map a matcher degrade the statement to
//! `RawCode` instead of inventing ids, so emitters may assume the id is
//! known here.

use hamlet_ir::{Assertion, AsyncQualifier, Node, Span};

use crate::scan;

// Unit-style matcher ids.
pub const EQUAL: &str = "equal";
pub const STRICT_EQUAL: &str = "strict-equal";
pub const DEEP_EQUAL: &str = "deep-equal";
pub const TRUTHY: &str = "truthy";
pub const FALSY: &str = "falsy";
pub const NULL: &str = "null";
pub const UNDEFINED: &str = "undefined";
pub const DEFINED: &str = "defined";
pub const CONTAIN: &str = "contain";
pub const HAVE_LENGTH: &str = "have-length";
pub const THROW: &str = "throw";
pub const GREATER_THAN: &str = "greater-than";
pub const GREATER_OR_EQUAL: &str = "greater-than-or-equal";
pub const LESS_THAN: &str = "less-than";
pub const LESS_OR_EQUAL: &str = "less-than-or-equal";
pub const MATCH: &str = "match";
pub const SNAPSHOT: &str = "snapshot";
pub const CALLED: &str = "called";
pub const CALLED_WITH: &str = "called-with";

// Browser-style matcher ids (subject is a selector).
pub const VISIBLE: &str = "visible";
pub const CONTAIN_TEXT: &str = "contain-text";
pub const HAVE_VALUE: &str = "have-value";
pub const CHECKED: &str = "checked";
pub const EXIST: &str = "exist";

/// Map a Jest/Vitest `expect` matcher name to the neutral vocabulary.
pub fn jest_to_canonical(name: &str) -> Option<&'static str> {
    Some(match name {
        "toBe" => EQUAL,
        "toEqual" => DEEP_EQUAL,
        "toStrictEqual" => STRICT_EQUAL,
        "toBeTruthy" => TRUTHY,
        "toBeFalsy" => FALSY,
        "toBeNull" => NULL,
        "toBeUndefined" => UNDEFINED,
        "toBeDefined" => DEFINED,
        "toContain" => CONTAIN,
        "toHaveLength" => HAVE_LENGTH,
        "toThrow" | "toThrowError" => THROW,
        "toBeGreaterThan" => GREATER_THAN,
        "toBeGreaterThanOrEqual" => GREATER_OR_EQUAL,
        "toBeLessThan" => LESS_THAN,
        "toBeLessThanOrEqual" => LESS_OR_EQUAL,
        "toMatch" => MATCH,
        "toMatchSnapshot" => SNAPSHOT,
        "toHaveBeenCalled" => CALLED,
        "toHaveBeenCalledWith" => CALLED_WITH,
        _ => return None,
    })
}

/// Map a neutral matcher id to the Jest/Vitest matcher name.
pub fn canonical_to_jest(id: &str) -> Option<&'static str> {
    Some(match id {
        EQUAL => "toBe",
        DEEP_EQUAL => "toEqual",
        STRICT_EQUAL => "toStrictEqual",
        TRUTHY => "toBeTruthy",
        FALSY => "toBeFalsy",
        NULL => "toBeNull",
        UNDEFINED => "toBeUndefined",
        DEFINED => "toBeDefined",
        CONTAIN => "toContain",
        HAVE_LENGTH => "toHaveLength",
        THROW => "toThrow",
        GREATER_THAN => "toBeGreaterThan",
        GREATER_OR_EQUAL => "toBeGreaterThanOrEqual",
        LESS_THAN => "toBeLessThan",
        LESS_OR_EQUAL => "toBeLessThanOrEqual",
        MATCH => "toMatch",
        SNAPSHOT => "toMatchSnapshot",
        CALLED => "toHaveBeenCalled",
        CALLED_WITH => "toHaveBeenCalledWith",
        _ => return None,
    })
}

/// Parse a Jest/Vitest-style assertion statement:
/// `[await ]expect(subject)[.not][.resolves|.rejects].matcher(args);`
pub fn parse_jest_assertion(trimmed: &str, span: Span) -> Option<Node> {
    let mut rest = trimmed.strip_prefix("await ").unwrap_or(trimmed);
    rest = rest.strip_prefix("expect")?;
    let close = scan::matching_paren(rest, 0)?;
    let subject = rest[1..close].trim().to_string();
    let mut chain = &rest[close + 1..];

    let mut negated = false;
    let mut qualifier = AsyncQualifier::None;
    loop {
        if let Some(r) = chain.strip_prefix(".not") {
            if r.starts_with('.') {
                negated = true;
                chain = r;
                continue;
            }
        }
        if let Some(r) = chain.strip_prefix(".resolves") {
            qualifier = AsyncQualifier::Resolves;
            chain = r;
            continue;
        }
        if let Some(r) = chain.strip_prefix(".rejects") {
            qualifier = AsyncQualifier::Rejects;
            chain = r;
            continue;
        }
        break;
    }

    let chain = chain.strip_prefix('.')?;
    let paren = chain.find('(')?;
    let matcher_name = &chain[..paren];
    let canonical = jest_to_canonical(matcher_name)?;
    let close = scan::matching_paren(chain, paren)?;
    let args = scan::split_args(&chain[paren + 1..close]);

    Some(Node::Assertion(Assertion {
        subject,
        matcher: canonical.to_string(),
        args,
        negated,
        async_qualifier: qualifier,
        span,
    }))
}

/// Emit an assertion in Jest/Vitest idiom.
pub fn emit_jest_assertion(assertion: &Assertion) -> Option<String> {
    let matcher = canonical_to_jest(&assertion.matcher)?;
    let mut out = String::new();
    let qualifier = match assertion.async_qualifier {
        AsyncQualifier::None => "",
        AsyncQualifier::Resolves => ".resolves",
        AsyncQualifier::Rejects => ".rejects",
    };
    if !qualifier.is_empty() {
        out.push_str("await ");
    }
    out.push_str("expect(");
    out.push_str(&assertion.subject);
    out.push(')');
    if assertion.negated {
        out.push_str(".not");
    }
    out.push_str(qualifier);
    out.push('.');
    out.push_str(matcher);
    out.push('(');
    out.push_str(&assertion.args.join(", "));
    out.push_str(");");
    Some(out)
}

/// Chai chain tails recognized by the Mocha parser, with their neutral ids,
/// whether the tail takes arguments, and whether its polarity is inverted
/// relative to the id (`falsy` is spelled `not ... be.ok`).
const CHAI_TAILS: &[(&str, &str, bool)] = &[
    ("deep.equal", DEEP_EQUAL, true),
    ("equal", EQUAL, true),
    ("include", CONTAIN, true),
    ("have.lengthOf", HAVE_LENGTH, true),
    ("match", MATCH, true),
    ("throw", THROW, true),
    ("be.greaterThan", GREATER_THAN, true),
    ("be.at.least", GREATER_OR_EQUAL, true),
    ("be.lessThan", LESS_THAN, true),
    ("be.at.most", LESS_OR_EQUAL, true),
    ("be.ok", TRUTHY, false),
    ("be.null", NULL, false),
    ("be.undefined", UNDEFINED, false),
];

/// Parse a Chai `expect` assertion: `expect(subject).to[.not].<tail>[(args)];`
pub fn parse_chai_assertion(trimmed: &str, span: Span) -> Option<Node> {
    let rest = trimmed.strip_prefix("expect")?;
    let close = scan::matching_paren(rest, 0)?;
    let subject = rest[1..close].trim().to_string();
    let mut chain = rest[close + 1..].trim_end_matches(';').trim_end();

    let mut negated = false;
    chain = chain.strip_prefix(".to")?;
    if let Some(r) = chain.strip_prefix(".not") {
        negated = true;
        chain = r;
    }
    let chain = chain.strip_prefix('.')?;

    for &(tail, id, takes_args) in CHAI_TAILS {
        if let Some(rest) = chain.strip_prefix(tail) {
            let args = if takes_args {
                let paren = rest.find('(')?;
                let close = scan::matching_paren(rest, paren)?;
                scan::split_args(&rest[paren + 1..close])
            } else {
                if !rest.is_empty() && !rest.starts_with('(') {
                    continue;
                }
                Vec::new()
            };
            return Some(Node::Assertion(Assertion {
                subject,
                matcher: id.to_string(),
                args,
                negated,
                async_qualifier: AsyncQualifier::None,
                span,
            }));
        }
    }
    None
}

/// Emit an assertion in Chai idiom. Returns the code plus an optional
/// advisory; `None` means Chai has no equivalent.
pub fn emit_chai_assertion(assertion: &Assertion) -> Option<(String, Option<String>)> {
    // Effective polarity: `falsy` and `defined` are spelled through negation.
    let mut negated = assertion.negated;
    let mut advisory = None;
    let (tail, takes_args) = match assertion.matcher.as_str() {
        s if s == EQUAL => ("equal", true),
        s if s == DEEP_EQUAL => ("deep.equal", true),
        s if s == STRICT_EQUAL => {
            advisory = Some(
                "strict equality mapped to deep.equal; Chai has no strict-equal matcher"
                    .to_string(),
            );
            ("deep.equal", true)
        }
        s if s == TRUTHY => ("be.ok", false),
        s if s == FALSY => {
            negated = !negated;
            ("be.ok", false)
        }
        s if s == NULL => ("be.null", false),
        s if s == UNDEFINED => ("be.undefined", false),
        s if s == DEFINED => {
            negated = !negated;
            ("be.undefined", false)
        }
        s if s == CONTAIN => ("include", true),
        s if s == HAVE_LENGTH => ("have.lengthOf", true),
        s if s == THROW => ("throw", true),
        s if s == GREATER_THAN => ("be.greaterThan", true),
        s if s == GREATER_OR_EQUAL => ("be.at.least", true),
        s if s == LESS_THAN => ("be.lessThan", true),
        s if s == LESS_OR_EQUAL => ("be.at.most", true),
        s if s == MATCH => ("match", true),
        _ => return None,
    };

    let mut out = format!("expect({})", assertion.subject);
    out.push_str(".to");
    if negated {
        out.push_str(".not");
    }
    out.push('.');
    out.push_str(tail);
    if takes_args {
        out.push('(');
        out.push_str(&assertion.args.join(", "));
        out.push(')');
    }
    out.push(';');
    Some((out, advisory))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assertion(node: Node) -> Assertion {
        match node {
            Node::Assertion(a) => a,
            other => panic!("expected assertion, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_parse_jest_simple() {
        let a = assertion(parse_jest_assertion("expect(sum(1, 2)).toBe(3);", Span::empty()).unwrap());
        assert_eq!(a.subject, "sum(1, 2)");
        assert_eq!(a.matcher, EQUAL);
        assert_eq!(a.args, vec!["3"]);
        assert!(!a.negated);
    }

    #[test]
    fn test_parse_jest_negated_resolves() {
        let a = assertion(
            parse_jest_assertion("await expect(fetchUser()).resolves.toEqual(user);", Span::empty())
                .unwrap(),
        );
        assert_eq!(a.async_qualifier, AsyncQualifier::Resolves);
        assert_eq!(a.matcher, DEEP_EQUAL);

        let b = assertion(
            parse_jest_assertion("expect(x).not.toBeNull();", Span::empty()).unwrap(),
        );
        assert!(b.negated);
        assert_eq!(b.matcher, NULL);
    }

    #[test]
    fn test_parse_jest_unknown_matcher_is_none() {
        assert!(parse_jest_assertion("expect(x).toBeFancy(1);", Span::empty()).is_none());
    }

    #[test]
    fn test_jest_emit_round_trips() {
        let node = parse_jest_assertion("expect(x).not.toContain('y');", Span::empty()).unwrap();
        let a = assertion(node);
        assert_eq!(emit_jest_assertion(&a).unwrap(), "expect(x).not.toContain('y');");
    }

    #[test]
    fn test_parse_chai_forms() {
        let a = assertion(
            parse_chai_assertion("expect(total).to.equal(10);", Span::empty()).unwrap(),
        );
        assert_eq!(a.matcher, EQUAL);
        assert_eq!(a.args, vec!["10"]);

        let b = assertion(
            parse_chai_assertion("expect(flag).to.not.be.ok;", Span::empty()).unwrap(),
        );
        assert_eq!(b.matcher, TRUTHY);
        assert!(b.negated);

        let c = assertion(
            parse_chai_assertion("expect(items).to.have.lengthOf(3);", Span::empty()).unwrap(),
        );
        assert_eq!(c.matcher, HAVE_LENGTH);
    }

    #[test]
    fn test_chai_emit_falsy_inverts_polarity() {
        let a = Assertion {
            subject: "flag".to_string(),
            matcher: FALSY.to_string(),
            args: vec![],
            negated: false,
            async_qualifier: AsyncQualifier::None,
            span: Span::empty(),
        };
        let (code, advisory) = emit_chai_assertion(&a).unwrap();
        assert_eq!(code, "expect(flag).to.not.be.ok;");
        assert!(advisory.is_none());
    }

    #[test]
    fn test_chai_emit_no_equivalent_for_snapshot() {
        let a = Assertion {
            subject: "tree".to_string(),
            matcher: SNAPSHOT.to_string(),
            args: vec![],
            negated: false,
            async_qualifier: AsyncQualifier::None,
            span: Span::empty(),
        };
        assert!(emit_chai_assertion(&a).is_none());
    }
}
