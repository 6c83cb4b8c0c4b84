// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Quill parser.
//!
//! These tests use `proptest` to verify parser invariants over generated inputs:
//!
//! 1. **Parser never panics** - arbitrary string input always returns a result
//! 2. **Diagnostic spans within input** - all spans have `end <= input.len()`
//! 3. **Comment spans are ordered** - attachment relies on source order
//! 4. **Parsing is deterministic** - the same input yields the same result
//! 5. **Error messages are user-facing** - no internal type names in diagnostics

use proptest::prelude::*;

use crate::source_analysis::{parse_document, parse_expression_script, parse_script};

// ============================================================================
// Near-valid Quill generators
// ============================================================================

/// Quill document fragments for composing near-valid inputs.
///
/// Most are valid Quill; the last two are intentionally invalid (a bare
/// literal member, an unterminated string) to seed error recovery paths
/// before the mutation generators dig further.
const FRAGMENTS: &[&str] = &[
    "Item {\n}\n",
    "Item { width: 640 }",
    "import QtQuick 2.15\n\nItem {\n    id: root\n    width: parent.width\n}\n",
    "pragma ComponentBehavior: Bound\nItem {\n}\n",
    "pragma Singleton\nimport QtQuick\nItem {\n}\n",
    "Item {\n    property int count: 3\n}\n",
    "Item {\n    default property list<Item> content\n    required property string title\n}\n",
    "Item {\n    signal clicked(int x, int y)\n}\n",
    "Item {\n    function area(w: int, h: int): int {\n        return w * h;\n    }\n}\n",
    "Item {\n    enum Kind { A, B }\n}\n",
    "Item {\n    Behavior on opacity {\n    }\n}\n",
    "Item {\n    states: [\n        State {\n        }\n    ]\n}\n",
    "Item {\n    component Styled: Rectangle {\n    }\n}\n",
    "Item {\n    onClicked: {\n        doIt();\n    }\n}\n",
    "Item {\n    anchors.fill: parent\n}\n",
    "Item {\n    // note\n    width: 640 // px\n    /* block */ height: 480\n}\n",
    "Item {\n    Rectangle {\n        color: \"red\"\n    }\n}\n",
    "Item {\n    42\n    width: 640\n}\n",
    "Item {\n    s: \"unterminated\n}\n",
];

/// Generates a Quill fragment from the seed corpus.
fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(std::string::ToString::to_string)
}

/// Generates a truncated document (cut at a random point).
fn truncated_document() -> impl Strategy<Value = String> {
    valid_fragment().prop_flat_map(|s| {
        let len = s.len();
        if len <= 1 {
            Just(s).boxed()
        } else {
            (1..len)
                .prop_map(move |cut| {
                    // Walk back to a char boundary so multi-byte characters
                    // don't split.
                    let mut cut = cut;
                    while cut > 0 && !s.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    s[..cut].to_string()
                })
                .boxed()
        }
    })
}

/// Generates input with mismatched braces via single-pass char mapping.
fn mismatched_braces() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| {
        let mut result = String::with_capacity(s.len());
        for ch in s.chars() {
            let mapped = match ch {
                '{' => '(',
                '}' => ']',
                '[' => '{',
                _ => ch,
            };
            result.push(mapped);
        }
        result
    })
}

/// Generates input with binding colons removed.
fn dropped_binding_colons() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| {
        let mut result = String::with_capacity(s.len());
        let mut previous = ' ';
        for ch in s.chars() {
            if ch == ':' && previous.is_alphanumeric() {
                previous = ch;
                continue;
            }
            result.push(ch);
            previous = ch;
        }
        result
    })
}

/// Generates input with duplicated operators.
fn duplicated_operators() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| s.replace('+', "+ +").replace('*', "* *"))
}

/// Generates a near-valid Quill input using one of several mutation strategies.
fn near_valid_quill() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_fragment(),
        truncated_document(),
        mismatched_braces(),
        dropped_binding_colons(),
        duplicated_operators(),
    ]
}

/// Internal type names that should never appear in user-facing diagnostics.
const INTERNAL_NAMES: &[&str] = &[
    "TokenKind",
    "unwrap()",
    "panic!",
    "unreachable!",
    "Expression::",
    "Statement::",
    "BindingValue::",
    "EcoString",
    "internal error",
];

// ============================================================================
// Property tests
// ============================================================================

/// Default is 512 cases for standard CI; override via `PROPTEST_CASES` env var
/// for extended runs (e.g., `PROPTEST_CASES=10000`).
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        // Use at least 512 cases, but allow PROPTEST_CASES to increase beyond that
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: No parse entry point panics on arbitrary string input.
    ///
    /// Every entry point must return a result, even for completely invalid
    /// input; errors surface as diagnostics, never as panics.
    #[test]
    fn parser_never_panics(input in "\\PC{0,500}") {
        let _document = parse_document(&input);
        let _script = parse_script(&input);
        let _expression = parse_expression_script(&input);
        // If we get here without panicking, the property holds.
    }

    /// Property 2: All diagnostic spans are within the input bounds.
    ///
    /// Every diagnostic's span must satisfy `end <= input.len()` (byte-level).
    #[test]
    fn diagnostic_spans_within_input(input in "\\PC{0,500}") {
        let document = parse_document(&input);
        let script = parse_script(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for diag in document.diagnostics.iter().chain(&script.diagnostics) {
            prop_assert!(
                diag.span.end() <= input_len,
                "Diagnostic span end {} exceeds input length {} for input {:?}: {}",
                diag.span.end(),
                input_len,
                input,
                diag.message,
            );
            prop_assert!(
                diag.span.start() <= diag.span.end(),
                "Diagnostic span start {} > end {} for input {:?}: {}",
                diag.span.start(),
                diag.span.end(),
                input,
                diag.message,
            );
        }
    }

    /// Property 3: Comment spans are in bounds and in source order.
    ///
    /// Comment attachment walks the comment list front to back and assumes
    /// it is ordered by start offset.
    #[test]
    fn comment_spans_are_ordered(input in near_valid_quill()) {
        let document = parse_document(&input);
        let script = parse_script(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for comments in [&document.comments, &script.comments] {
            for span in comments {
                prop_assert!(
                    span.start() <= span.end() && span.end() <= input_len,
                    "Comment span {}..{} out of bounds for input {:?}",
                    span.start(),
                    span.end(),
                    input,
                );
            }
            for pair in comments.windows(2) {
                prop_assert!(
                    pair[0].start() <= pair[1].start(),
                    "Comment spans out of order ({} after {}) for input {:?}",
                    pair[1].start(),
                    pair[0].start(),
                    input,
                );
            }
        }
    }

    /// Property 4: Parsing the same input twice yields the same result.
    ///
    /// The parser holds no hidden state; element counts and diagnostics
    /// must match across runs.
    #[test]
    fn parsing_is_deterministic(input in near_valid_quill()) {
        let first = parse_document(&input);
        let second = parse_document(&input);
        prop_assert_eq!(first.components.len(), second.components.len());
        prop_assert_eq!(first.comments, second.comments);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
    }

    /// Property 5: Error messages are user-facing (no internal type names).
    ///
    /// No diagnostic message or hint should contain internal Rust type names
    /// or panic-related strings that would confuse end users.
    #[test]
    fn error_messages_are_user_facing(input in near_valid_quill()) {
        let document = parse_document(&input);
        for diag in &document.diagnostics {
            for internal in INTERNAL_NAMES {
                prop_assert!(
                    !diag.message.contains(internal),
                    "Diagnostic message contains internal name {:?}: {:?} (input: {:?})",
                    internal,
                    diag.message,
                    input,
                );
                if let Some(hint) = &diag.hint {
                    prop_assert!(
                        !hint.contains(internal),
                        "Diagnostic hint contains internal name {:?}: {:?} (input: {:?})",
                        internal,
                        hint,
                        input,
                    );
                }
            }
        }
    }

    /// Property 1b: Parser never panics on near-valid structured input.
    ///
    /// Uses near-valid generators that exercise error recovery more deeply.
    #[test]
    fn parser_never_panics_near_valid(input in near_valid_quill()) {
        let _document = parse_document(&input);
        let _script = parse_script(&input);
    }
}
