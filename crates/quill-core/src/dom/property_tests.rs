// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for document reformatting.
//!
//! These tests use `proptest` to verify formatter invariants over generated
//! inputs:
//!
//! 1. **Reformatting never panics** - any parse result can be written out
//! 2. **Formatting is idempotent** - formatting formatted output is a no-op
//! 3. **Comments are preserved** - every comment survives exactly once
//! 4. **Formatted output is valid** - a clean parse formats to a clean parse

use proptest::prelude::*;

use crate::dom::Document;
use crate::unparse::LineWriterOptions;

/// Generates a small document: a root object with a handful of integer
/// bindings, each optionally preceded by an own-line comment.
///
/// Binding names start with `q` so they can never collide with a keyword
/// or with `id`; comment text is `// c<index> <letters>`, unique per
/// binding, so preservation can be asserted by exact substring count.
fn document_source() -> impl Strategy<Value = String> {
    let binding = (
        "q[a-z0-9]{0,4}",
        0u32..10_000u32,
        prop::option::of("[a-z]{1,8}"),
    );
    prop::collection::vec(binding, 1..6).prop_map(|entries| {
        let mut source = String::from("Item {\n");
        for (index, (name, value, comment)) in entries.into_iter().enumerate() {
            if let Some(text) = comment {
                source.push_str(&format!("    // c{index} {text}\n"));
            }
            source.push_str(&format!("    {name}: {value}\n"));
        }
        source.push_str("}\n");
        source
    })
}

fn format(source: &str) -> String {
    Document::parse("Main.qml", source)
        .reformat(&LineWriterOptions::default())
        .text
}

/// Default is 256 cases (the formatter runs the whole pipeline per case);
/// override via `PROPTEST_CASES` env var for extended runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        // Use at least 256 cases, but allow PROPTEST_CASES to increase beyond that
        cases: default.cases.max(256),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: Reformatting never panics, even on input that did not
    /// parse. Broken pieces surface in `WriteOutcome::failures`, never as
    /// panics.
    #[test]
    fn reformatting_never_panics(input in "\\PC{0,400}") {
        let document = Document::parse("Main.qml", &input);
        let _outcome = document.reformat(&LineWriterOptions::default());
    }

    /// Property 2: Formatting is idempotent on well-formed documents.
    #[test]
    fn formatting_is_idempotent(source in document_source()) {
        let document = Document::parse("Main.qml", &source);
        prop_assert!(
            document.is_clean(),
            "generated source did not parse: {:?} (source: {:?})",
            document.diagnostics,
            source,
        );
        let once = format(&source);
        let twice = format(&once);
        prop_assert_eq!(&once, &twice, "second pass changed the text");
    }

    /// Property 3: Every comment survives formatting exactly once.
    #[test]
    fn comments_are_preserved(source in document_source()) {
        let formatted = format(&source);
        for line in source.lines() {
            let needle = line.trim_start();
            if !needle.starts_with("//") {
                continue;
            }
            prop_assert_eq!(
                formatted.matches(needle).count(),
                1,
                "comment {:?} lost or duplicated in {:?}",
                needle,
                formatted,
            );
        }
    }

    /// Property 4: Formatted output of a clean document parses cleanly.
    #[test]
    fn formatted_output_parses_cleanly(source in document_source()) {
        let formatted = format(&source);
        let reparsed = Document::parse("Main.qml", &formatted);
        prop_assert!(
            reparsed.is_clean(),
            "formatted output did not parse: {:?} (text: {:?})",
            reparsed.diagnostics,
            formatted,
        );
    }
}
