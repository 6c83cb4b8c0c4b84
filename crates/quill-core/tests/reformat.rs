// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end reformatting tests.
//!
//! Each test drives the whole pipeline: source text is parsed into a
//! [`Document`], comments are collected and attached to the tree, and the
//! tree is written back out through the canonical writer. Expectations are
//! exact output strings, because spacing, ordering and comment placement
//! are the product under test.
//!
//! Two invariants run through everything here:
//!
//! - formatting is idempotent: feeding the formatter its own output
//!   changes nothing, and
//! - no comment is ever dropped, whatever construct it ends up attached
//!   to.

use quill_core::dom::Document;
use quill_core::unparse::{AttributesOrder, EndOfLine, LineWriterOptions};

/// Formats `source` with default options, asserting a clean parse and a
/// failure-free write.
#[track_caller]
fn format(source: &str) -> String {
    format_with(source, &LineWriterOptions::default())
}

#[track_caller]
fn format_with(source: &str, options: &LineWriterOptions) -> String {
    let document = Document::parse("Main.qml", source);
    assert!(
        document.is_clean(),
        "parse failed: {:?}",
        document.diagnostics
    );
    let outcome = document.reformat(options);
    assert!(
        outcome.failures.is_empty(),
        "write-out failures: {:?}",
        outcome.failures
    );
    outcome.text
}

/// Asserts that `formatted` is a fixed point of the formatter.
#[track_caller]
fn assert_idempotent(formatted: &str) {
    assert_eq!(format(formatted), formatted, "formatting is not idempotent");
}

#[test]
fn normalizes_attribute_groups() {
    let source = r#"import QtQuick 2.15

Item {
    Rectangle {
        color: "red"
    }
    onClicked: doIt()
    width: 640
    function area(): int {
        return width * height
    }
    signal clicked
    property int count: 3
    id: root
    height: 480
}
"#;
    let expected = r#"import QtQuick 2.15

Item {
    id: root

    property int count: 3

    signal clicked

    function area(): int {
        return width * height;
    }

    height: 480
    width: 640

    onClicked: doIt()

    Rectangle {
        color: "red"
    }
}
"#;
    let formatted = format(source);
    assert_eq!(formatted, expected);
    assert_idempotent(&formatted);
}

#[test]
fn merges_a_definition_with_its_later_binding() {
    let formatted = format("Item {\n    property int i\n    i: 5\n}\n");
    assert_eq!(formatted, "Item {\n    property int i: 5\n}\n");
    assert_idempotent(&formatted);
}

#[test]
fn round_trips_declarations() {
    let source = r#"Item {
    id: root

    default property list<Item> content
    readonly property int max: 99
    required property string title

    signal moved(int x, int y)

    function clamp(v: int, lo: int = 0): int {
        return Math.min(Math.max(v, lo), root.max);
    }
}
"#;
    assert_eq!(format(source), source);
}

#[test]
fn preserve_mode_keeps_source_order_and_blank_lines() {
    let source = r#"Item {
    width: 640

    function f() {
        g()
    }
    height: 480
}
"#;
    let expected = r#"Item {
    width: 640

    function f() {
        g();
    }
    height: 480
}
"#;
    let options = LineWriterOptions {
        attributes_order: AttributesOrder::Preserve,
        ..LineWriterOptions::default()
    };
    let formatted = format_with(source, &options);
    assert_eq!(formatted, expected);
    assert_eq!(format_with(&formatted, &options), formatted);
}

#[test]
fn spacing_options_add_blank_lines() {
    let source = r#"Item {
    function a() {
    }
    function b() {
    }
    Rectangle {
    }
    Text {
    }
}
"#;
    let expected = r#"Item {
    function a() {
    }

    function b() {
    }

    Rectangle {
    }

    Text {
    }
}
"#;
    let options = LineWriterOptions {
        objects_spacing: true,
        functions_spacing: true,
        ..LineWriterOptions::default()
    };
    let formatted = format_with(source, &options);
    assert_eq!(formatted, expected);
    assert_eq!(format_with(&formatted, &options), formatted);
}

#[test]
fn on_bindings_write_after_plain_values() {
    let formatted = format("Item {\n    width: 640\n    Behavior on opacity {\n    }\n}\n");
    assert_eq!(
        formatted,
        "Item {\n    width: 640\n\n    Behavior on opacity {\n    }\n}\n"
    );
    assert_idempotent(&formatted);
}

#[test]
fn enumerations_round_trip() {
    let source = r#"Item {
    enum Kind {
        A,
        B
    }
}
"#;
    assert_eq!(format(source), source);
}

#[test]
fn windows_line_endings_on_request() {
    let options = LineWriterOptions {
        end_of_line: EndOfLine::Windows,
        ..LineWriterOptions::default()
    };
    let formatted = format_with("Item {\n    width: 640\n}\n", &options);
    assert_eq!(formatted, "Item {\r\n    width: 640\r\n}\r\n");
}

#[test]
fn detected_line_endings_survive_a_round_trip() {
    let source = "Item {\r\n    width: 640\r\n}\r\n";
    let options = LineWriterOptions {
        end_of_line: EndOfLine::detect(source),
        ..LineWriterOptions::default()
    };
    assert_eq!(format_with(source, &options), source);
}

#[test]
fn comments_survive_and_stay_in_order() {
    let source = r#"// header
import QtQuick

// about the root
Item {
    // pre width
    width: 640 // after width

    /* block before height */
    height: 480
}
"#;
    let formatted = format(source);
    let needles = [
        "// header",
        "// about the root",
        "// pre width",
        "// after width",
        "/* block before height */",
    ];
    let mut last = 0;
    for needle in needles {
        assert_eq!(
            formatted.matches(needle).count(),
            1,
            "{needle:?} should appear exactly once in {formatted:?}"
        );
        let position = formatted.find(needle).unwrap();
        assert!(
            position >= last,
            "{needle:?} moved out of order in {formatted:?}"
        );
        last = position;
    }
    assert_idempotent(&formatted);
}

#[test]
fn method_body_comments_reindent_idempotently() {
    let source = r#"Item {
    function f() {
        a(); // done
        // next step
        b();
    }
}
"#;
    assert_eq!(format(source), source);
}

#[test]
fn trailing_comment_stays_inside_the_body() {
    let source = "Item {\n    function f() {\n        a()\n        /* trailing */\n    }\n}";
    let expected = r#"Item {
    function f() {
        a();
    /* trailing */
    }
}
"#;
    let formatted = format(source);
    assert_eq!(formatted, expected);
    assert_idempotent(&formatted);
}

#[test]
fn recovers_and_formats_what_parsed() {
    let document = Document::parse("Main.qml", "Item {\n    42\n    width: 640\n}\n");
    assert!(!document.is_clean());
    let outcome = document.reformat(&LineWriterOptions::default());
    assert!(outcome.text.contains("width: 640"));
}
