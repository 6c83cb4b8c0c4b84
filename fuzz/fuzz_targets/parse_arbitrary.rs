// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety.
//!
//! Feeds arbitrary bytes through the lexer, the script parser and the
//! document parser. Any input may produce diagnostics; none may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quill_core::dom::Document;
use quill_core::source_analysis::parse_script;

fuzz_target!(|data: &[u8]| {
    // The lexer takes strings; invalid UTF-8 is rejected before parsing.
    if let Ok(source) = std::str::from_utf8(data) {
        let _script = parse_script(source);
        let _document = Document::parse("fuzz.qml", source);
    }
});
