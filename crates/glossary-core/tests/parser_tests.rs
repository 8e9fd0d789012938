use glossary_core::{parse, parse_path, GlossaryError, Mapping, Value};

/// Helper: build a mapping value from `(key, value)` pairs.
fn map(entries: Vec<(&str, Value)>) -> Value {
    Value::Mapping(entries.into_iter().collect::<Mapping>())
}

fn seq(items: Vec<Value>) -> Value {
    Value::Sequence(items)
}

fn s(text: &str) -> Value {
    Value::String(text.to_string())
}

fn assert_parses(input: &str, expected: Value) {
    let actual = parse(input).unwrap();
    assert_eq!(
        actual, expected,
        "Parse mismatch:\n  input:    {input:?}\n  got:      {actual:?}\n  expected: {expected:?}"
    );
}

fn fixture_path() -> &'static str {
    concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/terms/retrieval-augmented-generation.yml"
    )
}

// ============================================================================
// Documents and Mappings
// ============================================================================

#[test]
fn parse_empty_document_is_empty_mapping() {
    assert_parses("", map(vec![]));
}

#[test]
fn parse_only_comments_and_blanks() {
    assert_parses("# heading\n\n   \n# another\n", map(vec![]));
}

#[test]
fn parse_flat_mapping() {
    assert_parses(
        "name: Alice\nage: 30\nactive: true",
        map(vec![
            ("name", s("Alice")),
            ("age", Value::Int(30)),
            ("active", Value::Bool(true)),
        ]),
    );
}

#[test]
fn parse_nested_mapping() {
    assert_parses(
        "a:\n  b: 1\n  c: 2\n",
        map(vec![(
            "a",
            map(vec![("b", Value::Int(1)), ("c", Value::Int(2))]),
        )]),
    );
}

#[test]
fn parse_mapping_returns_to_parent_on_dedent() {
    assert_parses(
        "a:\n  b:\n    c: 1\n  d: 2\ne: 3\n",
        map(vec![
            (
                "a",
                map(vec![
                    ("b", map(vec![("c", Value::Int(1))])),
                    ("d", Value::Int(2)),
                ]),
            ),
            ("e", Value::Int(3)),
        ]),
    );
}

#[test]
fn parse_key_without_children_is_empty_mapping() {
    assert_parses(
        "a:\nb: 1\n",
        map(vec![("a", map(vec![])), ("b", Value::Int(1))]),
    );
}

#[test]
fn parse_children_indented_deeper_than_two() {
    assert_parses(
        "a:\n    b: 1\n    c: 2\n",
        map(vec![(
            "a",
            map(vec![("b", Value::Int(1)), ("c", Value::Int(2))]),
        )]),
    );
}

#[test]
fn parse_value_keeps_colons_after_the_first() {
    assert_parses(
        "url: https://example.com:8080/x\n",
        map(vec![("url", s("https://example.com:8080/x"))]),
    );
}

#[test]
fn parse_duplicate_key_last_write_wins_in_first_position() {
    let value = parse("a: 1\nb: 2\na: 3\n").unwrap();
    let mapping = value.as_mapping().unwrap();
    assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(mapping.get("a"), Some(&Value::Int(3)));
}

#[test]
fn parse_skips_comments_at_any_indent() {
    assert_parses(
        "# c\na: 1\n  # indented comment\n\nb:\n  # x\n  - 1\n",
        map(vec![("a", Value::Int(1)), ("b", seq(vec![Value::Int(1)]))]),
    );
}

#[test]
fn parse_crlf_line_endings() {
    assert_parses(
        "a:\r\n  b: 1\r\n",
        map(vec![("a", map(vec![("b", Value::Int(1))]))]),
    );
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn parse_sequence_of_scalars() {
    assert_parses(
        "items:\n  - x\n  - y\n",
        map(vec![("items", seq(vec![s("x"), s("y")]))]),
    );
}

#[test]
fn parse_root_sequence() {
    assert_parses(
        "- a\n- b: 1\n  c: 2\n",
        seq(vec![
            s("a"),
            map(vec![("b", Value::Int(1)), ("c", Value::Int(2))]),
        ]),
    );
}

#[test]
fn parse_sequence_of_mappings() {
    assert_parses(
        "items:\n  - name: a\n    val: 1\n  - name: b\n    val: 2\n",
        map(vec![(
            "items",
            seq(vec![
                map(vec![("name", s("a")), ("val", Value::Int(1))]),
                map(vec![("name", s("b")), ("val", Value::Int(2))]),
            ]),
        )]),
    );
}

#[test]
fn parse_quoted_item_keeps_colon() {
    assert_parses(
        "dont:\n  - \"Silence alerts: skip postmortems once the incident is closed\"",
        map(vec![(
            "dont",
            seq(vec![s(
                "Silence alerts: skip postmortems once the incident is closed",
            )]),
        )]),
    );
}

#[test]
fn parse_unquoted_prose_item_with_colon_stays_string() {
    assert_parses(
        "dont:\n  - Silence alerts: skip postmortems\n",
        map(vec![("dont", seq(vec![s("Silence alerts: skip postmortems")]))]),
    );
}

#[test]
fn parse_short_key_item_opens_mapping() {
    assert_parses(
        "notes:\n  - key: value\n  - Note: see above\n",
        map(vec![(
            "notes",
            seq(vec![
                map(vec![("key", s("value"))]),
                // A short word followed by a colon reads as a key.
                map(vec![("Note", s("see above"))]),
            ]),
        )]),
    );
}

#[test]
fn parse_quoted_item_without_space_before_colon_stays_string() {
    assert_parses(
        "aliases:\n  - \"Foo:Bar\"\n  - 'k: v'\n",
        map(vec![("aliases", seq(vec![s("Foo:Bar"), s("k: v")]))]),
    );
}

#[test]
fn parse_nested_item_with_nested_blocks() {
    assert_parses(
        "outer:\n  - name: a\n    tags:\n      - x\n      - y\n    meta:\n      k: v\n  - plain\nafter: 1\n",
        map(vec![
            (
                "outer",
                seq(vec![
                    map(vec![
                        ("name", s("a")),
                        ("tags", seq(vec![s("x"), s("y")])),
                        ("meta", map(vec![("k", s("v"))])),
                    ]),
                    s("plain"),
                ]),
            ),
            ("after", Value::Int(1)),
        ]),
    );
}

#[test]
fn parse_nested_item_spans_blank_lines() {
    assert_parses(
        "items:\n  - name: a\n\n    val: 1\n  - name: b\n",
        map(vec![(
            "items",
            seq(vec![
                map(vec![("name", s("a")), ("val", Value::Int(1))]),
                map(vec![("name", s("b"))]),
            ]),
        )]),
    );
}

#[test]
fn parse_nested_item_continuation_deeper_than_first_key() {
    assert_parses(
        "items:\n  - name: a\n      extra: 1\n",
        map(vec![(
            "items",
            seq(vec![map(vec![("name", s("a")), ("extra", Value::Int(1))])]),
        )]),
    );
}

#[test]
fn parse_sequence_at_key_indent_is_not_consumed() {
    // The list is not indented under `items`, so the block under `items` is
    // empty and the root mapping stops at the first `- ` line.
    assert_parses("items:\n- x\n- y\nother: 1\n", map(vec![("items", map(vec![]))]));
}

#[test]
fn parse_sequence_ends_at_sibling_key() {
    assert_parses(
        "a:\n  - 1\n  - 2\nb: 3\n",
        map(vec![
            ("a", seq(vec![Value::Int(1), Value::Int(2)])),
            ("b", Value::Int(3)),
        ]),
    );
}

#[test]
fn parse_flow_sequence_is_plain_string() {
    assert_parses("narrower: []\n", map(vec![("narrower", s("[]"))]));
}

// ============================================================================
// Folded Blocks
// ============================================================================

#[test]
fn parse_folded_block_paragraphs() {
    assert_parses(
        "desc: >-\n  line one\n  line two\n\n  line three\n",
        map(vec![("desc", s("line one line two\n\nline three"))]),
    );
}

#[test]
fn parse_folded_plain_marker_matches_strip_marker() {
    assert_parses(
        "desc: >\n  one\n  two\nnext: 1\n",
        map(vec![("desc", s("one two")), ("next", Value::Int(1))]),
    );
}

#[test]
fn parse_folded_block_collapses_repeated_blank_lines() {
    assert_parses(
        "desc: >-\n  one\n\n\n   \n  two\n",
        map(vec![("desc", s("one\n\ntwo"))]),
    );
}

#[test]
fn parse_folded_block_trims_extra_indent() {
    assert_parses(
        "desc: >-\n  one\n      indented more   \n  done\n",
        map(vec![("desc", s("one indented more done"))]),
    );
}

#[test]
fn parse_folded_block_without_lines_is_empty_string() {
    assert_parses(
        "desc: >-\nnext: 1\n",
        map(vec![("desc", s("")), ("next", Value::Int(1))]),
    );
}

#[test]
fn parse_folded_block_inside_nested_item() {
    assert_parses(
        "items:\n  - name: a\n    body: >\n      one\n      two\n\n      three\n    next: 1\n",
        map(vec![(
            "items",
            seq(vec![map(vec![
                ("name", s("a")),
                ("body", s("one two\n\nthree")),
                ("next", Value::Int(1)),
            ])]),
        )]),
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn parse_line_without_colon_is_syntax_error() {
    let err = parse("a: 1\njust text\n").unwrap_err();
    match err {
        GlossaryError::Syntax { path, line, text } => {
            assert_eq!(path, None);
            assert_eq!(line, 2);
            assert_eq!(text, "just text");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn parse_bare_dash_in_mapping_is_syntax_error() {
    let err = parse("a: 1\n-\n").unwrap_err();
    match err {
        GlossaryError::Syntax { line, text, .. } => {
            assert_eq!(line, 2);
            assert_eq!(text, "-");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn parse_bare_dash_ends_sequence_and_fails_in_parent() {
    let err = parse("items:\n  - a\n  -\n").unwrap_err();
    match err {
        GlossaryError::Syntax { line, text, .. } => {
            assert_eq!(line, 3);
            assert_eq!(text, "  -");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn parse_error_inside_nested_item_reports_original_line() {
    let err = parse("title: x\nitems:\n  - name: a\n    oops\n").unwrap_err();
    match err {
        GlossaryError::Syntax { line, text, .. } => {
            assert_eq!(line, 4);
            assert_eq!(text, "    oops");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn parse_error_message_names_line() {
    let err = parse("oops\n").unwrap_err();
    assert_eq!(err.to_string(), "line 1: unsupported mapping line: oops");
}

#[test]
fn parse_path_error_carries_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yml");
    std::fs::write(&path, "term: x\n  not a pair\n").unwrap();

    let err = parse_path(&path).unwrap_err();
    match &err {
        GlossaryError::Syntax {
            path: Some(p),
            line,
            text,
        } => {
            assert_eq!(p, &path);
            assert_eq!(*line, 2);
            assert_eq!(text, "  not a pair");
        }
        other => panic!("expected syntax error with path, got {other:?}"),
    }
    assert!(err.to_string().contains("broken.yml"));
}

#[test]
fn parse_path_missing_file_is_io_error() {
    let err = parse_path("/definitely/not/here.yml").unwrap_err();
    assert!(matches!(err, GlossaryError::Io { .. }));
}

// ============================================================================
// Realistic document
// ============================================================================

#[test]
fn parse_path_reads_fixture() {
    let doc = parse_path(fixture_path()).unwrap();

    assert_eq!(
        doc.get("term").and_then(Value::as_str),
        Some("retrieval-augmented generation")
    );
    assert_eq!(
        doc.get("aliases").map(Value::string_items),
        Some(vec!["RAG", "Retrieval Augmented Generation"])
    );
    assert_eq!(
        doc.get("examples")
            .and_then(|e| e.get("dont"))
            .map(Value::string_items),
        Some(vec![
            "Silence alerts: skip postmortems once the incident is closed"
        ])
    );

    let long_def = doc.get("long_def").and_then(Value::as_str).unwrap();
    assert_eq!(long_def.matches("\n\n").count(), 1);
    assert!(long_def.starts_with("Retrieval-augmented generation combines a retriever"));

    let citations = doc.get("citations").and_then(Value::as_sequence).unwrap();
    assert_eq!(citations.len(), 2);
    assert_eq!(
        citations[1].get("url").and_then(Value::as_str),
        Some("https://airc.nist.gov/AI_RMF_Knowledge_Base/Playbook")
    );
}

#[test]
fn parse_result_serializes_to_ordered_json() {
    let doc = parse("b: 1\na:\n  - x\n  - 2.5\nc: ~\n").unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    assert_eq!(json, r#"{"b":1,"a":["x",2.5],"c":null}"#);
}
