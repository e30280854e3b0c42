use serde_vdf::{
    escape, parse_slice, parse_str, parse_str_with_options, to_string, to_writer_with_options,
    unescape, Encoding, Error, Kind, Table, Value, VdfOptions,
};

fn table_of(values: Vec<Value>) -> Table {
    Table::from_values(values).unwrap()
}

#[test]
fn test_config_example() {
    let config = Value::table(
        "config",
        table_of(vec![
            Value::integer("retries", 3),
            Value::string("name", "hi\"there"),
        ]),
    );

    let text = to_string(&config);
    println!("Config:\n{}", text);
    assert_eq!(
        text,
        "\"config\"\n{\n  \"retries\" \"3\"\n  \"name\" \"hi\\\"there\"\n}\n"
    );
}

#[test]
fn test_every_kind() {
    let root = Value::table(
        "root",
        table_of(vec![
            Value::string("s", "text"),
            Value::token("t", "ref"),
            Value::integer("i", -42),
            Value::double("d", 0.25),
            Value::table("empty", Table::new()),
        ]),
    );

    assert_eq!(
        to_string(&root),
        "\"root\"\n{\n  \"s\" \"text\"\n  \"t\" [$ref]\n  \"i\" \"-42\"\n  \"d\" \"0.25\"\n  \"empty\"\n  {\n  }\n}\n"
    );
}

#[test]
fn test_indentation_by_depth() {
    let mut level = Value::string("leaf", "x");
    for depth in (0..4).rev() {
        level = Value::table(format!("level{}", depth), table_of(vec![level]));
    }

    let text = to_string(&level);
    let lines: Vec<&str> = text.lines().collect();

    // "levelN", "{" at N*2 spaces; the leaf sits at depth 4
    for depth in 0..4 {
        let pad = " ".repeat(2 * depth);
        assert_eq!(lines[2 * depth], format!("{}\"level{}\"", pad, depth));
        assert_eq!(lines[2 * depth + 1], format!("{}{{", pad));
    }
    assert_eq!(lines[8], "        \"leaf\" \"x\"");
    for (offset, depth) in (0..4).rev().enumerate() {
        assert_eq!(lines[9 + offset], format!("{}}}", " ".repeat(2 * depth)));
    }
    assert_eq!(lines.len(), 13);
}

#[test]
fn test_escaping_in_names_values_and_tokens() {
    let value = Value::table(
        "a\tb",
        table_of(vec![
            Value::string("path", "C:\\games\\hl2"),
            Value::string("multi", "line one\nline two"),
            Value::token("tok", "x\"y"),
        ]),
    );

    assert_eq!(
        to_string(&value),
        "\"a\\tb\"\n{\n  \"path\" \"C:\\\\games\\\\hl2\"\n  \"multi\" \"line one\\nline two\"\n  \"tok\" [$x\\\"y]\n}\n"
    );
}

#[test]
fn test_escape_order_backslash_first() {
    // A literal backslash followed by 'n' must not collapse into a newline escape
    assert_eq!(escape("\\n"), "\\\\n");
    assert_eq!(unescape("\\\\n"), "\\n");
    assert_eq!(escape("\\\""), "\\\\\\\"");
    assert_eq!(unescape(&escape("\\\t\n\"")), "\\\t\n\"");
}

#[test]
fn test_other_characters_untouched() {
    let text = "caf\u{e9} \u{1F600} \r ] [$ { } //";
    assert_eq!(escape(text), text);

    let value = Value::string("s", text);
    let back = parse_str(&to_string(&value)).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_numbers_are_not_escaped() {
    let value = Value::table(
        "n",
        table_of(vec![
            Value::integer("max", i64::MAX),
            Value::integer("min", i64::MIN),
            Value::double("tenth", 0.1),
            Value::double("neg_zero", -0.0),
            Value::double("big", 1e308),
        ]),
    );

    let text = to_string(&value);
    assert!(text.contains("\"max\" \"9223372036854775807\"\n"));
    assert!(text.contains("\"min\" \"-9223372036854775808\"\n"));
    assert!(text.contains("\"tenth\" \"0.1\"\n"));
    assert!(text.contains("\"neg_zero\" \"-0\"\n"));
    // never exponent notation
    assert!(text.contains(&format!("\"big\" \"1{}\"\n", "0".repeat(308))));
}

#[test]
fn test_numeric_roundtrip() {
    for d in [0.1, -0.0, 1e308, 2.5e-10, -123.456] {
        let back = parse_str(&to_string(&Value::double("d", d))).unwrap();
        assert_eq!(back.as_f64().unwrap().to_bits(), d.to_bits(), "double {}", d);
    }

    for i in [0, -1, i64::MAX, i64::MIN] {
        let back = parse_str(&to_string(&Value::integer("i", i))).unwrap();
        assert_eq!(back.kind(), &Kind::Integer(i));
    }

    // An integral double renders like an integer and reads back as one
    let back = parse_str(&to_string(&Value::double("d", 3.0))).unwrap();
    assert_eq!(back.kind(), &Kind::Integer(3));
    assert_eq!(back.as_f64(), Some(3.0));
}

#[test]
fn test_non_finite_doubles() {
    let value = Value::table(
        "n",
        table_of(vec![
            Value::double("nan", f64::NAN),
            Value::double("inf", f64::INFINITY),
            Value::double("ninf", f64::NEG_INFINITY),
        ]),
    );

    let text = to_string(&value);
    assert_eq!(
        text,
        "\"n\"\n{\n  \"nan\" \"NaN\"\n  \"inf\" \"inf\"\n  \"ninf\" \"-inf\"\n}\n"
    );

    let back = parse_str(&text).unwrap();
    let table = back.as_table().unwrap();
    assert_eq!(table.get("nan").unwrap().as_str(), Some("NaN"));
    assert_eq!(table.get("ninf").unwrap().as_str(), Some("-inf"));
}

#[test]
fn test_comments() {
    let value = Value::table(
        "root",
        table_of(vec![
            Value::integer("a", 1)
                .with_comment("first line")
                .with_comment("second\tline"),
            Value::table("inner", table_of(vec![Value::string("b", "x").with_comment("")])),
        ]),
    )
    .with_comment("header");

    let text = to_string(&value);
    assert_eq!(
        text,
        "//header\n\"root\"\n{\n  //first line\n  //second\\tline\n  \"a\" \"1\"\n  \"inner\"\n  {\n    //\n    \"b\" \"x\"\n  }\n}\n"
    );

    let back = parse_str(&text).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_comment_with_newline_stays_one_line() {
    let value = Value::integer("a", 1).with_comment("two\nlines");
    let text = to_string(&value);
    assert_eq!(text, "//two\\nlines\n\"a\" \"1\"\n");
    assert_eq!(parse_str(&text).unwrap().comments(), &["two\nlines".to_string()]);
}

#[test]
fn test_token_containing_bracket() {
    let value = parse_str("\"t\" [$a]").unwrap();
    assert_eq!(value.as_token(), Some("a"));

    let token = Value::token("t", "a]b");
    let text = to_string(&token);
    assert_eq!(text, "\"t\" [$a]b]\n");
    assert_eq!(parse_str(&text).unwrap(), token);

    for body in ["]", "]]", "[$x]", "a]\"b\"]"] {
        let token = Value::token("t", body);
        assert_eq!(parse_str(&to_string(&token)).unwrap(), token, "body {:?}", body);
    }
}

#[test]
fn test_comment_ending_in_carriage_return() {
    let value = Value::table(
        "root",
        Table::from_values([Value::integer("a", 1).with_comment("note\r")]).unwrap(),
    )
    .with_comment("top\r");
    let text = to_string(&value);
    assert!(text.starts_with("//top\r\n\"root\"\n"));

    let back = parse_str(&text).unwrap();
    assert_eq!(back, value);
    assert_eq!(to_string(&back), text);

    // CRLF documents still drop the carriage return of the line break
    let crlf = text.replace('\n', "\r\n");
    let back = parse_str(&crlf).unwrap();
    assert_eq!(back.comments(), &["top\r".to_string()]);
}

#[test]
fn test_parse_is_inverse_of_serialize() {
    let original = Value::table(
        "scene",
        table_of(vec![
            Value::string("title", "Lobby \"main\""),
            Value::token("skybox", "sky_day01"),
            Value::integer("players", 16),
            Value::double("gravity", 9.81),
            Value::table(
                "spawn",
                table_of(vec![
                    Value::double("x", -12.5),
                    Value::double("y", 0.125),
                ]),
            )
            .with_comment("player start"),
        ]),
    );

    let text = to_string(&original);
    let parsed = parse_str(&text).unwrap();
    assert_eq!(parsed, original);
    assert_eq!(to_string(&parsed), text);
}

#[test]
fn test_infer_numbers_disabled() {
    let options = VdfOptions::new().with_infer_numbers(false);
    let value = parse_str_with_options("\"r\"\n{\n  \"a\" \"1\"\n  \"b\" \"0.5\"\n}\n", &options)
        .unwrap();
    let table = value.as_table().unwrap();
    assert_eq!(table.get("a").unwrap().as_str(), Some("1"));
    assert_eq!(table.get("b").unwrap().as_str(), Some("0.5"));
}

#[test]
fn test_hand_written_layout() {
    let text = "// generated by hand\r\n\"root\" {\r\n\t\"a\"   \"1\"\r\n\t\"b\"\r\n\t{\r\n\t}\r\n}\r\n";
    let value = parse_str(text).unwrap();
    assert_eq!(value.comments(), &[" generated by hand".to_string()]);

    let table = value.as_table().unwrap();
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(
        to_string(&value),
        "// generated by hand\n\"root\"\n{\n  \"a\" \"1\"\n  \"b\"\n  {\n  }\n}\n"
    );
}

#[test]
fn test_unknown_escape_is_kept() {
    let value = parse_str("\"p\" \"C:\\dir\"").unwrap();
    assert_eq!(value.as_str(), Some("C:\\dir"));
}

#[test]
fn test_syntax_errors() {
    let cases = [
        ("", "empty input"),
        ("\"a\"", "missing value"),
        ("\"a\" \"1", "unterminated string"),
        ("\"a\" {", "unterminated table"),
        ("\"a\" { \"b\" }", "child without value"),
        ("a \"1\"", "unquoted name"),
        ("\"a\" \"1\" junk", "trailing characters"),
        ("\"a\" [$tok", "unterminated token"),
        ("\"a\" \"x\\", "dangling escape"),
    ];

    for (input, description) in cases {
        let err = parse_str(input).unwrap_err();
        assert!(
            matches!(err, Error::Syntax { .. } | Error::UnexpectedEof { .. }),
            "{}: {:?}",
            description,
            err
        );
        assert!(err.position().is_some(), "{}", description);
    }
}

#[test]
fn test_byte_order_marks() {
    let value = Value::table("r", table_of(vec![Value::string("k", "\u{e9}t\u{e9}")]));

    for encoding in [
        Encoding::Utf8,
        Encoding::Utf8Bom,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
    ] {
        let mut bytes = Vec::new();
        let options = VdfOptions::new().with_encoding(encoding);
        to_writer_with_options(&mut bytes, &value, &options).unwrap();
        assert!(bytes.starts_with(encoding.bom()));
        assert_eq!(parse_slice(&bytes).unwrap(), value, "{}", encoding.as_str());
    }

    // UTF-8 without a BOM is written byte-for-byte like the in-memory text
    let mut bytes = Vec::new();
    to_writer_with_options(&mut bytes, &value, &VdfOptions::new()).unwrap();
    assert_eq!(bytes, to_string(&value).into_bytes());

    assert!(matches!(
        parse_slice(b"\"a\" \"\xFF\""),
        Err(Error::Encoding(_))
    ));
}
