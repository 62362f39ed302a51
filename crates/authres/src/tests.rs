use crate::*;

fn spf(value: ResultValue, reason: Option<&str>, from: &str) -> ResultEntry {
    ResultEntry::Spf(SpfResult {
        value,
        reason: reason.map(|s| s.to_string()),
        from: Some(from.to_string()),
        ..Default::default()
    })
}

fn dkim_identifier(value: ResultValue, reason: Option<&str>, identifier: &str) -> ResultEntry {
    ResultEntry::Dkim(DkimResult {
        value,
        reason: reason.map(|s| s.to_string()),
        identifier: Some(identifier.to_string()),
        ..Default::default()
    })
}

fn auth(auth: &str) -> ResultEntry {
    ResultEntry::Auth(AuthResult {
        value: ResultValue::Pass,
        auth: Some(auth.to_string()),
        ..Default::default()
    })
}

fn sender_id(value: ResultValue, key: &str, header_value: &str) -> ResultEntry {
    ResultEntry::SenderId(SenderIdResult {
        value,
        header_key: Some(key.to_string()),
        header_value: Some(header_value.to_string()),
        ..Default::default()
    })
}

/// Header values paired with the identifier and results they parse to
fn well_formed() -> Vec<(&'static str, &'static str, Vec<ResultEntry>)> {
    use ResultValue::{Fail, HardFail, Pass};
    vec![
        ("example.org; none", "example.org", vec![]),
        ("example.com 1; none", "example.com", vec![]),
        (
            "example.com; dkim=none ",
            "example.com",
            vec![ResultEntry::Dkim(DkimResult::default())],
        ),
        (
            "example.com; spf=pass smtp.mailfrom=example.net",
            "example.com",
            vec![spf(Pass, None, "example.net")],
        ),
        (
            "example.com; spf=fail reason=bad smtp.mailfrom=example.net",
            "example.com",
            vec![spf(Fail, Some("bad"), "example.net")],
        ),
        (
            "example.com; auth=pass smtp.auth=sender@example.com; spf=pass smtp.mailfrom=example.com",
            "example.com",
            vec![auth("sender@example.com"), spf(Pass, None, "example.com")],
        ),
        (
            "example.com; sender-id=pass header.from=example.com",
            "example.com",
            vec![sender_id(Pass, "from", "example.com")],
        ),
        (
            "example.com; sender-id=hardfail header.from=example.com; dkim=pass header.i=sender@example.com",
            "example.com",
            vec![
                sender_id(HardFail, "from", "example.com"),
                dkim_identifier(Pass, None, "sender@example.com"),
            ],
        ),
        (
            "example.com; auth=pass smtp.auth=sender@example.com; spf=hardfail smtp.mailfrom=example.com",
            "example.com",
            vec![auth("sender@example.com"), spf(HardFail, None, "example.com")],
        ),
        (
            "example.com; dkim=pass header.i=@mail-router.example.net; dkim=fail header.i=@newyork.example.com",
            "example.com",
            vec![
                dkim_identifier(Pass, None, "@mail-router.example.net"),
                dkim_identifier(Fail, None, "@newyork.example.com"),
            ],
        ),
        (
            "example.com; \r\n \t spf=pass smtp.mailfrom=example.net",
            "example.com",
            vec![spf(Pass, None, "example.net")],
        ),
        (
            "example.com;dkim=pass reason=\"good signature\" header.i=@mail-router.example.net;",
            "example.com",
            vec![dkim_identifier(
                Pass,
                Some("good signature"),
                "@mail-router.example.net",
            )],
        ),
        (
            "example.com;dkim=pass reason=\"good; signature\" header.i=@mail-router.example.net;",
            "example.com",
            vec![dkim_identifier(
                Pass,
                Some("good; signature"),
                "@mail-router.example.net",
            )],
        ),
        (
            "example.com; auth=pass (cram-md5) smtp.auth=sender@example.com;",
            "example.com",
            vec![auth("sender@example.com")],
        ),
        (
            "example.com; auth=pass (cram-md5) smtp.auth=sender@example.com; spf=pass smtp.mailfrom=example.net",
            "example.com",
            vec![auth("sender@example.com"), spf(Pass, None, "example.net")],
        ),
        (
            "example.com; auth=pass (cram-md5 (comment inside comment)) smtp.auth=sender@example.com;",
            "example.com",
            vec![auth("sender@example.com")],
        ),
        (
            "example.com; auth=pass (cram-md5; comment with semicolon) smtp.auth=sender@example.com;",
            "example.com",
            vec![auth("sender@example.com")],
        ),
        (
            "example.com; auth=pass (cram-md5 \\( comment with escaped char) smtp.auth=sender@example.com;",
            "example.com",
            vec![auth("sender@example.com")],
        ),
        (
            concat!(
                "foo.example.net (foobar) 1 (baz);",
                " dkim (Because I like it) / 1 (One yay) = (wait for it) fail",
                " policy (A dot can go here) . (like that) expired",
                " (this surprised me) = (as I wasn't expecting it) 1362471462"
            ),
            "foo.example.net",
            vec![ResultEntry::Dkim(DkimResult {
                value: Fail,
                extra_properties: vec![Property::new("policy", "expired", "1362471462")],
                ..Default::default()
            })],
        ),
    ]
}

#[test]
fn parses_well_formed_headers() {
    for (text, identifier, results) in well_formed() {
        let parsed = parse(text).unwrap_or_else(|err| panic!("{text}: {err:#}"));
        k9::assert_equal!(parsed, (identifier.to_string(), results), "{text}");
    }
}

#[test]
fn empty_header() {
    k9::assert_equal!(parse("").unwrap(), (String::new(), vec![]));
}

#[test]
fn hard_failures() {
    k9::assert_equal!(parse(" ; ").unwrap_err(), AuthResultsError::NoIdentifier);
    k9::assert_equal!(
        parse("example.com 2; none").unwrap_err(),
        AuthResultsError::UnsupportedVersion("2".to_string())
    );
    k9::assert_equal!(
        parse("example.com bogus; spf=pass").unwrap_err(),
        AuthResultsError::MissingSemicolon {
            line: 1,
            column: 13
        }
    );
}

#[test]
fn hard_failure_messages() {
    k9::assert_equal!(
        parse("example.com 2; none").unwrap_err().to_string(),
        "unsupported Authentication-Results version '2', only version 1 is supported".to_string()
    );
    k9::assert_equal!(
        parse(" ; ").unwrap_err().to_string(),
        "no authentication service identifier found".to_string()
    );
}

#[test]
fn round_trip_through_format() {
    for (_, identifier, results) in well_formed() {
        let text = format(identifier, &results);
        k9::assert_equal!(
            parse(&text).unwrap(),
            (identifier.to_string(), results.clone()),
            "{text}"
        );

        let folded = format_with(
            identifier,
            &results,
            &FormatOptions {
                include_version: true,
                fold: true,
            },
        );
        k9::assert_equal!(
            parse(&folded).unwrap(),
            (identifier.to_string(), results),
            "{folded}"
        );
    }
}

#[test]
fn quoted_values_survive_round_trip() {
    let results = vec![ResultEntry::Generic(GenericResult {
        method: "x-vendor".to_string(),
        value: ResultValue::Unknown("odd value".to_string()),
        reason: Some("has \"quotes\", a \\ and (parens); too".to_string()),
        properties: vec![
            Property::new("policy", "empty", ""),
            Property::new("policy", "tabbed", "a\tb"),
            Property::new("header", "b", "abc/d+e="),
        ],
    })];
    let text = format("\"quoted\" id", &results);
    k9::assert_equal!(
        text,
        concat!(
            r#""\"quoted\" id"; x-vendor="odd value" "#,
            r#"reason="has \"quotes\", a \\ and (parens); too" "#,
            "policy.empty=\"\" policy.tabbed=\"a\tb\" header.b=abc/d+e="
        )
        .to_string()
    );
    k9::assert_equal!(
        parse(&text).unwrap(),
        ("\"quoted\" id".to_string(), results)
    );
}

#[test]
fn comments_are_transparent() {
    let plain = "example.com; dkim=pass reason=ok header.d=example.net header.s=sel; spf=none";
    let commented = concat!(
        "(lead) example.com (a;b) ; (x) dkim (y (nested)) = (z) pass",
        " (\\) escaped) reason (r) = (s) ok header (h) . (i) d = example.net",
        " header.s=sel (tail;) ; spf=none (end"
    );
    k9::assert_equal!(parse(commented).unwrap(), parse(plain).unwrap());
}

#[test]
fn folding_is_transparent() {
    let plain = "example.com; spf=pass smtp.mailfrom=example.net smtp.helo=mx.example.net";
    let folded = "example.com;\r\n\tspf=pass\r\n smtp.mailfrom=example.net\r\n\t  smtp.helo=mx.example.net";
    k9::assert_equal!(parse(folded).unwrap(), parse(plain).unwrap());
}

#[test]
fn unknown_method_is_kept_verbatim() {
    let (_, results) =
        parse("example.com; iprev=PASS reason=\"matched\" policy.iprev=192.0.2.200 (mx.example.net)")
            .unwrap();
    k9::assert_equal!(
        results,
        vec![ResultEntry::Generic(GenericResult {
            method: "iprev".to_string(),
            value: ResultValue::Pass,
            reason: Some("matched".to_string()),
            properties: vec![Property::new("policy", "iprev", "192.0.2.200")],
        })]
    );
}

#[test]
fn malformed_entry_does_not_poison_the_rest() {
    let (identifier, results) =
        parse("example.com; spf pass smtp.mailfrom=example.net; dkim=pass header.d=example.org")
            .unwrap();
    k9::assert_equal!(identifier, "example.com".to_string());
    k9::assert_equal!(
        results,
        vec![ResultEntry::Dkim(DkimResult {
            value: ResultValue::Pass,
            domain: Some("example.org".to_string()),
            ..Default::default()
        })]
    );
}

#[test]
fn deep_comments_are_rejected() {
    let text = format!(
        "example.com; spf=pass {}x{}",
        "(".repeat(100),
        ")".repeat(100)
    );
    k9::assert_equal!(
        parse(&text).unwrap_err(),
        AuthResultsError::CommentTooDeep {
            max_depth: DEFAULT_MAX_COMMENT_DEPTH,
            line: 1,
            column: 23 + DEFAULT_MAX_COMMENT_DEPTH,
        }
    );

    let options = ParseOptions {
        max_comment_depth: 128,
    };
    k9::assert_equal!(
        parse_with(&text, &options).unwrap(),
        (
            "example.com".to_string(),
            vec![ResultEntry::Spf(SpfResult {
                value: ResultValue::Pass,
                ..Default::default()
            })]
        )
    );
}

#[test]
fn header_serializes_to_json() {
    let header = AuthenticationResults::parse(
        "mx.example.org; spf=softfail smtp.mailfrom=example.com; x-custom=pass a.b=c",
    )
    .unwrap();
    k9::assert_equal!(
        serde_json::to_value(&header).unwrap(),
        serde_json::json!({
            "identifier": "mx.example.org",
            "results": [
                {"Spf": {
                    "value": "softfail",
                    "reason": null,
                    "from": "example.com",
                    "helo": null,
                    "extra_properties": [],
                }},
                {"Generic": {
                    "method": "x-custom",
                    "value": "pass",
                    "reason": null,
                    "properties": [{"ptype": "a", "property": "b", "value": "c"}],
                }},
            ]
        })
    );

    let back: AuthenticationResults =
        serde_json::from_value(serde_json::to_value(&header).unwrap()).unwrap();
    k9::assert_equal!(back, header);
}

#[test]
fn sender_id_with_several_headers_round_trips() {
    let text = "example.com; sender-id=pass header.from=a.example header.sender=b.example";
    let (identifier, results) = parse(text).unwrap();
    k9::assert_equal!(
        results,
        vec![ResultEntry::SenderId(SenderIdResult {
            value: ResultValue::Pass,
            header_key: Some("from".to_string()),
            header_value: Some("a.example".to_string()),
            extra_properties: vec![Property::new("header", "sender", "b.example")],
            ..Default::default()
        })]
    );

    let formatted = format(&identifier, &results);
    k9::assert_equal!(formatted, text.to_string());
    k9::assert_equal!(parse(&formatted).unwrap(), (identifier, results));
}

#[test]
fn zero_comment_depth_rejects_any_comment() {
    let options = ParseOptions {
        max_comment_depth: 0,
    };
    k9::assert_equal!(
        parse_with("example.com; spf=pass (c)", &options).unwrap_err(),
        AuthResultsError::CommentTooDeep {
            max_depth: 0,
            line: 1,
            column: 23,
        }
    );
    k9::assert_equal!(
        parse_with("example.com; spf=pass", &options).unwrap(),
        (
            "example.com".to_string(),
            vec![ResultEntry::Spf(SpfResult {
                value: ResultValue::Pass,
                ..Default::default()
            })]
        )
    );
}

#[test]
fn result_values_from_text_round_trip() {
    let results = vec![ResultEntry::Generic(GenericResult {
        method: "x-check".to_string(),
        value: ResultValue::from("PASS"),
        reason: None,
        properties: vec![],
    })];
    k9::assert_equal!(
        parse(&format("example.com", &results)).unwrap(),
        ("example.com".to_string(), results)
    );
}
