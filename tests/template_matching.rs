//! Integration tests for template construction, parsing and parameter extraction

use std::collections::BTreeMap;

use docs_uri::{
    ParameterType, ParameterValue, ResourceError, ResourceState, ResourceTemplate, Subject,
    UriComponents,
};
use pretty_assertions::assert_eq;

const PATHS: &[&str] = &[
    "a",
    "guides",
    "guides/install",
    "/leading",
    "trailing/",
    "double//slash",
    "{id}",
    "ünïcödé/パス",
    "with spaces/and%20escapes",
    "?query=ignored#frag",
];

#[test]
fn test_any_nonempty_path_constructs_and_parses_to_itself() {
    for path in PATHS {
        let uri = format!("docs://{}", path);
        let template = ResourceTemplate::from_uri(&uri).expect("Should construct");
        assert_eq!(template.uri_template(), uri);
        assert_eq!(template.state(), ResourceState::Created);

        let components = template.parse_uri(&uri).expect("Should parse");
        assert_eq!(components.protocol, "docs");
        assert_eq!(components.path, *path);
    }
}

#[test]
fn test_strings_without_prefix_are_rejected() {
    for uri in ["", "docs:/", "docs:", "Docs://a", "http://a", "a", " docs://a", "docs//a"] {
        let err = ResourceTemplate::from_uri(uri).unwrap_err();
        assert!(err.is_uri_validation(), "expected URI error for {:?}", uri);
    }
}

#[test]
fn test_round_trip_extraction() {
    let cases: Vec<(&str, Vec<(&str, &str)>)> = vec![
        ("base", vec![]),
        ("base", vec![("id", "42")]),
        ("docs", vec![("section", "install"), ("page", "3")]),
        ("x", vec![("A1", "v a l"), ("b2", "%41"), ("Größe", "ü"), ("k", "{}")]),
    ];

    for (base, params) in &cases {
        let mut template_uri = format!("docs://{}", base);
        let mut candidate = format!("docs://{}", base);
        for (name, value) in params.iter() {
            template_uri.push_str(&format!("/{{{}}}", name));
            candidate.push('/');
            candidate.push_str(value);
        }

        let template = ResourceTemplate::new(
            template_uri.as_str(),
            params.iter().map(|(name, _)| (*name, ParameterType::String)),
        )
        .unwrap();

        let extracted = template.extract_parameters(&candidate).unwrap();
        let expected: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(extracted, expected);

        let values: BTreeMap<String, ParameterValue> = extracted
            .into_iter()
            .map(|(k, v)| (k, ParameterValue::String(v)))
            .collect();
        template.validate_parameters(&values).unwrap();
    }
}

#[test]
fn test_segment_count_mismatch() {
    let template = ResourceTemplate::from_uri("docs://a/{x}").unwrap();
    let err = template.parse_uri("docs://a").unwrap_err();
    assert!(matches!(err, ResourceError::UriValidation { .. }));
    assert_eq!(
        err.message(),
        "URI segments do not match template. Expected 2 segments, got 1"
    );
    assert_eq!(err.location(), Some((Subject::Candidate, &(7..8))));
}

#[test]
fn test_integer_type_check() {
    let template =
        ResourceTemplate::new("docs://test/{param}", [("param", ParameterType::Integer)]).unwrap();

    let bad = BTreeMap::from([("param", ParameterValue::from("not_an_int"))]);
    let err = template
        .validate_parameters(bad.iter().map(|(k, v)| (*k, v)))
        .unwrap_err();
    assert!(matches!(err, ResourceError::ParameterExtraction { .. }));

    let good = BTreeMap::from([("param", ParameterValue::from(42))]);
    template
        .validate_parameters(good.iter().map(|(k, v)| (*k, v)))
        .unwrap();
}

#[test]
fn test_missing_and_extra_parameters() {
    let template = ResourceTemplate::new("docs://x/{b}", [("a", ParameterType::String)]).unwrap();
    let err = template.extract_parameters("docs://x/x").unwrap_err();
    assert!(err.is_parameter_extraction());
    let message = err.to_string().to_lowercase();
    assert!(message.contains("missing"), "{}", message);
    assert!(message.contains("extra"), "{}", message);
}

#[test]
fn test_parse_is_idempotent() {
    let template = ResourceTemplate::from_uri("docs://guides/{section}/{page}").unwrap();
    let before = template.clone();
    let first = template.parse_uri("docs://guides/a/1").unwrap();
    let second = template.parse_uri("docs://guides/a/1").unwrap();
    assert_eq!(first, second);
    assert_eq!(template, before);
}

#[test]
fn test_literal_segments_are_not_compared() {
    let template = ResourceTemplate::new("docs://fixed/{id}", [("id", ParameterType::Integer)])
        .unwrap();
    let params = template.resolve("docs://WRONG/12").unwrap();
    assert_eq!(params["id"], ParameterValue::Integer(12));
}

#[test]
fn test_parsed_components_snapshot() {
    let template = ResourceTemplate::from_uri("docs://guides/{section}/{page}").unwrap();
    let components = template.parse_uri("docs://guides/intro/3").unwrap();
    insta::assert_debug_snapshot!(components, @r###"
    UriComponents {
        protocol: "docs",
        path: "guides/intro/3",
        parameters: {
            "page": "3",
            "section": "intro",
        },
    }
    "###);
}

#[test]
fn test_components_equal_constructed_value() {
    let template = ResourceTemplate::from_uri("docs:///api//{item}/").unwrap();
    let components = template.parse_uri("docs://api/Read").unwrap();
    assert_eq!(
        components,
        UriComponents {
            protocol: "docs".to_string(),
            path: "api/Read".to_string(),
            parameters: BTreeMap::from([("item".to_string(), "Read".to_string())]),
        }
    );
}

#[test]
fn test_invalid_placeholder_diagnostic() {
    let template_uri = "docs://api/{item_id}";
    let template = ResourceTemplate::from_uri(template_uri).unwrap();
    let err = template.parse_uri("docs://api/7").unwrap_err();
    assert_eq!(err.message(), "Invalid parameter name: item_id");

    let report = err.format(template_uri, "docs://api/7");
    assert!(report.contains("Invalid parameter name: item_id"));
    assert!(report.contains("template"));
}

#[test]
fn test_shared_across_threads() {
    let template = std::sync::Arc::new(
        ResourceTemplate::new("docs://items/{n}", [("n", ParameterType::Integer)]).unwrap(),
    );

    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let template = std::sync::Arc::clone(&template);
            std::thread::spawn(move || {
                let params = template.resolve(&format!("docs://items/{}", i)).unwrap();
                params["n"].as_i64()
            })
        })
        .collect();

    let mut results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.sort();
    assert_eq!(results, vec![Some(0), Some(1), Some(2), Some(3)]);
}
