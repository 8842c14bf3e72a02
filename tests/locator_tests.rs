//! Tests for resource location: first-match ordering and shell-glob
//! pattern semantics against a populated registry.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use appcontainer::locator;
use appcontainer::ServletRegistry;
use common::servlets::EchoServlet;

fn registry_with(mappings: &[(&str, &str)]) -> ServletRegistry {
    let mut registry = ServletRegistry::new();
    for (_, name) in mappings {
        registry.register(name, Box::new(EchoServlet::new()));
    }
    for (pattern, name) in mappings {
        registry.add_mapping(pattern, name).unwrap();
    }
    registry
}

#[test]
fn first_match_wins_over_a_more_specific_literal() {
    common::runtime::setup();
    let registry = registry_with(&[("/a/*", "S1"), ("/a/b", "S2")]);

    let mapping = registry.locate("/a/b").unwrap();
    assert_eq!(mapping.servlet_name(), "S1");
    assert_eq!(mapping.pattern(), "/a/*");
}

#[test]
fn declaration_order_is_authoritative() {
    common::runtime::setup();
    let registry = registry_with(&[("/a/b", "S2"), ("/a/*", "S1")]);

    assert_eq!(registry.locate("/a/b").unwrap().servlet_name(), "S2");
    assert_eq!(registry.locate("/a/c").unwrap().servlet_name(), "S1");
}

#[test]
fn miss_signals_servlet_not_found_with_the_path() {
    common::runtime::setup();
    let registry = registry_with(&[("/a/*", "S1")]);

    let err = registry.locate("/x").unwrap_err();
    assert_eq!(err.path, "/x");
}

#[test]
fn locate_is_a_pure_function_of_the_mapping_list() {
    common::runtime::setup();
    let registry = registry_with(&[("/a/*", "S1"), ("/b/*", "S2")]);

    let direct = locator::locate(registry.mappings(), "/b/1").unwrap();
    assert_eq!(direct.servlet_name(), "S2");
    // Same inputs, same result, every time.
    for _ in 0..3 {
        assert_eq!(
            locator::locate(registry.mappings(), "/b/1")
                .unwrap()
                .servlet_name(),
            "S2"
        );
    }
}

#[test]
fn star_crosses_segment_separators() {
    common::runtime::setup();
    let registry = registry_with(&[("/static/*", "Files")]);

    assert_eq!(
        registry.locate("/static/css/site.css").unwrap().servlet_name(),
        "Files"
    );
    assert!(registry.locate("/statics/site.css").is_err());
}

#[test]
fn question_mark_matches_exactly_one_character() {
    common::runtime::setup();
    let registry = registry_with(&[("/report-?", "Reports")]);

    assert!(registry.locate("/report-1").is_ok());
    assert!(registry.locate("/report-").is_err());
    assert!(registry.locate("/report-12").is_err());
}

#[test]
fn character_classes_and_negation() {
    common::runtime::setup();
    let registry = registry_with(&[("/v[0-9]/*", "Versioned"), ("/v[!0-9]*", "Fallback")]);

    assert_eq!(registry.locate("/v1/items").unwrap().servlet_name(), "Versioned");
    assert_eq!(registry.locate("/vx/items").unwrap().servlet_name(), "Fallback");
}
