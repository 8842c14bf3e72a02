//! Tests for the per-application servlet registry: idempotent
//! registration, mapping validation and the frozen read API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use appcontainer::{RegistryError, Servlet, ServletRegistry, ServletRequest, ServletResponse};
use common::servlets::EchoServlet;
use http::Method;

#[test]
fn registration_is_idempotent_first_wins() {
    common::runtime::setup();
    let mut registry = ServletRegistry::new();

    assert!(registry.register("Echo", Box::new(EchoServlet::with_marker("first"))));
    assert!(!registry.register("Echo", Box::new(EchoServlet::with_marker("second"))));
    assert_eq!(registry.servlet_count(), 1);

    // The first instance stays authoritative.
    let servlet = registry.get("Echo").unwrap();
    let request = ServletRequest::new(Method::GET, "/echo");
    let mut response = ServletResponse::ok();
    servlet.service(&request, &mut response).unwrap();
    assert_eq!(response.body["marker"], "first");
}

#[test]
fn get_unknown_name_is_none() {
    common::runtime::setup();
    let registry = ServletRegistry::new();
    assert!(registry.get("Ghost").is_none());
    assert!(!registry.contains("Ghost"));
}

#[test]
fn mapping_requires_registered_target() {
    common::runtime::setup();
    let mut registry = ServletRegistry::new();

    let err = registry.add_mapping("/ghost/*", "Ghost").unwrap_err();
    assert_eq!(
        err,
        RegistryError::InvalidMapping {
            pattern: "/ghost/*".to_string(),
            servlet_name: "Ghost".to_string(),
        }
    );
    assert!(registry.mappings().is_empty());

    registry.register("Ghost", Box::new(EchoServlet::new()));
    registry.add_mapping("/ghost/*", "Ghost").unwrap();
    assert_eq!(registry.mappings().len(), 1);
}

#[test]
fn mappings_keep_declaration_order() {
    common::runtime::setup();
    let mut registry = ServletRegistry::new();
    registry.register("S1", Box::new(EchoServlet::new()));
    registry.register("S2", Box::new(EchoServlet::new()));

    registry.add_mapping("/a/*", "S1").unwrap();
    registry.add_mapping("/a/b", "S2").unwrap();
    registry.add_mapping("/c", "S1").unwrap();

    let patterns: Vec<&str> = registry.mappings().iter().map(|m| m.pattern()).collect();
    assert_eq!(patterns, vec!["/a/*", "/a/b", "/c"]);
    let targets: Vec<&str> = registry
        .mappings()
        .iter()
        .map(|m| m.servlet_name())
        .collect();
    assert_eq!(targets, vec!["S1", "S2", "S1"]);
}

#[test]
fn malformed_pattern_is_rejected_at_load_time() {
    common::runtime::setup();
    let mut registry = ServletRegistry::new();
    registry.register("Echo", Box::new(EchoServlet::new()));

    let err = registry.add_mapping("/v[z-a]/*", "Echo").unwrap_err();
    match err {
        RegistryError::InvalidPattern(pattern_err) => {
            assert_eq!(pattern_err.pattern, "/v[z-a]/*");
        }
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
    assert!(registry.mappings().is_empty());
}

#[test]
fn init_parameters_roundtrip() {
    common::runtime::setup();
    let mut registry = ServletRegistry::new();
    registry.add_init_parameter("env", "prod");
    registry.add_init_parameter("region", "eu-west-1");

    assert_eq!(registry.init_parameter("env"), Some("prod"));
    assert_eq!(registry.init_parameter("region"), Some("eu-west-1"));
    assert_eq!(registry.init_parameter("missing"), None);
}
