//! Fixture-based integration tests for description loading
//!
//! These tests serve pre-captured router documents from a mock HTTP server
//! and load them through the real transport.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use fritz_description::{Description, DescriptionError, DescriptionLoader, ServiceDescription};
use helpers::load_fixture;
use mockito::Server;
use rstest::rstest;
use soap_client::{HttpTransport, SoapError, TransportConfig};

fn loader() -> DescriptionLoader {
    let config = TransportConfig::default().timeout(Some(Duration::from_secs(5)));
    DescriptionLoader::new(Arc::new(HttpTransport::new(&config).unwrap()))
}

/// Test parsing the entry documents
#[rstest]
#[case("igddesc.xml", "FRITZ!Box 7590", 3, None)]
#[case("tr64desc.xml", "FRITZ!Box 7590", 4, Some("154.07.29"))]
fn test_parse_description_fixture(
    #[case] fixture_file: &str,
    #[case] expected_model: &str,
    #[case] expected_services: usize,
    #[case] expected_version: Option<&str>,
) {
    let xml = load_fixture(fixture_file);
    let description = Description::from_xml(fixture_file, &xml).expect("Failed to parse description");

    assert_eq!(description.model_name(), Some(expected_model));
    assert_eq!(description.device.all_services().len(), expected_services);
    assert_eq!(
        description.system_version.and_then(|v| v.version()).as_deref(),
        expected_version
    );
}

#[test]
fn test_tr64_service_names() {
    let description = Description::from_xml("tr64desc.xml", &load_fixture("tr64desc.xml")).unwrap();
    let names: Vec<&str> = description
        .device
        .all_services()
        .iter()
        .map(|s| s.short_name())
        .collect();

    assert_eq!(
        names,
        vec!["DeviceInfo1", "Hosts1", "WLANConfiguration1", "WLANConfiguration2"]
    );
}

#[test]
fn test_load_device_over_http() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/tr64desc.xml")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(load_fixture("tr64desc.xml"))
        .create();

    let url = format!("{}/tr64desc.xml", server.url());
    let description = loader().load_device(&url).expect("Failed to load description");

    mock.assert();
    assert_eq!(description.source, url);
    assert_eq!(description.device.services().len(), 2);
    assert_eq!(description.device.devices().len(), 1);
}

#[test]
fn test_load_service_over_http() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/hostsSCPD.xml")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(load_fixture("hostsSCPD.xml"))
        .create();

    let scpd: ServiceDescription = loader()
        .load_service(&format!("{}/hostsSCPD.xml", server.url()))
        .expect("Failed to load SCPD");

    let names: Vec<&str> = scpd.actions().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["GetHostNumberOfEntries", "GetGenericHostEntry"]);
    assert_eq!(scpd.state_variables().len(), 6);
}

#[test]
fn test_missing_document_is_unreachable() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/tr64desc.xml").with_status(404).create();

    let url = format!("{}/tr64desc.xml", server.url());
    match loader().load_device(&url) {
        Err(DescriptionError::Unreachable { url: failed, source }) => {
            assert_eq!(failed, url);
            assert!(matches!(source, SoapError::Http { status: 404, .. }));
        }
        other => panic!("Expected Unreachable, got {:?}", other),
    }
}

#[test]
fn test_refused_connection_is_unreachable() {
    let result = loader().load_device("http://127.0.0.1:1/igddesc.xml");
    assert!(matches!(result, Err(DescriptionError::Unreachable { .. })));
    assert!(!result.unwrap_err().is_timeout());
}

#[test]
fn test_login_page_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/tr64desc.xml")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(load_fixture("login.html"))
        .create();

    let result = loader().load_device(&format!("{}/tr64desc.xml", server.url()));
    assert!(matches!(result, Err(DescriptionError::LoginRequired(_))));
}

#[test]
fn test_malformed_document_is_parse_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/igddesc.xml")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body("<root><device><modelName>broken")
        .create();

    let result = loader().load_device(&format!("{}/igddesc.xml", server.url()));
    assert!(matches!(result, Err(DescriptionError::ParseError(_))));
}
