//! Integration tests for msgwire.
//!
//! These tests start a loopback responder and exchange real frames with it
//! over TCP.

mod common;

use std::time::Duration;

use msgwire::config::Settings;
use msgwire::message::Message;
use msgwire::protocol::{KeyValuePairs, MessageType};
use msgwire::services::{ServiceInfo, ServiceRegistry};
use msgwire::transport::TcpConnector;

use common::{echo, single_service_config, write_config, TestResponder};

fn connector() -> TcpConnector {
    TcpConnector::new()
        .with_read_timeout(Duration::from_secs(10))
        .with_write_timeout(Duration::from_secs(10))
}

fn registry_for(service_name: &str, port: u16) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register_service(service_name, ServiceInfo::new(service_name, "127.0.0.1", port));
    registry
}

#[test]
fn test_two_way_key_values_echo() {
    let responder = TestResponder::start(1, echo);
    let registry = registry_for("echo_service", responder.port);

    let mut message = Message::new("echo", MessageType::KeyValues);
    message.set_key_values_payload(
        KeyValuePairs::new()
            .with("firstName", "Mickey")
            .with("lastName", "Mouse")
            .with("city", "Orlando")
            .with("state", "FL"),
    );

    let mut response = Message::empty();
    assert!(message.send_with_response_via(&registry, &connector(), "echo_service", &mut response));

    let kvp = response.key_values_payload().expect("Expected key/value reply");
    assert_eq!(kvp.get("firstName"), Some("Mickey"));
    assert_eq!(kvp.get("lastName"), Some("Mouse"));
    assert_eq!(kvp.get("city"), Some("Orlando"));
    assert_eq!(kvp.get("state"), Some("FL"));
    assert_eq!(response.request_name(), "echo");

    let received = responder.finish();
    assert_eq!(received.len(), 1);
    assert!(!received[0].is_one_way());
}

#[test]
fn test_two_way_text_reply() {
    let responder = TestResponder::start(1, |_| {
        let mut reply = Message::new("serverInfo", MessageType::Text);
        reply.set_text_payload("msgwire test responder");
        reply
    });
    let registry = registry_for("server_info", responder.port);

    let mut message = Message::new("serverInfo", MessageType::Text);
    let mut response = Message::empty();
    assert!(message.send_with_response_via(&registry, &connector(), "server_info", &mut response));
    assert_eq!(response.text_payload(), Some("msgwire test responder"));

    responder.finish();
}

#[test]
fn test_one_way_delivery() {
    let responder = TestResponder::start(1, echo);
    let registry = registry_for("echo_service", responder.port);

    let mut message = Message::new("echo", MessageType::KeyValues);
    message.set_key_values_payload(
        KeyValuePairs::new()
            .with("firstName", "Mickey")
            .with("lastName", "Mouse"),
    );
    assert!(message.send_via(&registry, &connector(), "echo_service"));
    assert!(message.is_one_way());

    let received = responder.finish();
    assert_eq!(received.len(), 1);
    assert!(received[0].is_one_way());
    assert_eq!(received[0].request_name(), "echo");
    assert_eq!(
        received[0].key_values_payload().and_then(|kvp| kvp.get("lastName")),
        Some("Mouse")
    );
}

#[test]
fn test_each_send_opens_a_connection() {
    let responder = TestResponder::start(3, echo);
    let registry = registry_for("echo_service", responder.port);

    for i in 0..3 {
        let mut message = Message::new("count", MessageType::Text);
        message.set_text_payload(format!("message {}", i));
        let mut response = Message::empty();
        assert!(message.send_with_response_via(
            &registry,
            &connector(),
            "echo_service",
            &mut response
        ));
        assert_eq!(response.text_payload(), Some(format!("message {}", i).as_str()));
    }

    assert_eq!(responder.finish().len(), 3);
}

#[test]
fn test_unregistered_service_fails_without_connecting() {
    // Nothing listens here; resolution must fail first.
    let registry = registry_for("echo_service", 1);

    let mut message = Message::new("echo", MessageType::Text);
    let mut response = Message::empty();
    assert!(!message.send_with_response_via(&registry, &connector(), "missing", &mut response));
    assert_eq!(response.message_type(), MessageType::Unknown);
}

#[test]
fn test_connection_refused() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let registry = registry_for("gone", port);

    let mut message = Message::new("echo", MessageType::Text);
    assert!(!message.send_via(&registry, &connector(), "gone"));
}

#[test]
fn test_registry_from_config_file() {
    let responder = TestResponder::start(1, echo);
    let config = format!(
        r#"
[services]
broken = "broken_section"
echo_service = "echo_section"

[broken_section]
host = "127.0.0.1"

[echo_section]
host = "127.0.0.1"
port = {}
"#,
        responder.port
    );
    let (_temp_dir, path) = write_config(&config);

    let settings = Settings::load(&path).unwrap();
    let registry = ServiceRegistry::from_settings(&settings).unwrap();
    assert_eq!(registry.count(), 1);
    assert!(!registry.is_service_registered("broken"));

    let mut message = Message::new("ping", MessageType::Text);
    message.set_text_payload("pong?");
    let mut response = Message::empty();
    assert!(message.send_with_response_via(&registry, &connector(), "echo_service", &mut response));
    assert_eq!(response.text_payload(), Some("pong?"));

    responder.finish();
}

#[test]
fn test_config_with_no_valid_services() {
    let config = single_service_config("echo", 9000).replace("port = 9000", "");
    let (_temp_dir, path) = write_config(&config);
    let settings = Settings::load(&path).unwrap();
    assert!(ServiceRegistry::from_settings(&settings).is_err());
}
