//! Process-wide registry tests.
//!
//! The registry can only be installed once per process, so everything that
//! touches it lives in a single test in its own test binary.

mod common;

use msgwire::message::Message;
use msgwire::protocol::{KeyValuePairs, MessageType};
use msgwire::services;

use common::{echo, single_service_config, write_config, TestResponder};

#[test]
fn test_global_registry_lifecycle() {
    // Before initialization every send fails.
    assert!(!services::is_initialized());
    assert!(services::global().is_none());
    let mut message = Message::new("echo", MessageType::Text);
    assert!(!message.send("echo_service"));
    assert!(!message.is_one_way());

    // A config that registers nothing does not initialize messaging.
    let (_empty_dir, empty_path) = write_config("[services]\n");
    assert!(services::initialize(&empty_path).is_err());
    assert!(!services::is_initialized());

    // An unreadable config fails too.
    assert!(services::initialize("/nonexistent/msgwire.toml").is_err());

    let responder = TestResponder::start(2, echo);
    let (_temp_dir, path) = write_config(&single_service_config("echo_service", responder.port));
    let registry = services::initialize(&path).expect("Failed to initialize messaging");
    assert!(services::is_initialized());
    assert!(registry.is_service_registered("echo_service"));

    // No reset: a second initialization is rejected and the first stays live.
    assert!(services::initialize(&path).is_err());
    assert_eq!(services::global().map(|r| r.count()), Some(1));

    // Unregistered service.
    let mut response = Message::empty();
    assert!(!message.send_with_response("nobody", &mut response));

    // Two-way through the global registry.
    let mut message = Message::new("echo", MessageType::KeyValues);
    message.set_key_values_payload(KeyValuePairs::new().with("firstName", "Mickey"));
    assert!(message.send_with_response("echo_service", &mut response));
    assert_eq!(
        response.key_values_payload().and_then(|kvp| kvp.get("firstName")),
        Some("Mickey")
    );

    // One-way through the global registry.
    let mut message = Message::new("echo", MessageType::Text);
    message.set_text_payload("fire and forget");
    assert!(message.send("echo_service"));
    assert!(message.is_one_way());

    let received = responder.finish();
    assert_eq!(received.len(), 2);
    assert!(received[1].is_one_way());
    assert_eq!(received[1].text_payload(), Some("fire and forget"));
}
