//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use tempfile::TempDir;

use msgwire::message::Message;
use msgwire::transport::TcpTransport;

/// A loopback responder that serves a fixed number of connections.
pub struct TestResponder {
    pub port: u16,
    handle: JoinHandle<Vec<Message>>,
}

impl TestResponder {
    /// Start a responder. For each connection it reads one message and, if
    /// the message is two-way, writes back whatever `reply` returns.
    pub fn start<F>(connections: usize, reply: F) -> Self
    where
        F: Fn(&Message) -> Message + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        let port = listener.local_addr().expect("No local address").port();

        let handle = thread::spawn(move || {
            let mut received = Vec::new();
            for _ in 0..connections {
                let (stream, _) = listener.accept().expect("Failed to accept");
                let mut transport = TcpTransport::new(stream);
                let Some(message) = Message::reconstruct(Some(&mut transport)) else {
                    continue;
                };
                if !message.is_one_way() {
                    reply(&message)
                        .write_to(&mut transport)
                        .expect("Failed to write reply");
                }
                received.push(message);
            }
            received
        });

        Self { port, handle }
    }

    /// Wait for the responder to finish and return what it received.
    pub fn finish(self) -> Vec<Message> {
        self.handle.join().expect("Responder panicked")
    }
}

/// Echo the request name and payload back.
pub fn echo(message: &Message) -> Message {
    let mut reply = Message::new(message.request_name(), message.message_type());
    reply.set_payload(message.payload().clone());
    reply
}

/// Write a config file into a temp dir.
pub fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("msgwire.toml");
    std::fs::write(&path, contents).expect("Failed to write config");
    (temp_dir, path)
}

/// Config text for one service on localhost.
pub fn single_service_config(service_name: &str, port: u16) -> String {
    format!(
        r#"
[logging]
level = "debug"

[services]
{service_name} = "{service_name}_section"

[{service_name}_section]
host = "127.0.0.1"
port = {port}
"#
    )
}
