#![allow(dead_code)]

mod launcher;

pub use self::launcher::{FakeLauncher, Script};

pub const CONNECTED: &str =
    r#"{"state":"connected","pid":4242,"message":{"message":"Connected"}}"#;

pub const DISCONNECTED: &str =
    r#"{"state":"disconnected","message":{"message":"Invalid access key"}}"#;

pub const STOPPED: &str = r#"{"status":"success","message":"BrowserStackLocal stopped"}"#;
