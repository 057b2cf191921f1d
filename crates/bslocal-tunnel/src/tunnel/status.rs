use std::num::NonZeroU32;

use serde::Deserialize;

use super::RunMode;
use crate::{Error, Result};

/// Status line printed by the tunnel binary in daemon mode.
///
/// For instance:
///
/// ```text
/// {"state":"connected","pid":1234,"message":{"message":"Connected"}}
/// {"status":"success","message":"BrowserStackLocal stopped successfully"}
/// ```
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub(crate) struct Status {
    state: Option<String>,
    status: Option<String>,
    pid: Option<u32>,
    message: Option<StatusMessage>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
enum StatusMessage {
    Text(String),
    Nested { message: String },
}

impl Status {
    /// Parses a line of output, returning `None` if it isn't a status line.
    pub fn parse(line: &str) -> Option<Self> {
        serde_json::from_str(line.trim()).ok()
    }

    fn message(&self) -> String {
        match &self.message {
            Some(StatusMessage::Text(msg)) | Some(StatusMessage::Nested { message: msg }) => {
                msg.clone()
            }
            None => self
                .state
                .as_deref()
                .or(self.status.as_deref())
                .unwrap_or("unknown error")
                .to_owned(),
        }
    }

    /// Returns the outcome this status line denotes for the given mode, or
    /// `None` if the line is irrelevant.
    ///
    /// A successful start outcome holds the ID of the daemon process, when
    /// reported. A zero ID is ignored: it doesn't name a single process.
    pub fn outcome(&self, mode: RunMode) -> Option<Result<Option<NonZeroU32>>> {
        let is = |field: &Option<String>, value: &str| {
            field
                .as_deref()
                .is_some_and(|field| field.eq_ignore_ascii_case(value))
        };

        match mode {
            RunMode::Start => {
                self.state.as_ref()?;

                if is(&self.state, "connected") {
                    Some(Ok(self.pid.and_then(NonZeroU32::new)))
                } else {
                    Some(Err(Error::Rejected(self.message())))
                }
            }
            RunMode::Stop => {
                if is(&self.status, "success") || is(&self.state, "disconnected") {
                    Some(Ok(None))
                } else if self.status.is_some() {
                    Some(Err(Error::Rejected(self.message())))
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used)]
mod tests {
    use super::Status;
    use crate::Error;
    use crate::tunnel::RunMode;

    #[test]
    fn connected_with_pid() {
        let status = Status::parse(
            r#" {"state":"connected","pid":1234,"message":{"message":"Connected"}} "#,
        )
        .expect("status");

        assert!(matches!(
            status.outcome(RunMode::Start),
            Some(Ok(Some(pid))) if pid.get() == 1234
        ));
        assert!(status.outcome(RunMode::Stop).is_none());
    }

    #[test]
    fn connected_with_zero_pid() {
        let status = Status::parse(r#"{"state":"connected","pid":0}"#).expect("status");

        assert!(matches!(status.outcome(RunMode::Start), Some(Ok(None))));
    }

    #[test]
    fn disconnected_is_rejected_on_start() {
        let status = Status::parse(
            r#"{"state":"disconnected","message":{"message":"Invalid access key"}}"#,
        )
        .expect("status");

        match status.outcome(RunMode::Start) {
            Some(Err(Error::Rejected(msg))) => assert_eq!(msg, "Invalid access key"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn stop_acknowledged() {
        let status =
            Status::parse(r#"{"status":"success","message":"BrowserStackLocal stopped"}"#)
                .expect("status");
        assert!(matches!(status.outcome(RunMode::Stop), Some(Ok(None))));

        let status = Status::parse(r#"{"status":"error","message":"no such tunnel"}"#)
            .expect("status");
        assert!(matches!(
            status.outcome(RunMode::Stop),
            Some(Err(Error::Rejected(_)))
        ));
    }

    #[test]
    fn plain_text_is_not_a_status() {
        assert!(Status::parse("BrowserStackLocal v8.4").is_none());
        assert!(Status::parse("42").is_none());
        assert!(Status::parse("").is_none());

        let unrelated = Status::parse(r#"{"level":"info"}"#).expect("status");
        assert!(unrelated.outcome(RunMode::Start).is_none());
        assert!(unrelated.outcome(RunMode::Stop).is_none());
    }
}
