//! Request/response envelope between a host and the fill engine.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::report::FillReport;

/// A request carried over the host's transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FillRequest {
    /// Fill the current page from this profile.
    FillForm { profile: Profile },
    /// Liveness probe.
    Ping,
}

/// Response to a [`FillRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillResponse {
    Report(FillReport),
    Status { success: bool, message: String },
}

impl FillResponse {
    /// Response to [`FillRequest::Ping`].
    pub fn ready() -> Self {
        FillResponse::Status {
            success: true,
            message: "Form filler is ready".to_string(),
        }
    }

    /// Response to a request that could not be parsed or served.
    pub fn error(message: impl Into<String>) -> Self {
        FillResponse::Status {
            success: false,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            FillResponse::Report(report) => report.success,
            FillResponse::Status { success, .. } => *success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileAttribute;

    #[test]
    fn test_fill_request_parses_action_tag() {
        let json = r#"{"action": "fillForm", "profile": {"name": "Work", "email": "a@b.com"}}"#;
        let request: FillRequest = serde_json::from_str(json).unwrap();
        match request {
            FillRequest::FillForm { profile } => {
                assert_eq!(profile.name, "Work");
                assert_eq!(profile.get(ProfileAttribute::Email), Some("a@b.com"));
            }
            FillRequest::Ping => panic!("expected fillForm"),
        }
    }

    #[test]
    fn test_ping_request() {
        let request: FillRequest = serde_json::from_str(r#"{"action": "ping"}"#).unwrap();
        assert!(matches!(request, FillRequest::Ping));
    }

    #[test]
    fn test_ready_response_shape() {
        let json = serde_json::to_value(FillResponse::ready()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Form filler is ready");
        assert!(FillResponse::ready().is_success());
        assert!(!FillResponse::error("bad request").is_success());
    }

    #[test]
    fn test_report_response_is_flat() {
        let response = FillResponse::Report(FillReport::no_fields_found());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["filledCount"], 0);
    }
}
