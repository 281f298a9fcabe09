//! CDP session attached to a single page.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::Connection;
use crate::error::CdpError;
use crate::protocol::{ExceptionDetails, RemoteObject};

/// A session attached to a single page/target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    connection: Connection,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, connection: Connection) -> Self {
        Self {
            target_id,
            session_id,
            connection,
        }
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!(
            "Enabled CDP domains for target {} (session {})",
            self.target_id, self.session_id
        );
        Ok(())
    }

    /// Evaluate JavaScript and return a handle to the result.
    ///
    /// The handle belongs to `object_group` and stays alive until that group
    /// is released.
    pub async fn evaluate_handle(
        &self,
        expression: &str,
        object_group: &str,
    ) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "objectGroup": object_group,
                    "returnByValue": false,
                })),
            )
            .await?;

        check_exception(&result)?;
        let remote_obj: RemoteObject = serde_json::from_value(result["result"].clone())?;
        Ok(remote_obj)
    }

    /// Release every remote object in `object_group`.
    pub async fn release_object_group(&self, object_group: &str) -> Result<(), CdpError> {
        self.call(
            "Runtime.releaseObjectGroup",
            Some(json!({ "objectGroup": object_group })),
        )
        .await?;
        Ok(())
    }

    /// Call `function` with `this` bound to a remote object.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, CdpError> {
        let params = json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "arguments": args.into_iter().map(|v| json!({"value": v})).collect::<Vec<_>>(),
            "returnByValue": true,
            "awaitPromise": true,
        });

        let result = self.call("Runtime.callFunctionOn", Some(params)).await?;
        check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }
}

fn check_exception(result: &Value) -> Result<(), CdpError> {
    match result.get("exceptionDetails") {
        Some(exception) => {
            let message = serde_json::from_value::<ExceptionDetails>(exception.clone())
                .map(|details| details.message())
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(CdpError::JavaScript(message))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_exception() {
        assert!(check_exception(&json!({"result": {"type": "undefined"}})).is_ok());

        let result = json!({
            "result": {"type": "object"},
            "exceptionDetails": {"exceptionId": 1, "text": "Uncaught", "lineNumber": 0, "columnNumber": 0}
        });
        let err = check_exception(&result).unwrap_err();
        assert!(matches!(err, CdpError::JavaScript(ref m) if m == "Uncaught"));
    }

    #[test]
    fn test_malformed_exception_still_fails() {
        let err = check_exception(&json!({"exceptionDetails": 42})).unwrap_err();
        assert!(matches!(err, CdpError::JavaScript(ref m) if m == "Unknown error"));
    }
}
