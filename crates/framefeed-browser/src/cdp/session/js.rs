//! JavaScript execution operations for CDP page session.

use serde_json::{Value, json};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{PropertyDescriptor, RemoteObject};

use super::core::PageSession;

fn check_exception(result: &Value) -> Result<(), CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let text = exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error");
        return Err(CdpError::JavaScript(text.to_string()));
    }
    Ok(())
}

fn call_arguments(args: Vec<Value>) -> Value {
    Value::Array(args.into_iter().map(|v| json!({"value": v})).collect())
}

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Evaluate a JavaScript expression and return a remote object.
    pub async fn evaluate_handle(&self, expression: &str) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": false,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(serde_json::from_value(result["result"].clone())?)
    }

    /// Call `function` with `this` bound to the remote object and return its value.
    ///
    /// Arguments travel as JSON values, never spliced into the source.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(json!({
                    "objectId": object_id,
                    "functionDeclaration": function,
                    "arguments": call_arguments(args),
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Like [`call_function_on`](Self::call_function_on) but returns a remote object.
    pub async fn call_function_handle(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(json!({
                    "objectId": object_id,
                    "functionDeclaration": function,
                    "arguments": call_arguments(args),
                    "returnByValue": false,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(serde_json::from_value(result["result"].clone())?)
    }

    /// Own properties of a remote object (array elements come back by index).
    pub async fn get_properties(&self, object_id: &str) -> Result<Vec<PropertyDescriptor>, CdpError> {
        let result = self
            .call(
                "Runtime.getProperties",
                Some(json!({
                    "objectId": object_id,
                    "ownProperties": true,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(serde_json::from_value(result["result"].clone())?)
    }

    pub async fn release_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("Runtime.releaseObject", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }
}
