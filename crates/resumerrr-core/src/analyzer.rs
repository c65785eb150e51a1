use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::attachment::Attachment;
use crate::error::AnalyzerError;
use crate::state::Analysis;

pub const DEFAULT_ENDPOINT: &str = "https://ai-resume-reviewer-backend-npd0.onrender.com/analyze";

/// Shown when the backend reports an error without saying what went wrong
pub const DEFAULT_BACKEND_ERROR: &str = "Something went wrong";

/// Shown when the request never completes or the reply is not JSON
pub const TRANSPORT_FAILURE: &str =
    "Failed to connect to backend. Make sure the server is running.";

/// Shown when the reply is JSON but neither a success nor an error
pub const UNRECOGNIZED_REPLY: &str = "Unexpected response from the server.";

/// What the backend said about one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Analysis(Analysis),
    Failure(String),
    Unrecognized,
}

impl Reply {
    /// Classify a parsed response body.
    ///
    /// Error indicators win over success: a body carrying a truthy `error`
    /// field is a failure whatever its `status` says.
    pub fn from_json(body: &Value) -> Self {
        let error = body.get("error").filter(|v| is_truthy(v));
        let status = body.get("status").and_then(Value::as_str);

        if error.is_some() || status == Some("error") {
            let text = match error {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => DEFAULT_BACKEND_ERROR.to_string(),
            };
            return Reply::Failure(text);
        }

        if status == Some("success") {
            if let Some(data) = body.get("data").filter(|v| is_truthy(v)) {
                match serde_json::from_value::<Analysis>(data.clone()) {
                    Ok(analysis) => return Reply::Analysis(analysis),
                    Err(e) => tracing::warn!(error = %e, "success reply with malformed data"),
                }
            }
        }

        Reply::Unrecognized
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Clone)]
pub struct AnalyzerClient {
    client: Client,
    endpoint: String,
}

impl AnalyzerClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one question, with an optional résumé, and classify the reply.
    ///
    /// The body is parsed whatever the HTTP status; backends report errors in
    /// the JSON. There is no timeout and no retry.
    pub async fn analyze(
        &self,
        question: &str,
        resume: Option<&Attachment>,
    ) -> Result<Reply, AnalyzerError> {
        let request_error = |source| AnalyzerError::Request {
            endpoint: self.endpoint.clone(),
            source,
        };

        let mut form = Form::new();
        if let Some(resume) = resume {
            let part = Part::bytes(resume.bytes.clone())
                .file_name(resume.name.clone())
                .mime_str(&resume.content_type)
                .map_err(request_error)?;
            form = form.part("resume", part);
        }
        form = form.text("question", question.to_string());

        tracing::info!(
            endpoint = %self.endpoint,
            with_resume = resume.is_some(),
            "sending question to analyzer"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(request_error)?;
        tracing::debug!(%status, bytes = body.len(), "analyzer responded");

        let json: Value = serde_json::from_slice(&body).map_err(|source| AnalyzerError::Decode {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        Ok(Reply::from_json(&json))
    }
}
