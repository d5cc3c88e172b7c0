use crate::utils::error::{QaError, Result};
use reqwest::Response;
use serde::Deserialize;

/// `{"error": {"message": ...}}`, the error shape OpenAI and Pinecone share.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Passes 2xx responses through; anything else becomes [`QaError::ApiError`]
/// carrying the service's own message, or the raw body when it is not JSON.
pub async fn check_status(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(QaError::api(service, status.as_u16(), error_message(body)))
}

fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_envelope() {
        let body = r#"{"error": {"code": "NOT_FOUND", "message": "Index docs not found"}, "status": 404}"#;
        assert_eq!(error_message(body.to_string()), "Index docs not found");
        assert_eq!(error_message("Bad Gateway".to_string()), "Bad Gateway");
    }
}
