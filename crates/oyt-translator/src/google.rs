use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ProviderMetadata, TranslateError, Translation, TranslationRequest, Translator};

pub const DEFAULT_API_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation (basic, v2) client
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(api_key: String, api_url: String) -> Result<Self, TranslateError> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::MissingApiKey);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
        })
    }
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    target: &'a str,
    /// "text" keeps line breaks instead of reading the input as HTML
    format: &'static str,
}

impl<'a> RequestBody<'a> {
    fn from_request(request: &'a TranslationRequest) -> Self {
        Self {
            q: &request.text,
            source: (!request.is_auto_detect()).then_some(request.from.as_str()),
            target: &request.to,
            format: "text",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    data: Option<TranslationList>,
    /// Some proxies return the list without the `data` envelope
    translations: Option<Vec<TranslationItem>>,
}

#[derive(Debug, Deserialize)]
struct TranslationList {
    #[serde(default)]
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationItem {
    pub translated_text: String,
    pub detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Interpret a raw response from the translation endpoint.
///
/// Non-2xx responses carry `{error: {message}}` when the service explains
/// itself; anything else falls back to the bare status code.
pub fn parse_response(status: u16, body: &str) -> Result<TranslationItem, TranslateError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty());

        return Err(match message {
            Some(message) => TranslateError::ApiError(message),
            None => TranslateError::Status(status),
        });
    }

    let parsed: ResponseBody = serde_json::from_str(body)
        .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

    parsed
        .data
        .map(|d| d.translations)
        .or(parsed.translations)
        .and_then(|list| list.into_iter().next())
        .ok_or(TranslateError::NoTranslation)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError> {
        let body = RequestBody::from_request(&request);

        let response = self
            .client
            .post(&self.api_url)
            .header("X-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!(status, bytes = text.len(), "translation response received");

        let item = parse_response(status, &text)?;

        Ok(Translation {
            text: item.translated_text,
            from: request.from,
            to: request.to,
            detected_from: item.detected_source_language,
            provider: "google".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google Cloud Translation".to_string(),
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_source_is_omitted_from_body() {
        let request = TranslationRequest::new("Hello", "auto", "tr");
        let json = serde_json::to_value(RequestBody::from_request(&request)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "q": "Hello", "target": "tr", "format": "text" })
        );
    }

    #[test]
    fn concrete_source_is_sent() {
        let request = TranslationRequest::new("line1\nline2", "en", "tr");
        let json = serde_json::to_value(RequestBody::from_request(&request)).unwrap();

        assert_eq!(json["source"], "en");
        assert_eq!(json["q"], "line1\nline2");
    }

    #[test]
    fn success_with_detection() {
        let body = r#"{"data":{"translations":[{"translatedText":"Merhaba","detectedSourceLanguage":"en"}]}}"#;
        let item = parse_response(200, body).unwrap();

        assert_eq!(item.translated_text, "Merhaba");
        assert_eq!(item.detected_source_language.as_deref(), Some("en"));
    }

    #[test]
    fn success_without_envelope() {
        let body = r#"{"translations":[{"translatedText":"Merhaba"}]}"#;
        let item = parse_response(200, body).unwrap();

        assert_eq!(item.translated_text, "Merhaba");
        assert_eq!(item.detected_source_language, None);
    }

    #[test]
    fn structured_error_message_is_surfaced() {
        let body = r#"{"error":{"code":403,"message":"Invalid API key"}}"#;
        let err = parse_response(403, body).unwrap_err();

        assert!(matches!(&err, TranslateError::ApiError(m) if m == "Invalid API key"));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn unstructured_error_falls_back_to_status() {
        let err = parse_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "Request failed. Status: 502");
    }

    #[test]
    fn missing_payload_is_an_error() {
        let err = parse_response(200, r#"{"data":{"translations":[]}}"#).unwrap_err();
        assert!(matches!(err, TranslateError::NoTranslation));

        let err = parse_response(200, "not json").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }

    #[test]
    fn empty_key_is_rejected() {
        let result = GoogleTranslator::new(" ".to_string(), DEFAULT_API_URL.to_string());
        assert!(matches!(result, Err(TranslateError::MissingApiKey)));
    }
}
