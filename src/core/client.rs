//! Translation API client: parameter shaping and request dispatch

use serde_json::Value;
use tracing::debug;

use crate::core::errors::{ClientError, Result};
use crate::core::models::{expand_phrase, normalize_input_string, FileFormat, PhraseValue};
use crate::core::transport::{Params, Transport};

/// Client for the string input/output API of a single platform.
///
/// Holds the platform identifier and a transport; every operation merges the
/// identifier into its parameters and makes exactly one transport call. The
/// client keeps no other state, so it is freely shareable across tasks as
/// long as the transport itself is.
#[derive(Debug, Clone)]
pub struct TranslationClient<T> {
    platform_id: String,
    transport: T,
}

impl<T: Transport> TranslationClient<T> {
    /// Create a client for the given platform.
    ///
    /// The platform identifier may be numeric or a string; it is sent as-is
    /// under the `platform-id` parameter on every request.
    pub fn new(platform_id: impl ToString, transport: T) -> Self {
        Self {
            platform_id: platform_id.to_string(),
            transport,
        }
    }

    /// The platform this client addresses
    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submit new strings to be translated.
    ///
    /// Each element must be either plain text or a structured record (a JSON
    /// object with `string_key`/`string` and optional `context`). Elements
    /// are normalized before anything is sent: text is wrapped as
    /// `{"string": <text>}`, record keys are dashified. A malformed element
    /// fails the whole call with [`ClientError::InvalidInput`] and no request
    /// is made.
    pub async fn submit_strings(&self, strings: &[Value], tag: Option<&str>) -> Result<Value> {
        let payload = encode_input_strings(strings)?;
        debug!("submitting {} strings to string/input", strings.len());

        let mut params = Params::new();
        params.insert("input".to_string(), Value::String(payload));
        if let Some(tag) = tag {
            params.insert("tag".to_string(), Value::String(tag.to_string()));
        }

        self.post("string/input", params).await
    }

    /// Submit a single string to be translated.
    ///
    /// Produces the same request as [`submit_strings`](Self::submit_strings)
    /// with a one-element slice.
    pub async fn submit_string(&self, string: Value, tag: Option<&str>) -> Result<Value> {
        self.submit_strings(std::slice::from_ref(&string), tag).await
    }

    /// Submit a phrase mapping: keys paired with one text or ordered variants.
    ///
    /// A variants entry of length N expands into N records carrying their
    /// zero-based position as `context`; a single-text entry expands into one
    /// record without `context`. Expansion follows pair order, then variant
    /// order, and the flattened result goes through
    /// [`submit_strings`](Self::submit_strings).
    pub async fn submit_phrases<K, V, I>(&self, phrases: I, tag: Option<&str>) -> Result<Value>
    where
        K: AsRef<str>,
        V: Into<PhraseValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut strings = Vec::new();
        for (string_key, value) in phrases {
            let value = value.into();
            strings.extend(expand_phrase(string_key.as_ref(), &value));
        }

        self.submit_strings(&strings, tag).await
    }

    /// Record a translation for an existing string.
    pub async fn record_translation(
        &self,
        string_key: &str,
        locale: &str,
        translation: &str,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.insert("string-key".to_string(), Value::String(string_key.to_string()));
        params.insert("locale".to_string(), Value::String(locale.to_string()));
        params.insert("translation".to_string(), Value::String(translation.to_string()));

        self.post("string/translate", params).await
    }

    /// Get the strings with their translations, across all locales.
    pub async fn fetch_output(&self) -> Result<Value> {
        self.get_output(None).await
    }

    /// Get the strings with their translations for one locale.
    pub async fn fetch_output_for_locale(&self, locale: &str) -> Result<Value> {
        self.get_output(Some(locale)).await
    }

    /// Download strings and translations as a string file.
    ///
    /// `extra` parameters are merged in first; `locale`, `format` and the
    /// platform identifier always take precedence over caller-supplied keys.
    /// Returns the decoded response unexamined.
    pub async fn download(&self, locale: &str, format: FileFormat, extra: Params) -> Result<Value> {
        let mut params = extra;
        params.insert("locale".to_string(), Value::String(locale.to_string()));
        params.insert("format".to_string(), Value::String(format.as_str().to_string()));

        self.get("string/download", params).await
    }

    /// Download strings and translations as a Ruby YAML file.
    pub async fn download_yaml(&self, locale: &str, extra: Params) -> Result<Value> {
        self.download(locale, FileFormat::RubyYaml, extra).await
    }

    /// Download strings and translations as a gettext PO file.
    pub async fn download_po(&self, locale: &str, extra: Params) -> Result<Value> {
        self.download(locale, FileFormat::GnuPo, extra).await
    }

    /// Upload a string file to add new strings.
    ///
    /// The file content is passed through opaquely; this layer does not
    /// inspect it. Note: the upload endpoint has not been verified against
    /// the live service, so treat this operation as untested.
    pub async fn upload(&self, file: &str, format: FileFormat) -> Result<Value> {
        let mut params = Params::new();
        params.insert("file".to_string(), Value::String(file.to_string()));
        params.insert("format".to_string(), Value::String(format.as_str().to_string()));

        self.post("string/upload", params).await
    }

    /// Upload a Ruby YAML string file. Untested, see [`upload`](Self::upload).
    pub async fn upload_yaml(&self, file: &str) -> Result<Value> {
        self.upload(file, FileFormat::RubyYaml).await
    }

    /// Upload a gettext PO string file. Untested, see [`upload`](Self::upload).
    pub async fn upload_po(&self, file: &str) -> Result<Value> {
        self.upload(file, FileFormat::GnuPo).await
    }

    /// Upload an iOS `.strings` file. Untested, see [`upload`](Self::upload).
    pub async fn upload_strings(&self, file: &str) -> Result<Value> {
        self.upload(file, FileFormat::IosStrings).await
    }

    /// Fetch `string/output` and extract the `translation` field
    async fn get_output(&self, locale: Option<&str>) -> Result<Value> {
        let mut params = Params::new();
        if let Some(locale) = locale {
            params.insert("locale".to_string(), Value::String(locale.to_string()));
        }

        let response = self.get("string/output", params).await?;
        response
            .get("translation")
            .cloned()
            .ok_or(ClientError::ResponseShape {
                field: "translation",
            })
    }

    /// GET with the platform identifier merged in last
    async fn get(&self, path: &str, mut params: Params) -> Result<Value> {
        params.insert(
            "platform-id".to_string(),
            Value::String(self.platform_id.clone()),
        );
        self.transport.get(path, &params).await
    }

    /// POST with the platform identifier merged in last
    async fn post(&self, path: &str, mut params: Params) -> Result<Value> {
        params.insert(
            "platform-id".to_string(),
            Value::String(self.platform_id.clone()),
        );
        self.transport.post(path, &params).await
    }
}

/// Normalize every element and JSON-encode the result for the `input` param
fn encode_input_strings(strings: &[Value]) -> Result<String> {
    let normalized = strings
        .iter()
        .map(normalize_input_string)
        .collect::<Result<Vec<Value>>>()?;
    Ok(serde_json::to_string(&normalized)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct Call {
        method: &'static str,
        path: String,
        params: Params,
    }

    /// Records every invocation and answers with a canned response
    #[derive(Debug)]
    struct MockTransport {
        calls: Mutex<Vec<Call>>,
        response: Value,
    }

    impl MockTransport {
        fn new() -> Self {
            Self::with_response(json!({"status": "ok"}))
        }

        fn with_response(response: Value) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response,
            }
        }

        fn record(&self, method: &'static str, path: &str, params: &Params) {
            self.calls.lock().unwrap().push(Call {
                method,
                path: path.to_string(),
                params: params.clone(),
            });
        }

        fn calls(&self) -> std::sync::MutexGuard<'_, Vec<Call>> {
            self.calls.lock().unwrap()
        }
    }

    impl Transport for MockTransport {
        async fn get(&self, path: &str, params: &Params) -> Result<Value> {
            self.record("GET", path, params);
            Ok(self.response.clone())
        }

        async fn post(&self, path: &str, params: &Params) -> Result<Value> {
            self.record("POST", path, params);
            Ok(self.response.clone())
        }
    }

    fn client_with(transport: &Arc<MockTransport>) -> TranslationClient<Arc<MockTransport>> {
        TranslationClient::new(99, Arc::clone(transport))
    }

    fn input_payload(params: &Params) -> Value {
        let encoded = params["input"].as_str().unwrap();
        serde_json::from_str(encoded).unwrap()
    }

    #[tokio::test]
    async fn test_submit_strings_normalizes_and_posts() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport);

        let strings = vec![
            json!("Hello"),
            json!({"string_key": "greeting", "string": "Hi", "context": 0}),
        ];
        client.submit_strings(&strings, None).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "string/input");
        assert_eq!(calls[0].params["platform-id"], json!("99"));
        assert!(!calls[0].params.contains_key("tag"));
        assert_json_eq!(
            input_payload(&calls[0].params),
            json!([
                {"string": "Hello"},
                {"string-key": "greeting", "string": "Hi", "context": 0},
            ])
        );
    }

    #[tokio::test]
    async fn test_submit_strings_includes_tag_when_given() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport);

        client
            .submit_strings(&[json!("Hello")], Some("release-7"))
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].params["tag"], json!("release-7"));
    }

    #[tokio::test]
    async fn test_submit_string_matches_one_element_submit_strings() {
        let single = Arc::new(MockTransport::new());
        let slice = Arc::new(MockTransport::new());

        client_with(&single)
            .submit_string(json!("Hello"), Some("t"))
            .await
            .unwrap();
        client_with(&slice)
            .submit_strings(&[json!("Hello")], Some("t"))
            .await
            .unwrap();

        let single_calls = single.calls();
        let slice_calls = slice.calls();
        assert_eq!(single_calls[0].path, slice_calls[0].path);
        assert_eq!(single_calls[0].params, slice_calls[0].params);
    }

    #[tokio::test]
    async fn test_submit_phrases_expands_into_one_post() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport);

        client
            .submit_phrases(
                vec![
                    ("hello", PhraseValue::from(vec!["Hi", "Hello there"])),
                    ("bye", PhraseValue::from("Goodbye")),
                ],
                None,
            )
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "string/input");
        assert_json_eq!(
            input_payload(&calls[0].params),
            json!([
                {"string-key": "hello", "string": "Hi", "context": 0},
                {"string-key": "hello", "string": "Hello there", "context": 1},
                {"string-key": "bye", "string": "Goodbye"},
            ])
        );
    }

    #[tokio::test]
    async fn test_record_translation_params() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport);

        client
            .record_translation("greeting", "ja", "こんにちは")
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "string/translate");
        assert_eq!(calls[0].params["string-key"], json!("greeting"));
        assert_eq!(calls[0].params["locale"], json!("ja"));
        assert_eq!(calls[0].params["translation"], json!("こんにちは"));
        assert_eq!(calls[0].params["platform-id"], json!("99"));
    }

    #[tokio::test]
    async fn test_fetch_output_extracts_translation_field() {
        let transport = Arc::new(MockTransport::with_response(
            json!({"translation": {"greeting": {"ja": "こんにちは"}}}),
        ));
        let client = client_with(&transport);

        let output = client.fetch_output().await.unwrap();
        assert_json_eq!(output, json!({"greeting": {"ja": "こんにちは"}}));

        let calls = transport.calls();
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, "string/output");
        assert!(!calls[0].params.contains_key("locale"));
    }

    #[tokio::test]
    async fn test_fetch_output_fails_on_missing_field() {
        let transport = Arc::new(MockTransport::with_response(json!({"unexpected": true})));
        let client = client_with(&transport);

        let err = client.fetch_output().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ResponseShape {
                field: "translation"
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_output_for_locale_adds_locale() {
        let transport = Arc::new(MockTransport::with_response(json!({"translation": {}})));
        let client = client_with(&transport);

        client.fetch_output_for_locale("ja").await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].params["locale"], json!("ja"));
    }

    #[tokio::test]
    async fn test_download_merges_extras_without_clobbering() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport);

        let mut extra = Params::new();
        extra.insert("md5".to_string(), json!(true));
        extra.insert("platform-id".to_string(), json!("spoofed"));

        client
            .download("ja", FileFormat::IosStrings, extra)
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, "string/download");
        assert_eq!(calls[0].params["locale"], json!("ja"));
        assert_eq!(calls[0].params["format"], json!("IOS_STRINGS"));
        assert_eq!(calls[0].params["md5"], json!(true));
        // the configured platform always wins over caller params
        assert_eq!(calls[0].params["platform-id"], json!("99"));
    }

    #[tokio::test]
    async fn test_upload_params() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport);

        client.upload("en:\n  greeting: Hi\n", FileFormat::RubyYaml).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "string/upload");
        assert_eq!(calls[0].params["file"], json!("en:\n  greeting: Hi\n"));
        assert_eq!(calls[0].params["format"], json!("RUBY_YAML"));
    }

    #[tokio::test]
    async fn test_invalid_element_fails_before_any_request() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport);

        let err = client
            .submit_strings(&[json!("Hello"), json!(42)], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidInput { .. }));
        assert_eq!(transport.calls().len(), 0);
    }
}
