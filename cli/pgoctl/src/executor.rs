//! The single request/response contract every API operation goes through.
//!
//! A [`Call`] names a verb, a path, optional query parameters and an
//! optional JSON body. [`Session::execute`] sends it with the session's
//! basic-auth identity over the shared channel, classifies the HTTP status,
//! and only then decodes the body.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::classify::{classify, StatusClass};
use crate::error::CallError;
use crate::session::Session;

/// One logical remote operation.
#[derive(Debug, Clone)]
pub struct Call {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Call {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a path segment, percent-encoded.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, CallError> {
        self.body = Some(serde_json::to_vec(body).map_err(CallError::Encode)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    fn url(&self, base_url: &str) -> Result<Url, CallError> {
        let raw = format!("{}{}", base_url, self.path);
        let mut url = Url::parse(&raw).map_err(|_| CallError::InvalidUrl(raw.clone()))?;
        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| CallError::InvalidUrl(raw.clone()))?
                .pop_if_empty()
                .extend(&self.segments);
        }
        Ok(url)
    }
}

impl Session {
    /// Perform `call` and decode a successful body into `R`.
    ///
    /// Transport failures come back without a status. A non-200 status is
    /// returned as an error without reading the body. Only a 200 body is
    /// decoded; a body that does not match `R` comes back with its raw text.
    pub async fn execute<R: DeserializeOwned>(&self, call: Call) -> Result<R, CallError> {
        let url = call.url(self.base_url())?;
        let credentials = self.credentials();

        debug!(method = %call.method, url = %url, "sending request");

        let mut request = self
            .channel()
            .client()
            .request(call.method.clone(), url)
            .basic_auth(&credentials.username, Some(&credentials.password));
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = call.body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = request.send().await.map_err(CallError::Transport)?;
        let status = response.status().as_u16();
        let class = classify(status);
        debug!(status, class = %class, "received response");

        match class {
            StatusClass::Success => {}
            StatusClass::AuthenticationFailed => return Err(CallError::AuthenticationFailed),
            StatusClass::UnexpectedStatus(code) => return Err(CallError::UnexpectedStatus(code)),
        }

        let body = response.text().await.map_err(CallError::Transport)?;
        serde_json::from_str(&body).map_err(|source| CallError::Decode { body, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_percent_encoded() {
        let call = Call::get("/backrest").segment("my cluster/1");
        let url = call.url("https://pgo:8443").unwrap();
        assert_eq!(url.as_str(), "https://pgo:8443/backrest/my%20cluster%2F1");
    }

    #[test]
    fn json_marks_call_as_having_a_body() {
        let call = Call::post("/clusters")
            .json(&serde_json::json!({ "Name": "hippo" }))
            .unwrap();
        assert!(call.has_body());
        assert_eq!(call.method(), &Method::POST);
        assert!(!Call::get("/version").has_body());
    }

    #[test]
    fn path_is_joined_to_base() {
        let call = Call::post("/policies/apply");
        let url = call.url("https://pgo:8443").unwrap();
        assert_eq!(url.path(), "/policies/apply");
    }
}
