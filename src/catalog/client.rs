//! HTTP client for the upstream catalog API.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::models::CharacterDetail;
use super::normalize::{self, is_truthy};
use crate::error::CatalogError;

/// Locale requested from the list endpoint.
pub const LIST_LOCALE: &str = "en";

/// Single page requested from the list endpoint; larger catalogs are cut here.
pub const LIST_PAGE_SIZE: usize = 1000;

/// Bound on each detail request, since prompts can be large.
pub const DETAIL_TIMEOUT: Duration = Duration::from_secs(30);

const LIST_PATH: &str = "role/list";
const DETAIL_PATH: &str = "role/detail";

/// Upstream response envelope: `{ code, data }`.
#[derive(Debug, Clone)]
pub struct Envelope {
    raw: Value,
}

impl Envelope {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// True when the upstream reported `code == 1`.
    pub fn is_success(&self) -> bool {
        self.raw.get("code").and_then(Value::as_f64) == Some(1.0)
    }

    /// Take the payload, or reject the envelope when it failed or is empty.
    pub fn into_payload(self) -> Result<Value, CatalogError> {
        let has_payload = self.raw.get("data").is_some_and(is_truthy);
        if !self.is_success() || !has_payload {
            return Err(CatalogError::Rejected { envelope: self.raw });
        }

        match self.raw {
            Value::Object(mut map) => Ok(map.remove("data").unwrap_or_default()),
            _ => Ok(Value::Null),
        }
    }
}

/// One way of addressing a character on the detail endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// `?id=<id>`
    PrimaryId,
    /// `?rawId=<id>`
    AlternateId,
}

impl LookupStrategy {
    /// Strategies in the order they are tried.
    pub const ORDER: [LookupStrategy; 2] = [LookupStrategy::PrimaryId, LookupStrategy::AlternateId];

    pub fn query_param(self) -> &'static str {
        match self {
            Self::PrimaryId => "id",
            Self::AlternateId => "rawId",
        }
    }
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_param())
    }
}

/// Client for the upstream catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the given base URL (must end with `/`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch the first (and only) page of the character list.
    pub async fn fetch_list(&self) -> Result<Envelope, CatalogError> {
        let url = self.endpoint(LIST_PATH)?;
        debug!("GET {} (locale={}, pageSize={})", url, LIST_LOCALE, LIST_PAGE_SIZE);

        let body: Value = self
            .http
            .get(url)
            .query(&[
                ("locale", LIST_LOCALE.to_string()),
                ("pageSize", LIST_PAGE_SIZE.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Envelope::new(body))
    }

    /// Fetch a character detail envelope using one lookup strategy.
    pub async fn fetch_detail(
        &self,
        strategy: LookupStrategy,
        id: &str,
    ) -> Result<Envelope, CatalogError> {
        let url = self.endpoint(DETAIL_PATH)?;
        debug!("GET {} ({}={})", url, strategy, id);

        let body: Value = self
            .http
            .get(url)
            .query(&[(strategy.query_param(), id)])
            .timeout(DETAIL_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Envelope::new(body))
    }

    /// Run one lookup strategy end to end.
    ///
    /// Returns `Ok(None)` when the upstream answered but did not know the id
    /// or sent something that is not a character record, and `Err` when the
    /// call itself failed.
    pub async fn lookup_detail(
        &self,
        strategy: LookupStrategy,
        id: &str,
    ) -> Result<Option<CharacterDetail>, CatalogError> {
        match self.fetch_detail(strategy, id).await?.into_payload() {
            Ok(payload) => Ok(normalize::detail(&payload)),
            Err(CatalogError::Rejected { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> CatalogClient {
        CatalogClient::new(parse_base_url(&format!("{}/vapi", server.url())).unwrap())
    }

    #[test]
    fn test_envelope_success_requires_code_one_and_payload() {
        assert!(Envelope::new(json!({"code": 1, "data": []})).into_payload().is_ok());
        assert!(Envelope::new(json!({"code": 1, "data": null})).into_payload().is_err());
        assert!(Envelope::new(json!({"code": 0, "data": [1]})).into_payload().is_err());
        assert!(Envelope::new(json!({"data": [1]})).into_payload().is_err());
        assert!(Envelope::new(json!([1, 2])).into_payload().is_err());
    }

    #[test]
    fn test_rejected_envelope_keeps_raw_body() {
        let err = Envelope::new(json!({"code": 2, "msg": "nope"}))
            .into_payload()
            .unwrap_err();
        assert_eq!(err.details(), Some(&json!({"code": 2, "msg": "nope"})));
    }

    #[test]
    fn test_strategy_order_and_params() {
        assert_eq!(
            LookupStrategy::ORDER,
            [LookupStrategy::PrimaryId, LookupStrategy::AlternateId]
        );
        assert_eq!(LookupStrategy::PrimaryId.query_param(), "id");
        assert_eq!(LookupStrategy::AlternateId.to_string(), "rawId");
    }

    #[tokio::test]
    async fn test_fetch_list_sends_locale_and_page_size() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/vapi/role/list")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("locale".into(), "en".into()),
                Matcher::UrlEncoded("pageSize".into(), "1000".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": 1, "data": []}).to_string())
            .create_async()
            .await;

        let envelope = client_for(&server).fetch_list().await.unwrap();
        assert!(envelope.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/vapi/role/list")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let err = client_for(&server).fetch_list().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }

    #[tokio::test]
    async fn test_lookup_detail_unknown_id_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/vapi/role/detail")
            .match_query(Matcher::UrlEncoded("id".into(), "404".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": 0, "data": null}).to_string())
            .create_async()
            .await;

        let found = client_for(&server)
            .lookup_detail(LookupStrategy::PrimaryId, "404")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_lookup_detail_uses_alternate_param() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/vapi/role/detail")
            .match_query(Matcher::UrlEncoded("rawId".into(), "elon-musk".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 1,
                    "data": {"id": 1, "attributes": {"name": "Elon Musk", "prompt": "Be bold."}}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let detail = client_for(&server)
            .lookup_detail(LookupStrategy::AlternateId, "elon-musk")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.system_prompt, "Be bold.");
        assert_eq!(detail.prompt_length, 8);
        mock.assert_async().await;
    }
}
