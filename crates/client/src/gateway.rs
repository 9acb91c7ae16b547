//! The outbound HTTP surface.

use blinks_core::ActionManifest;
use reqwest::header::ACCEPT;
use serde::Serialize;
use url::Url;

use crate::error::ClientError;
use crate::post::PostResponse;

/// Response header carrying the comma-separated CAIP-2 blockchain ids.
pub const BLOCKCHAIN_IDS_HEADER: &str = "x-blockchain-ids";

/// Response header carrying the action spec version.
pub const ACTION_VERSION_HEADER: &str = "x-action-version";

/// A fetched manifest plus its raw supportability headers.
///
/// Header values stay raw here; who defaults them differs between an
/// initial fetch (baselines) and a chain (the previous instance's values).
#[derive(Debug, Clone)]
pub struct ManifestResponse {
    /// The parsed manifest.
    pub manifest: ActionManifest,
    /// Raw `x-blockchain-ids` value, if the provider sent one.
    pub blockchain_ids: Option<String>,
    /// Raw `x-action-version` value, if the provider sent one.
    pub version: Option<String>,
}

/// HTTP gateway for manifest GETs and action POSTs.
///
/// Requests route through an optional proxy indirection
/// (`{proxy}?url=<target>`); localhost targets always go direct so local
/// development works without one.
#[derive(Debug, Clone, Default)]
pub struct HttpGateway {
    client: reqwest::Client,
    proxy: Option<Url>,
}

impl HttpGateway {
    /// Direct gateway, no proxy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway routing non-localhost requests through `proxy`.
    #[must_use]
    pub fn with_proxy(proxy: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            proxy: Some(proxy),
        }
    }

    /// The underlying client, for collaborators issuing their own requests
    /// (registry refresh, actions.json fetch).
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Where a request for `target` is actually sent.
    #[must_use]
    pub fn route(&self, target: &Url) -> Url {
        match &self.proxy {
            Some(proxy) if !is_localhost(target) => {
                let mut routed = proxy.clone();
                routed
                    .query_pairs_mut()
                    .append_pair("url", target.as_str());
                routed
            }
            _ => target.clone(),
        }
    }

    /// GET a manifest with `Accept: application/json`, capturing the
    /// supportability headers.
    pub async fn get_manifest(&self, url: &Url) -> Result<ManifestResponse, ClientError> {
        let response = self
            .client
            .get(self.route(url))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        self.read_manifest(url, response).await
    }

    /// POST to a next-action link while chaining; the response is a fresh
    /// manifest with optional supportability headers.
    pub async fn post_manifest<B: Serialize>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<ManifestResponse, ClientError> {
        let response = self
            .client
            .post(self.route(url))
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        self.read_manifest(url, response).await
    }

    /// POST a resolved component href for a transaction.
    pub async fn post_action<B: Serialize>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<PostResponse, ClientError> {
        let response = self
            .client
            .post(self.route(url))
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        Err(provider_error(url, status, response).await)
    }

    async fn read_manifest(
        &self,
        url: &Url,
        response: reqwest::Response,
    ) -> Result<ManifestResponse, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(provider_error(url, status, response).await);
        }
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let blockchain_ids = header(BLOCKCHAIN_IDS_HEADER);
        let version = header(ACTION_VERSION_HEADER);
        let manifest = response.json().await?;
        Ok(ManifestResponse {
            manifest,
            blockchain_ids,
            version,
        })
    }
}

/// Map a non-success response to a provider error when it carries a
/// `{message}` body, otherwise to a bare status error.
async fn provider_error(url: &Url, status: reqwest::StatusCode, response: reqwest::Response) -> ClientError {
    let body: Option<blinks_core::ActionError> = response.json().await.ok();
    match body {
        Some(err) => ClientError::Provider {
            status: status.as_u16(),
            message: err.message,
        },
        None => ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        },
    }
}

fn is_localhost(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost" | "127.0.0.1" | "[::1]" | "::1")
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn route_is_direct_without_a_proxy() {
        let gateway = HttpGateway::new();
        let target = Url::parse("https://provider.com/api/act").unwrap();
        assert_eq!(gateway.route(&target), target);
    }

    #[test]
    fn route_wraps_target_in_proxy_query() {
        let gateway = HttpGateway::with_proxy(Url::parse("https://proxy.example/v1").unwrap());
        let target = Url::parse("https://provider.com/api/act?x=1").unwrap();
        let routed = gateway.route(&target);
        assert_eq!(routed.host_str(), Some("proxy.example"));
        let (_, wrapped) = routed
            .query_pairs()
            .find(|(k, _)| k == "url")
            .expect("proxied route carries the target");
        assert_eq!(wrapped, "https://provider.com/api/act?x=1");
    }

    #[test]
    fn localhost_targets_bypass_the_proxy() {
        let gateway = HttpGateway::with_proxy(Url::parse("https://proxy.example/v1").unwrap());
        for target in [
            "http://localhost:3000/api/act",
            "http://127.0.0.1:3000/api/act",
        ] {
            let target = Url::parse(target).unwrap();
            assert_eq!(gateway.route(&target), target);
        }
    }
}
