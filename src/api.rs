use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, ClientResult},
    model::{DownloadRequest, InfoRequest, InfoResponse, VideoInfo},
};

/// HTTP client for the `/info` and `/download` endpoints of the backend.
#[derive(Clone, Debug)]
pub struct BackendClient {
    base: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, http: Client::new() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolves a video URL into its title and available resolutions.
    ///
    /// The backend answers errors with a 4xx status *and* an `error` body, so the
    /// status code is not consulted; the body decides.
    pub async fn fetch_info(&self, url: &str) -> ClientResult<VideoInfo> {
        info!(%url, "requesting video info");
        let res = self
            .http
            .post(format!("{}/info", self.base))
            .json(&InfoRequest { url: url.to_string() })
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;
        let parsed: InfoResponse = serde_json::from_slice(&body)?;

        if let Some(err) = parsed.error {
            warn!(%status, error = %err, "backend rejected info request");
            return Err(ClientError::Service(err));
        }

        let resolutions = parsed
            .resolutions
            .ok_or_else(|| ClientError::malformed("response has no resolutions"))?;
        let title = parsed.title.unwrap_or_default();
        debug!(%title, ?resolutions, "video info received");

        Ok(VideoInfo { title, resolutions })
    }

    /// Fetches the encoded media for the requested mode and height.
    pub async fn download(&self, req: &DownloadRequest) -> ClientResult<Vec<u8>> {
        info!(url = %req.url, mode = ?req.mode, height = ?req.height, "requesting download");
        let res = self
            .http
            .post(format!("{}/download", self.base))
            .json(req)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            warn!(%status, %detail, "download rejected by backend");
            return Err(ClientError::DownloadFailed { status });
        }

        let data = res.bytes().await?;
        debug!(bytes = data.len(), "download body received");
        Ok(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DownloadMode;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn info_success_keeps_resolution_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(body_json(json!({"url": "https://youtube.com/watch?v=abc"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"title": "Sample", "resolutions": ["360", "720", "1080"]}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let info = client.fetch_info("https://youtube.com/watch?v=abc").await.unwrap();
        assert_eq!(info.title, "Sample");
        assert_eq!(info.resolutions, vec!["360", "720", "1080"]);
    }

    #[tokio::test]
    async fn info_error_field_wins_over_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid url"})))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client.fetch_info("nope").await.unwrap_err();
        assert!(matches!(err, ClientError::Service(ref m) if m == "invalid url"));
    }

    #[tokio::test]
    async fn info_non_json_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client.fetch_info("https://youtube.com/watch?v=abc").await.unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }

    #[tokio::test]
    async fn info_without_resolutions_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Sample"})))
            .mount(&server)
            .await;

        let client = BackendClient::new(format!("{}/", server.uri()));
        let err = client.fetch_info("https://youtube.com/watch?v=abc").await.unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[tokio::test]
    async fn download_returns_exact_body() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/download"))
            .and(body_json(json!({
                "url": "https://youtube.com/watch?v=abc",
                "mode": "resolution",
                "height": "720"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let req = DownloadRequest {
            url: "https://youtube.com/watch?v=abc".into(),
            mode: DownloadMode::Resolution,
            height: Some("720".into()),
        };
        assert_eq!(client.download(&req).await.unwrap(), payload);
    }

    #[tokio::test]
    async fn download_failure_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/download"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "ffmpeg exploded"})),
            )
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let req = DownloadRequest {
            url: "https://youtube.com/watch?v=abc".into(),
            mode: DownloadMode::Quick,
            height: None,
        };
        let err = client.download(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "Download failed");
        assert!(matches!(
            err,
            ClientError::DownloadFailed { status } if status.as_u16() == 500
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Nothing listens on port 1.
        let client = BackendClient::new("http://127.0.0.1:1");
        let err = client.fetch_info("https://youtube.com/watch?v=abc").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
