use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

/// Body of gateway responses that carry no payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:8080/api/hmtpk`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, reqwest::Error> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
    }

    pub async fn groups(&self) -> Result<Response, reqwest::Error> {
        self.post("/groups", &[]).await
    }

    pub async fn teachers(&self) -> Result<Response, reqwest::Error> {
        self.post("/teachers", &[]).await
    }

    /// Schedule of a group; `date` is `DD.MM.YYYY`, today when `None`.
    pub async fn schedule_by_group(
        &self,
        key: &str,
        group: &str,
        date: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut query = vec![("key", key), ("group", group)];
        if let Some(date) = date {
            query.push(("date", date));
        }
        self.post("/schedule", &query).await
    }

    /// Schedule of a teacher; `date` is `DD.MM.YYYY`, today when `None`.
    pub async fn schedule_by_teacher(
        &self,
        key: &str,
        teacher: &str,
        date: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut query = vec![("key", key), ("teacher", teacher)];
        if let Some(date) = date {
            query.push(("date", date));
        }
        self.post("/schedule", &query).await
    }

    pub async fn announces(&self, page: &str) -> Result<Response, reqwest::Error> {
        self.post("/announces", &[("page", page)]).await
    }

    /// Decode an error response body.
    pub async fn envelope(response: Response) -> Result<Envelope, reqwest::Error> {
        response.json().await
    }
}
