use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{TrackingId, TrackingKind},
    error::ApiErrorBody,
    protocol::{
        CreatedEntry, DayEntry, EntryPayload, SleepEntry, Symptom, TokenResponse,
        TrackingEntry, TrackingListQuery, Trigger,
    },
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::ServiceError};

/// The remote tracking API, one request/response exchange per call.
#[async_trait]
pub trait TrackingService: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String, ServiceError>;
    async fn list_symptoms(&self, token: &str) -> Result<Vec<Symptom>, ServiceError>;
    async fn list_triggers(&self, token: &str) -> Result<Vec<Trigger>, ServiceError>;
    async fn list_entries(
        &self,
        token: &str,
        query: &TrackingListQuery,
    ) -> Result<Vec<TrackingEntry>, ServiceError>;
    async fn fetch_entry(
        &self,
        token: &str,
        kind: TrackingKind,
        id: TrackingId,
    ) -> Result<TrackingEntry, ServiceError>;
    async fn create_entry(
        &self,
        token: &str,
        payload: &EntryPayload,
    ) -> Result<TrackingId, ServiceError>;
    async fn update_entry(
        &self,
        token: &str,
        id: TrackingId,
        payload: &EntryPayload,
    ) -> Result<(), ServiceError>;
    async fn delete_entry(
        &self,
        token: &str,
        kind: TrackingKind,
        id: TrackingId,
    ) -> Result<(), ServiceError>;
}

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

pub struct HttpTrackingService {
    http: Client,
    base_url: Url,
}

impl HttpTrackingService {
    pub fn new(service_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(service_url, Client::new())
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Self::with_client(&settings.service_url, http)
    }

    pub fn with_client(service_url: &str, http: Client) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(service_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(service_url.to_string()));
        }
        // Relative joins replace the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.base_url.join(path)?)
    }

    fn entry_endpoint(&self, kind: TrackingKind, id: TrackingId) -> Result<Url, ServiceError> {
        self.endpoint(&format!("trackings/{}/{}", kind.as_str(), id.0))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<T, ServiceError> {
        let res = self
            .http
            .get(self.endpoint(path)?)
            .bearer_auth(token)
            .send()
            .await?;
        read_json(ensure_success(res).await?).await
    }
}

/// Converts a non-2xx response into an application failure carrying the
/// server's `detail`, when the body has one.
async fn ensure_success(res: Response) -> Result<Response, ServiceError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let detail = ApiErrorBody::parse(&body).map(|body| body.message());
    debug!(
        "tracking service: status={} detail={}",
        status.as_u16(),
        detail.as_deref().unwrap_or("-")
    );
    Err(ServiceError::Application {
        status: status.as_u16(),
        detail,
    })
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ServiceError> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ServiceError::Decode(err.to_string()))
}

#[async_trait]
impl TrackingService for HttpTrackingService {
    async fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let res = self
            .http
            .post(self.endpoint("token")?)
            .form(&LoginForm { username, password })
            .send()
            .await?;
        let body: TokenResponse = read_json(ensure_success(res).await?).await?;
        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or(ServiceError::MissingToken)
    }

    async fn list_symptoms(&self, token: &str) -> Result<Vec<Symptom>, ServiceError> {
        self.get_json(token, "trackings/symptoms").await
    }

    async fn list_triggers(&self, token: &str) -> Result<Vec<Trigger>, ServiceError> {
        self.get_json(token, "trackings/triggers").await
    }

    async fn list_entries(
        &self,
        token: &str,
        query: &TrackingListQuery,
    ) -> Result<Vec<TrackingEntry>, ServiceError> {
        let res = self
            .http
            .get(self.endpoint("trackings/me")?)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        let res = ensure_success(res).await?;
        let entries = match query.kind {
            TrackingKind::Sleep => read_json::<Vec<SleepEntry>>(res)
                .await?
                .into_iter()
                .map(TrackingEntry::Sleep)
                .collect(),
            TrackingKind::Day => read_json::<Vec<DayEntry>>(res)
                .await?
                .into_iter()
                .map(TrackingEntry::Day)
                .collect(),
        };
        Ok(entries)
    }

    async fn fetch_entry(
        &self,
        token: &str,
        kind: TrackingKind,
        id: TrackingId,
    ) -> Result<TrackingEntry, ServiceError> {
        let res = self
            .http
            .get(self.entry_endpoint(kind, id)?)
            .bearer_auth(token)
            .send()
            .await?;
        let res = ensure_success(res).await?;
        Ok(match kind {
            TrackingKind::Sleep => TrackingEntry::Sleep(read_json(res).await?),
            TrackingKind::Day => TrackingEntry::Day(read_json(res).await?),
        })
    }

    async fn create_entry(
        &self,
        token: &str,
        payload: &EntryPayload,
    ) -> Result<TrackingId, ServiceError> {
        let res = self
            .http
            .post(self.endpoint(&format!("trackings/{}", payload.kind().as_str()))?)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        let created: CreatedEntry = read_json(ensure_success(res).await?).await?;
        Ok(created.id)
    }

    async fn update_entry(
        &self,
        token: &str,
        id: TrackingId,
        payload: &EntryPayload,
    ) -> Result<(), ServiceError> {
        let res = self
            .http
            .put(self.entry_endpoint(payload.kind(), id)?)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        ensure_success(res).await?;
        Ok(())
    }

    async fn delete_entry(
        &self,
        token: &str,
        kind: TrackingKind,
        id: TrackingId,
    ) -> Result<(), ServiceError> {
        let res = self
            .http
            .delete(self.entry_endpoint(kind, id)?)
            .bearer_auth(token)
            .send()
            .await?;
        ensure_success(res).await?;
        Ok(())
    }
}

/// `GET /trackings/me` answers 404 with this detail when the user has no
/// entries of a type. Any other 404 (gateway, wrong base path) is a failure.
pub fn is_empty_listing(err: &ServiceError, kind: TrackingKind) -> bool {
    err.status() == Some(StatusCode::NOT_FOUND.as_u16())
        && err.server_detail() == Some(format!("No {kind} trackings found for this user").as_str())
}
