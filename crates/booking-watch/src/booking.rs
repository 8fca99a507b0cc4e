//! Client for the alteg.io booking dates endpoint.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Request};
use serde::Deserialize;

use crate::config::{required, Settings};
use crate::error::{WatchError, WatchResult};

const API_ACCEPT: &str = "application/vnd.api.v2+json";

/// What the booking API reported for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Dates currently open for booking, in the order the API returned them
    Dates(Vec<String>),
    /// The API answered with `success: false`; nothing should be compared or stored
    Rejected,
}

/// Source of the currently available dates
#[async_trait]
pub trait DateSource: Send + Sync {
    async fn fetch_dates(&self) -> WatchResult<FetchOutcome>;
}

#[derive(Debug, Deserialize)]
struct BookingResponse {
    success: bool,
    #[serde(default)]
    data: Option<BookingData>,
}

#[derive(Debug, Deserialize)]
struct BookingData {
    booking_dates: Vec<String>,
}

impl BookingResponse {
    fn into_outcome(self) -> anyhow::Result<FetchOutcome> {
        if !self.success {
            return Ok(FetchOutcome::Rejected);
        }

        let data = self
            .data
            .context("Successful response is missing data.booking_dates")?;
        Ok(FetchOutcome::Dates(data.booking_dates))
    }
}

/// Request parameters resolved from settings
#[derive(Debug, Clone, PartialEq, Eq)]
struct BookingRequest {
    url: String,
    api_key: String,
    staff_id: String,
    service_id: String,
}

impl BookingRequest {
    fn from_settings(settings: &Settings) -> WatchResult<Self> {
        let base_url = required(&settings.altegio_api_url, "ALTEGIO_API_URL")?;
        let company_id = required(&settings.altegio_company_id, "ALTEGIO_COMPANY_ID")?;

        Ok(Self {
            url: format!("{}{}", base_url, company_id),
            api_key: required(&settings.altegio_api_key, "ALTEGIO_API_KEY")?.to_string(),
            staff_id: required(&settings.altegio_staff_id, "ALTEGIO_STAFF_ID")?.to_string(),
            service_id: required(&settings.altegio_service_id, "ALTEGIO_SERVICE_ID")?
                .to_string(),
        })
    }

    fn query(&self, date_from: NaiveDate) -> [(&'static str, String); 3] {
        [
            ("staff_id", self.staff_id.clone()),
            ("service_ids[]", self.service_id.clone()),
            ("date_from", date_from.format("%Y-%m-%d").to_string()),
        ]
    }
}

pub struct BookingClient {
    http: Client,
    settings: Settings,
}

impl BookingClient {
    pub fn new(settings: Settings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    fn build(&self, request: &BookingRequest, today: NaiveDate) -> reqwest::Result<Request> {
        self.http
            .get(&request.url)
            .bearer_auth(&request.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, API_ACCEPT)
            .query(&request.query(today))
            .build()
    }

    async fn request(&self, request: &BookingRequest) -> anyhow::Result<FetchOutcome> {
        let http_request = self
            .build(request, Local::now().date_naive())
            .context("Failed to build booking dates request")?;

        let response = self
            .http
            .execute(http_request)
            .await
            .context("Failed to send booking dates request")?;

        let body: BookingResponse = response
            .json()
            .await
            .context("Failed to decode booking dates response")?;

        body.into_outcome()
    }
}

#[async_trait]
impl DateSource for BookingClient {
    async fn fetch_dates(&self) -> WatchResult<FetchOutcome> {
        let request = BookingRequest::from_settings(&self.settings).inspect_err(|e| {
            tracing::error!("Cannot query alteg.io API: {:?}", e);
        })?;

        match self.request(&request).await {
            Ok(FetchOutcome::Rejected) => {
                tracing::error!("Failed to query data from alteg.io API!");
                Ok(FetchOutcome::Rejected)
            }
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!("An error occurred while making the web requests: {:?}", e);
                Err(WatchError::fetch(e))
            }
        }
    }
}
