//! HTTP implementation of the backend API
//!
//! Speaks the inventory backend's REST+JSON dialect: trailing-slash routes,
//! token auth, decimal fields as strings, and list responses that are either
//! page envelopes or bare arrays.

use reqwest::{multipart, Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{EffectiveRate, ListResponse, Party, ProgramDraft, QualityType, RateSource, StockLot};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{primary_message, ClientError, ClientResult};

use super::{ProgramApi, ProgramRef};

/// REST client for the inventory backend
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

/// Rate endpoint response
#[derive(Debug, Deserialize)]
struct RateBody {
    rate: Decimal,
    source: RateSource,
}

/// Program create/update request body
#[derive(Debug, Serialize)]
struct ProgramPayload<'a> {
    design_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    challan_no: Option<&'a str>,
    input_meters: Decimal,
    output_meters: Decimal,
    rate_per_meter: Decimal,
    tax_amount: Decimal,
    notes: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    lot_allocations: Vec<AllocationPayload>,
}

#[derive(Debug, Serialize)]
struct AllocationPayload {
    lot_id: Uuid,
    allocated_meters: Decimal,
}

impl<'a> ProgramPayload<'a> {
    /// Shape a draft the way the backend expects it. Absent numbers go out
    /// as zero; `status` is only sent on update.
    fn from_draft(draft: &'a ProgramDraft, include_status: bool) -> Self {
        Self {
            design_number: &draft.design_number,
            challan_no: draft.challan_no.as_deref(),
            input_meters: draft.input_meters,
            output_meters: draft.output_meters.unwrap_or(Decimal::ZERO),
            rate_per_meter: draft.rate_per_meter.unwrap_or(Decimal::ZERO),
            tax_amount: draft.tax_amount,
            notes: &draft.notes,
            status: include_status.then(|| draft.status.as_str()),
            lot_allocations: draft
                .allocations
                .iter()
                .filter_map(|row| {
                    row.lot_id.map(|lot_id| AllocationPayload {
                        lot_id,
                        allocated_meters: row.allocated_meters,
                    })
                })
                .collect(),
        }
    }
}

impl HttpApi {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth_token: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.header("Authorization", format!("Token {}", token)),
            None => builder,
        }
    }

    /// Turn a non-success response into the one error line the form shows
    async fn read_error(response: Response, fallback: &str) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let parsed: serde_json::Value =
            serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        let message = primary_message(&parsed, fallback);
        tracing::warn!(status, %message, "backend rejected request");
        ClientError::Api { status, message }
    }

    async fn fetch_items<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> ClientResult<Vec<T>> {
        let response = self.authorize(request).send().await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response, fallback).await);
        }
        let items: ListResponse<T> = response.json().await?;
        Ok(items.into_items())
    }

    async fn save_program(
        &self,
        request: RequestBuilder,
        payload: &ProgramPayload<'_>,
        fallback: &str,
    ) -> ClientResult<ProgramRef> {
        let response = self.authorize(request).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response, fallback).await);
        }
        Ok(response.json().await?)
    }
}

impl ProgramApi for HttpApi {
    async fn list_parties(&self) -> ClientResult<Vec<Party>> {
        let request = self.client.get(self.url("/parties/"));
        self.fetch_items(request, "Failed to load parties").await
    }

    async fn list_quality_types(&self) -> ClientResult<Vec<QualityType>> {
        let request = self.client.get(self.url("/quality-types/"));
        self.fetch_items(request, "Failed to load quality types")
            .await
    }

    async fn list_all_lots(&self) -> ClientResult<Vec<StockLot>> {
        // The full snapshot feeds edit mode; one page is plenty at mill scale
        let request = self
            .client
            .get(self.url("/inward-lots/"))
            .query(&[("page_size", "100")]);
        self.fetch_items(request, "Failed to load lots").await
    }

    async fn list_available_lots(&self, min_balance: Decimal) -> ClientResult<Vec<StockLot>> {
        let request = self
            .client
            .get(self.url("/inward-lots/available_lots/"))
            .query(&[("min_balance", min_balance.to_string())]);
        self.fetch_items(request, "Failed to load available lots")
            .await
    }

    async fn get_effective_rate(
        &self,
        party_id: Uuid,
        quality_id: Uuid,
    ) -> ClientResult<Option<EffectiveRate>> {
        let request = self.client.get(self.url("/rates/party-quality/")).query(&[
            ("party_id", party_id.to_string()),
            ("quality_type_id", quality_id.to_string()),
        ]);
        let response = self.authorize(request).send().await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::read_error(response, "Failed to resolve rate").await);
        }

        let body: RateBody = response.json().await?;
        Ok(Some(EffectiveRate {
            rate: body.rate,
            source: body.source,
        }))
    }

    async fn create_program(&self, draft: &ProgramDraft) -> ClientResult<ProgramRef> {
        let payload = ProgramPayload::from_draft(draft, false);
        let request = self.client.post(self.url("/programs/"));
        self.save_program(request, &payload, "Failed to create program")
            .await
    }

    async fn update_program(&self, id: Uuid, draft: &ProgramDraft) -> ClientResult<ProgramRef> {
        let payload = ProgramPayload::from_draft(draft, true);
        let request = self.client.put(self.url(&format!("/programs/{}/", id)));
        self.save_program(request, &payload, "Failed to update program")
            .await
    }

    async fn upload_design_photo(
        &self,
        id: Uuid,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<()> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("photo", part);
        let request = self
            .client
            .post(self.url(&format!("/programs/{}/upload-photo/", id)))
            .multipart(form);

        let response = self.authorize(request).send().await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response, "Failed to upload design photo").await);
        }
        Ok(())
    }
}
