use chrono::NaiveDate;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::{Result, StrideError};
use crate::transport::ApiRequest;
use crate::types::{StepEntry, SyncSummary};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct StepService {
    client: ApiClient,
}

#[derive(Serialize)]
struct SyncBody<'a> {
    entries: &'a [StepEntry],
}

impl StepService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Upload daily step counts collected on the device.
    pub async fn sync(&self, entries: &[StepEntry]) -> Result<SyncSummary> {
        if entries.is_empty() {
            return Err(StrideError::InvalidArgument(
                "no step entries to sync".to_string(),
            ));
        }
        self.client
            .send_json(ApiRequest::post("/steps").json(&SyncBody { entries })?)
            .await
    }

    /// Step counts for the inclusive date range.
    pub async fn history(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<StepEntry>> {
        if from > to {
            return Err(StrideError::InvalidArgument(format!(
                "range start {from} is after end {to}"
            )));
        }
        let request = ApiRequest::get("/steps")
            .query("from", from.format(DATE_FORMAT))
            .query("to", to.format(DATE_FORMAT));
        self.client.send_json(request).await
    }

    pub async fn today(&self) -> Result<StepEntry> {
        self.client.send_json(ApiRequest::get("/steps/today")).await
    }
}
