//! A blocking HTTP client that lists records from the Airtable REST API.
use chrono::{DateTime, Utc};
use reqwest::{header, StatusCode, Url};
use serde::Deserialize;

use crate::{
    store::{Page, Pages, RecordStore},
    Error, FlagRecord, Result,
};

/// [`RecordStore`] backed by an Airtable base.
///
/// Records are listed with `GET {base_url}/{base_id}/{table}`; Airtable returns them in pages of
/// up to 100 and hands out an `offset` token as long as more pages remain.
pub struct AirtableStore {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::blocking::Client,
    base_url: Url,
    api_key: String,
    base_id: String,
}

/// Body of a "list records" response.
///
/// Rows are kept undecoded so that a single malformed row can be dropped without failing the
/// whole page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListRecordsResponse {
    records: Vec<serde_json::Value>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AirtableRecord {
    id: String,
    #[serde(default)]
    created_time: Option<DateTime<Utc>>,
    #[serde(default = "empty_fields")]
    fields: FlagRecord,
}

fn empty_fields() -> FlagRecord {
    FlagRecord::new("", false, crate::FlagValue::Absent)
}

impl From<AirtableRecord> for FlagRecord {
    fn from(record: AirtableRecord) -> Self {
        FlagRecord {
            id: Some(record.id),
            created_time: record.created_time,
            ..record.fields
        }
    }
}

impl AirtableStore {
    pub(crate) fn new(
        base_url: &str,
        api_key: impl Into<String>,
        base_id: impl Into<String>,
    ) -> Result<AirtableStore> {
        let base_url = Url::parse(base_url).map_err(Error::InvalidBaseUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        Ok(AirtableStore {
            client: reqwest::blocking::Client::new(),
            base_url,
            api_key: api_key.into(),
            base_id: base_id.into(),
        })
    }

    fn table_url(&self, table: &str, offset: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?
            .pop_if_empty()
            .extend([self.base_id.as_str(), table]);
        if let Some(offset) = offset {
            url.query_pairs_mut().append_pair("offset", offset);
        }
        Ok(url)
    }

    fn fetch_page(&self, table: &str, offset: Option<&str>) -> Result<ListRecordsResponse> {
        let url = self.table_url(table, offset)?;

        log::debug!(target: "airtable_flags", table, offset; "fetching page of flag records");
        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()?;

        let response = response.error_for_status().map_err(|err| match err.status() {
            Some(StatusCode::UNAUTHORIZED) => {
                log::warn!(target: "airtable_flags", "store rejected the access token");
                Error::Unauthorized
            }
            Some(StatusCode::NOT_FOUND) => Error::TableNotFound(table.to_owned()),
            Some(status) => Error::StoreFetch(format!("received {status} while listing {table}")),
            None => Error::from(err),
        })?;

        let body = response.text()?;
        serde_json::from_str(&body)
            .map_err(|err| Error::StoreFetch(format!("malformed records page: {err}")))
    }
}

impl RecordStore for AirtableStore {
    fn pages(&self, table: &str) -> Pages<'_> {
        Box::new(AirtablePages {
            store: self,
            table: table.to_owned(),
            offset: None,
            done: false,
        })
    }
}

/// Iterator that follows Airtable's `offset` continuation tokens.
struct AirtablePages<'a> {
    store: &'a AirtableStore,
    table: String,
    offset: Option<String>,
    done: bool,
}

impl Iterator for AirtablePages<'_> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.store.fetch_page(&self.table, self.offset.as_deref()) {
            Ok(response) => {
                self.done = response.offset.is_none();
                self.offset = response.offset;
                Some(Ok(into_page(response.records)))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Decode the rows of a page, skipping rows that do not describe a flag.
fn into_page(rows: Vec<serde_json::Value>) -> Page {
    rows.into_iter()
        .filter_map(|row| {
            let record_id = row.get("id").and_then(|id| id.as_str()).map(str::to_owned);
            match serde_json::from_value::<AirtableRecord>(row) {
                Ok(record) => Some(FlagRecord::from(record)),
                Err(err) => {
                    log::warn!(target: "airtable_flags",
                               record_id = record_id.as_deref();
                               "skipping malformed flag record: {}", err);
                    None
                }
            }
        })
        .collect()
}
