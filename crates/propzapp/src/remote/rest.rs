use super::RemoteTable;
use crate::error::{PropzError, Result};
use crate::identity::OwnerId;
use crate::mapping::{input_to_row, patch_to_row, row_to_property, Row, ID_COLUMN, OWNER_COLUMN};
use crate::model::{Property, PropertyInput, PropertyPatch};
use chrono::Utc;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

const REST_PATH: &str = "rest/v1";

/// A table behind a PostgREST endpoint (the hosted backend's REST API).
///
/// Requests carry the service key both as `apikey` and as a bearer token. Rows
/// are filtered with PostgREST operators (`id=eq.<id>`, `user_id=eq.<owner>`).
pub struct RestTable {
    client: Client,
    endpoint: String,
    table: String,
    api_key: Option<String>,
}

impl RestTable {
    pub fn new(
        endpoint: &str,
        table: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            table: table.to_string(),
            api_key,
        })
    }

    pub fn table_url(&self) -> String {
        format!("{}/{}/{}", self.endpoint, REST_PATH, self.table)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let apikey = HeaderValue::from_str(key)
                .map_err(|e| PropzError::Config(format!("invalid api key: {}", e)))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| PropzError::Config(format!("invalid api key: {}", e)))?;
            headers.insert("apikey", apikey);
            headers.insert(AUTHORIZATION, bearer);
        }
        Ok(headers)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.headers(self.headers()?).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .unwrap_or_else(|_| "(no body)".to_string());
        Err(PropzError::Remote {
            status: status.as_u16(),
            body,
        })
    }
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

fn first_row(rows: Vec<Row>) -> Result<Row> {
    rows.into_iter()
        .next()
        .ok_or_else(|| PropzError::Decode("insert returned no row".to_string()))
}

impl RemoteTable for RestTable {
    #[tracing::instrument(skip(self), fields(table = %self.table))]
    fn list(&self, owner: &OwnerId) -> Result<Vec<Property>> {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "*".to_string()), (OWNER_COLUMN, eq(owner.as_str()))]);
        let rows: Vec<Row> = self.send(request)?.json()?;
        rows.iter().map(row_to_property).collect()
    }

    #[tracing::instrument(skip(self), fields(table = %self.table))]
    fn get(&self, id: &str) -> Result<Option<Property>> {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "*".to_string()), (ID_COLUMN, eq(id))]);
        let rows: Vec<Row> = self.send(request)?.json()?;
        rows.first().map(row_to_property).transpose()
    }

    #[tracing::instrument(skip(self, input), fields(table = %self.table))]
    fn insert(&self, owner: &OwnerId, input: &PropertyInput) -> Result<Property> {
        let row = input_to_row(owner.as_str(), input)?;
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&row);
        let rows: Vec<Row> = self.send(request)?.json()?;
        row_to_property(&first_row(rows)?)
    }

    #[tracing::instrument(skip(self, patch), fields(table = %self.table))]
    fn update(&self, id: &str, patch: &PropertyPatch) -> Result<()> {
        let row = patch_to_row(patch, Utc::now())?;
        let request = self
            .client
            .patch(self.table_url())
            .query(&[(ID_COLUMN, eq(id))])
            .json(&row);
        self.send(request)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(table = %self.table))]
    fn delete(&self, id: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.table_url())
            .query(&[(ID_COLUMN, eq(id))]);
        self.send(request)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.table_url()
    }
}
