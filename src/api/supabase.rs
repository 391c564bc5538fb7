//! Implements the `Store` trait against a hosted Supabase project using its REST interface.

use crate::api::{Order, Store, TRANSACTIONS};
use crate::model::{NewTransaction, Transaction};
use crate::{Config, Result};
use anyhow::{bail, Context};
use reqwest::{RequestBuilder, Response};
use tracing::trace;
use url::Url;

/// Talks to `{store_url}/rest/v1/transactions`, authenticating every request with the API key.
pub struct SupabaseStore {
    client: reqwest::Client,
    table_url: Url,
    api_key: String,
}

impl SupabaseStore {
    /// Reads the API key and resolves the table URL from `config`.
    pub async fn new(config: &Config) -> Result<Self> {
        let api_key = config.api_key().await?;
        Self::with_key(config.store_url(), api_key)
    }

    /// Creates a store for `store_url` using an API key that has already been read.
    pub fn with_key(store_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            table_url: table_url(store_url)?,
            api_key: api_key.into(),
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait::async_trait]
impl Store for SupabaseStore {
    async fn fetch_all(&mut self, order: Order) -> Result<Vec<Transaction>> {
        let mut query = vec![("select", "*")];
        if order == Order::DateDescending {
            query.push(("order", "date.desc"));
        }
        trace!("GET {} {query:?}", self.table_url);

        let response = self
            .authorize(self.client.get(self.table_url.clone()))
            .query(&query)
            .send()
            .await
            .context("Failed to send the fetch request to the store")?;
        let response = check(response, "fetch").await?;

        response
            .json::<Vec<Transaction>>()
            .await
            .context("Failed to parse the transactions returned by the store")
    }

    async fn insert(&mut self, transaction: &NewTransaction) -> Result<()> {
        trace!("POST {} {transaction:?}", self.table_url);
        let response = self
            .authorize(self.client.post(self.table_url.clone()))
            .header("Prefer", "return=minimal")
            .json(&[transaction])
            .send()
            .await
            .context("Failed to send the insert request to the store")?;
        check(response, "insert").await?;
        Ok(())
    }
}

/// Turns a non-success status into an error that carries the status and the response body.
async fn check(response: Response, what: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    bail!("The store {what} failed with status {status}: {body}")
}

fn table_url(store_url: &str) -> Result<Url> {
    let base = format!("{}/", store_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|u| u.join(&format!("rest/v1/{TRANSACTIONS}")))
        .with_context(|| format!("Invalid store URL '{store_url}'"))
}
