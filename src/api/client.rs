use crate::config::Credentials;
use crate::models::{ChangeRequest, Incident};
use anyhow::{anyhow, Context, Result};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const CHANGE_FIELDS: &str = "number,short_description,description,type,state,phase,risk,\
    priority,start_date,end_date,approval,requested_by,assignment_group";
const INCIDENT_FIELDS: &str = "number,short_description";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TableResponse<T> {
    result: Vec<T>,
}

/// Filter knobs for a table query, rendered into `sysparm_query`.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub assignment_group: String,
    pub state: String,
    pub limit: u32,
}

impl QueryOptions {
    fn sysparm_query(&self) -> String {
        format!(
            "active=true^state={}^assignment_group={}",
            self.state, self.assignment_group
        )
    }
}

#[derive(Debug, Clone)]
pub struct SnowClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl SnowClient {
    /// Exchanges the Rundeck credentials for a bearer token via the password
    /// grant. Transport errors and non-2xx responses are terminal; the token
    /// is held for the lifetime of the process, with no refresh.
    pub async fn authenticate(credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let token_url = format!("{}/oauth_token.do", credentials.base_url());
        debug!(%token_url, "requesting OAuth token");

        let form = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = client
            .post(&token_url)
            .form(&form)
            .send()
            .await
            .context("Error getting token")?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Error getting token: {} - {}", status, body_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        Ok(Self {
            client,
            base_url: credentials.base_url().to_string(),
            access_token: token.access_token,
        })
    }

    pub async fn list_change_requests(&self, options: &QueryOptions) -> Result<Vec<ChangeRequest>> {
        self.fetch_table("change_request", CHANGE_FIELDS, options)
            .await
    }

    pub async fn list_incidents(&self, options: &QueryOptions) -> Result<Vec<Incident>> {
        self.fetch_table("incident", INCIDENT_FIELDS, options).await
    }

    async fn fetch_table<T: DeserializeOwned>(
        &self,
        table: &str,
        fields: &str,
        options: &QueryOptions,
    ) -> Result<Vec<T>> {
        let url = format!("{}/api/now/table/{}", self.base_url, table);
        let query = options.sysparm_query();
        let limit = options.limit.to_string();
        debug!(%url, %query, %limit, "querying table");

        let response = self
            .client
            .get(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.access_token),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .query(&[
                ("sysparm_query", query.as_str()),
                ("sysparm_limit", limit.as_str()),
                ("sysparm_fields", fields),
            ])
            .send()
            .await
            .with_context(|| format!("Error getting {} records", table))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Error getting {} records: {} - {}",
                table,
                status,
                body_text
            ));
        }

        let data: TableResponse<T> = response.json().await.context("Failed to parse response")?;
        Ok(data.result)
    }
}
