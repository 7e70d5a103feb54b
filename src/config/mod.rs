use anyhow::{bail, Result};
use std::env;

/// Overrides the base URL derived from the instance name. Used by tests and
/// nonstandard deployments; normal Rundeck jobs never set it.
const API_URL_VAR: &str = "RD_OPTION_SNOW_API_URL";

/// ServiceNow credentials handed to the job as Rundeck option variables.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
    base_url: String,
}

impl Credentials {
    /// Reads the five required `RD_OPTION_SNOW_*` variables. An unset or
    /// empty variable counts as missing, and every missing name is reported
    /// in one error so a misconfigured job fails before any network call.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match env::var(name) {
            Ok(value) if !value.is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let instance = read("RD_OPTION_SNOW_INSTANCE");
        let username = read("RD_OPTION_SNOW_USERNAME");
        let password = read("RD_OPTION_SNOW_PASSWORD");
        let client_id = read("RD_OPTION_SNOW_CLIENT_ID");
        let client_secret = read("RD_OPTION_SNOW_CLIENT_SECRET");

        if !missing.is_empty() {
            bail!("Missing required Rundeck variables: {}", missing.join(", "));
        }

        let base_url = env::var(API_URL_VAR)
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("https://{}.service-now.com", instance));

        Ok(Credentials {
            username,
            password,
            client_id,
            client_secret,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
