use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use ureq::Agent;

use super::{ListQuery, ListSource};
use crate::config::SiteSettings;
use crate::error::{MatrixError, Result};

const GET_LIST_PATH: &str = "/api/method/frappe.client.get_list";

/// Envelope of a whitelisted method response.
#[derive(Debug, Deserialize)]
struct MethodResponse {
    #[serde(default)]
    message: Option<Vec<Value>>,
}

/// Blocking HTTP client for a Frappe site.
pub struct FrappeClient {
    agent: Agent,
    base_url: String,
    auth: Option<String>,
}

impl FrappeClient {
    pub fn new(site: &SiteSettings) -> Result<Self> {
        let base_url = site.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(MatrixError::NoSite);
        }

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(site.timeout_secs)))
            .build()
            .into();

        Ok(Self {
            agent,
            base_url,
            auth: site.auth_token(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GET_LIST_PATH)
    }
}

impl ListSource for FrappeClient {
    fn get_list(&self, query: &ListQuery) -> Result<Vec<Value>> {
        let url = self.endpoint();
        let payload = query.to_body().to_string();

        log::debug!(
            "get_list {} ({} clause(s), limit {})",
            query.doctype,
            query.filters.len(),
            query.limit
        );

        let mut request = self
            .agent
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        if let Some(token) = &self.auth {
            request = request.header("Authorization", token.as_str());
        }

        let body = request
            .send(payload.as_str())
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|source| MatrixError::Http {
                url: url.clone(),
                source,
            })?;

        decode_message(&query.doctype, &body)
    }
}

/// Pull the row array out of a `{"message": [...]}` body; a missing message is no rows.
pub(crate) fn decode_message(doctype: &str, body: &str) -> Result<Vec<Value>> {
    let parsed: MethodResponse = serde_json::from_str(body).map_err(|e| MatrixError::Decode {
        doctype: doctype.to_string(),
        reason: e.to_string(),
    })?;
    Ok(parsed.message.unwrap_or_default())
}
