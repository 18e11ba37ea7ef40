//! Writer for the Google Sheets `values.update` endpoint.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use gcp_auth::{CustomServiceAccount, TokenProvider};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde_json::Value;

use seodiff_core::AppConfig;

use crate::error::{truncate_body, ReportError};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Unreserved characters stay literal; everything else in a range (`!`,
/// spaces, non-ASCII sheet names) is percent-encoded.
const RANGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// How [`SheetsClient`] authenticates its requests.
pub enum SheetsCredentials {
    /// A bearer token minted elsewhere, sent as is.
    AccessToken(String),
    /// A service-account key; tokens are minted on demand and cached until expiry.
    ServiceAccount(Box<CustomServiceAccount>),
}

impl SheetsCredentials {
    /// Loads a service-account JSON key file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Auth`] if the file cannot be read or is not a
    /// valid service-account key.
    pub fn service_account_file(path: &Path) -> Result<Self, ReportError> {
        let account = CustomServiceAccount::from_file(path)?;
        Ok(Self::ServiceAccount(Box::new(account)))
    }

    async fn bearer_token(&self) -> Result<String, ReportError> {
        match self {
            Self::AccessToken(token) => Ok(token.clone()),
            Self::ServiceAccount(account) => {
                let token = account.token(&[SHEETS_SCOPE]).await?;
                Ok(token.as_str().to_owned())
            }
        }
    }
}

impl fmt::Debug for SheetsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken(_) => f.write_str("AccessToken([redacted])"),
            Self::ServiceAccount(_) => f.write_str("ServiceAccount([redacted])"),
        }
    }
}

/// Overwrites sheet ranges of one spreadsheet.
///
/// Use [`SheetsClient::new`] for production or [`SheetsClient::with_base_url`]
/// to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    spreadsheet_id: String,
    credentials: SheetsCredentials,
    base_url: Url,
}

impl SheetsClient {
    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        spreadsheet_id: &str,
        credentials: SheetsCredentials,
        timeout_secs: u64,
    ) -> Result<Self, ReportError> {
        Self::with_base_url(spreadsheet_id, credentials, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Builds a client from the spreadsheet id and credentials in `config`.
    ///
    /// A service-account key file takes precedence over a plain access token.
    ///
    /// # Errors
    ///
    /// - [`ReportError::MissingConfig`] naming the unset variable(s).
    /// - [`ReportError::Auth`] if the service-account key cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReportError> {
        let spreadsheet_id = config
            .spreadsheet_id
            .as_deref()
            .ok_or(ReportError::MissingConfig("SEODIFF_SPREADSHEET_ID"))?;
        let credentials = match (&config.service_account_path, &config.sheets_access_token) {
            (Some(path), _) => SheetsCredentials::service_account_file(path)?,
            (None, Some(token)) => SheetsCredentials::AccessToken(token.clone()),
            (None, None) => {
                return Err(ReportError::MissingConfig(
                    "SEODIFF_SERVICE_ACCOUNT_PATH or SEODIFF_SHEETS_ACCESS_TOKEN",
                ))
            }
        };
        Self::new(spreadsheet_id, credentials, config.request_timeout_secs)
    }

    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ReportError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        spreadsheet_id: &str,
        credentials: SheetsCredentials,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ReportError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.to_owned(),
            credentials,
            base_url,
        })
    }

    fn update_url(&self, range: &str) -> Result<Url, ReportError> {
        let path = format!(
            "v4/spreadsheets/{}/values/{}",
            utf8_percent_encode(&self.spreadsheet_id, RANGE_ENCODE_SET),
            utf8_percent_encode(range, RANGE_ENCODE_SET),
        );
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| ReportError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        Ok(url)
    }

    /// Writes `values` into `sheet_name` starting at `A1`, replacing whatever
    /// those cells held.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Auth`] if a service-account token cannot be minted.
    /// - [`ReportError::Http`] on network failure.
    /// - [`ReportError::UnexpectedStatus`] on any non-2xx response.
    pub async fn overwrite(
        &self,
        sheet_name: &str,
        values: &[Vec<Value>],
    ) -> Result<(), ReportError> {
        let token = self.credentials.bearer_token().await?;
        let range = format!("{sheet_name}!A1");
        let url = self.update_url(&range)?;
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        let response = self
            .client
            .put(url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ReportError::UnexpectedStatus {
                service: "Google Sheets",
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        tracing::info!(sheet = sheet_name, rows = values.len(), "sheet updated");
        Ok(())
    }
}
