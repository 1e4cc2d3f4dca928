// src/app/api.rs
// Handles interactions with the annotation server: defines request/response structs and
// async functions for API calls (list models, list users, capabilities, delete).

use crate::app::config::Config;
use crate::app::state::UpdateMessage;
use chrono::DateTime;
use chrono_tz::Tz;
use log::{debug, error, warn};
use reqwest;
use serde::Deserialize;
use std::sync::mpsc::Sender;

// --- Annotation Server API Structures ---

/// A model known to the annotation server.
///
/// `id` is present for models uploaded by a registered user and absent for
/// models integrated into the platform; nothing else distinguishes the two
/// categories on the wire.
#[derive(Deserialize, Debug, Clone)]
pub struct Model {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub framework: Option<String>,
    /// User id of the uploader; absent for integrated models.
    #[serde(default)]
    pub owner: Option<u64>,
    /// Original timestamp string from the server (RFC 3339).
    #[serde(default)]
    pub uploaded_at: Option<String>,

    // Populated locally after fetching
    #[serde(skip)]
    pub uploaded_local: Option<String>,
}

/// A registered user of the annotation platform.
#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
}

/// Installed-capability flags reported by the server.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Capabilities {
    pub auto_annotation: bool,
    pub tf_annotation: bool,
    pub tf_segmentation: bool,
}

/// Response structure of the `/api/models` endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct ModelsResponse {
    pub models: Vec<Model>,
}

/// Response structure of the `/api/users` endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Ensures the configured host carries an http(s) scheme.
fn base_url(config: &Config) -> String {
    if config.server_host.starts_with("http://") || config.server_host.starts_with("https://") {
        config.server_host.clone()
    } else {
        format!("http://{}", config.server_host)
    }
}

// --- Async Operations ---

/// Asynchronously fetches the list of models from the annotation server using `/api/models`.
/// Localizes the upload timestamp of each model for display.
pub async fn list_models_async(
    config: &Config,
    sender: Sender<UpdateMessage>,
) -> Result<Vec<Model>, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();
    let url = format!("{}/api/models", base_url(config));
    debug!("Sending list request to {}", url);
    let _ = sender.send(UpdateMessage::Log(format!(
        "DEBUG: Sending list models request to {}",
        url
    )));

    let res = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("Network request failed for {}: {}", url, e))?;

    let status_code = res.status();
    if !status_code.is_success() {
        let error_body = res
            .text()
            .await
            .unwrap_or_else(|_| "Unknown server error".to_string());
        error!(
            "Annotation server at {} returned error status {}: {}",
            url, status_code, error_body
        );
        let log_msg = format!(
            "ERROR listing models: Server returned error status {}: {}",
            status_code, error_body
        );
        let _ = sender.send(UpdateMessage::Log(log_msg));
        return Err(format!("Server error ({}) from {}: {}", status_code, url, error_body).into());
    }

    let mut response_body: ModelsResponse = res
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON response from {}: {}", url, e))?;

    let local_tz: Tz = config.tz;
    for model in response_body.models.iter_mut() {
        model.uploaded_local =
            localize_timestamp(model.uploaded_at.as_deref(), local_tz, &model.name);
    }
    Ok(response_body.models)
}

/// Asynchronously fetches the registered users from the annotation server using `/api/users`.
pub async fn list_users_async(
    config: &Config,
) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();
    let url = format!("{}/api/users", base_url(config));
    debug!("Sending users request to {}", url);

    let res = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("Network request failed for {}: {}", url, e))?;

    let status_code = res.status();
    if !status_code.is_success() {
        let error_body = res
            .text()
            .await
            .unwrap_or_else(|_| "Unknown server error".to_string());
        return Err(format!("Server error ({}) from {}: {}", status_code, url, error_body).into());
    }

    let response_body: UsersResponse = res
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON response from {}: {}", url, e))?;
    Ok(response_body.users)
}

/// Asynchronously fetches the installed-capability flags using `/api/capabilities`.
pub async fn capabilities_async(
    config: &Config,
) -> Result<Capabilities, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();
    let url = format!("{}/api/capabilities", base_url(config));
    debug!("Sending capabilities request to {}", url);

    let res = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("Network request failed for {}: {}", url, e))?;

    let status_code = res.status();
    if !status_code.is_success() {
        let error_body = res
            .text()
            .await
            .unwrap_or_else(|_| "Unknown server error".to_string());
        return Err(format!("Server error ({}) from {}: {}", status_code, url, error_body).into());
    }

    let caps: Capabilities = res
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON response from {}: {}", url, e))?;
    Ok(caps)
}

/// Asynchronously deletes an uploaded model using `DELETE /api/models/{id}`.
/// Only uploaded models carry an id, so integrated models can never reach this call.
pub async fn delete_model_async(
    model_id: u64,
    model_name: &str,
    config: &Config,
    sender: Sender<UpdateMessage>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();
    let url = format!("{}/api/models/{}", base_url(config), model_id);

    debug!(
        "Sending delete request to {} for model '{}'",
        url, model_name
    );
    let _ = sender.send(UpdateMessage::Log(format!(
        "DEBUG: Sending delete request for '{}'",
        model_name
    )));

    let res = client
        .delete(&url)
        .send()
        .await
        .map_err(|e| format!("Network request failed for {}: {}", url, e))?;

    let status_code = res.status();
    if status_code.is_success() {
        debug!(
            "Successfully received response for deleting model '{}'.",
            model_name
        );
        Ok(())
    } else if status_code == reqwest::StatusCode::NOT_FOUND {
        // Already gone; the desired state (model not present) is achieved.
        warn!(
            "Model '{}' (id {}) not found on server during deletion attempt.",
            model_name, model_id
        );
        let _ = sender.send(UpdateMessage::Log(format!(
            "WARN: Model '{}' not found on server.",
            model_name
        )));
        Ok(())
    } else {
        let error_body = res
            .text()
            .await
            .unwrap_or_else(|_| "Unknown server error".to_string());
        error!(
            "Annotation server returned error status {} deleting model '{}': {}",
            status_code, model_name, error_body
        );
        let log_msg = format!(
            "ERROR deleting model '{}': Server returned error status {}: {}",
            model_name, status_code, error_body
        );
        let _ = sender.send(UpdateMessage::Log(log_msg));
        Err(format!(
            "Server error ({}) deleting {}: {}",
            status_code, model_name, error_body
        )
        .into())
    }
}

/// Parses an RFC 3339 timestamp and formats it in the configured timezone.
/// Falls back to the raw string when parsing fails.
fn localize_timestamp(raw: Option<&str>, tz: Tz, model_name: &str) -> Option<String> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string()),
        Err(e) => {
            warn!(
                "Failed to parse upload date '{}' for model '{}': {}. Using original.",
                raw, model_name, e
            );
            Some(format!("{} (Parse Failed)", raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;

    #[test]
    fn models_response_distinguishes_uploaded_and_integrated() {
        let json = r#"{
            "models": [
                { "id": 5, "name": "my-detector", "framework": "openvino",
                  "owner": 2, "uploaded_at": "2024-03-01T10:00:00+00:00" },
                { "id": null, "name": "person-detection" }
            ]
        }"#;
        let parsed: ModelsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.models.len(), 2);
        assert_eq!(parsed.models[0].id, Some(5));
        assert_eq!(parsed.models[0].owner, Some(2));
        assert_eq!(parsed.models[1].id, None);
        assert!(parsed.models[1].framework.is_none());
    }

    #[test]
    fn model_without_id_field_is_integrated() {
        // Some servers omit the field entirely instead of sending null.
        let parsed: Model = serde_json::from_str(r#"{ "name": "builtin" }"#).unwrap();
        assert!(parsed.id.is_none());
    }

    #[test]
    fn capabilities_default_to_absent() {
        let caps: Capabilities = serde_json::from_str("{}").unwrap();
        assert_eq!(caps, Capabilities::default());
        let caps: Capabilities =
            serde_json::from_str(r#"{ "auto_annotation": true }"#).unwrap();
        assert!(caps.auto_annotation);
        assert!(!caps.tf_annotation);
    }

    #[test]
    fn base_url_prepends_scheme_when_missing() {
        let config = Config {
            server_host: "127.0.0.1:8080".to_string(),
            tz: chrono_tz::Tz::UTC,
        };
        assert_eq!(base_url(&config), "http://127.0.0.1:8080");
        let config = Config {
            server_host: "https://annotate.example.com".to_string(),
            tz: chrono_tz::Tz::UTC,
        };
        assert_eq!(base_url(&config), "https://annotate.example.com");
    }

    #[test]
    fn localize_timestamp_formats_in_configured_tz() {
        let formatted = localize_timestamp(
            Some("2024-03-01T10:00:00+00:00"),
            chrono_tz::Tz::Europe__Vienna,
            "m",
        );
        assert_eq!(formatted.as_deref(), Some("2024-03-01 11:00:00"));
        assert!(localize_timestamp(None, chrono_tz::Tz::UTC, "m").is_none());
        assert_eq!(
            localize_timestamp(Some("not-a-date"), chrono_tz::Tz::UTC, "m").as_deref(),
            Some("not-a-date (Parse Failed)")
        );
    }
}
