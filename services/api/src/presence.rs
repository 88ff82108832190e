//! Client for the RFID reader that reports which students are in the room

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct PresencePayload {
    data: Vec<String>,
}

/// Presence source with a configured fallback
#[derive(Clone)]
pub struct PresenceClient {
    http: reqwest::Client,
    url: Option<String>,
    fallback: Vec<String>,
}

impl PresenceClient {
    pub fn new(url: Option<String>, fallback: Vec<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            fallback,
        }
    }

    /// Ask the reader for the registration numbers it has seen
    pub async fn fetch(&self) -> Result<Vec<String>> {
        let url = self
            .url
            .as_deref()
            .context("No presence source configured")?;

        let payload: PresencePayload = self
            .http
            .get(url)
            .send()
            .await
            .context("Presence source unreachable")?
            .error_for_status()
            .context("Presence source returned an error status")?
            .json()
            .await
            .context("Presence source returned a malformed payload")?;

        Ok(payload.data)
    }

    /// Registration numbers to mark present
    ///
    /// Never fails: any problem with the reader is logged and the fallback
    /// set is used instead.
    pub async fn present_prns(&self) -> HashSet<String> {
        match self.fetch().await {
            Ok(prns) => {
                info!("Presence source reported {} students", prns.len());
                prns.into_iter().collect()
            }
            Err(e) => {
                warn!("Using fallback presence list: {:#}", e);
                self.fallback.iter().cloned().collect()
            }
        }
    }

    /// Caller-supplied registration numbers win; the reader is not contacted
    pub async fn present_or(&self, supplied: Option<Vec<String>>) -> HashSet<String> {
        match supplied {
            Some(prns) => prns.into_iter().collect(),
            None => self.present_prns().await,
        }
    }
}
