use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::model::{BudgetMonth, Snapshot};

/// Session token header expected by the server.
const TOKEN_HEADER: &str = "X-ACTUAL-TOKEN";

#[derive(Deserialize)]
struct LoginResponse {
    status: String,
    data: Option<LoginData>,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
}

/// Session against the budget server. Owns the HTTP client, the session
/// token and the local cache directory for downloaded budget files.
///
/// No retries anywhere: network, auth and unknown-sync-id failures
/// propagate to the caller, who is expected to call `shutdown` before
/// exiting.
pub(crate) struct BudgetClient {
    http: Client,
    server_url: String,
    cache_dir: PathBuf,
    token: String,
    snapshot: Option<Snapshot>,
    shut_down: bool,
}

impl BudgetClient {
    /// Prepare the local cache directory and log into the server.
    pub(crate) fn initialize(
        cache_dir: &Path,
        server_url: &str,
        password: &str,
    ) -> anyhow::Result<BudgetClient> {
        fs::create_dir_all(cache_dir)
            .with_context(|| format!("creating cache directory {}", cache_dir.display()))?;

        let server_url = server_url.trim_end_matches('/').to_string();
        let http = Client::new();

        debug!("Logging into {server_url}");
        let response = http
            .post(format!("{server_url}/account/login"))
            .json(&json!({ "password": password }))
            .send()
            .context("login request failed")?
            .error_for_status()
            .context("login rejected by server")?;

        let login: LoginResponse = response.json().context("malformed login response")?;
        if login.status != "ok" {
            return Err(anyhow!("login failed, server returned status '{}'", login.status));
        }
        let token = login
            .data
            .ok_or_else(|| anyhow!("login response carries no session token"))?
            .token;

        Ok(BudgetClient {
            http,
            server_url,
            cache_dir: cache_dir.to_path_buf(),
            token,
            snapshot: None,
            shut_down: false,
        })
    }

    /// Download the budget file selected by `sync_id`, cache the raw body
    /// locally and keep the parsed snapshot in memory.
    pub(crate) fn fetch_budget_snapshot(&mut self, sync_id: &str) -> anyhow::Result<()> {
        info!("Downloading budget {sync_id}");
        let body = self
            .http
            .get(format!("{}/sync/download/{sync_id}", self.server_url))
            .header(TOKEN_HEADER, self.token.as_str())
            .send()
            .context("budget download request failed")?
            .error_for_status()
            .with_context(|| format!("server refused budget '{sync_id}'"))?
            .text()
            .context("reading budget download")?;

        let cache_file = self.cache_dir.join(format!("{sync_id}.json"));
        fs::write(&cache_file, &body)
            .with_context(|| format!("writing {}", cache_file.display()))?;
        debug!("Cached budget file at {}", cache_file.display());

        self.snapshot = Some(serde_json::from_str(&body).context("malformed budget snapshot")?);
        Ok(())
    }

    /// Category breakdown for one `YYYY-MM` of the downloaded budget.
    pub(crate) fn get_month(&self, month: &str) -> anyhow::Result<BudgetMonth> {
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or_else(|| anyhow!("no budget downloaded yet"))?;
        snapshot
            .months
            .get(month)
            .cloned()
            .ok_or_else(|| anyhow!("budget has no data for {month}"))
    }

    /// End the server session. Best effort and idempotent: a failed logout
    /// is logged and swallowed so it never masks the error that got us
    /// here.
    pub(crate) fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        debug!("Closing server session");
        let result = self
            .http
            .post(format!("{}/account/logout", self.server_url))
            .header(TOKEN_HEADER, self.token.as_str())
            .send();
        if let Err(e) = result {
            debug!("Logout failed: {e}");
        }
    }
}
