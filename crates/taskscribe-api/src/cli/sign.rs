//! `taskscribe sign` -- compute the signature header for a local payload.

use std::path::Path;

use anyhow::Context;
use secrecy::ExposeSecret;

use taskscribe_infra::webhook::compute_signature;
use taskscribe_types::config::AppConfig;

pub async fn sign(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    println!("{}", signature_for_file(config, file).await?);
    Ok(())
}

async fn signature_for_file(config: &AppConfig, file: &Path) -> anyhow::Result<String> {
    let secret = config
        .webhook_secret
        .as_ref()
        .context("WEBHOOK_SECRET must be set to sign payloads")?;
    let body = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    compute_signature(secret.expose_secret().as_bytes(), &body)
        .context("WEBHOOK_SECRET cannot be used as an HMAC key")
}
