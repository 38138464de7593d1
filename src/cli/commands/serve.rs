//! Implementation of the `lexicon serve` command.

use anyhow::Result;
use clap::Args;

use super::connect;
use crate::adapters::http::{HttpConfig, LexiconHttpServer};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    fn http_config(&self, config: &Config) -> HttpConfig {
        let mut http = HttpConfig::from(&config.server).with_pagination(config.pagination.clone());
        if let Some(host) = &self.host {
            http.host.clone_from(host);
        }
        if let Some(port) = self.port {
            http.port = port;
        }
        http
    }
}

pub async fn execute(args: ServeArgs, config: &Config) -> Result<()> {
    let http = args.http_config(config);
    let services = connect(config).await?;

    let server = LexiconHttpServer::new(services.translations, services.tags, http);
    server
        .serve_with_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        })
        .await
}
