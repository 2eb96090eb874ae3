//! Development server mode.

use anyhow::Result;

use easel_server::{DevServer, DevServerConfig};
use easel_site::Builder;

use crate::config::ConfigFile;

/// Build if needed, then serve with watch-driven rebuilds until ctrl-c.
pub async fn run(config: ConfigFile, port: u16, open: bool) -> Result<()> {
    let builder = Builder::new(config.into_site_config());

    let server_config = DevServerConfig {
        port,
        open,
        ..Default::default()
    };

    DevServer::new(server_config, builder).run().await?;

    Ok(())
}
