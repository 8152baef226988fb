// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, build the transfer client and the
//   controller, then hand over to the UI loop.
// - Returns `anyhow::Result`; nothing the session does is fatal, only terminal
//   I/O errors end the program.

use std::sync::Arc;

use huffman_cli::logging::{init_logging, LoggingConfig};
use huffman_cli::{ui::main_menu, Config, Controller, TransferClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging(&LoggingConfig::default());

    // Base address comes from `HUFFMAN_API_URL` or defaults to
    // http://localhost:8080. See `Config::from_env`.
    let config = Config::from_env();
    let client = TransferClient::new(&config)?;
    tracing::info!(base_url = client.base_url(), "Transfer client ready");

    let controller = Controller::new(Arc::new(client), &config);

    // Blocks on terminal input until the user exits.
    main_menu(controller, &config).await?;
    Ok(())
}
