//! `notamrev` - CLI for notam-review
//!
//! This binary provides the command-line interface for serving the review
//! form, fetching the reference dataset, inspecting review progress, and
//! uploading feedback files.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use notam_review::cli::{Cli, Command, ConfigCommand, FetchCommand, ServeCommand, StatusCommand, UploadCommand};
use notam_review::remote::{self, HttpRemoteStore};
use notam_review::{init_logging, Config, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, &serve_cmd).await,
        Command::Fetch(fetch_cmd) => handle_fetch(&config, &fetch_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, &status_cmd),
        Command::Upload(upload_cmd) => handle_upload(&config, &upload_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    if let Some(bind) = &cmd.bind {
        config.server.bind_address.clone_from(bind);
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    // Make sure the dataset is present before accepting logins.
    let remote = HttpRemoteStore::new();
    let dataset = remote::ensure_dataset(&config, &remote, false)
        .await
        .context("reference dataset is not available")?;
    println!("Dataset: {}", dataset.display());
    println!("Serving review form on http://{}", config.bind_addr());

    notam_review::server::serve(config).await?;
    Ok(())
}

async fn handle_fetch(config: &Config, cmd: &FetchCommand) -> anyhow::Result<()> {
    let remote = HttpRemoteStore::new();
    let path = remote::ensure_dataset(config, &remote, cmd.force).await?;
    println!("Dataset ready at {}", path.display());
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let store = match UserStore::open_existing(config, &cmd.user) {
        Ok(store) => store,
        Err(err) if err.is_user_file_missing() => {
            if cmd.json {
                let status = serde_json::json!({
                    "user": cmd.user,
                    "started": false,
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("User '{}' has not started reviewing yet.", cmd.user);
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let progress = store.progress();
    if cmd.json {
        let status = serde_json::json!({
            "user": store.username(),
            "started": true,
            "reviewed": progress.reviewed,
            "total": progress.total,
            "percent": progress.percent(),
            "cursor": store.cursor(),
            "feedback_file": store.path(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Review progress for {}", store.username());
        println!("------------------------");
        println!(
            "Reviewed:      {} of {} ({}%)",
            progress.reviewed,
            progress.total,
            progress.percent()
        );
        match store.cursor() {
            Some(cursor) => println!("Resumes at:    record {}", cursor + 1),
            None => println!("Resumes at:    record 1 (no stored position)"),
        }
        println!("Feedback file: {}", store.path().display());
    }
    Ok(())
}

async fn handle_upload(config: &Config, cmd: &UploadCommand) -> anyhow::Result<()> {
    let remote = HttpRemoteStore::new();
    remote::upload_feedback(config, &remote, &cmd.user)
        .await
        .context("feedback upload failed")?;
    println!("Uploaded feedback for '{}'.", cmd.user);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:    {}", config.bind_addr());
                println!(
                    "  Password set:    {}",
                    config.server.access_password.is_some()
                );
                println!();
                println!("[Dataset]");
                println!("  Path:            {}", config.dataset_path().display());
                println!(
                    "  URL:             {}",
                    config.dataset.url.as_deref().unwrap_or("(not set)")
                );
                println!();
                println!("[Storage]");
                println!("  Data directory:  {}", config.data_dir().display());
                println!();
                println!("[Upload]");
                println!(
                    "  Endpoint:        {}",
                    config.upload.endpoint.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Token set:       {}",
                    config.upload.token.is_some()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
