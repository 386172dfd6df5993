//! CLI shell for Ghiblify.

use clap::Parser;
use ghiblify::{
    GeminiTransformer, GenerationState, GhiblifyError, Session, StyleTransformer, UploadedFile,
    DEFAULT_DOWNLOAD_FILENAME, GENERIC_ERROR_MESSAGE, VALIDATION_NOTICE,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ghiblify")]
#[command(about = "Transform a photo into the Studio Ghibli art style via Gemini")]
#[command(version)]
struct Cli {
    /// Path to the photo to transform
    #[arg(required_unless_present = "check")]
    input: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = DEFAULT_DOWNLOAD_FILENAME)]
    output: PathBuf,

    /// API key (falls back to the GOOGLE_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Check that the API is reachable and authenticated, then exit
    #[arg(long)]
    check: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Missing credential is fatal before any work happens
    let mut builder = GeminiTransformer::builder();
    if let Some(key) = &cli.api_key {
        builder = builder.api_key(key.as_str());
    }
    let transformer = builder.build()?;

    if cli.check {
        transformer.health_check().await?;
        println!("{}: ok", transformer.name());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input) = cli.input else {
        anyhow::bail!("no input photo given");
    };

    let file = match UploadedFile::from_path(&input).await {
        Ok(file) => file,
        Err(GhiblifyError::Validation(detail)) => {
            tracing::warn!(detail = %detail, "rejected upload");
            eprintln!("{VALIDATION_NOTICE}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    if !cli.json {
        println!(
            "Uploaded {} ({} bytes, {})",
            file.name, file.size_bytes, file.mime_type
        );
    }

    let mut session = Session::new();
    session.upload(file);
    session.generate(&transformer).await;

    match session.state() {
        GenerationState::Succeeded(image) => {
            session.download_to(&cli.output)?;
            if cli.json {
                let result = serde_json::json!({
                    "success": true,
                    "output": cli.output.display().to_string(),
                    "size_bytes": image.size(),
                    "format": image.format.extension(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "Saved {} ({} bytes) via {}",
                    cli.output.display(),
                    image.size(),
                    transformer.name()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            // generate() always lands on a terminal state when a file is
            // set, so message() is present here
            let message = session.message().unwrap_or(GENERIC_ERROR_MESSAGE);
            if cli.json {
                let result = serde_json::json!({
                    "success": false,
                    "message": message,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                eprintln!("{message}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
