//! GenAI Studio - command-line entry point.
//!
//! Collects user input, runs the studio action and prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use genai_studio_lib::app::Studio;
use genai_studio_lib::config::Config;
use genai_studio_lib::error::{AppError, AppResult};
use genai_studio_lib::models::image::DEFAULT_IMAGE_COUNT;
use genai_studio_lib::models::video::{DEFAULT_DURATION_SECS, DEFAULT_NEGATIVE_PROMPT};
use genai_studio_lib::models::{
    AspectRatio, ImageGenerationRequest, InlineImage, ModelVersion, VideoGenerationRequest,
    VideoMode,
};

#[derive(Parser, Debug)]
#[command(name = "genai-studio")]
#[command(about = "Generate videos and images and swap faces through hosted AI vendors", long_about = None)]
struct Cli {
    /// Print results and errors as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with the configured studio credentials
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show whether a session is active
    Status,
    /// Upload a reference image and print its public URL
    Upload { file: PathBuf },
    /// Generate a video from a prompt and a reference image
    Video(VideoArgs),
    /// Generate images from a prompt and a reference image
    Image(ImageArgs),
    /// Swap the face from one image onto another
    Faceswap {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
    },
}

#[derive(Args, Debug)]
struct VideoArgs {
    #[arg(short, long)]
    prompt: String,

    /// Local reference image, uploaded before submission
    #[arg(long, conflicts_with = "image_url", required_unless_present = "image_url")]
    image: Option<PathBuf>,

    /// Public URL of an already-uploaded reference image
    #[arg(long)]
    image_url: Option<String>,

    #[arg(long, default_value_t = DEFAULT_DURATION_SECS)]
    duration: u32,

    /// std or pro
    #[arg(long, default_value = "std")]
    mode: VideoMode,

    /// 1.0, 1.5 or 1.6
    #[arg(long, default_value = "1.6")]
    version: ModelVersion,

    #[arg(long, default_value = DEFAULT_NEGATIVE_PROMPT, hide_default_value = true)]
    negative_prompt: String,
}

#[derive(Args, Debug)]
struct ImageArgs {
    #[arg(short, long)]
    prompt: String,

    /// Local reference image
    #[arg(long)]
    image: PathBuf,

    #[arg(long, default_value = "16:9")]
    aspect_ratio: AspectRatio,

    /// Number of images to generate
    #[arg(short, long, default_value_t = DEFAULT_IMAGE_COUNT, value_parser = clap::value_parser!(u8).range(1..=10))]
    n: u8,

    /// Send the prompt as written
    #[arg(long)]
    no_optimizer: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be 'development' or 'production' when set");
            error!("  - In production, vendor keys, AWS_BUCKET_NAME and STUDIO_USERNAME/STUDIO_PASSWORD must be set");
            return ExitCode::FAILURE;
        }
    };

    info!(environment = %config.environment, "Configuration loaded");

    let embedded = config.embedded_credentials();
    if !embedded.is_empty() {
        warn!(
            credentials = %embedded.join(", "),
            "Vendor credentials are embedded in client configuration; anyone with this configuration can call the vendors directly"
        );
    }
    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let json = cli.json;
    let result = match Studio::new(config) {
        Ok(mut studio) => run(&mut studio, cli.command, json).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                print_json(&e.to_response());
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(studio: &mut Studio, command: Command, json: bool) -> AppResult<()> {
    match command {
        Command::Login { username, password } => {
            studio.login(&username, &password)?;
            report(json, &studio.gate().session(), || "Logged in".to_string());
        }
        Command::Logout => {
            studio.logout()?;
            report(json, &studio.gate().session(), || "Logged out".to_string());
        }
        Command::Status => {
            let session = studio.gate().session();
            let path = studio.config().gate.session_path.display().to_string();
            report(json, &session, || {
                if session.authenticated {
                    format!("Logged in (session: {})", path)
                } else {
                    "Not logged in".to_string()
                }
            });
        }
        Command::Upload { file } => {
            let asset = studio.upload(&file).await?;
            report(json, &asset, || asset.url.clone());
        }
        Command::Video(args) => run_video(studio, args, json).await?,
        Command::Image(args) => {
            studio.gate().require_authenticated()?;
            let reference = InlineImage::read(&args.image).await?;
            let request = ImageGenerationRequest {
                prompt: args.prompt,
                reference_image: reference.data_url(),
                aspect_ratio: args.aspect_ratio,
                n: args.n,
                prompt_optimizer: !args.no_optimizer,
            };
            let result = studio.generate_images(&request).await?;
            report(json, &result, || result.image_urls.join("\n"));
        }
        Command::Faceswap { source, target } => {
            let result = studio.swap_faces(&source, &target).await?;
            report(json, &result, || result.result_url.clone());
        }
    }
    Ok(())
}

async fn run_video(studio: &Studio, args: VideoArgs, json: bool) -> AppResult<()> {
    studio.gate().require_authenticated()?;

    let image_url = match (args.image, args.image_url) {
        (_, Some(url)) => url,
        (Some(path), None) => studio.upload(&path).await?.url,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "either --image or --image-url is required".to_string(),
            ));
        }
    };

    let request = VideoGenerationRequest {
        duration: args.duration,
        mode: args.mode,
        version: args.version,
        negative_prompt: args.negative_prompt,
        ..VideoGenerationRequest::new(args.prompt, image_url)
    };

    // Ctrl-C stops polling; the vendor task itself is not cancelled
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let output = studio
        .generate_video(&request, &cancel, |task_id| {
            info!(%task_id, "Video task submitted, polling for the result");
        })
        .await?;

    report(json, &output, || match &output.cover_url {
        Some(cover) => format!("{}\ncover: {}", output.video_url, cover),
        None => output.video_url.clone(),
    });
    Ok(())
}

fn report<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) {
    if json {
        print_json(value);
    } else {
        println!("{}", text());
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => eprintln!("Failed to render JSON output: {}", e),
    }
}
