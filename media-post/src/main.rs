//! media-post - Publish content to Facebook, Instagram, TikTok and YouTube

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libmediacast::types::{ImagePost, VideoPost};
use libmediacast::validation::{self, Verdict, DEFAULT_MAX_VIDEO_MB};
use libmediacast::{
    logging, AggregateResult, Config, ContentKind, MediacastError, MultiPlatformPoster, Platform,
    PlatformError, Privacy, PublishRequest, PublishResult, VideoMetadata,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "media-post")]
#[command(version, about = "Publish content to several social platforms at once")]
#[command(long_about = r#"Publish one piece of content to every configured platform that accepts it.

Text goes to Facebook. Images go to Facebook and Instagram. Videos go to
Facebook and YouTube (uploaded from --video-path) and to Instagram and
TikTok (pulled from --video-url).

Credentials are read from the environment or a .env file:
    FACEBOOK_ACCESS_TOKEN, FACEBOOK_PAGE_ID
    INSTAGRAM_ACCESS_TOKEN, INSTAGRAM_ACCOUNT_ID
    TIKTOK_ACCESS_TOKEN
    YOUTUBE_CLIENT_SECRETS_FILE, YOUTUBE_CREDENTIALS_FILE

EXAMPLES:
    # Post text to Facebook
    media-post "Hello from media-post"

    # Read the message from stdin
    echo "Hello" | media-post

    # Post an image to Facebook and Instagram
    media-post "New product" --image-url https://cdn.example.com/p.jpg

    # Publish a video everywhere
    media-post "Launch" --video-path launch.mp4 \
        --video-url https://cdn.example.com/launch.mp4 \
        --title "Launch day" --tags launch,demo --privacy public

    # Only some platforms, JSON output for scripting
    media-post "Hi" --image-url https://cdn.example.com/p.jpg \
        --platform instagram --format json | jq '.instagram.media_id'

    # Show which platforms are configured
    media-post --check-config

EXIT CODES:
    0 - Every attempted platform succeeded
    1 - At least one platform failed, or none could be attempted
    2 - A platform rejected its credentials (e.g. expired YouTube token)
    3 - Invalid input (empty message, bad URL, unusable video file)
"#)]
struct Cli {
    /// Message to publish (reads from stdin if not provided)
    message: Option<String>,

    /// Content kind; inferred from the media options when omitted
    #[arg(short, long, value_name = "KIND")]
    kind: Option<ContentKind>,

    /// Public URL of an image
    #[arg(long, value_name = "URL")]
    image_url: Option<String>,

    /// Local video file (Facebook, YouTube)
    #[arg(long, value_name = "PATH")]
    video_path: Option<PathBuf>,

    /// Public video URL (Instagram, TikTok)
    #[arg(long, value_name = "URL")]
    video_url: Option<String>,

    /// Video title
    #[arg(long)]
    title: Option<String>,

    /// Video description
    #[arg(long)]
    description: Option<String>,

    /// Video tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Video audience: public, unlisted, private, friends, followers
    #[arg(long, value_name = "PRIVACY")]
    privacy: Option<Privacy>,

    /// Caption for image and video posts (defaults to the message)
    #[arg(long)]
    caption: Option<String>,

    /// Target specific platform(s) (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    platform: Vec<Platform>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the configuration summary and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_env();

    logging::init_from_settings(&config.logging, cli.verbose);

    match run(cli, config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            let code = e
                .downcast_ref::<MediacastError>()
                .map_or(1, MediacastError::exit_code);
            std::process::exit(code);
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<i32> {
    info!("{}", "=".repeat(50));
    info!("media-post v{} starting", env!("CARGO_PKG_VERSION"));
    info!("{}", "=".repeat(50));

    let warnings = config.validate();
    if cli.check_config {
        println!("{}", config.status());
        for warning in warnings {
            println!("⚠ {}", warning);
        }
        return Ok(0);
    }

    let message = match cli.message.clone() {
        Some(message) => message,
        None => read_stdin()?,
    };
    let request = build_request(&cli, message)?;

    let poster = MultiPlatformPoster::from_config(&config);
    let results = if cli.platform.is_empty() {
        poster.post_to_all(&request).await
    } else {
        poster.post_to_selected(&request, &cli.platform).await
    };

    if results.is_empty() {
        eprintln!(
            "Error: No configured platform accepts {} content",
            request.kind()
        );
    }

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        _ => print_text(&results),
    }

    if results.all_succeeded() {
        return Ok(0);
    }

    // Rejected credentials get their own exit code
    let auth_failure = results
        .failures()
        .filter_map(PublishResult::error)
        .find(|e| matches!(e, PlatformError::Authentication(_)));
    match auth_failure {
        Some(e) => Err(MediacastError::Platform(e.clone()).into()),
        None => Ok(1),
    }
}

fn read_stdin() -> Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .context("Failed to read message from stdin")?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn build_request(cli: &Cli, message: String) -> Result<PublishRequest, MediacastError> {
    let kind = cli.kind.unwrap_or(if cli.video_path.is_some() || cli.video_url.is_some() {
        ContentKind::Video
    } else if cli.image_url.is_some() {
        ContentKind::Image
    } else {
        ContentKind::Text
    });

    match kind {
        ContentKind::Text => {
            if message.trim().is_empty() {
                return Err(MediacastError::InvalidInput(
                    "Message cannot be empty".to_string(),
                ));
            }
            Ok(PublishRequest::text(message))
        }
        ContentKind::Image => {
            let image_url = cli.image_url.as_deref().ok_or_else(|| {
                MediacastError::InvalidInput("--image-url is required for image posts".to_string())
            })?;
            check(validation::validate_url(image_url))?;

            let mut post = ImagePost::new(message, image_url);
            post.caption = cli.caption.clone();
            Ok(post.into())
        }
        ContentKind::Video => {
            if cli.video_path.is_none() && cli.video_url.is_none() {
                return Err(MediacastError::InvalidInput(
                    "--video-path or --video-url is required for video posts".to_string(),
                ));
            }

            let mut post = VideoPost::new(message).with_metadata(VideoMetadata {
                title: cli.title.clone(),
                description: cli.description.clone(),
                tags: cli.tags.clone(),
                privacy: cli.privacy,
            });
            post.caption = cli.caption.clone();

            if let Some(path) = &cli.video_path {
                if let Verdict::Valid {
                    size_mb: Some(size_mb),
                } = check(validation::validate_video_file(path, DEFAULT_MAX_VIDEO_MB))?
                {
                    info!("Video file {} ({:.1}MB)", path.display(), size_mb);
                }
                post = post.with_path(path);
            }
            if let Some(url) = &cli.video_url {
                check(validation::validate_url(url))?;
                post = post.with_url(url);
            }
            Ok(post.into())
        }
    }
}

fn check(verdict: Verdict) -> Result<Verdict, MediacastError> {
    match verdict.rejection() {
        Some(rejection) => Err(MediacastError::InvalidInput(rejection.to_string())),
        None => Ok(verdict),
    }
}

fn print_text(results: &AggregateResult) {
    for result in results.iter() {
        match (result.id(), result.error()) {
            (Some(id), _) => println!("✓ {}: {} {}", result.platform, id.kind.label(), id.value),
            (None, Some(e)) => println!("✗ {}: {}", result.platform, e),
            (None, None) => {}
        }
    }
}
