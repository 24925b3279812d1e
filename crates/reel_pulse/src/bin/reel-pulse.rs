use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use vocab_store::JsonHistoryStore;

use reel_pulse::{
    config::Settings,
    media::{
        cloudinary::CloudinaryClient, elevenlabs::ElevenLabsClient, ffmpeg::FfmpegComposer,
        leonardo::LeonardoClient,
    },
    openai::OpenAIClient,
    publish::instagram::InstagramClient,
    scheduler::Scheduler,
    tracing::init_tracing_subscriber,
    ReelProcessor, ReelProcessorBuilder, RemoteCleanup,
};

#[derive(Parser)]
#[command(name = "reel-pulse", about = "German vocabulary reel generator")]
struct Cli {
    /// JSON settings file; credentials are read from the environment when omitted
    #[arg(long, env = "REEL_PULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Working directory for the generated image, audio and video
    #[arg(long, env = "REEL_PULSE_WORKDIR", default_value = ".")]
    workdir: PathBuf,

    /// File holding the recently posted words
    #[arg(long, env = "REEL_PULSE_HISTORY", default_value = "posted_vocabs.json")]
    history_file: PathBuf,

    /// ffmpeg executable
    #[arg(long, env = "FFMPEG_PATH", default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Also delete the hosted video when publishing fails
    #[arg(long)]
    delete_remote_on_failure: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline once and exit
    Run,
    /// Start the scheduler
    Cron {
        /// Cron schedule expression (with seconds)
        #[arg(long, env = "CRON_SCHEDULE", default_value = Scheduler::DEFAULT_SCHEDULE)]
        schedule: String,

        /// IANA timezone the schedule is evaluated in
        #[arg(long, env = "CRON_TIMEZONE", default_value = Scheduler::DEFAULT_TIMEZONE)]
        timezone: String,
    },
}

type Processor = ReelProcessor<
    OpenAIClient,
    LeonardoClient,
    ElevenLabsClient,
    FfmpegComposer,
    CloudinaryClient,
    InstagramClient,
    JsonHistoryStore,
>;

fn build_processor(cli: &Cli, settings: &Settings) -> anyhow::Result<Processor> {
    let remote_cleanup = if cli.delete_remote_on_failure {
        RemoteCleanup::Always
    } else {
        RemoteCleanup::AfterPublish
    };

    Ok(ReelProcessorBuilder::new(&cli.workdir)
        .vocab_source(OpenAIClient::new(&settings.vocabulary_api_key))
        .image_provider(LeonardoClient::new(&settings.image_api_key))
        .audio_provider(ElevenLabsClient::new(
            &settings.speech_api_key,
            &settings.speech_voice_id,
        ))
        .composer(FfmpegComposer::new(&cli.ffmpeg))
        .media_host(CloudinaryClient::from_url(&settings.media_host_url)?)
        .publisher(InstagramClient::new(
            &settings.publish_user_id,
            &settings.publish_access_token,
        ))
        .history(JsonHistoryStore::new(&cli.history_file))
        .remote_cleanup(remote_cleanup)
        .build())
}

async fn shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    tracing::info!("Shutdown requested");
    token.cancel();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::from_env()?,
    };
    tracing::debug!(?settings, "Loaded settings");

    let processor = build_processor(&cli, &settings)?;

    match &cli.command {
        Command::Run => {
            tracing::info!("Running pipeline once...");
            let report = processor.run().await?;
            println!("Published \"{}\" as media {}", report.word, report.published_id);
        }
        Command::Cron { schedule, timezone } => {
            let scheduler = Scheduler::parse(schedule, timezone)?;
            tracing::info!(%schedule, timezone = %scheduler.timezone(), "Starting scheduler...");

            let processor = Arc::new(processor);
            let shutdown = CancellationToken::new();
            tokio::spawn(shutdown_signal(shutdown.clone()));

            scheduler
                .run(
                    move || {
                        let processor = processor.clone();
                        async move { processor.run().await }
                    },
                    shutdown,
                )
                .await;
        }
    }

    Ok(())
}
