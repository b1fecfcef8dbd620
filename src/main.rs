use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use research_assistant::config::{self, Settings};
use research_assistant::models::{OutputFormat, ResearchRequest};
use research_assistant::progress::{ChannelEvent, ProgressChannel};
use research_assistant::server::{self, DOWNLOAD_BASENAME};
use research_assistant::ResearchService;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "research-assistant", version, about = "Web research with cited, summarized reports")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Research a single topic and write the report to a file
    Run {
        topic: String,
        #[arg(long, short = 'n')]
        sources: Option<usize>,
        #[arg(long, short, value_enum, default_value_t = FormatArg::Markdown)]
        format: FormatArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Markdown,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("research_assistant=debug,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve(settings).await
        }
        Command::Run {
            topic,
            sources,
            format,
            output,
        } => {
            let mut request = ResearchRequest::new(topic).with_format(format.into());
            request.num_sources = sources;
            run_once(settings, request, output).await
        }
    }
}

async fn serve(settings: Settings) -> Result<()> {
    let service = ResearchService::from_settings(&settings)?;
    let app = server::router(service);

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Research assistant server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_once(settings: Settings, request: ResearchRequest, output: Option<PathBuf>) -> Result<()> {
    let service = ResearchService::from_settings(&settings)?;
    let request = request.validate(service.settings())?;
    let output = output.unwrap_or_else(|| request.output_format.download_filename(DOWNLOAD_BASENAME).into());

    let poll_interval = service.settings().progress_poll_interval();
    let mut channel = ProgressChannel::spawn(poll_interval, move |progress| async move {
        service.research(&request, &progress).await
    });

    while let Some(item) = channel.next().await {
        match item {
            ChannelEvent::Progress(event) => {
                eprintln!("[{:>3.0}%] {}", event.fraction() * 100.0, event.message);
            }
            ChannelEvent::Complete(result) => {
                tokio::fs::write(&output, &result.content)
                    .await
                    .with_context(|| format!("failed to write {}", output.display()))?;
                info!(language = %result.language, "report written to {}", output.display());
                return Ok(());
            }
            ChannelEvent::Failed(e) => bail!("{e}"),
        }
    }

    bail!("research ended without a result")
}
