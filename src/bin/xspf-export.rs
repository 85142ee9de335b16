use std::path::PathBuf;

use clap::Parser;
use xspf_export::{classify, ExportCoordinator, FileSink, Message, PageFetcher};

/// Export a track listing page to an XSPF playlist file
#[derive(Parser)]
#[command(name = "xspf-export", about = "Export track listings to XSPF playlists", long_about = None)]
struct Cli {
    /// URL of the listing page (OST archive album, video playlist, fan
    /// archive listing)
    url: String,

    /// Directory to write the playlist into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Drop the first captured track (priming-row workaround on
    /// player-driven sites)
    #[arg(long)]
    skip_first: bool,

    /// Show detailed debug information
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if classify(&args.url).is_none() {
        eprintln!("Unsupported page: {}", args.url);
        eprintln!("Supported: OST archive albums, video platform playlists, fan archive listings.");
        std::process::exit(1);
    }

    let http_client = http_client::native::NativeClient::new();
    let fetcher = PageFetcher::new(Box::new(http_client));
    let sink = FileSink::new(&args.output);

    let coordinator = ExportCoordinator::new(fetcher, Box::new(sink))
        .with_skip_first_record(args.skip_first);
    coordinator.update_detection(&args.url);

    match coordinator.handle(Message::ExportPlaylist).await {
        Some(Message::ExportSuccess { filename }) => {
            println!("Wrote {}", args.output.join(filename).display());
            Ok(())
        }
        Some(Message::ExportError { message }) => {
            eprintln!("Export failed: {message}");
            std::process::exit(1);
        }
        _ => unreachable!("exportPlaylist always produces a response"),
    }
}
