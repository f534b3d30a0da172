use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use chatshot::{RenderConfig, RenderRequest, Renderer};

/// Render a chat transcript to a PNG image via headless Chrome
#[derive(Parser, Debug)]
#[command(name = "chatshot", version, about)]
struct Args {
    /// JSON-encoded message list: [{"nickname", "avatar"?, "content"}, ...]
    #[arg(long, conflicts_with = "messages_file")]
    messages: Option<String>,

    /// Read the message list JSON from a file instead
    #[arg(long)]
    messages_file: Option<PathBuf>,

    /// Color theme; "dark" selects the dark palette, anything else is light
    #[arg(long, default_value = "light")]
    theme: String,

    /// Final image width in device pixels (non-numeric falls back to 1600)
    #[arg(long)]
    width: Option<String>,

    /// Output path for the PNG, or "-" for stdout
    #[arg(long, short, default_value = "chat.png")]
    output: PathBuf,
}

fn run(args: Args) -> anyhow::Result<()> {
    let messages = match (&args.messages, &args.messages_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => anyhow::bail!("one of --messages or --messages-file is required"),
    };

    let request =
        RenderRequest::from_query(&messages, Some(&args.theme), args.width.as_deref())?;

    let png = Renderer::new(RenderConfig::default()).render(&request)?;

    if args.output.to_str() == Some("-") {
        std::io::stdout().write_all(&png)?;
    } else {
        std::fs::write(&args.output, &png)?;
        eprintln!("wrote {} bytes to {}", png.len(), args.output.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("chatshot: {}", e);
        std::process::exit(1);
    }
}
