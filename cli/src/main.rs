use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use narrative_core::{SummaryConfig, SummaryRequest, TracingObserver};
use narrative_fhir::{build_prompt, prepare_narrative_str};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "narrative-cli",
    about = "Tạo văn bản tường thuật lâm sàng từ bundle FHIR JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON bundle.
    #[arg(short, long)]
    input: PathBuf,

    /// Gợi ý trọng tâm cho bản tóm tắt.
    #[arg(short, long)]
    focus: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// In prompt gửi tới mô hình tóm tắt thay vì văn bản tường thuật.
    #[arg(long)]
    prompt: bool,

    /// Số ký tự tối đa của gợi ý trọng tâm.
    #[arg(long)]
    max_focus_chars: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;

    let narrative = prepare_narrative_str(&data, &TracingObserver)?;
    debug!(
        chars = narrative.narrative_text.len(),
        "Narrative rendered"
    );

    if args.prompt {
        let mut config = SummaryConfig::default();
        if let Some(max_focus_chars) = args.max_focus_chars {
            config.max_focus_chars = max_focus_chars;
        }
        let request = SummaryRequest::new(narrative, args.focus.as_deref(), &config);
        let prompt = build_prompt(&request, &config);
        match args.format {
            OutputFormat::Text => println!("{}\n\n{}", prompt.system, prompt.user),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prompt)?),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => {
            print!("{}", narrative.narrative_text);
            println!("Bundle entries: {}", narrative.resource_entry_count);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&narrative)?),
    }

    Ok(())
}
