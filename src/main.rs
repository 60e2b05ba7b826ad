//! motivic — convert monophonic MIDI files to WAV or AIFF.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use motivic::render::AudioFormat;
use motivic::{ConversionJob, Converter};

#[derive(Parser, Debug)]
#[command(name = "motivic", version, about = "Render monophonic MIDI melodies to audio")]
struct Cli {
    /// MIDI files to convert.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output container: wav or aiff. Defaults to the settings file's format.
    #[arg(short, long)]
    format: Option<String>,

    /// Waveform: sine, triangle, square, or saw. Unknown names play as sine.
    #[arg(short, long)]
    waveform: Option<String>,

    /// Output file name without extension. Only valid with a single input.
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for converted files, named after each input.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Frequency table (JSON).
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Conversion settings (YAML).
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let converter = match Converter::from_files(&cli.config, cli.settings.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let format_name = cli
        .format
        .as_deref()
        .unwrap_or(&converter.settings().format);
    let format: AudioFormat = match format_name.parse() {
        Ok(f) => f,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let waveform = cli
        .waveform
        .as_deref()
        .unwrap_or(&converter.settings().waveform);

    let jobs: Vec<ConversionJob> = match cli.output {
        Some(output) => {
            if cli.inputs.len() > 1 {
                log::error!("--output needs exactly one input; use --out-dir for several");
                return ExitCode::FAILURE;
            }
            let mut name = output.into_os_string();
            name.push(".");
            name.push(format.extension());
            vec![ConversionJob {
                input: cli.inputs[0].clone(),
                output: PathBuf::from(name),
                format,
                waveform: waveform.to_string(),
            }]
        }
        None => cli
            .inputs
            .iter()
            .map(|input| ConversionJob::in_dir(input.clone(), &cli.out_dir, format, waveform))
            .collect(),
    };

    let mut failed = 0;
    for (job, result) in jobs.iter().zip(converter.convert_batch(&jobs)) {
        if let Err(e) = result {
            log::error!("{}: {e}", job.input.display());
            failed += 1;
        }
    }

    if failed > 0 {
        log::error!("{failed} of {} conversions failed", jobs.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
