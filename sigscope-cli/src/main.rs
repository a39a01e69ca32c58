//! `sigscope` - manage captures on the processing backend from a terminal.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use sigscope_client::{ApiClient, UploadFile};
use sigscope_core::api::UploadOptions;
use sigscope_core::format::{format_frequency, format_seconds};
use sigscope_core::generate::{GenerateField, GenerateForm, PlacementMethod};
use sigscope_core::library;
use sigscope_core::session::{FileRole, SelectionError};

type DynError = Box<dyn std::error::Error>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Upload, inspect and manage RF captures on a sigscope backend")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "SIGSCOPE_API", default_value = "http://127.0.0.1:5000", global = true)]
    api: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored files
    List {
        /// Case-insensitive filename filter
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Upload a .cfile capture with its .sigmf-meta file
    Upload(UploadArgs),
    /// Delete a stored file
    Delete { id: String },
    /// Rename a stored file
    Rename { id: String, filename: String },
    /// Remove every stored file
    Refresh,
    /// Show domain bounds and annotations of a file
    Data { id: String },
    /// Print a file's annotations as JSON
    Annotations { id: String },
    /// Show SigMF metadata
    Metadata { id: String },
    /// Print AirVIEW detection output as JSON
    Airview { id: String },
    /// Print calculated statistics as JSON
    Stats { id: String },
    /// Generate a synthetic transmitter dataset and save its CSV
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct UploadArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    capture: PathBuf,

    #[arg(value_hint = ValueHint::FilePath)]
    metadata: PathBuf,

    /// Run AirVIEW detection
    #[arg(long)]
    airview: bool,

    /// Compute capture statistics
    #[arg(long)]
    statistics: bool,

    #[arg(long)]
    fft_size: Option<u32>,

    /// AirVIEW beta
    #[arg(long)]
    beta: Option<f64>,

    /// AirVIEW scale
    #[arg(long)]
    scale: Option<f64>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    rows: Option<f64>,
    #[arg(long)]
    cols: Option<f64>,
    #[arg(long)]
    transmitters: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    transmitter_mean: Option<f64>,
    #[arg(long)]
    transmitter_sd: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    noise_mean: Option<f64>,
    #[arg(long)]
    noise_sd: Option<f64>,
    #[arg(long)]
    bandwidth: Option<f64>,
    #[arg(long)]
    active_time: Option<f64>,

    /// equally_spaced or random
    #[arg(long, default_value = "equally_spaced")]
    placement: PlacementMethod,

    /// Where to write the CSV (defaults to the generated name)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    out: Option<PathBuf>,
}

impl GenerateArgs {
    fn form(&self) -> GenerateForm {
        let mut form = GenerateForm::default();
        form.placement = self.placement;
        let overrides = [
            (GenerateField::Rows, self.rows),
            (GenerateField::Cols, self.cols),
            (GenerateField::NumTransmitters, self.transmitters),
            (GenerateField::TransmitterMean, self.transmitter_mean),
            (GenerateField::TransmitterSd, self.transmitter_sd),
            (GenerateField::NoiseMean, self.noise_mean),
            (GenerateField::NoiseSd, self.noise_sd),
            (GenerateField::Bandwidth, self.bandwidth),
            (GenerateField::ActiveTime, self.active_time),
        ];
        for (field, value) in overrides {
            if value.is_some() {
                form.set(field, value);
            }
        }
        form
    }
}

fn read_upload(path: &Path) -> Result<UploadFile, DynError> {
    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("{}: not a file", path.display()))?;
    Ok(UploadFile::new(name, bytes))
}

fn print_json(value: &serde_json::Value) -> Result<(), DynError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

async fn run(cli: Cli) -> Result<(), DynError> {
    let client = ApiClient::new(&cli.api);
    log::info!("backend: {}", client.base_url());

    match cli.command {
        Command::List { search } => {
            let files = client.files().await?;
            let hits = library::filter(&files, search.as_deref().unwrap_or(""));
            if hits.is_empty() {
                println!("No files found.");
            }
            for f in hits {
                println!("{}  {}", f.id, f.filename);
            }
        }
        Command::Upload(args) => {
            for (role, path) in [(FileRole::Capture, &args.capture), (FileRole::Metadata, &args.metadata)] {
                let filename = path.to_string_lossy().into_owned();
                if !role.accepts(&filename) {
                    return Err(SelectionError::WrongExtension { role, filename }.into());
                }
            }
            let options = UploadOptions {
                airview: args.airview,
                statistics: args.statistics,
                fft_size: args.fft_size,
                airview_beta: args.beta,
                airview_scale: args.scale,
            };
            let reply = client
                .upload(read_upload(&args.capture)?, read_upload(&args.metadata)?, &options)
                .await?;
            println!("{}", reply.file_id.as_deref().unwrap_or("?"));
            if let Some(msg) = reply.message {
                eprintln!("{msg}");
            }
        }
        Command::Delete { id } => {
            let reply = client.delete_file(&id).await?;
            println!("{}", reply.message.as_deref().unwrap_or("File successfully deleted."));
        }
        Command::Rename { id, filename } => {
            let name = filename.trim();
            if name.is_empty() {
                return Err("File name cannot be empty.".into());
            }
            client.rename_file(&id, name).await?;
            println!("Renamed {id} to {name}");
        }
        Command::Refresh => {
            let reply = client.refresh().await?;
            println!("{}", reply.message.as_deref().unwrap_or("All saved files cleared."));
        }
        Command::Data { id } => {
            let data = client.file_data(&id).await?;
            println!("max time:  {} s", format_seconds(data.max_time));
            println!("min freq:  {}", format_frequency(data.min_freq));
            println!("max freq:  {}", format_frequency(data.max_freq));
            let annotations = data.annotations.unwrap_or_default();
            println!("annotations: {}", annotations.len());
            for a in &annotations {
                let c = a.corners.normalized();
                println!(
                    "  [{}] {}  {} .. {}  {} s .. {} s",
                    a.id,
                    a.label,
                    format_frequency(Some(c.freq1)),
                    format_frequency(Some(c.freq2)),
                    format_seconds(Some(c.time1)),
                    format_seconds(Some(c.time2)),
                );
            }
        }
        Command::Annotations { id } => {
            print_json(&serde_json::to_value(client.annotations(&id).await?)?)?
        }
        Command::Metadata { id } => {
            let meta = client.metadata(&id).await?;
            for section in meta.sections() {
                println!("{}", section.title);
                for (label, value) in section.items {
                    println!("  {label:<18}{value}");
                }
            }
        }
        Command::Airview { id } => print_json(&client.airview(&id).await?)?,
        Command::Stats { id } => print_json(&client.calculated_statistics(&id).await?)?,
        Command::Generate(args) => {
            let params = args.form().validate()?;
            let reply = client.generate(&params).await?;
            let csv = reply.csv.ok_or("No CSV returned.")?;
            let out = args
                .out
                .clone()
                .unwrap_or_else(|| PathBuf::from(params.csv_download_name(now_ms())));
            std::fs::write(&out, csv).map_err(|e| format!("{}: {e}", out.display()))?;
            println!("{}", out.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "sigscope", "generate", "--rows", "64", "--noise-mean", "-90", "--placement", "random",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else { panic!("expected generate") };
        let params = args.form().validate().unwrap();
        assert_eq!(params.rows, 64);
        assert_eq!(params.cols, 1024);
        assert_eq!(params.noise_mean, -90.0);
        assert_eq!(params.placement_method, PlacementMethod::Random);
    }

    #[test]
    fn test_api_flag_is_global() {
        let cli = Cli::try_parse_from(["sigscope", "list", "--api", "http://x:1", "-s", "lte"]).unwrap();
        assert_eq!(cli.api, "http://x:1");
        assert!(matches!(cli.command, Command::List { search: Some(ref s) } if s == "lte"));
    }
}
