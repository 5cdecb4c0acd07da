use clap::Parser;
use folio_convert::capabilities::Capabilities;
use folio_convert::config::{ConfigError, ConversionConfig, ConvertSettings, SettingsOverrides};
use folio_convert::discover::discover_images;
use folio_convert::imaging::{OutputFormat, RustBackend};
use folio_convert::process::Converter;
use folio_convert::{crop, output};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "folio-convert")]
#[command(version)]
#[command(about = "Convert portfolio photographs into web images with thumbnails")]
#[command(long_about = "\
Convert portfolio photographs into web images with thumbnails

Every supported image directly inside INPUT_DIR (jpg, jpeg, png, bmp, tiff,
tif, gif, heic, heif) is cropped to the target aspect ratio, resized to
exactly --size and written to OUTPUT_DIR. A centered square thumbnail is
written to OUTPUT_DIR/thumbnails.

  input/                 output/
  ├── dawn.jpg     →     ├── dawn.webp
  └── logo.png     →     ├── logo.webp
                         └── thumbnails/
                             ├── dawn.webp
                             └── logo.webp

Settings can also come from a TOML file (--config) with the keys size, thumb,
quality and format. Command-line flags win over the file.

Exit codes: 0 done (even if some files failed), 1 setup error, 3 quit from the
interactive crop window.")]
struct Cli {
    /// Directory containing the source images
    input_dir: PathBuf,

    /// Directory for converted images (created if missing)
    output_dir: PathBuf,

    /// Full image size [default: 1000 1000]
    #[arg(
        long,
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        action = clap::ArgAction::Set,
        overrides_with = "size"
    )]
    size: Option<Vec<u32>>,

    /// Thumbnail bounding box [default: 200 200]
    #[arg(
        long,
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        action = clap::ArgAction::Set,
        overrides_with = "thumb"
    )]
    thumb: Option<Vec<u32>>,

    /// Lossy quality, 1-100 [default: 85]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Output format [default: webp]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Position each crop by hand in a preview window
    #[arg(short, long)]
    interactive: bool,

    /// TOML file with default settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Result<SettingsOverrides, ConfigError> {
        Ok(SettingsOverrides {
            size: pair("size", self.size.as_deref())?,
            thumb: pair("thumb", self.thumb.as_deref())?,
            quality: self.quality,
            format: self.format,
        })
    }
}

/// A repeated flag replaces the earlier one, so a present flag holds the
/// values of its last occurrence.
fn pair(flag: &str, values: Option<&[u32]>) -> Result<Option<[u32; 2]>, ConfigError> {
    values
        .map(|v| {
            <[u32; 2]>::try_from(v).map_err(|_| {
                ConfigError::Validation(format!(
                    "--{flag} takes exactly two values, got {}",
                    v.len()
                ))
            })
        })
        .transpose()
}

#[derive(Debug, Clone, Copy)]
enum Status {
    Success = 0,
    Error = 1,
    Quit = 3,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match run(&cli) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("error: {e}");
            Status::Error.into()
        }
    }
}

fn run(cli: &Cli) -> Result<Status, Box<dyn std::error::Error>> {
    let settings = match &cli.config {
        Some(path) => ConvertSettings::load(path)?,
        None => ConvertSettings::default(),
    }
    .with_overrides(&cli.overrides()?);

    let config = ConversionConfig::new(&cli.input_dir, &cli.output_dir, &settings, cli.interactive)?;
    let capabilities = Capabilities::probe();
    debug!(?capabilities, "probed capabilities");

    config.prepare_output_dirs()?;
    let files = discover_images(&config.input_dir)?;
    if files.is_empty() {
        output::print_no_images(&config.input_dir);
        return Ok(Status::Success);
    }

    let backend = RustBackend::new();
    let mut frontend = crop::default_frontend();
    let mut converter = Converter::new(&backend, &config, capabilities);
    if let Some(frontend) = frontend.as_deref_mut() {
        converter = converter.with_frontend(frontend);
    }
    let interactive = converter.interactive();

    output::print_found_files(&files);
    output::print_run_header(&config, files.len(), interactive);
    if interactive {
        output::print_crop_controls();
        wait_for_enter()?;
    }

    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = converter.convert_all(&files, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    output::print_summary(&result.report, &config, result.quit);

    if let Some(path) = &cli.report {
        result.report.write_json(path)?;
        info!(path = %path.display(), "wrote report");
    }

    Ok(if result.quit {
        Status::Quit
    } else {
        Status::Success
    })
}

fn wait_for_enter() -> io::Result<()> {
    print!("Press Enter to start interactive processing...");
    io::stdout().flush()?;
    io::stdin().read_line(&mut String::new())?;
    Ok(())
}
