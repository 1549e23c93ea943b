use std::fmt::Write;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use arcsum_lib::{Digest, Engine};
use clap::{Parser, ValueEnum};
use indicatif::{MultiProgress, ProgressBar, ProgressState, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{debug, error, trace};

static CHUNK_SIZE: usize = 64 * 1024;

/// Compute CRC-16/ARC checksums of files, standard input or a literal.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Files to checksum. `-`, or no files at all, reads standard input.
    files: Vec<PathBuf>,

    /// Checksum the bytes of this string instead of reading input.
    #[arg(short, long, conflicts_with = "files")]
    string: Option<String>,

    /// Checksum implementation.
    #[arg(short, long, value_enum, default_value_t = EngineArg::Table)]
    engine: EngineArg,

    /// How checksums are printed.
    #[arg(short, long, value_enum, default_value_t = Format::Hex)]
    format: Format,

    /// Expected checksum in hex. Inputs that differ fail the run.
    #[arg(short = 'c', long, value_parser = parse_checksum)]
    expect: Option<u16>,

    /// Compute every input with all engines and fail if they disagree.
    #[arg(long)]
    cross_check: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    Table,
    Bitwise,
    Reference,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Table => Engine::Table,
            EngineArg::Bitwise => Engine::Bitwise,
            EngineArg::Reference => Engine::Reference,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Hex,
    Dec,
}

enum Input {
    Stdin,
    File(PathBuf),
    Literal(String),
}

impl Input {
    fn label(&self) -> String {
        match self {
            Input::Stdin => "-".to_owned(),
            Input::File(path) => path.display().to_string(),
            Input::Literal(text) => format!("{text:?}"),
        }
    }
}

fn main() -> Result<ExitCode> {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).build();
    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), logger)
        .try_init()
        .context("failed to initialize logger")?;

    let args = Cli::parse();
    let engines = selected_engines(args.engine.into(), args.cross_check);
    let mut ok = true;

    for input in inputs(&args) {
        let label = input.label();
        debug!("Checksumming {label} with {:?}.", engines);
        let sums = checksum_input(&input, &engines, &multi)?;
        ok &= verify(&label, &engines, &sums, args.expect);
        println!("{}  {label}", render(sums[0], args.format));
    }

    Ok(exit_code(ok))
}

/// Checks one input's checksums. `sums[i]` was computed by `engines[i]`; the
/// first entry is the reported checksum.
fn verify(label: &str, engines: &[Engine], sums: &[u16], expect: Option<u16>) -> bool {
    let crc = sums[0];
    let mut ok = true;

    if let Some((engine, other)) = engines.iter().zip(sums).find(|(_, sum)| **sum != crc) {
        error!(
            "{label}: {engine:?} computed {other:04x}, {:?} computed {crc:04x}",
            engines[0]
        );
        ok = false;
    }
    if let Some(expected) = expect {
        if crc != expected {
            error!("{label}: checksum {crc:04x} does not match expected {expected:04x}");
            ok = false;
        }
    }
    ok
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn selected_engines(engine: Engine, cross_check: bool) -> Vec<Engine> {
    let mut engines = vec![engine];
    if cross_check {
        engines.extend(Engine::ALL.into_iter().filter(|other| *other != engine));
    }
    engines
}

fn inputs(args: &Cli) -> Vec<Input> {
    if let Some(text) = &args.string {
        return vec![Input::Literal(text.clone())];
    }
    if args.files.is_empty() {
        return vec![Input::Stdin];
    }
    args.files
        .iter()
        .map(|path| {
            if path.as_os_str() == "-" {
                Input::Stdin
            } else {
                Input::File(path.clone())
            }
        })
        .collect()
}

fn checksum_input(input: &Input, engines: &[Engine], multi: &MultiProgress) -> Result<Vec<u16>> {
    match input {
        Input::Literal(text) => Ok(engines
            .iter()
            .map(|engine| engine.checksum(text.as_bytes()))
            .collect()),
        Input::Stdin => checksum_reader(io::stdin().lock(), engines, &ProgressBar::hidden())
            .context("failed to read standard input"),
        Input::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            let len = file
                .metadata()
                .with_context(|| format!("failed to stat {}", path.display()))?
                .len();

            let progress = if len > CHUNK_SIZE as u64 {
                multi.add(progress_bar(len))
            } else {
                ProgressBar::hidden()
            };
            let sums = checksum_reader(file, engines, &progress)
                .with_context(|| format!("failed to read {}", path.display()))?;
            progress.finish();
            multi.remove(&progress);
            Ok(sums)
        }
    }
}

fn checksum_reader(
    mut reader: impl Read,
    engines: &[Engine],
    progress: &ProgressBar,
) -> io::Result<Vec<u16>> {
    let mut digests: Vec<Digest> = engines.iter().map(|engine| engine.digest()).collect();
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        trace!("Read {read} bytes.");
        for digest in &mut digests {
            digest.update(&chunk[..read]);
        }
        progress.inc(read as u64);
    }
    Ok(digests.into_iter().map(Digest::finalize).collect())
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:60.cyan/blue}] {bytes}/{total_bytes} ({eta})",
    ) {
        progress.set_style(
            style
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                })
                .progress_chars("#>-"),
        );
    }
    progress
}

fn render(crc: u16, format: Format) -> String {
    match format {
        Format::Hex => format!("{crc:04x}"),
        Format::Dec => crc.to_string(),
    }
}

fn parse_checksum(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("`{s}` is not a 16-bit hex checksum"));
    }
    u16::from_str_radix(digits, 16).map_err(|err| format!("`{s}`: {err}"))
}
