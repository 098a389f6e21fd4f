use std::{
    fs::File,
    io::{BufReader, BufWriter, IsTerminal as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use bindump::{
    BindumpError, DumpConfig, DumpStats, FlatMemory, FrameSink, OutputMode, RawSink, Source, SourceKind,
    TextSink, WidthClass,
};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

/// Size dumped from memory sources when `--size` is not given.
const DEFAULT_MEMORY_SIZE: u32 = 0x100;

/// Width assumed when stdout is not a terminal.
const FALLBACK_COLUMNS: u16 = 80;

#[derive(Parser, Debug)]
#[command(
    name = "bindump",
    version,
    about = "Dump memory or file contents as hex + ASCII"
)]
#[command(group(ArgGroup::new("from").args(["file", "logical", "physical"])))]
struct Cli {
    /// Output file, or a directory to auto-name the file in. Dumps to the terminal when omitted.
    output: Option<PathBuf>,

    /// Read from this file.
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Read logical memory (backed by `--image`).
    #[arg(short, long)]
    logical: bool,

    /// Read physical memory.
    #[arg(short, long)]
    physical: bool,

    /// Memory image backing the logical address space.
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Address the memory image is mapped at.
    #[arg(long, value_name = "ADDR", value_parser = parse_number, default_value = "0")]
    image_base: u32,

    /// Offset to read from (decimal or 0x-prefixed hex).
    #[arg(short, long, value_parser = parse_number)]
    offset: Option<u32>,

    /// Number of bytes to read (defaults to the rest of the file, or 0x100 for memory).
    #[arg(short, long, value_parser = parse_number)]
    size: Option<u32>,

    /// Save the raw bytes instead of the rendered dump.
    #[arg(short, long, requires = "output")]
    raw: bool,

    /// Overwrite an existing output file.
    #[arg(long)]
    force: bool,

    /// Display width in columns (defaults to the terminal width).
    #[arg(short, long, value_name = "COLS")]
    width: Option<u16>,

    /// Load settings from a JSON config; flags override it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print no status messages.
    #[arg(short, long)]
    quiet: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = resolve_config(&cli)?;
    cfg.validate()?;
    tracing::debug!(?cfg, "resolved config");

    match &cli.output {
        None => {
            let stdout = std::io::stdout();
            let mut sink = TextSink::new(stdout.lock());
            run_dump(&cli, &cfg, &mut sink)?;
        }
        Some(out) => {
            let path = resolve_output_path(out, cfg.offset, cfg.output);
            dump_to_file(&cli, &cfg, &path)?;
            if !cli.quiet {
                eprintln!("wrote {}", path.display());
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_filter = if verbose {
        "bindump=debug"
    } else {
        "bindump=warn"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn parse_number(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

fn resolve_config(cli: &Cli) -> anyhow::Result<DumpConfig> {
    let base = cli
        .config
        .as_deref()
        .map(DumpConfig::from_path)
        .transpose()?;

    let source = if cli.file.is_some() {
        SourceKind::File
    } else if cli.logical {
        SourceKind::Logical
    } else if cli.physical {
        SourceKind::Physical
    } else if let Some(base) = &base {
        base.source
    } else {
        anyhow::bail!("no source selected: use --file, --logical or --physical");
    };

    let offset = cli
        .offset
        .or(base.as_ref().map(|b| b.offset))
        .unwrap_or(0);

    let size = match cli.size.or(base.as_ref().map(|b| b.size)) {
        Some(size) => size,
        None if source == SourceKind::File => remaining_file_size(cli, offset)?,
        None => DEFAULT_MEMORY_SIZE,
    };

    let width = match (cli.width, &base) {
        (Some(cols), _) => WidthClass::from_columns(cols),
        (None, Some(base)) => base.width,
        (None, None) => WidthClass::from_columns(measure_columns()),
    };

    let loaded_output = base.as_ref().map_or(OutputMode::Display, |b| b.output);
    let output = match (&cli.output, cli.raw, loaded_output) {
        (None, _, OutputMode::Raw) => {
            anyhow::bail!("config requests raw output, which needs an OUTPUT path")
        }
        (None, _, _) => OutputMode::Display,
        (Some(_), true, _) | (Some(_), false, OutputMode::Raw) => OutputMode::Raw,
        (Some(_), false, _) => OutputMode::Text,
    };

    Ok(DumpConfig::new(source, offset, size, width).with_output(output))
}

fn remaining_file_size(cli: &Cli, offset: u32) -> anyhow::Result<u32> {
    let path = cli
        .file
        .as_deref()
        .context("file source requires --file")?;
    let len = std::fs::metadata(path)
        .with_context(|| format!("stat input '{}'", path.display()))?
        .len();
    if u64::from(offset) > len {
        return Err(BindumpError::invalid_argument(format!(
            "offset 0x{offset:X} is beyond the end of input '{}' ({len} bytes)",
            path.display()
        ))
        .into());
    }
    u32::try_from(len - u64::from(offset)).with_context(|| {
        format!(
            "input '{}' is too large to dump in one run; pass --size",
            path.display()
        )
    })
}

fn measure_columns() -> u16 {
    if !std::io::stdout().is_terminal() {
        return FALLBACK_COLUMNS;
    }
    crossterm::terminal::size()
        .map(|(cols, _rows)| cols)
        .unwrap_or(FALLBACK_COLUMNS)
}

fn resolve_output_path(out: &Path, offset: u32, output: OutputMode) -> PathBuf {
    if !out.is_dir() {
        return out.to_path_buf();
    }
    let ext = match output {
        OutputMode::Raw => "bin",
        OutputMode::Display | OutputMode::Text => "txt",
    };
    out.join(format!("bindump-{:06X}.{ext}", offset & 0xFF_FFFF))
}

fn dump_to_file(cli: &Cli, cfg: &DumpConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(input) = cli.file.as_deref().filter(|_| cfg.source == SourceKind::File) {
        ensure_distinct(input, path)?;
    }
    if path.exists() && !cli.force {
        anyhow::bail!(
            "output file '{}' already exists (use --force to overwrite)",
            path.display()
        );
    }

    let file =
        File::create(path).with_context(|| format!("create output '{}'", path.display()))?;
    let dest = BufWriter::new(file);
    let result = match cfg.output {
        OutputMode::Raw => run_dump(cli, cfg, &mut RawSink::new(dest)),
        OutputMode::Display | OutputMode::Text => run_dump(cli, cfg, &mut TextSink::new(dest)),
    };

    if let Err(err) = result {
        if let Err(rm) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %rm, "failed to remove partial output");
        }
        return Err(err.context(format!("dump to '{}'", path.display())));
    }
    Ok(())
}

/// Creating the output truncates it, so it must not be the file being read.
fn ensure_distinct(input: &Path, output: &Path) -> anyhow::Result<()> {
    let (Ok(input), Ok(output)) = (std::fs::canonicalize(input), std::fs::canonicalize(output))
    else {
        return Ok(());
    };
    if input == output {
        anyhow::bail!(
            "output '{}' is the input file; refusing to overwrite it",
            output.display()
        );
    }
    Ok(())
}

fn run_dump(cli: &Cli, cfg: &DumpConfig, sink: &mut dyn FrameSink) -> anyhow::Result<DumpStats> {
    let stats = match cfg.source {
        SourceKind::File => {
            let path = cli
                .file
                .as_deref()
                .context("file source requires --file")?;
            let file =
                File::open(path).with_context(|| format!("open input '{}'", path.display()))?;
            let mut reader = BufReader::new(file);
            bindump::dump(cfg, &mut Source::File(&mut reader), sink)?
        }
        SourceKind::Logical => {
            let image = cli
                .image
                .as_deref()
                .context("logical memory source requires --image")?;
            let mem = FlatMemory::load(image, cli.image_base)?;
            bindump::dump(cfg, &mut Source::Logical(&mem), sink)?
        }
        SourceKind::Physical => bindump::dump(cfg, &mut Source::Physical, sink)?,
    };
    tracing::debug!(
        frames = stats.frames,
        bytes = stats.bytes_sourced,
        "dump complete"
    );
    Ok(stats)
}
