use anyhow::Result;
use clap::{CommandFactory, Parser, error::ErrorKind};
use log::{debug, info};
use std::{io::Write, path::PathBuf, process::ExitCode};

use peak_map::{
    CsvOptions, MapStyle, PeakMapError, PeakTable, font_path_from_env, load_font, render_map,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a map of peaks, marking the ones already bagged", long_about = None)]
struct Args {
    /// Peaks table (GridRef, Name, optional Triangle/Circle columns)
    #[arg(long = "peaks", value_name = "FILE")]
    peaks: PathBuf,

    /// Bagged table (GridRef column)
    #[arg(long = "bagged", value_name = "FILE")]
    bagged: PathBuf,

    /// Output image; format follows the extension (PNG otherwise)
    #[arg(long = "output", value_name = "FILE")]
    output: PathBuf,

    /// Canvas side length in pixels (overrides the style file)
    #[arg(long = "size", value_name = "PX")]
    size: Option<u32>,

    /// Label font file (TrueType/OpenType); falls back to $PEAK_MAP_FONT
    /// and then to system fonts
    #[arg(long = "font", value_name = "FILE")]
    font: Option<PathBuf>,

    /// TOML file overriding the drawing style
    #[arg(long = "style", value_name = "FILE")]
    style: Option<PathBuf>,

    /// Field delimiter of both tables
    #[arg(long = "delimiter", value_name = "CHAR", default_value_t = ',')]
    delimiter: char,
}

fn main() -> ExitCode {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\n{}", Args::command().render_help());
            return ExitCode::from(1);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PeakMapError>() {
                Some(err) => eprintln!("{} error: {e:#}", err.kind()),
                None => eprintln!("Error: {e:#}"),
            }
            let _ = std::io::stderr().flush();
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut style = match &args.style {
        Some(path) => MapStyle::load_from_file(path)?,
        None => MapStyle::default(),
    };
    if let Some(size) = args.size {
        style.canvas_size = size;
    }
    style.validate()?;
    debug!("style: {:?}", style);

    let csv = CsvOptions {
        delimiter: delimiter_byte(args.delimiter)?,
    };

    let font_path = args.font.clone().or_else(font_path_from_env);
    let font = load_font(font_path.as_deref())?;

    let table = PeakTable::load(&args.peaks, &args.bagged, &csv, &style)?;
    println!("{}", table.bounds);

    render_map(&table, &style, font, &args.output)?;

    print!("{}", table);
    info!(
        "{} peaks, {} bagged, map written to {}",
        table.len(),
        table.bagged_count(),
        args.output.display()
    );
    Ok(())
}

fn delimiter_byte(c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        anyhow::bail!("delimiter must be a single ASCII character, got '{c}'")
    }
}
