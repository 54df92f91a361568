use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use figgo::{font, render, LayoutOverride, PrintDirection, RenderOptions};

/// Render text as a FIGlet-style ASCII-art banner.
#[derive(Parser, Debug)]
#[command(name = "figgo", version, about)]
struct Args {
    /// Path to an FLF font file (.flf, or a zip-wrapped .flf)
    #[arg(short = 'f', long = "font", default_value = "standard.flf")]
    font: PathBuf,

    /// Force left-to-right composition, regardless of the font's default
    #[arg(short = 'L', long, conflicts_with = "right_to_left")]
    left_to_right: bool,

    /// Force right-to-left composition, regardless of the font's default
    #[arg(short = 'R', long)]
    right_to_left: bool,

    /// Force full-width layout (no overlap), overriding the font's layout
    #[arg(short = 'W', long, conflicts_with_all = ["fitting", "smush"])]
    full_width: bool,

    /// Force fitting (kerned, no smush), overriding the font's layout
    #[arg(short = 'k', long = "kerning", conflicts_with_all = ["full_width", "smush"])]
    fitting: bool,

    /// Force controlled smushing, overriding the font's layout
    #[arg(short = 's', long, conflicts_with_all = ["full_width", "fitting"])]
    smush: bool,

    /// Rune substituted for any input rune missing from the font. Accepts a
    /// literal rune, \uXXXX, \UXXXXXXXX, U+XXXX, a decimal codepoint, or a
    /// 0x-prefixed hex codepoint.
    #[arg(short = 'u', long = "unknown-rune", default_value = "?")]
    unknown_rune: String,

    /// Wrap output at this column width instead of rendering one unbroken line
    #[arg(short = 'w', long)]
    width: Option<usize>,

    /// Trim trailing whitespace from each rendered line
    #[arg(long)]
    trim_whitespace: bool,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Text to render; read from stdin if omitted
    text: Vec<String>,
}

fn read_font(path: &PathBuf) -> Result<font::Font> {
    let file = File::open(path).with_context(|| format!("opening font file {}", path.display()))?;
    font::parse_font(file).with_context(|| format!("parsing font file {}", path.display()))
}

fn read_text(args: &Args) -> Result<String> {
    if args.text.is_empty() {
        let mut buf = String::new();
        io::stdin()
            .read_line(&mut buf)
            .context("reading text from stdin")?;
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    } else {
        Ok(args.text.join(" "))
    }
}

fn build_options(args: &Args) -> Result<RenderOptions> {
    let unknown_rune = figgo::unknown_rune::parse_spec(&args.unknown_rune)
        .with_context(|| format!("parsing --unknown-rune {:?}", args.unknown_rune))?;

    let print_direction = if args.right_to_left {
        Some(PrintDirection::RightToLeft)
    } else if args.left_to_right {
        Some(PrintDirection::LeftToRight)
    } else {
        None
    };

    let layout = if args.full_width || args.fitting || args.smush {
        Some(LayoutOverride {
            full: args.full_width,
            fitting: args.fitting,
            smushing: args.smush,
            rules: None,
        })
    } else {
        None
    };

    Ok(RenderOptions {
        layout,
        print_direction,
        unknown_rune,
        trim_whitespace: args.trim_whitespace,
        width: args.width,
    })
}

fn run() -> Result<()> {
    let args = Args::parse();

    if args.full_width as u8 + args.fitting as u8 + args.smush as u8 > 1 {
        bail!("--full-width, --kerning and --smush are mutually exclusive");
    }

    let font = read_font(&args.font)?;
    for warning in font.warnings() {
        log::warn!("{warning}");
    }

    let text = read_text(&args)?;
    let options = build_options(&args)?;
    let banner = render(&text, &font, &options).context("rendering banner")?;

    match &args.output {
        Some(path) => {
            let mut out = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            writeln!(out, "{banner}")?;
        }
        None => println!("{banner}"),
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("figgo: {err:#}");
        std::process::exit(1);
    }
}
