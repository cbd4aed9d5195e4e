// Sample-probe: prints what each texsample filter returns at given
// coordinates of a synthetic image, for eyeballing kernels and wrap modes.
//
// Usage:
//   sample-probe [OPTIONS] <U> <V> [<U> <V> ...]
//   sample-probe --filter ewa --du 4,0 --dv 0,1 -- -0.5 2.5

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use texsample::ewa_filter::EwaFilter;
use texsample::image_accessors::{ImageSampler, WrapMode};
use texsample::image_filters::CubicFilter;
use texsample::image_view::ImageView;
use texsample::sampler_bilinear::bilinear_wrapmode;
use texsample::sampler_cubic::cubic_wrapmode;
use texsample::sampler_nearest::nearest_wrapmode;
use texsample::Texel;

/// Probe texsample filters on a synthetic image
#[derive(Parser, Debug)]
#[command(name = "sample-probe")]
#[command(about = "Print filtered texel values at chosen coordinates", long_about = None)]
struct Cli {
    /// Image width in texels
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Image height in texels
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Test pattern to sample
    #[arg(short, long, value_enum, default_value_t = Pattern::Checker)]
    pattern: Pattern,

    /// Checker cell size in texels
    #[arg(long, default_value_t = 1)]
    cell: usize,

    /// Storage format of the test image
    #[arg(long, value_enum, default_value_t = Format::U8)]
    format: Format,

    /// Filter to apply
    #[arg(short, long, value_enum, default_value_t = Filter::Bilinear)]
    filter: Filter,

    /// Wrap mode along u (and along v unless --wrap-v is given)
    #[arg(short, long, value_enum, default_value_t = Wrap::Extend)]
    wrap: Wrap,

    /// Wrap mode along v
    #[arg(long, value_enum)]
    wrap_v: Option<Wrap>,

    /// Subtract half a texel so integer+0.5 coordinates hit texel centres
    #[arg(short, long)]
    center: bool,

    /// EWA gradient along screen x, as "du,dv"
    #[arg(long, value_parser = parse_pair, default_value = "1,0")]
    du: [f32; 2],

    /// EWA gradient along screen y, as "du,dv"
    #[arg(long, value_parser = parse_pair, default_value = "0,1")]
    dv: [f32; 2],

    /// EWA: assume an interpolating source (larger minimum footprint)
    #[arg(long)]
    intpol: bool,

    /// EWA: force the result alpha to one
    #[arg(long)]
    no_alpha: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Coordinate pairs: U V [U V ...]
    #[arg(required = true, allow_negative_numbers = true)]
    coords: Vec<f32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pattern {
    Checker,
    Gradient,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    U8,
    F32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Filter {
    Nearest,
    Bilinear,
    Bspline,
    Mitchell,
    CatmullRom,
    Ewa,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Wrap {
    Extend,
    Repeat,
    Border,
}

impl From<Wrap> for WrapMode {
    fn from(w: Wrap) -> Self {
        match w {
            Wrap::Extend => WrapMode::Extend,
            Wrap::Repeat => WrapMode::Repeat,
            Wrap::Border => WrapMode::Border,
        }
    }
}

fn parse_pair(s: &str) -> Result<[f32; 2], String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let a = a.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let b = b.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok([a, b])
}

// ============================================================================
// Logging
// ============================================================================

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|e| anyhow!("installing logger: {e}"))?;
    log::set_max_level(match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    });
    Ok(())
}

// ============================================================================
// Test images
// ============================================================================

/// RGBA test image with channel values in `[0, 1]`.
fn make_pattern(cli: &Cli) -> Vec<f32> {
    let cell = cli.cell.max(1);
    let mut data = Vec::with_capacity(cli.width * cli.height * 4);
    for y in 0..cli.height {
        for x in 0..cli.width {
            match cli.pattern {
                Pattern::Checker => {
                    let on = ((x / cell + y / cell) % 2) as f32;
                    data.extend_from_slice(&[on, on, on, 1.0]);
                }
                Pattern::Gradient => {
                    let r = x as f32 / (cli.width.max(2) - 1) as f32;
                    let g = y as f32 / (cli.height.max(2) - 1) as f32;
                    data.extend_from_slice(&[r, g, 0.5, 1.0]);
                }
            }
        }
    }
    data
}

// ============================================================================
// Probing
// ============================================================================

fn probe<T: Texel>(cli: &Cli, data: &[T]) -> Result<()> {
    let view = ImageView::new_rgba(data, cli.width, cli.height).context("building test image")?;
    let wrap_u = WrapMode::from(cli.wrap);
    let wrap_v = WrapMode::from(cli.wrap_v.unwrap_or(cli.wrap));
    let offset = if cli.center { 0.5 } else { 0.0 };
    log::info!(
        "{}x{} {:?} image, filter {:?}, wrap {:?}/{:?}",
        cli.width,
        cli.height,
        cli.pattern,
        cli.filter,
        wrap_u,
        wrap_v
    );

    let ewa = EwaFilter::new(cli.intpol, !cli.no_alpha);
    let source = ImageSampler::new(view, wrap_u, wrap_v);

    for pair in cli.coords.chunks_exact(2) {
        let (u, v) = (pair[0], pair[1]);
        let (su, sv) = (u - offset, v - offset);
        let mut out = [T::ZERO; 4];
        let rgba = match cli.filter {
            Filter::Nearest => {
                nearest_wrapmode(&view, &mut out, su, sv, wrap_u, wrap_v);
                out.map(T::to_f32)
            }
            Filter::Bilinear => {
                bilinear_wrapmode(&view, &mut out, su, sv, wrap_u, wrap_v);
                out.map(T::to_f32)
            }
            Filter::Bspline => {
                cubic_wrapmode(&view, &mut out, su, sv, &CubicFilter::BSPLINE, wrap_u, wrap_v);
                out.map(T::to_f32)
            }
            Filter::Mitchell => {
                cubic_wrapmode(&view, &mut out, su, sv, &CubicFilter::MITCHELL, wrap_u, wrap_v);
                out.map(T::to_f32)
            }
            Filter::CatmullRom => {
                let k = CubicFilter::CATMULL_ROM;
                cubic_wrapmode(&view, &mut out, su, sv, &k, wrap_u, wrap_v);
                out.map(T::to_f32)
            }
            // EWA places texel centres itself.
            Filter::Ewa => ewa.sample(cli.width, cli.height, [u, v], cli.du, cli.dv, &source),
        };
        println!(
            "({u:>8.3}, {v:>8.3}) -> [{:.4}, {:.4}, {:.4}, {:.4}]",
            rgba[0], rgba[1], rgba[2], rgba[3]
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if cli.coords.len() % 2 != 0 {
        bail!("coordinates come in U V pairs, got {} values", cli.coords.len());
    }

    let pattern = make_pattern(&cli);
    match cli.format {
        Format::U8 => {
            let bytes: Vec<u8> = pattern.iter().map(|&v| u8::from_f32(v * 255.0)).collect();
            probe(&cli, &bytes)
        }
        Format::F32 => probe(&cli, &pattern),
    }
}
