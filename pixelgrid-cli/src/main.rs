use clap::Parser;
use pixelgrid::ops::{self, BlurType, Interpolation};
use pixelgrid::{Image, PixelFormat, PixelValue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "pixelgrid CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum InterpolationConfig {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
}

impl From<InterpolationConfig> for Interpolation {
    fn from(value: InterpolationConfig) -> Self {
        match value {
            InterpolationConfig::Nearest => Interpolation::Nearest,
            InterpolationConfig::Bilinear => Interpolation::Bilinear,
            InterpolationConfig::Bicubic => Interpolation::Bicubic,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FormatConfig {
    GrayU8,
    RgbU8,
    ArgbU8,
    GrayU16,
    RgbU16,
    ArgbU16,
    GrayS16,
    RgbS16,
    ArgbS16,
    GrayS32,
    RgbS32,
    ArgbS32,
    GrayF32,
    RgbF32,
    ArgbF32,
}

impl From<FormatConfig> for PixelFormat {
    fn from(value: FormatConfig) -> Self {
        match value {
            FormatConfig::GrayU8 => PixelFormat::GrayU8,
            FormatConfig::RgbU8 => PixelFormat::RgbU8,
            FormatConfig::ArgbU8 => PixelFormat::ArgbU8,
            FormatConfig::GrayU16 => PixelFormat::GrayU16,
            FormatConfig::RgbU16 => PixelFormat::RgbU16,
            FormatConfig::ArgbU16 => PixelFormat::ArgbU16,
            FormatConfig::GrayS16 => PixelFormat::GrayS16,
            FormatConfig::RgbS16 => PixelFormat::RgbS16,
            FormatConfig::ArgbS16 => PixelFormat::ArgbS16,
            FormatConfig::GrayS32 => PixelFormat::GrayS32,
            FormatConfig::RgbS32 => PixelFormat::RgbS32,
            FormatConfig::ArgbS32 => PixelFormat::ArgbS32,
            FormatConfig::GrayF32 => PixelFormat::GrayF32,
            FormatConfig::RgbF32 => PixelFormat::RgbF32,
            FormatConfig::ArgbF32 => PixelFormat::ArgbF32,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Resize {
        width: usize,
        height: usize,
        #[serde(default)]
        interpolation: InterpolationConfig,
        #[serde(default)]
        by_step: bool,
    },
    Blur {
        scale: u32,
    },
    Convert {
        format: FormatConfig,
    },
    /// Channels in memory order (`b, g, r, a`).
    Fill {
        value: Vec<f64>,
    },
    Crop {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    /// Keep the decoded layout instead of normalizing to ARGB_U8.
    native: bool,
    output_path: Option<String>,
    report_path: Option<String>,
    steps: Vec<Step>,
}

#[derive(Debug, Serialize)]
struct Report {
    width: usize,
    height: usize,
    format: String,
    min: Vec<f64>,
    max: Vec<f64>,
}

impl Report {
    fn new(image: &Image) -> Self {
        let (min, max) = ops::min_max(image);
        Self {
            width: image.width(),
            height: image.height(),
            format: image.format().to_string(),
            min: min.channels(),
            max: max.channels(),
        }
    }
}

fn apply(image: Image, step: Step) -> Result<Image, Box<dyn std::error::Error>> {
    let format = image.format();
    let out = match step {
        Step::Resize {
            width,
            height,
            interpolation,
            by_step,
        } => {
            let mut dst = Image::new(format, width, height)?;
            if by_step {
                ops::resize_by_step(&image, &mut dst, interpolation.into())?;
            } else {
                ops::resize(&image, &mut dst, interpolation.into())?;
            }
            dst
        }
        Step::Blur { scale } => {
            let mut dst = Image::new(format, image.width(), image.height())?;
            ops::blur(&image, &mut dst, scale, BlurType::Gaussian)?;
            dst
        }
        Step::Convert { format: target } => {
            let mut dst = Image::new(target.into(), image.width(), image.height())?;
            ops::convert(&image, &mut dst)?;
            dst
        }
        Step::Fill { value } => {
            let mut image = image;
            ops::fill(&mut image, PixelValue::from_channels(format, &value))?;
            image
        }
        Step::Crop {
            x,
            y,
            width,
            height,
        } => image.sub_view(x, y, width, height)?.to_image()?,
    };
    tracing::info!(width = out.width(), height = out.height(), format = %out.format(), "step done");
    Ok(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pixelgrid=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }

    let mut image = if config.native {
        Image::load_file_native(&config.input_path)?
    } else {
        Image::load_file(&config.input_path)?
    };
    for step in config.steps {
        image = apply(image, step)?;
    }

    if let Some(path) = &config.output_path {
        image.save_file(path)?;
    }

    let report = Report::new(&image);
    let json = serde_json::to_string_pretty(&report)?;
    match config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
