use clap::{ArgAction, Parser, ValueHint};
use env_logger::Env;
use log::{debug, error, info, warn};
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use gauge::{DisplayConfig, Gauge, GaugeCommand, GaugeConfig};

/// Draw a circular gauge, as SVG or in a window fed from stdin.
#[derive(Debug, Parser)]
#[command(name = "gauge", version)]
struct Cli {
    /// JSON gauge options: min, max, value, values, majorTicks, minorTicks, segments, label
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Override the range
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    range: Option<Vec<f64>>,
    #[arg(long, allow_negative_numbers = true)]
    value: Option<f64>,
    /// Caption under the needle
    #[arg(long)]
    label: Option<String>,
    /// Write SVG to this file ("-" for stdout) and exit
    #[arg(long, value_hint = ValueHint::FilePath)]
    svg: Option<PathBuf>,
    /// Font for labels in the window
    #[arg(long, value_hint = ValueHint::FilePath)]
    font: Option<PathBuf>,
    #[arg(long, default_value_t = 300)]
    width: usize,
    #[arg(long, default_value_t = 300)]
    height: usize,
    #[arg(long, default_value = "Gauge")]
    title: String,
    /// Move the needle randomly instead of reading stdin
    #[arg(long, action = ArgAction::SetTrue)]
    demo: bool,
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(if cli.verbose {
        "debug"
    } else {
        "info"
    }))
    .init();

    if let Err(err) = run(cli) {
        error!("{err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let mut gauge = Gauge::new(config)?;

    let mut display = DisplayConfig::builder()
        .title(cli.title.clone())
        .window_width(cli.width)
        .window_height(cli.height)
        .build();

    if let Some(path) = cli.svg.as_ref() {
        let svg = gauge.to_svg(&display.theme);
        if path.as_os_str() == "-" {
            io::stdout().write_all(svg.as_bytes())?;
        } else {
            std::fs::write(path, svg)?;
            info!("wrote {}", path.display());
        }
        return Ok(());
    }

    if let Some(path) = cli.font.as_ref() {
        display.font_data = Some(std::fs::read(path)?);
    }

    let (sender, receiver) = mpsc::channel();
    if cli.demo {
        let range = gauge.geometry().range();
        spawn_demo(sender, range.min(), range.max());
    } else {
        spawn_stdin_reader(sender);
    }

    gauge.show_with_commands(&display, receiver)
}

fn load_config(cli: &Cli) -> Result<GaugeConfig, gauge::GaugeError> {
    let mut config = match cli.config.as_ref() {
        Some(path) => GaugeConfig::from_path(path)?,
        None => GaugeConfig::default(),
    };
    if let Some(range) = cli.range.as_deref() {
        if let [min, max] = range {
            config.min = min.min(*max);
            config.max = min.max(*max);
        }
    }
    if let Some(value) = cli.value {
        config.value = Some(value);
    }
    if let Some(label) = cli.label.as_ref() {
        config.label = label.clone();
    }
    debug!("effective config: {:?}", config);
    Ok(config)
}

/// One value per line; anything unparsable is logged and skipped.
fn spawn_stdin_reader(sender: Sender<GaugeCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match line.trim().parse::<f64>() {
                Ok(value) => {
                    if sender.send(GaugeCommand::SetValue(value)).is_err() {
                        break;
                    }
                }
                Err(_) => warn!("ignoring non-numeric input {:?}", line.trim()),
            }
        }
    });
}

fn spawn_demo(sender: Sender<GaugeCommand>, min: f64, max: f64) {
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let value = rng.random_range(min..=max);
            if sender.send(GaugeCommand::SetValue(value)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(500));
        }
    });
}
