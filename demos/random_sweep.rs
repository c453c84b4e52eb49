use gauge::{Color, DisplayConfig, Gauge, GaugeCommand, GaugeConfig, Segment, Theme};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = GaugeConfig::builder()
        .min(0.0)
        .max(8000.0)
        .values((0..=8).map(|i| i as f64 * 1000.0).collect())
        .major_ticks((1..8).map(|i| i as f64 * 1000.0).collect())
        .minor_ticks((1..16).map(|i| i as f64 * 500.0).collect())
        .segments(vec![
            Segment::new(6000.0, 7000.0, "warn"),
            Segment::new(7000.0, 8000.0, "danger"),
        ])
        .label("RPM")
        .build();
    let mut gauge = Gauge::new(config)?;

    let display = DisplayConfig::builder()
        .title("Random sweep")
        .theme(Theme::default().with_segment_color("warn", Color::new(0xff, 0x98, 0x00)))
        .build();

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let value = rng.random_range(0.0..8500.0);
            if sender.send(GaugeCommand::SetValue(value)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(250));
        }
    });

    println!("Displaying a tachometer with a randomly moving needle. Close the window to exit.");
    gauge.show_with_commands(&display, receiver)
}
