mod cli;
mod wav;

use anyhow::{Context, Result};
use clap::Parser;
use psd::{Keywords, OutputEvent, OutputSink, Outputs, Packet, PsdConfig, SessionManager, CHAN_RF, COL_RF};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use cli::Cli;

/// Prints the strongest bin of every power frame
#[derive(Default)]
struct PeakReport {
    axis: Mutex<(f64, f64)>,
}

impl OutputSink for PeakReport {
    fn push(&self, event: OutputEvent) {
        let mut axis = self.axis.lock().unwrap_or_else(|p| p.into_inner());
        match event {
            OutputEvent::Metadata(meta) => {
                *axis = (meta.xdelta, meta.xstart);
                println!(
                    "# {}: xdelta={} Hz xstart={} Hz ydelta={} s bins={}",
                    meta.stream_id, meta.xdelta, meta.xstart, meta.ydelta, meta.subsize
                );
            }
            OutputEvent::Frame { frame_id, data, .. } => {
                let (xdelta, xstart) = *axis;
                let peak = data
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| a.total_cmp(b));
                if let Some((bin, power)) = peak {
                    println!(
                        "{:>6}  bin {:>6}  {:>14.3} Hz  {:.6e}",
                        frame_id,
                        bin,
                        xstart + bin as f64 * xdelta,
                        power
                    );
                }
            }
            OutputEvent::EndOfStream { stream_id } => println!("# {}: end of stream", stream_id),
        }
    }
}

/// Counts transform frames
#[derive(Default)]
struct FrameCounter {
    frames: AtomicU64,
}

impl OutputSink for FrameCounter {
    fn push(&self, event: OutputEvent) {
        if let OutputEvent::Frame { .. } = event {
            self.frames.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn build_config(cli: &Cli) -> Result<PsdConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = psd::load_config(path)?;
            log::info!("Loaded config from {}", path.display());
            config
        }
        None => PsdConfig::default(),
    };

    // Command line values take precedence over the file
    if let Some(fft_size) = cli.fft_size {
        config.fft_size = fft_size;
    }
    if let Some(overlap) = cli.overlap {
        config.overlap = overlap;
    }
    if let Some(num_avg) = cli.num_avg {
        config.num_average = num_avg;
    }
    if let Some(coeff) = cli.log_coeff {
        config.log_coefficient = coeff;
    }
    if cli.rf_freq_units {
        config.rf_freq_units = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let recording = wav::read_recording(&cli.input)?;

    log::info!("Input: {}", cli.input.display());
    log::info!(
        "{} Hz, {}, fft_size={} overlap={} num_avg={}",
        recording.sample_rate,
        if recording.complex { "complex" } else { "real" },
        config.fft_size,
        config.overlap,
        config.num_average
    );

    let counter = Arc::new(FrameCounter::default());
    let manager = SessionManager::new(
        config,
        Outputs::new(counter.clone(), Arc::new(PeakReport::default())),
    )?;

    let mut keywords = Keywords::new();
    if let Some(rf) = cli.chan_rf {
        keywords.insert(CHAN_RF, rf);
    }
    if let Some(rf) = cli.col_rf {
        keywords.insert(COL_RF, rf);
    }

    let per_sample = if recording.complex { 2 } else { 1 };
    let chunk = cli.chunk.max(1) * per_sample;
    let mut chunks = recording.samples.chunks(chunk).peekable();
    let mut first = true;

    while let Some(samples) = chunks.next() {
        let mut packet = Packet {
            stream_id: &cli.stream_id,
            samples,
            sample_rate: recording.sample_rate,
            complex: recording.complex,
            end_of_stream: chunks.peek().is_none(),
            keywords: None,
        };
        if first {
            packet.keywords = Some(keywords.clone());
            first = false;
        }
        manager
            .push(&packet)
            .with_context(|| format!("Push to stream '{}' failed", cli.stream_id))?;
    }
    // Empty recordings still get a terminated stream
    if first {
        manager.update_metadata(&cli.stream_id, recording.sample_rate, recording.complex, keywords)?;
        manager.end_of_stream(&cli.stream_id);
    }

    log::info!("Processed {} frame(s)", counter.frames.load(Ordering::Relaxed));
    Ok(())
}
