use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "psd", about = "Streaming FFT and power spectrum of a WAV recording")]
pub struct Cli {
    /// Input WAV file (mono = real samples, stereo = I/Q pairs)
    pub input: PathBuf,

    /// TOML file with processing parameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// FFT size in samples
    #[arg(short = 'n', long)]
    pub fft_size: Option<usize>,

    /// Samples shared by consecutive frames
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Power frames averaged per output frame
    #[arg(long)]
    pub num_avg: Option<usize>,

    /// Emit power as coeff * log10(p)
    #[arg(long)]
    pub log_coeff: Option<f64>,

    /// Put the frequency axis in RF units
    #[arg(long)]
    pub rf_freq_units: bool,

    /// Channel RF reference frequency keyword (Hz)
    #[arg(long)]
    pub chan_rf: Option<f64>,

    /// Collection RF reference frequency keyword (Hz)
    #[arg(long)]
    pub col_rf: Option<f64>,

    /// Samples per push
    #[arg(long, default_value_t = 4096)]
    pub chunk: usize,

    /// Stream id for the recording
    #[arg(long, default_value = "wav")]
    pub stream_id: String,
}
