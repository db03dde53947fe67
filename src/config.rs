use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

/// how fast the interpreter runs relative to the 60Hz timers
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 16;
pub const DEFAULT_FRAME_RATE: f64 = 60.0;
/// terminals only report presses, so a key counts as held for this long
pub const DEFAULT_KEY_HOLD_FRAMES: u32 = 6;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "chip8",
    about = "CHIP-8 interpreter for the terminal",
    arg_required_else_help = true
)]
pub struct Config {
    /// ROM image, loaded at 0x200 (at most 3584 bytes)
    #[arg(value_name = "ROM")]
    pub rom_path: PathBuf,

    /// Instructions executed per frame.
    #[arg(long = "cycles", default_value_t = DEFAULT_CYCLES_PER_FRAME,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles_per_frame: u32,

    /// Frames per second; the timers tick once per frame.
    #[arg(long = "hz", default_value_t = DEFAULT_FRAME_RATE, value_parser = parse_frame_rate)]
    pub frame_rate: f64,

    /// Frames a key stays down after the terminal reports a press.
    #[arg(long = "hold", default_value_t = DEFAULT_KEY_HOLD_FRAMES)]
    pub key_hold_frames: u32,

    /// No tone while the sound timer runs.
    #[arg(long, default_value_t = false)]
    pub mute: bool,

    /// fixes the random number sequence
    #[arg(long)]
    pub seed: Option<u64>,

    /// stop after this many frames; run until quit/fault otherwise
    #[arg(long = "frames", value_name = "N")]
    pub max_frames: Option<u64>,
}

impl Config {
    pub fn new(rom_path: impl Into<PathBuf>) -> Self {
        Config {
            rom_path: rom_path.into(),
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
            frame_rate: DEFAULT_FRAME_RATE,
            key_hold_frames: DEFAULT_KEY_HOLD_FRAMES,
            mute: false,
            seed: None,
            max_frames: None,
        }
    }
}

fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let hz: f64 = s.parse().map_err(|_| format!("`{}` isn't a number", s))?;
    if hz > 0.0 && hz.is_finite() {
        Ok(hz)
    } else {
        Err(String::from("must be positive"))
    }
}

/// asking for help (or giving no arguments at all) isn't a failure
pub fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 2,
    }
}
