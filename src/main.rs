use clap::Parser;
use dotmatrix::cartridge::Cartridge;
use dotmatrix::ppu::buffer::FrameBuffer;
use dotmatrix::ppu::display::FrameSink;
use dotmatrix::{Emulator, EmulatorConfig, DISPLAY_REFRESH_RATE};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use std::fs;

#[derive(Parser)]
#[command(version, about = "Headless DMG core emulator")]
struct Cli {
    /// Path of the ROM image to load.
    rom: PathBuf,

    /// Emit a trace line per executed instruction (requires RUST_LOG=trace).
    #[arg(long)]
    trace: bool,

    /// Skip the boot ROM handshake.
    #[arg(long)]
    fastboot: bool,

    /// Stop after this many frames instead of running forever.
    #[arg(long)]
    frames: Option<u64>,

    /// Run as fast as possible instead of pacing to the panel refresh rate.
    #[arg(long)]
    no_throttle: bool,
}

/// Counts presented frames and reports the effective rate once a second.
#[derive(Default)]
struct RateSink {
    frames: u64,
    window_start: Option<Instant>,
}

impl FrameSink for RateSink {
    fn present(&mut self, _frame: &FrameBuffer) {
        let start = *self.window_start.get_or_insert_with(Instant::now);
        self.frames += 1;
        let elapsed = start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            info!("{:.1} fps", self.frames as f64 / elapsed.as_secs_f64());
            self.frames = 0;
            self.window_start = Some(Instant::now());
        }
    }
}

/// Limits the frame rate to the configured panel refresh rate.
struct FrameLimiter {
    frame_duration: Duration,
    last_frame: Instant,
}

impl FrameLimiter {
    fn new(refresh_rate: f64) -> Self {
        Self {
            frame_duration: Duration::from_secs_f64(1.0 / refresh_rate),
            last_frame: Instant::now(),
        }
    }

    /// Blocks the current thread until the allotted frame time has passed.
    fn wait(&mut self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_duration {
            spin_sleep::sleep(self.frame_duration - elapsed);
        }
        self.last_frame = Instant::now();
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let rom = match fs::read(&cli.rom) {
        Ok(rom) => rom,
        Err(err) => {
            error!("cannot read {}: {err}", cli.rom.display());
            return ExitCode::FAILURE;
        }
    };
    let cartridge = match Cartridge::from_bytes(&rom) {
        Ok(cartridge) => cartridge,
        Err(err) => {
            error!("cannot load {}: {err}", cli.rom.display());
            return ExitCode::FAILURE;
        }
    };

    let config = EmulatorConfig {
        debug_trace: cli.trace,
        fastboot: cli.fastboot,
    };
    let mut emulator = Emulator::new(cartridge, Box::new(RateSink::default()), config);
    let mut limiter = FrameLimiter::new(DISPLAY_REFRESH_RATE);

    let mut frame = 0u64;
    loop {
        if cli.frames.is_some_and(|max| frame >= max) {
            info!("finished after {frame} frames");
            return ExitCode::SUCCESS;
        }
        if let Err(err) = emulator.run_frame() {
            error!("emulation halted: {err}");
            return ExitCode::FAILURE;
        }
        if !cli.no_throttle {
            limiter.wait();
        }
        frame += 1;
    }
}
