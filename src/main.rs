use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nescore::{Nes, StepKind};

/// Headless NES runner: frames, nestest-style traces and screenshots.
#[derive(Parser, Debug)]
#[command(name = "nescore")]
#[command(about = "Run an iNES ROM on the nescore CPU/PPU core", long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value = "1")]
    frames: u64,

    /// Stop after this many instructions (instruction mode)
    #[arg(short = 'n', long)]
    max_instructions: Option<u64>,

    /// Start execution at this hex address instead of the reset vector (e.g. C000)
    #[arg(long, value_parser = parse_hex_u16)]
    start_pc: Option<u16>,

    /// Print a nestest-format trace line before every instruction
    #[arg(short, long)]
    trace: bool,

    /// Save the last frame as PNG (requires the `screenshot` feature)
    #[arg(short, long)]
    screenshot: Option<PathBuf>,
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches('$').trim_start_matches("0x");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address {s:?}: {e}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut nes = Nes::from_ines_file(&args.rom)
        .with_context(|| format!("failed to load ROM {}", args.rom.display()))?;
    if let Some(pc) = args.start_pc {
        nes.set_pc(pc);
    }

    if args.trace || args.max_instructions.is_some() {
        run_instructions(&mut nes, args.trace, args.max_instructions)?;
    } else {
        for frame in 0..args.frames {
            nes.run_frame()
                .with_context(|| format!("emulation stopped during frame {frame}"))?;
        }
        log::info!(
            "ran {} frame(s), {} CPU cycles",
            args.frames,
            nes.bus().cpu_cycle()
        );
    }

    if let Some(path) = &args.screenshot {
        save_screenshot(&nes, path)?;
    }
    Ok(())
}

fn run_instructions(nes: &mut Nes, trace: bool, max: Option<u64>) -> Result<()> {
    let mut executed = 0u64;
    while max.is_none_or(|m| executed < m) {
        if trace {
            println!("{}", nes.trace_line());
        }
        let status = nes
            .step()
            .with_context(|| format!("emulation stopped after {executed} instruction(s)"))?;
        if status.kind == StepKind::Instruction {
            executed += 1;
        }
    }
    log::info!("executed {executed} instruction(s)");
    Ok(())
}

#[cfg(feature = "screenshot")]
fn save_screenshot(nes: &Nes, path: &std::path::Path) -> Result<()> {
    nescore::screenshot::save_png(nes.frame(), path)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(not(feature = "screenshot"))]
fn save_screenshot(_nes: &Nes, _path: &std::path::Path) -> Result<()> {
    anyhow::bail!("--screenshot needs a build with the `screenshot` feature")
}
