use gameboy_cpu::cpu::Cpu;
use gameboy_cpu::{Address, Addressable, Cycles, Error, MemoryBus, Result, Steppable};

use std::fs;
use std::io::Write;

use clap::Parser;
use log::{debug, error, info, warn, LevelFilter};

/// M-cycles in one 59.7 Hz video frame.
const CYCLES_PER_FRAME: Cycles = 17556;

/// Runs a raw program image on the CPU core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the program image, loaded byte for byte
    #[arg(short = 'p', long = "program", required = true)]
    program_path: String,

    /// Address the image is copied to (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0x0100", value_parser = parse_address)]
    load_address: Address,

    /// Initial program counter. Defaults to the load address
    #[arg(long, value_parser = parse_address)]
    entry: Option<Address>,

    /// Cycle budget handed to each run call
    #[arg(short, long, default_value_t = CYCLES_PER_FRAME)]
    cycles: Cycles,

    /// Number of run calls
    #[arg(short, long, default_value_t = 60)]
    slices: u32,

    /// Start from the register values left behind by the boot ROM
    #[arg(long, default_value_t = false)]
    post_boot: bool,

    /// Debug mode
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn parse_address(arg: &str) -> std::result::Result<Address, String> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => Address::from_str_radix(hex, 16),
        None => arg.parse::<Address>(),
    };
    parsed.map_err(|e| format!("invalid address {}: {}", arg, e))
}

/// Forwards everything to the flat bus, except that a 0x81 written to the serial control
/// register sends the byte in the serial data register to stdout.
struct SerialCapture {
    bus: MemoryBus,
    output: Vec<u8>,
}

impl Addressable for SerialCapture {
    fn read_u8(&mut self, address: Address) -> u8 {
        self.bus.read_u8(address)
    }

    fn write_u8(&mut self, address: Address, value: u8) {
        if address == 0xFF02 && value == 0x81 {
            let byte = self.bus.read_u8(0xFF01);
            self.output.push(byte);
            let mut stdout = std::io::stdout();
            if let Err(e) = stdout.write_all(&[byte]).and_then(|_| stdout.flush()) {
                warn!("could not echo serial byte {:#04x}: {}", byte, e);
            }
        }
        self.bus.write_u8(address, value)
    }
}

impl SerialCapture {
    fn new() -> Self {
        Self {
            bus: MemoryBus::new(),
            output: Vec::new(),
        }
    }
}

fn read_program(path: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::from(format!("could not read {}: {}", path, e)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.debug {
        builder.filter_level(LevelFilter::Trace);
    }
    builder.init();

    let bytes = read_program(&args.program_path)?;

    let mut cpu = Cpu::with_memory(SerialCapture::new());
    if args.post_boot {
        cpu.emulate_bootrom();
    }
    cpu.load(args.load_address, &bytes)?;

    let mut pc = args.entry.unwrap_or(args.load_address);
    for slice in 0..args.slices {
        match cpu.run(pc, args.cycles) {
            Ok((next_pc, overrun)) => {
                pc = next_pc;
                debug!("slice {} overran by {}: {}", slice, -overrun, cpu.debug_info());
            }
            Err(e) => {
                error!("{}", e);
                info!("{}", cpu.debug_info());
                return Err(e);
            }
        }
    }

    let serial_bytes = cpu.memory().output.len();
    println!();
    println!("{}", cpu.debug_info());
    info!("{} bytes written to serial", serial_bytes);
    Ok(())
}
