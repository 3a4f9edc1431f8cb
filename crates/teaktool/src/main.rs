mod dump;

use bytesize::ByteSize;
use clap::{Parser, Subcommand};
use coff::{Coff, Space};
use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};
use eyre_pretty::{Context, ContextCompat, Result};
use std::{
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use teak::{
    Ins, Teak,
    ins::{disasm, operand::RegName},
    ucode,
};

#[derive(Debug, clap::Args)]
struct DisasmSettings {
    /// Values of ar0 and ar1, used to resolve indirect operands
    #[arg(long, num_args = 2, value_parser = parse_word)]
    ar: Option<Vec<u16>>,
    /// Values of arp0 to arp3, used to resolve indirect operands
    #[arg(long, num_args = 4, value_parser = parse_word)]
    arp: Option<Vec<u16>>,
}

impl DisasmSettings {
    fn settings(&self) -> Result<disasm::Settings> {
        let ar = self
            .ar
            .as_deref()
            .map(<[u16; 2]>::try_from)
            .transpose()
            .ok()
            .context("expected two ar values")?;

        let arp = self
            .arp
            .as_deref()
            .map(<[u16; 4]>::try_from)
            .transpose()
            .ok()
            .context("expected four arp values")?;

        Ok(disasm::Settings { ar, arp })
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Disassemble a single Teak instruction.
    Disasm {
        /// The instruction word
        #[arg(value_parser = parse_word)]
        code: u16,
        /// The expansion word, for instructions that take one
        #[arg(value_parser = parse_word)]
        expansion: Option<u16>,
        #[command(flatten)]
        settings: DisasmSettings,
    },
    /// Print a listing of an object file
    Dump {
        /// Path to the object file
        input: PathBuf,
        /// Path to the output file. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        settings: DisasmSettings,
    },
    /// Identify the ucode in a raw program memory image
    Identify {
        /// Path to the image
        input: PathBuf,
    },
    /// Load an object file into a fresh DSP and run it
    Run {
        /// Path to the object file
        input: PathBuf,
        /// How many cycles to run for
        #[arg(short, long, default_value_t = 1_000_000)]
        cycles: u64,
    },
}

/// A CLI to inspect and run Teak DSP code.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Action to take
    #[command(subcommand)]
    command: Command,
}

fn parse_word(code: &str) -> Result<u16, std::num::ParseIntError> {
    let code = code.replace('_', "");
    if let Some(code) = code.strip_prefix("0x") {
        u16::from_str_radix(code, 16)
    } else if let Some(code) = code.strip_prefix("0b") {
        u16::from_str_radix(code, 2)
    } else {
        code.parse()
    }
}

fn setup_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_coff(input: &Path) -> Result<Coff> {
    let file = std::fs::File::open(input).context("opening input file")?;
    let coff = Coff::read(BufReader::new(file)).context("parsing object file")?;

    Ok(coff)
}

fn disassemble(code: u16, expansion: Option<u16>, settings: &DisasmSettings) -> Result<()> {
    let settings = settings.settings()?;
    let ins = match expansion {
        Some(extra) => Ins::with_extra(code, extra),
        None => Ins::new(code),
    };

    if disasm::needs_expansion(code) && expansion.is_none() {
        tracing::warn!("0x{code:04X} takes an expansion word, assuming zero");
    }

    println!("{}", disasm::disassemble_with(ins, &settings));
    Ok(())
}

fn dump(input: PathBuf, output: Option<PathBuf>, settings: &DisasmSettings) -> Result<()> {
    let settings = settings.settings()?;
    let coff = load_coff(&input)?;

    match output {
        Some(output) => {
            let file = std::fs::File::create(&output).context("opening output file")?;
            dump::dump(&mut BufWriter::new(file), &coff, settings)?;
        }
        None => dump::dump(&mut std::io::stdout().lock(), &coff, settings)?,
    }

    Ok(())
}

fn identify(input: PathBuf) -> Result<()> {
    let mut image = std::fs::read(&input).context("reading image")?;
    let len = image.len();
    image.truncate(ucode::PROGRAM_VIEW_LEN);

    let crc = ucode::checksum(&image);
    let id = ucode::UcodeId::from_checksum(crc);

    println!(
        "{} ({}): {id} (crc 0x{crc:08X})",
        input.display(),
        ByteSize(len as u64).display()
    );

    Ok(())
}

fn table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.map(|h| Cell::new(h).set_alignment(CellAlignment::Center)));

    table
}

fn run(input: PathBuf, cycles: u64) -> Result<()> {
    let coff = load_coff(&input)?;
    let mut teak = Teak::new();

    for section in &coff.sections {
        let base = section.address();
        for (offset, word) in section.words().enumerate() {
            let addr = base.wrapping_add(offset as u32);
            match section.space() {
                Space::Program => teak.program_write(addr, word),
                Space::Data => teak.data_write(addr as u16, word, true),
            }
        }
    }

    let id = teak.identify_ucode();
    tracing::info!("running {id} ucode for {cycles} cycles");
    teak.run(cycles);

    let regs = teak.registers();
    let mut registers = table(["Register", "Value"]);
    let mut row = |name: &str, value: String| {
        registers.add_row(vec![Cell::new(name), Cell::new(value)]);
    };

    row("pc", format!("0x{:05X}", regs.pc));
    row("idle", teak.is_idle().to_string());
    for (i, a) in regs.a.iter().enumerate() {
        row(&format!("a{i}"), format!("0x{:010X}", a & 0xFF_FFFF_FFFF));
    }
    for (i, b) in regs.b.iter().enumerate() {
        row(&format!("b{i}"), format!("0x{:010X}", b & 0xFF_FFFF_FFFF));
    }
    for (i, r) in regs.r.iter().enumerate() {
        row(&format!("r{i}"), format!("0x{r:04X}"));
    }
    row("sp", format!("0x{:04X}", regs.sp));
    for name in [RegName::Stt0, RegName::Stt1, RegName::Stt2, RegName::Mod0] {
        if let Some(value) = regs.pseudo(name) {
            row(&name.to_string(), format!("0x{value:04X}"));
        }
    }

    let mut mailbox = table(["Channel", "To DSP", "From DSP"]);
    for channel in 0..3 {
        let to_dsp = if teak.send_data_is_empty(channel) {
            "empty".to_owned()
        } else {
            "full".to_owned()
        };

        let from_dsp = if teak.recv_data_is_ready(channel) {
            format!("0x{:04X}", teak.peek_recv_data(channel))
        } else {
            "empty".to_owned()
        };

        mailbox.add_row(vec![
            Cell::new(channel),
            Cell::new(to_dsp),
            Cell::new(from_dsp),
        ]);
    }

    let mut out = std::io::stdout().lock();
    writeln!(out, "{registers}")?;
    writeln!(out, "{mailbox}")?;
    writeln!(out, "semaphore: 0x{:04X}", teak.semaphore())?;

    Ok(())
}

fn main() -> Result<()> {
    eyre_pretty::install()?;
    setup_tracing();

    let args = Args::parse();
    match args.command {
        Command::Disasm {
            code,
            expansion,
            settings,
        } => disassemble(code, expansion, &settings),
        Command::Dump {
            input,
            output,
            settings,
        } => dump(input, output, &settings),
        Command::Identify { input } => identify(input),
        Command::Run { input, cycles } => run(input, cycles),
    }
}
