use anyhow::Context;
use bootsmith::{BootOptions, DisplayMessage, Fixture, MediaGeometry, MessagePolicy};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
    /// Build a boot sector, and optionally a disk image containing it
    Build(BuildArgs),
    /// Pad an existing boot sector into a disk image
    Pad(PadArgs),
    /// Check the boot signature and message of a sector or disk image
    Inspect(InspectArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Build(args) => args.verbose,
            Command::Pad(args) => args.verbose,
            Command::Inspect(args) => args.verbose,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FixtureArg {
    Minimal,
    Working,
}

impl From<FixtureArg> for Fixture {
    fn from(value: FixtureArg) -> Self {
        match value {
            FixtureArg::Minimal => Fixture::Minimal,
            FixtureArg::Working => Fixture::Working,
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct BuildArgs {
    /// Where to write the 512 byte boot sector
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Where to write the disk image
    #[arg(short, long)]
    image: Option<PathBuf>,
    /// Disk image size in bytes, or a floppy preset such as 1.44M or 720K
    #[arg(long, default_value = "1.44M", value_parser = parse_size)]
    image_size: u64,
    /// Stock message and offset to start from
    #[arg(long, value_enum, default_value = "minimal")]
    fixture: FixtureArg,
    /// A line of the message, can be repeated
    #[arg(short, long = "line")]
    lines: Vec<String>,
    /// Offset of the message within the sector, decimal or 0x hex
    #[arg(long, value_parser = parse_offset)]
    offset: Option<u16>,
    /// Cut a message that does not fit instead of failing
    #[arg(long)]
    truncate: bool,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct PadArgs {
    sector: PathBuf,
    #[arg(short, long)]
    output: PathBuf,
    /// Disk image size in bytes, or a floppy preset such as 1.44M or 720K
    #[arg(long, default_value = "1.44M", value_parser = parse_size)]
    size: u64,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    input: PathBuf,
    /// Offset of the message to print, decimal or 0x hex
    #[arg(long, value_parser = parse_offset)]
    offset: Option<u16>,
    #[arg(short, long)]
    verbose: bool,
}

fn parse_number(value: &str) -> Result<u64, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("invalid number `{value}`: {err}"))
}

fn parse_size(value: &str) -> Result<u64, String> {
    match MediaGeometry::from_name(value) {
        Some(geometry) => Ok(geometry.size_bytes()),
        None => parse_number(value),
    }
}

fn parse_offset(value: &str) -> Result<u16, String> {
    let offset = parse_number(value)?;
    u16::try_from(offset).map_err(|_| format!("offset `{value}` does not fit in 16 bits"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    simple_logger::SimpleLogger::new()
        .with_level(if args.cmd.verbose() {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Warn
        })
        .init()
        .context("failed to initialise logging")?;

    match args.cmd {
        Command::Build(args) => build(args),
        Command::Pad(args) => pad(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    let mut options = BootOptions::default()
        .with_fixture(args.fixture.into())
        .with_image_size(args.image_size);
    if args.lines.is_empty() {
        log::info!("Using the {} message", options.fixture.name());
    } else {
        let message = DisplayMessage::from_lines(&args.lines).context("invalid message")?;
        options = options.with_message(message);
    }
    if let Some(offset) = args.offset {
        options = options.with_message_offset(offset);
    }
    if args.truncate {
        options = options.with_message_policy(MessagePolicy::Truncate);
    }
    if args.output.is_none() && args.image.is_none() {
        anyhow::bail!("nothing to write, pass --output and/or --image");
    }

    let artifacts =
        bootsmith::write_artifacts(&options, args.output.as_deref(), args.image.as_deref())
            .context("failed to build boot sector")?;

    let signature = artifacts.sector.signature();
    if let Some(output) = &args.output {
        println!("Created {}", output.display());
        println!("   Size: {} bytes", artifacts.sector.as_bytes().len());
        println!(
            "   Boot signature: 0x{:02X}{:02X}",
            signature[0], signature[1]
        );
    }
    if let (Some(path), Some(image)) = (&args.image, &artifacts.image) {
        println!("Created {} ({} bytes)", path.display(), image.len());
        println!("Test with:");
        println!("{}", bootsmith::emulator_command(path));
    }
    Ok(())
}

fn pad(args: PadArgs) -> anyhow::Result<()> {
    let image = bootsmith::pad(&args.sector, args.size, &args.output).with_context(|| {
        format!(
            "failed to pad {} into {}",
            args.sector.display(),
            args.output.display()
        )
    })?;
    println!("Created {} ({} bytes)", args.output.display(), image.len());
    println!("{}", bootsmith::emulator_command(&args.output));
    Ok(())
}

fn inspect(args: InspectArgs) -> anyhow::Result<()> {
    let inspection = bootsmith::inspect(&args.input, args.offset)
        .with_context(|| format!("failed to inspect {}", args.input.display()))?;

    println!("{}", args.input.display());
    println!("   Size: {} bytes", inspection.len);
    println!(
        "   Boot signature: {} ({})",
        inspection.signature_hex(),
        if inspection.is_bootable() {
            "bootable"
        } else {
            "not bootable"
        }
    );
    if inspection.len > 512 {
        println!(
            "   Rest of image: {}",
            if inspection.blank_tail {
                "blank"
            } else {
                "has data"
            }
        );
    }
    if let Some(message) = &inspection.message {
        let text = &message[..message.len() - 1];
        println!("   Message: \"{}\"", text.escape_ascii());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_fixture_names() {
        use clap::ValueEnum;

        for arg in FixtureArg::value_variants() {
            let value = arg.to_possible_value().unwrap();
            assert_eq!(value.get_name(), Fixture::from(*arg).name());
        }
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1.44M"), Ok(1_474_560));
        assert_eq!(parse_size("720k"), Ok(737_280));
        assert_eq!(parse_size("4096"), Ok(4096));
        assert_eq!(parse_size("0x200"), Ok(512));
        assert!(parse_size("big").is_err());
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("0x2A"), Ok(42));
        assert_eq!(parse_offset("48"), Ok(48));
        assert!(parse_offset("0x10000").is_err());
    }

    #[test]
    fn test_build_args() {
        let args = Args::try_parse_from([
            "bootsmith",
            "build",
            "-o",
            "boot.bin",
            "--line",
            "SAGE OS Bootloader Working!",
            "--line",
            "System Ready.",
            "--offset",
            "0x2A",
        ])
        .unwrap();
        let Command::Build(build) = args.cmd else {
            panic!("expected build");
        };
        assert_eq!(build.lines.len(), 2);
        assert_eq!(build.offset, Some(0x2A));
        assert_eq!(build.image_size, 1_474_560);
        assert!(build.image.is_none());
    }
}
