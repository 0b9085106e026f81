use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::LevelFilter;

use crcsim::config::{self, Config, Direction, InputFormat};
use crcsim::{endian, io as input, BitBuffer, Generator, LogTracer};

#[derive(Parser, Debug)]
#[command(name = "crcsim", about = "Append and check CRC remainders, with optional burst errors")]
struct Cli {
    /// Send phase only: append the remainder, but do not check it
    #[arg(short = 's', conflicts_with = "receive")]
    send: bool,
    /// Receive phase only: check for a remainder, but do not append one
    #[arg(short = 'r')]
    receive: bool,
    /// Read input as a string of ASCII '0's and '1's
    #[arg(short = 'b', overrides_with = "characters")]
    binary: bool,
    /// Read input as raw characters (default)
    #[arg(short = 'c', overrides_with = "binary")]
    characters: bool,
    /// Print only the resulting bit string; use with -b to chain runs
    #[arg(short = 'o')]
    binary_only: bool,
    /// Generator polynomial, in 0x-prefixed hex or decimal
    #[arg(short = 'g', value_parser = config::parse_generator, default_value = "0x04C11DB7")]
    generator: u32,
    /// Introduce a burst error of this many bits
    #[arg(short = 'e', default_value_t = 0)]
    burst: usize,
    /// Read from this file instead of stdin ("-" is stdin)
    #[arg(short = 'f', default_value = "-")]
    file: PathBuf,
    /// Trace every register step
    #[arg(short = 'v', overrides_with = "quiet")]
    verbose: bool,
    /// Only report warnings and errors
    #[arg(short = 'q', overrides_with = "verbose")]
    quiet: bool,
}

impl Cli {
    // -b and -c override each other, so at most one is set.
    fn input_format(&self) -> InputFormat {
        if self.binary && !self.characters {
            InputFormat::Binary
        } else {
            InputFormat::Characters
        }
    }

    fn direction(&self) -> Direction {
        match (self.send, self.receive) {
            (true, _) => Direction::Send,
            (_, true) => Direction::Receive,
            _ => Direction::SendReceive,
        }
    }

    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Trace
        } else if self.quiet || self.binary_only {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    fn reads_stdin(&self) -> bool {
        self.file == Path::new("-")
    }
}

fn config_from(cli: &Cli) -> Result<Config> {
    Ok(Config {
        format: cli.input_format(),
        direction: cli.direction(),
        generator: Generator::new(cli.generator).context("invalid generator")?,
        burst_bits: cli.burst,
        binary_only: cli.binary_only,
    })
}

fn init_logging(level: LevelFilter) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .try_init()
        .map_err(|e| anyhow!("installing logger: {e}"))
}

fn read_message(cli: &Cli, format: InputFormat) -> Result<BitBuffer> {
    let message = if cli.reads_stdin() {
        let stdin = io::stdin().lock();
        match format {
            InputFormat::Characters => input::read_characters(stdin),
            InputFormat::Binary => input::read_binary(stdin),
        }
    } else {
        let file = File::open(&cli.file)
            .with_context(|| format!("opening {}", cli.file.display()))?;
        let reader = BufReader::new(file);
        match format {
            InputFormat::Characters => input::read_characters(reader),
            InputFormat::Binary => input::read_binary(reader),
        }
    };
    message.with_context(|| format!("reading {}", cli.file.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level())?;

    if endian::host_is_big_endian() {
        log::warn!("big-endian host: register bytes are reordered before readout");
    }

    let config = config_from(&cli)?;
    let message = read_message(&cli, config.format)?;
    if config.format == InputFormat::Characters {
        log::info!("MESSAGE READ: {}", String::from_utf8_lossy(message.as_bytes()));
    }
    log::info!("IN BINARY:    {}", message);
    log::debug!("OCTETS:       {}", message.octets());

    let mut rng = rand::rng();
    let outcome = config::run(&config, &message, &mut rng, &mut LogTracer);
    log::info!("{}", outcome);

    if config.binary_only {
        println!("{}", outcome.message);
    }

    std::process::exit(outcome.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crcsim::Error;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("crcsim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_round_trip_from_stdin() -> Result<()> {
        let cli = parse(&[]);
        let config = config_from(&cli)?;
        assert!(cli.reads_stdin());
        assert_eq!(config.direction, Direction::SendReceive);
        assert_eq!(config.format, InputFormat::Characters);
        assert_eq!(config.generator, Generator::default());
        assert_eq!(config.burst_bits, 0);
        assert!(!config.binary_only);
        assert_eq!(cli.log_level(), LevelFilter::Info);
        Ok(())
    }

    #[test]
    fn send_and_receive_flags_pick_direction() -> Result<()> {
        assert_eq!(config_from(&parse(&["-s"]))?.direction, Direction::Send);
        assert_eq!(config_from(&parse(&["-r"]))?.direction, Direction::Receive);
        assert!(Cli::try_parse_from(["crcsim", "-s", "-r"]).is_err());
        Ok(())
    }

    #[test]
    fn last_of_binary_and_characters_wins() {
        assert_eq!(parse(&["-b"]).input_format(), InputFormat::Binary);
        assert_eq!(parse(&["-b", "-c"]).input_format(), InputFormat::Characters);
        assert_eq!(parse(&["-c", "-b"]).input_format(), InputFormat::Binary);
    }

    #[test]
    fn bit_string_output_quiets_the_log() -> Result<()> {
        let cli = parse(&["-o", "-b"]);
        assert!(config_from(&cli)?.binary_only);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        assert_eq!(parse(&["-o", "-v"]).log_level(), LevelFilter::Trace);
        assert_eq!(parse(&["-q"]).log_level(), LevelFilter::Warn);
        assert_eq!(parse(&["-q", "-v"]).log_level(), LevelFilter::Trace);
        assert_eq!(parse(&["-v", "-q"]).log_level(), LevelFilter::Warn);
        Ok(())
    }

    #[test]
    fn generator_accepts_hex_and_decimal() -> Result<()> {
        assert_eq!(config_from(&parse(&["-g", "0x18005"]))?.generator.degree(), 16);
        assert_eq!(config_from(&parse(&["-g", "263"]))?.generator.value(), 0x107);
        assert!(Cli::try_parse_from(["crcsim", "-g", "0xNOPE"]).is_err());
        Ok(())
    }

    #[test]
    fn degree_zero_generator_is_rejected() {
        let err = config_from(&parse(&["-g", "1"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidGenerator(1))
        ));
    }

    #[test]
    fn file_and_burst_are_passed_through() -> Result<()> {
        let cli = parse(&["-f", "message.txt", "-e", "12"]);
        assert!(!cli.reads_stdin());
        assert_eq!(cli.file, PathBuf::from("message.txt"));
        assert_eq!(config_from(&cli)?.burst_bits, 12);
        assert!(parse(&["-f", "-"]).reads_stdin());
        Ok(())
    }
}
