//! `n1mm2adif` - CLI for the N1MM Logger+ to ADIF bridge
//!
//! This binary listens for N1MM contact broadcasts, converts saved payloads,
//! and inspects band and configuration settings.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;

use n1mm2adif::cli::{BandCommand, Cli, Command, ConfigCommand, ConvertCommand, ListenCommand};
use n1mm2adif::formatter::fields::scale_frequency;
use n1mm2adif::pipeline::{Outcome, PipelineSettings};
use n1mm2adif::transport::UdpListener;
use n1mm2adif::{classify, init_logging, Config, ContactLogger, FileSink, Pipeline, RecordFormatter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // `config validate` reports load errors itself
    if let Command::Config(ConfigCommand::Validate { file }) = cli.command {
        return handle_validate(file.or(cli.config));
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Listen(listen_cmd) => handle_listen(config, &listen_cmd),
        Command::Convert(convert_cmd) => handle_convert(&config, &convert_cmd),
        Command::Band(band_cmd) => handle_band(&band_cmd),
        Command::Config(config_cmd) => handle_config(&config, &config_cmd),
    }
}

fn logger_for(config: &Config, output_dir: Option<&PathBuf>) -> ContactLogger<FileSink> {
    let directory = output_dir
        .cloned()
        .unwrap_or_else(|| config.output_directory());
    let formatter = RecordFormatter::new(config.contest_rules());
    ContactLogger::new(formatter, FileSink::new(directory))
}

fn handle_listen(mut config: Config, cmd: &ListenCommand) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = cmd.port {
        config.listener.port = port;
        config.validate()?;
    }

    let logger = logger_for(&config, cmd.output_dir.as_ref());
    info!("Writing ADIF logs to {}", logger.sink().directory().display());
    let settings = PipelineSettings::from(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let listener = UdpListener::bind(&config.listener).await?;
        let pipeline = Pipeline::new(listener, logger, settings);

        tokio::select! {
            result = pipeline.run() => {
                result?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupted, shutting down");
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn handle_convert(config: &Config, cmd: &ConvertCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut logger = logger_for(config, cmd.output_dir.as_ref());
    let mut failed = 0usize;

    for path in &cmd.files {
        let result = std::fs::read(path)
            .map_err(n1mm2adif::Error::from)
            .and_then(|payload| logger.handle_datagram(&payload));

        match result {
            Ok(Outcome::Logged { station_callsign }) => {
                println!("{}: logged for {station_callsign}", path.display());
            }
            Ok(Outcome::NotAContact) => {
                println!("{}: not a contactinfo payload, skipped", path.display());
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {e}", path.display());
            }
        }
    }

    println!(
        "Logged {} of {} files to {}",
        logger.logged(),
        cmd.files.len(),
        logger.sink().directory().display()
    );

    if failed > 0 {
        return Err(format!("{failed} files could not be converted").into());
    }
    Ok(())
}

fn handle_band(cmd: &BandCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mhz = if cmd.raw {
        scale_frequency(&cmd.frequency)
    } else {
        cmd.frequency.trim().parse::<Decimal>().ok()
    };
    let mhz = mhz.ok_or_else(|| format!("not a decimal frequency: {:?}", cmd.frequency))?;

    println!("{mhz} MHz: {}", classify(mhz));
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                print_config(config);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            handle_validate(file.clone())?;
        }
    }
    Ok(())
}

fn print_config(config: &Config) {
    let listener = &config.listener;
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Listener]");
    println!("  Address:            {}", listener.socket_addr());
    match listener.multicast_group {
        Some(group) => println!("  Multicast group:    {group} on {}", listener.interface),
        None => println!("  Multicast group:    (none)"),
    }
    println!("  Poll timeout (ms):  {}", listener.poll_timeout_ms);
    println!("  Backoff (ms):       {}", listener.timeout_backoff_ms);
    println!("  Max datagram:       {}", listener.max_datagram_size);
    println!();
    println!("[Output]");
    println!("  Directory:          {}", config.output_directory().display());
    println!("  Drain interval (ms): {}", config.output.drain_interval_ms);
    println!();
    println!("[Contests]");
    println!(
        "  Extra RTTY contests: {}",
        config.contests.rtty_contests.len()
    );
    println!(
        "  Exchange overrides:  {}",
        config.contests.exchange_rules.len()
    );
}
