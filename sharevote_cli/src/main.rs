use clap::{App, AppSettings, Arg, SubCommand};
use log::LevelFilter;
use sharevote::ProtocolParams;

mod command_ballot;
mod command_simulate;
mod command_verify;

pub use command_ballot::*;
pub use command_simulate::*;
pub use command_verify::*;

fn main() {
    let matches = App::new("ShareVote CLI")
        .version("0.1")
        .about("Prepares secret-shared ballots and verifies published tallies")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("ballot")
                .about("Prepare a ballot and print the submission with its openings")
                .arg(
                    Arg::with_name("vote")
                        .long("vote")
                        .takes_value(true)
                        .required(true)
                        .possible_values(&["0", "1"])
                        .help("The vote: 1 for yes, 0 for no"),
                )
                .arg(
                    Arg::with_name("voter")
                        .long("voter")
                        .takes_value(true)
                        .required(true)
                        .help("Voter identifier"),
                )
                .arg(
                    Arg::with_name("token")
                        .long("token")
                        .takes_value(true)
                        .required(true)
                        .help("One-time token issued by the election authority"),
                ),
        )
        .subcommand(
            SubCommand::with_name("verify")
                .about("Reconstruct the tally from a bulletin board and audit any published tally")
                .arg(
                    Arg::with_name("BOARD")
                        .index(1)
                        .required(true)
                        .help("Bulletin board as a JSON array of records"),
                ),
        )
        .subcommand(
            SubCommand::with_name("simulate")
                .about("Run a complete election in memory")
                .arg(
                    Arg::with_name("votes")
                        .long("votes")
                        .takes_value(true)
                        .default_value("1,0,1,1")
                        .help("Comma-separated list of votes"),
                ),
        )
        .get_matches();

    init_logger(matches.occurrences_of("v"));

    let params = ProtocolParams::from_env().unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    match matches.subcommand() {
        ("ballot", Some(matches)) => command_ballot(matches, &params),
        ("verify", Some(matches)) => command_verify(matches, &params),
        ("simulate", Some(matches)) => command_simulate(matches, &params),
        _ => unreachable!(),
    }
}

fn init_logger(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    // RUST_LOG, when set, takes precedence
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

pub fn expand(input: &str) -> String {
    shellexpand::full(input)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| input.to_owned())
}
