use sharevote::{load_board, ProtocolParams, Reconstructor, ValidationError};

pub fn command_verify(matches: &clap::ArgMatches, params: &ProtocolParams) {
    let filename = crate::expand(matches.value_of("BOARD").unwrap());

    let entries = match load_board(&filename) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("sharevote verify: unable to load {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    let reconstructor = Reconstructor::new(*params);
    let result = reconstructor.reconstruct_entries(&entries);
    println!("{}", serde_json::to_string_pretty(&result).unwrap());

    if !result.is_clean() {
        eprintln!(
            "sharevote verify: {} record(s) were rejected",
            result.rejected.len()
        );
    }

    match reconstructor.audit_entries(&entries) {
        Ok(_) => println!("> Published tally verified OK"),
        Err(ValidationError::NoPublishedTally) => println!("> No tally has been published yet"),
        Err(e) => {
            eprintln!("sharevote verify: {}", e);
            std::process::exit(1);
        }
    }
}
