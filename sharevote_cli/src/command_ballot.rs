use sharevote::{prepare_ballot, ProtocolParams, RngSource};

pub fn command_ballot(matches: &clap::ArgMatches, params: &ProtocolParams) {
    // Required and validated by clap
    let vote: u64 = matches.value_of("vote").unwrap().parse().unwrap();
    let voter_id = crate::expand(matches.value_of("voter").unwrap());
    let token = crate::expand(matches.value_of("token").unwrap());

    let mut source = RngSource::os();
    let ballot = match prepare_ballot(params, &token, &voter_id, vote, &mut source) {
        Ok(ballot) => ballot,
        Err(e) => {
            eprintln!("sharevote ballot: {}", e);
            std::process::exit(1);
        }
    };

    let json = serde_json::to_string_pretty(&ballot).unwrap();
    println!("{}", json);
}
