use sharevote::{
    prepare_ballot, BulletinBoard, Election, MemTokenAuthority, ProtocolParams, RngSource,
};

pub fn command_simulate(matches: &clap::ArgMatches, params: &ProtocolParams) {
    let votes: Vec<u64> = matches
        .value_of("votes")
        .unwrap()
        .split(',')
        .map(|v| {
            v.trim().parse().unwrap_or_else(|_| {
                eprintln!("sharevote simulate: invalid vote {:?}", v);
                std::process::exit(1);
            })
        })
        .collect();

    let mut election = Election::new(*params, MemTokenAuthority::new());
    let mut source = RngSource::os();

    for (i, vote) in votes.iter().enumerate() {
        let voter_id = format!("voter-{}", i + 1);

        let result = election.issue_token(&voter_id).and_then(|token| {
            let ballot = prepare_ballot(params, &token, &voter_id, *vote, &mut source)?;
            election.submit(ballot.submission)
        });

        if let Err(e) = result {
            eprintln!("sharevote simulate: {}: {}", voter_id, e);
            std::process::exit(1);
        }
    }

    let published = election.publish_tally();

    let board = election.board().snapshot();
    println!("{}", serde_json::to_string_pretty(&board).unwrap());
    println!("> Published tally: {} yes vote(s) of {}", published.total, published.counted);

    match election.verify() {
        Ok(result) => println!("> Election verified OK: {}", result.explanation),
        Err(e) => {
            eprintln!("sharevote simulate: {}", e);
            std::process::exit(1);
        }
    }
}
