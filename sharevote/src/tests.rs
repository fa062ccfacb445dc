use super::*;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use std::thread;

#[test]
fn end_to_end_election() {
    let params = ProtocolParams::default();
    let mut election = Election::new(params, MemTokenAuthority::new());
    let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(2024));

    // Four voters, votes [1, 0, 1, 1]
    let votes = [("alice", 1), ("bob", 0), ("carol", 1), ("dave", 1)];
    for (voter, vote) in votes.iter() {
        // The election authority issues a one-time token
        let token = election.issue_token(voter).unwrap();

        // The voter's client splits, commits and proves
        let ballot = prepare_ballot(&params, &token, voter, *vote, &mut source).unwrap();
        verify_openings(&ballot.submission.commits, &ballot.openings).unwrap();

        // The submission endpoint validates and appends
        election.submit(ballot.submission).unwrap();
    }

    // 4 token_issued + 4 vote_submitted
    assert_eq!(election.board().len(), 8);

    // Voting is over
    // ----------------

    let published = election.publish_tally();
    assert_eq!(published.total.value(), 3);
    assert_eq!(published.counted, 4);
    assert!(published.is_clean());

    // Any observer can re-run the reconstruction from the raw board
    let verified = election.verify().unwrap();
    assert_eq!(verified, published);

    // ...including from its JSON serialization
    let json = serde_json::to_vec(&election.board().snapshot()).unwrap();
    let records = BulletinRecord::list_from_json(&json).unwrap();
    let audited = Reconstructor::new(params).audit(&records).unwrap();
    assert_eq!(audited.total.value(), 3);
}

#[test]
fn reconstruction_from_snapshot_is_stable_under_concurrent_submissions() {
    let params = ProtocolParams::default();
    let board = SharedBoard::default();

    // Seed the board with a known set of ballots
    let mut seed_board = board.clone();
    let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(1));
    for i in 0..10 {
        let ballot =
            prepare_ballot(&params, "t", &format!("seed-{}", i), 1, &mut source).unwrap();
        seed_board.append(ballot.submission.into_record(0));
    }
    let snapshot = board.snapshot();

    // Ballots are prepared independently and appended from several threads
    let writers: Vec<_> = (0..4)
        .map(|t| {
            let mut board = board.clone();
            thread::spawn(move || {
                let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(100 + t));
                for i in 0..25 {
                    let voter = format!("voter-{}-{}", t, i);
                    let ballot = prepare_ballot(&params, "t", &voter, 1, &mut source).unwrap();
                    board.append(ballot.submission.into_record(0));
                }
            })
        })
        .collect();

    let reconstructor = Reconstructor::new(params);
    let first = reconstructor.reconstruct(&snapshot);
    let second = reconstructor.reconstruct(&snapshot);

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(first, second);
    assert_eq!(first.total.value(), 10);

    let full = reconstructor.reconstruct(&board.snapshot());
    assert_eq!(full.total.value(), 110);
    assert_eq!(full.counted, 110);
}

#[test]
fn tally_published_mid_election_stays_auditable() {
    let params = ProtocolParams::default();
    let board = SharedBoard::default();
    let reconstructor = Reconstructor::new(params);

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let mut board = board.clone();
            thread::spawn(move || {
                let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(200 + t));
                for i in 0..25 {
                    let voter = format!("voter-{}-{}", t, i);
                    let ballot = prepare_ballot(&params, "t", &voter, 1, &mut source).unwrap();
                    board.append(ballot.submission.into_record(0));
                }
            })
        })
        .collect();

    let published = board.append_from(|records| {
        let result = reconstructor.reconstruct(records);
        (result.to_record(1), result)
    });

    for writer in writers {
        writer.join().unwrap();
    }

    // Every ballot before the tally is counted, none after it
    let records = board.snapshot();
    let audited = reconstructor.audit(&records).unwrap();
    assert_eq!(audited, published);
    assert_eq!(published.total.value(), published.counted as u64);
    assert_eq!(reconstructor.reconstruct(&records).total.value(), 100);
}

#[test]
fn public_board_shape() {
    let params = ProtocolParams::default();
    let mut election = Election::new(params, MemTokenAuthority::new());
    let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(5));

    let token = election.issue_token("alice").unwrap();
    let ballot = prepare_ballot(&params, &token, "alice", 1, &mut source).unwrap();
    election.submit(ballot.submission).unwrap();
    election.publish_tally();

    let board = serde_json::to_value(&election.board().snapshot()).unwrap();
    let board = board.as_array().unwrap();
    assert_eq!(board[0]["type"], "token_issued");
    assert_eq!(board[1]["type"], "vote_submitted");
    assert_eq!(board[1]["shares"].as_array().unwrap().len(), 3);
    assert_eq!(board[1]["commits"].as_array().unwrap().len(), 3);
    assert!(board[1]["proof"].is_string());
    assert_eq!(board[2]["type"], "tally_published");
    assert_eq!(board[2]["total"], 1);
}
