use dp_aligner::{Aligner, AlignerConfig, AlignerError, AlignmentMode, BatchAligner};

fn pairs() -> Vec<(Vec<u8>, Vec<u8>)> {
    vec![
        (b"AA".to_vec(), b"TAAT".to_vec()),
        (b"ACC".to_vec(), b"TTTACACGG".to_vec()),
        (b"GATTACA".to_vec(), b"GCATGCT".to_vec()),
        (b"ACGT".to_vec(), b"".to_vec()),
        (b"T".to_vec(), b"T".to_vec()),
    ]
}

#[test]
fn batch_matches_serial_in_input_order() {
    for mode in [AlignmentMode::Global, AlignmentMode::Local] {
        let config = AlignerConfig::new().with_mode(mode).with_workers(3).unwrap();
        let serial = Aligner::new(&config).unwrap();
        let mut batch = BatchAligner::new(&config).unwrap();

        let results = batch.align_parallel(pairs()).unwrap();
        assert_eq!(results.len(), pairs().len());
        for ((seq_x, seq_y), result) in pairs().iter().zip(&results) {
            assert_eq!(result, &serial.align(seq_x, seq_y).unwrap());
        }
    }
}

#[test]
fn batch_can_be_reused() {
    let config = AlignerConfig::new().with_workers(2).unwrap();
    let mut batch = BatchAligner::new(&config).unwrap();

    let first = batch.align_parallel(pairs()).unwrap();
    let second = batch.align_parallel(pairs()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].score, 12);
    assert!(batch.align_parallel(Vec::new()).unwrap().is_empty());
}

#[test]
fn batch_reports_first_failing_pair() {
    let config = AlignerConfig::new().with_workers(2).unwrap();
    let mut batch = BatchAligner::new(&config).unwrap();

    let mut input = pairs();
    input.insert(1, (b"ANA".to_vec(), b"A".to_vec()));
    input.push((b"A".to_vec(), b"XA".to_vec()));

    let err = batch.align_parallel(input).unwrap_err();
    assert!(matches!(err, AlignerError::UnknownSymbol { symbol: 'N', .. }));
}

#[test]
fn batch_survives_failing_pair_mid_batch() {
    let config = AlignerConfig::new()
        .with_scores(i32::MAX / 2 + 1, 0, -1)
        .with_workers(2)
        .unwrap();
    let mut batch = BatchAligner::new(&config).unwrap();

    let input = vec![
        (b"A".to_vec(), b"A".to_vec()),
        (b"AA".to_vec(), b"AA".to_vec()),
        (b"C".to_vec(), b"C".to_vec()),
    ];
    let err = batch.align_parallel(input).unwrap_err();
    assert_eq!(err, AlignerError::ScoreOverflow { row: 2, col: 2 });

    let results = batch
        .align_parallel(vec![(b"A".to_vec(), b"A".to_vec()), (b"C".to_vec(), b"C".to_vec())])
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].score, i32::MAX / 2 + 1);
}
