use dp_aligner::{AlignerConfig, AlignmentMode, BatchAligner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AlignerConfig::new().with_workers(2)?;
    let mut batch = BatchAligner::new(&config)?;

    let seq_x = b"AA";
    let seq_y = b"TAAT";
    println!("{}", batch.aligner().compute_matrix(seq_x, seq_y)?);

    let pairs = vec![
        (seq_x.to_vec(), seq_y.to_vec()),
        (b"ACC".to_vec(), b"TTTACACGG".to_vec()),
    ];
    for (i, result) in batch.align_parallel(pairs)?.iter().enumerate() {
        let (aligned_x, aligned_y) = result.aligned_strings();
        println!("Global alignment {}: Score = {}", i, result.score);
        println!("{}", aligned_x);
        println!("{}", aligned_y);
        println!();
    }

    let local = batch.aligner().clone().with_alignment_mode(AlignmentMode::Local);
    let result = local.align(b"ACC", b"TTTACACGG")?;
    let (aligned_x, aligned_y) = result.aligned_strings();
    println!("Local alignment: Score = {}", result.score);
    println!("{}", aligned_x);
    println!("{}", aligned_y);

    Ok(())
}
