use futures::StreamExt as _;

use crate::error::ReduceError;
use crate::point::Point;
use crate::visvalingam::simplify;

/// Inputs below this length are reduced in one piece regardless of the
/// requested chunk count; the scheduling overhead only pays off beyond it.
pub const MIN_LEN_FOR_CHUNKING: usize = 100_000;

/// Name of the Visvalingam-Whyatt reduction algorithm.
pub const VISVALINGAM_ALG: &str = "visvalingam";

/// A recognized point-reduction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Visvalingam,
}

impl std::str::FromStr for Algorithm {
    type Err = ReduceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            VISVALINGAM_ALG => Ok(Algorithm::Visvalingam),
            other => Err(ReduceError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Reduce `points` to `min_keep` points, chunking large inputs across
/// parallel workers.
///
/// An unrecognized `algorithm` name is an error before any work starts.
/// Inputs shorter than [`MIN_LEN_FOR_CHUNKING`], a `chunk_count` below 2,
/// inputs too small to split usefully, and keep targets too small to give
/// every chunk its two mandatory endpoints all take the direct single-pass
/// path.
///
/// Chunked runs split the sequence into `chunk_count` contiguous slices (the
/// last absorbs the remainder), give each worker a proportional share of
/// `min_keep` (remainder to the last chunk), and merge by re-sorting on x in
/// ascending order. Chunk seams are simplified without knowledge of their
/// neighbors, so the result may differ from a single-pass run over the same
/// input.
pub async fn reduce<P>(
    points: Vec<P>,
    min_keep: usize,
    chunk_count: usize,
    algorithm: &str,
) -> Result<Vec<P>, ReduceError>
where
    P: Point + Clone + Send + Sync + 'static,
{
    let algorithm: Algorithm = algorithm.parse()?;
    let Algorithm::Visvalingam = algorithm;

    // A chunk budget below 2 would be clamped up to the chunk's endpoints
    // by simplify, overshooting min_keep in the merged result.
    let keep_per_chunk = min_keep / chunk_count;

    if chunk_count < 2
        || points.len() < MIN_LEN_FOR_CHUNKING
        || points.len() <= chunk_count * 2
        || keep_per_chunk < 2
    {
        return Ok(simplify(&points, min_keep));
    }

    let chunk_len = points.len() / chunk_count;

    // One slot per worker so no producer ever blocks on a slow consumer.
    let (part_send, part_recv) = async_channel::bounded::<Vec<P>>(chunk_count);

    for i in 0..chunk_count {
        let start = i * chunk_len;
        let last = i + 1 == chunk_count;
        let end = if last { points.len() } else { start + chunk_len };
        let budget = if last {
            keep_per_chunk + min_keep % chunk_count
        } else {
            keep_per_chunk
        };

        let chunk = points[start..end].to_vec();
        let part_send = part_send.clone();
        tokio::spawn(async move {
            let _ = part_send.send(simplify(&chunk, budget)).await;
        });
    }

    // Dropping the original sender leaves the workers as the only producers;
    // the stream ends once every worker has delivered and hung up.
    drop(part_send);

    let mut merged: Vec<P> = Vec::with_capacity(min_keep);
    let mut parts = part_recv;
    while let Some(part) = parts.next().await {
        merged.extend(part);
    }

    // Workers finish in any order; sorting by x restores the sequence.
    // Ascending, so the output reads chronologically.
    merged.sort_by(|a, b| a.x().partial_cmp(&b.x()).unwrap_or(std::cmp::Ordering::Equal));

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> Vec<(f64, f64)> {
        (0..n)
            .map(|i| (i as f64, ((i * 7919) % 1000) as f64 / 10.0))
            .collect()
    }

    #[tokio::test]
    async fn unknown_algorithm_is_an_error() {
        let points = series(10);
        let err = reduce(points, 5, 2, "douglas-peucker").await.unwrap_err();
        assert!(matches!(err, ReduceError::UnsupportedAlgorithm(_)));
    }

    #[tokio::test]
    async fn small_input_takes_the_direct_path() {
        let points = series(100);
        let kept = reduce(points.clone(), 10, 4, VISVALINGAM_ALG).await.unwrap();
        // Below the chunking threshold this must be identical to simplify.
        assert_eq!(kept, simplify(&points, 10));
    }

    #[tokio::test]
    async fn input_already_below_target_is_unchanged() {
        let points = series(8);
        let kept = reduce(points.clone(), 20, 2, VISVALINGAM_ALG).await.unwrap();
        assert_eq!(kept, points);
    }

    #[tokio::test]
    async fn chunked_budgets_sum_to_min_keep() {
        let points = series(MIN_LEN_FOR_CHUNKING);
        // 1003 % 4 == 3: exercises the remainder going to the last chunk.
        let kept = reduce(points, 1003, 4, VISVALINGAM_ALG).await.unwrap();
        assert_eq!(kept.len(), 1003);
    }

    #[tokio::test]
    async fn tiny_keep_target_keeps_exactly_min_keep() {
        let points = series(MIN_LEN_FOR_CHUNKING);
        // 10 / 8 leaves every chunk a budget of 1; chunking would clamp each
        // chunk up to its two endpoints and overshoot the target.
        let kept = reduce(points.clone(), 10, 8, VISVALINGAM_ALG).await.unwrap();
        assert_eq!(kept.len(), 10);
        assert_eq!(kept, simplify(&points, 10));
    }

    #[tokio::test]
    async fn chunked_output_is_sorted_ascending_by_x() {
        let points = series(MIN_LEN_FOR_CHUNKING);
        let kept = reduce(points, 500, 8, VISVALINGAM_ALG).await.unwrap();

        let mut last_x = f64::NEG_INFINITY;
        for p in &kept {
            assert!(p.0 > last_x);
            last_x = p.0;
        }
    }
}
