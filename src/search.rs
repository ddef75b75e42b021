//! Cosine similarity scoring and top-K selection over embedded chunks.
//!
//! The candidate set is small enough to score in-process: every stored chunk
//! vector is compared against the query vector and the best K survive. Chunks
//! without an embedding are filtered out before scoring; they are "not yet
//! embedded", not "zero similarity", and must never appear in results.

use std::cmp::Ordering;

use crate::models::EmbeddedChunk;

/// An embedded chunk annotated with its similarity to a query vector.
#[derive(Debug, Clone)]
pub struct RankedChunk {
    /// The candidate chunk with its document name.
    pub chunk: EmbeddedChunk,
    /// Cosine similarity against the query vector.
    pub score: f32,
}

/// Cosine similarity between two vectors.
///
/// Mismatched lengths score `0.0` instead of erroring; callers treat that as
/// corrupt data and flag it. Zero-magnitude vectors also score `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Select the `k` candidates most similar to `query`, best first.
///
/// Candidates with an empty embedding are dropped before scoring. The sort is
/// stable, so ties keep their original candidate order. Length mismatches are
/// scored `0.0` and logged as corruption.
pub fn top_k(query: &[f32], candidates: Vec<EmbeddedChunk>, k: usize) -> Vec<RankedChunk> {
    let mut ranked: Vec<RankedChunk> = candidates
        .into_iter()
        .filter(|candidate| !candidate.chunk.embedding.is_empty())
        .map(|candidate| {
            if candidate.chunk.embedding.len() != query.len() {
                tracing::warn!(
                    chunk_id = %candidate.chunk.id,
                    expected = query.len(),
                    actual = candidate.chunk.embedding.len(),
                    "Stored embedding length mismatch; scoring as 0"
                );
            }
            let score = cosine_similarity(query, &candidate.chunk.embedding);
            RankedChunk {
                chunk: candidate,
                score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentChunk;

    fn make_candidate(id: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            chunk: DocumentChunk {
                id: id.to_string(),
                document_id: "doc".to_string(),
                content: format!("content {id}"),
                chunk_index: 0,
                embedding,
            },
            document_name: "doc.pdf".to_string(),
        }
    }

    #[test]
    fn similarity_of_vector_with_itself_is_one() {
        let v = vec![0.3, -1.2, 4.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn similarity_of_opposite_vectors_is_negative_one() {
        let v = vec![1.0, 2.0, -3.0];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&v, &neg) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = vec![1.0, 0.0, 2.0];
        let b = vec![0.5, 1.5, -1.0];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn mismatched_lengths_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn zero_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn top_k_filters_unembedded_and_bounds_length() {
        let candidates = vec![
            make_candidate("a", vec![1.0, 0.0]),
            make_candidate("b", Vec::new()),
            make_candidate("c", vec![0.0, 1.0]),
        ];
        let ranked = top_k(&[1.0, 0.0], candidates, 5);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| !r.chunk.chunk.embedding.is_empty()));
    }

    #[test]
    fn top_k_orders_by_descending_score() {
        let candidates = vec![
            make_candidate("far", vec![0.0, 1.0]),
            make_candidate("near", vec![1.0, 0.1]),
            make_candidate("mid", vec![0.7, 0.7]),
        ];
        let ranked = top_k(&[1.0, 0.0], candidates, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].chunk.chunk.id, "near");
        assert_eq!(ranked[1].chunk.chunk.id, "mid");
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn ties_keep_candidate_order() {
        let candidates = vec![
            make_candidate("first", vec![1.0, 0.0]),
            make_candidate("second", vec![2.0, 0.0]),
        ];
        let ranked = top_k(&[1.0, 0.0], candidates, 2);
        // Both score 1.0; the stable sort preserves insertion order.
        assert_eq!(ranked[0].chunk.chunk.id, "first");
        assert_eq!(ranked[1].chunk.chunk.id, "second");
    }

    #[test]
    fn corrupt_length_candidates_score_zero_but_remain() {
        let candidates = vec![
            make_candidate("good", vec![1.0, 0.0]),
            make_candidate("corrupt", vec![1.0, 0.0, 0.0]),
        ];
        let ranked = top_k(&[1.0, 0.0], candidates, 2);
        assert_eq!(ranked[0].chunk.chunk.id, "good");
        assert_eq!(ranked[1].chunk.chunk.id, "corrupt");
        assert_eq!(ranked[1].score, 0.0);
    }
}
