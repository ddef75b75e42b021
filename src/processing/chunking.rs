//! Sentence-boundary chunking with a trailing-word overlap seed.
//!
//! The chunker splits text on sentence-terminating periods and greedily packs
//! sentences into chunks of at most `chunk_size` characters. When a sentence
//! would overflow the running buffer, the buffer is closed and the next chunk
//! is seeded with the last `overlap_words / 10` words of the closed buffer so
//! that spans around the boundary stay visible to retrieval. A sentence longer
//! than `chunk_size` is never force-split; it is emitted whole.

/// Split `text` into overlapping chunks of at most `chunk_size` characters.
///
/// The seed width is `overlap_words / 10` whole words (integer division), a
/// deliberately small window relative to the configured overlap parameter.
/// Returns an empty vector when the input carries no sentence content; no
/// emitted chunk is ever empty or whitespace-only. Chunk indices are assigned
/// by the caller from output order.
pub fn chunk_text(text: &str, chunk_size: usize, overlap_words: usize) -> Vec<String> {
    let seed_words = overlap_words / 10;
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in text.split('.') {
        if sentence.trim().is_empty() {
            continue;
        }
        let sentence_chars = sentence.chars().count();

        if current_chars + sentence_chars > chunk_size && !current.is_empty() {
            let seed = tail_words(&current, seed_words);
            chunks.push(current.trim().to_string());
            // The triggering sentence starts the next buffer after the seed.
            current = format!("{seed} {sentence}");
            current_chars = current.chars().count();
        } else {
            current.push_str(sentence);
            current.push('.');
            current_chars += sentence_chars + 1;
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        chunks.push(tail.to_string());
    }

    chunks
}

/// Last `count` space-separated words of `text`, joined back with spaces.
fn tail_words(text: &str, count: usize) -> String {
    let words: Vec<&str> = text.split(' ').collect();
    let start = words.len().saturating_sub(count);
    words[start..].join(" ")
}
