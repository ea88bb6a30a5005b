//! Centralized validation and helper functions.

/// Maximum number of gene blocks accepted from a single genome-order file (DOS protection)
pub const MAX_BLOCKS: usize = 1_000_000;

/// Maximum length of a genome label
pub const MAX_GENOME_LABEL_LENGTH: usize = 64;

/// Characters with a structural meaning in GRIMM files or topology descriptors
const RESERVED_LABEL_CHARS: [char; 7] = ['|', ',', '>', '#', '$', '@', '"'];

/// Validate a genome label: non-empty, bounded, no whitespace or reserved characters.
///
/// # Examples
///
/// ```
/// use quartet_solver::utils::validation::is_valid_genome_label;
///
/// assert!(is_valid_genome_label("A"));
/// assert!(is_valid_genome_label("Left"));
/// assert!(!is_valid_genome_label("A|B"));
/// assert!(!is_valid_genome_label(""));
/// ```
#[must_use]
pub fn is_valid_genome_label(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_GENOME_LABEL_LENGTH
        && !s.chars().any(char::is_whitespace)
        && !s.chars().any(|c| RESERVED_LABEL_CHARS.contains(&c))
}

/// Split one side of a topology descriptor into genome labels.
///
/// A side containing a comma is split on commas (`Left,Right`); otherwise
/// every character is its own label (`AB`).
#[must_use]
pub fn split_descriptor_side(side: &str) -> Vec<String> {
    let side = side.trim();
    if side.contains(',') {
        side.split(',').map(|s| s.trim().to_string()).collect()
    } else {
        side.chars().map(String::from).collect()
    }
}

/// Check if adding another block would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new block.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_block_limit(count: usize) -> Option<String> {
    if count >= MAX_BLOCKS {
        Some(format!(
            "Too many blocks: adding another would exceed maximum of {MAX_BLOCKS}"
        ))
    } else {
        None
    }
}
