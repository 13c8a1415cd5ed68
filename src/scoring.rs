use std::collections::HashMap;

/// Per-letter verdict for one position of a guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Right letter, right position (green)
    Exact,
    /// Letter occurs elsewhere in the secret (yellow)
    Present,
    /// No unclaimed occurrence left in the secret (gray)
    Absent,
}

impl Mark {
    #[must_use]
    pub fn tile(self) -> char {
        match self {
            Self::Exact => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
        }
    }
}

/// Scores `guess` against `secret`.
///
/// Exact matches are claimed first; the secret letters left over form a pool
/// that the remaining guess letters draw from left to right. A letter is
/// therefore never marked more often than it occurs in the secret.
///
/// Both words must have the same number of characters.
#[must_use]
pub fn score_guess(guess: &str, secret: &str) -> Vec<Mark> {
    let guess_chars: Vec<char> = guess.chars().collect();
    let secret_chars: Vec<char> = secret.chars().collect();
    debug_assert_eq!(guess_chars.len(), secret_chars.len());

    let mut marks = vec![Mark::Absent; guess_chars.len()];
    let mut remaining: HashMap<char, usize> = HashMap::new();

    // First pass: exact matches
    for (i, (g, s)) in guess_chars.iter().zip(&secret_chars).enumerate() {
        if g == s {
            marks[i] = Mark::Exact;
        } else {
            *remaining.entry(*s).or_insert(0) += 1;
        }
    }

    // Second pass: misplaced letters, bounded by what is left over
    for (i, g) in guess_chars.iter().enumerate() {
        if marks[i] == Mark::Exact {
            continue;
        }
        if let Some(count) = remaining.get_mut(g)
            && *count > 0
        {
            marks[i] = Mark::Present;
            *count -= 1;
        }
    }

    marks
}

/// Renders marks as a row of colored squares.
#[must_use]
pub fn render_tiles(marks: &[Mark]) -> String {
    marks.iter().map(|m| m.tile()).collect()
}
