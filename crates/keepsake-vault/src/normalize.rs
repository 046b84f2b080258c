//! Codeword text utilities.

/// Normalize a guess: lowercase, fold Spanish diacritics, keep `[a-z0-9]`.
///
/// "9 de Noviembre" and "noviembre9" both need a fighting chance, so
/// whitespace and punctuation are dropped entirely rather than collapsed.
pub fn normalize_code(raw: &str) -> String {
    raw.chars()
        .flat_map(|c| c.to_lowercase())
        .filter_map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => Some('a'),
            'é' | 'è' | 'ë' | 'ê' => Some('e'),
            'í' | 'ì' | 'ï' | 'î' => Some('i'),
            'ó' | 'ò' | 'ö' | 'ô' => Some('o'),
            'ú' | 'ù' | 'ü' | 'û' => Some('u'),
            'ñ' => Some('n'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Edit distance between two codes, for near-miss detection.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut current = vec![0usize; a.len() + 1];

    for (i, bc) in b.iter().enumerate() {
        current[0] = i + 1;
        for (j, ac) in a.iter().enumerate() {
            let substitution = prev[j] + usize::from(ac != bc);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[a.len()]
}
