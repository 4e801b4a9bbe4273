/// Splits a comma-delimited cuisine list into trimmed, non-empty tokens.
///
/// A token repeated within one list is kept once, at its first position.
pub fn split_cuisines(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tokens.iter().any(|seen| seen == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}
