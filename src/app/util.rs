/// Byte offset of the `cursor`-th char, clamped to the end of `s`.
pub fn cursor_to_byte_index(s: &str, cursor: usize) -> usize {
    s.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_multibyte_chars() {
        let s = "é→a";
        assert_eq!(cursor_to_byte_index(s, 0), 0);
        assert_eq!(cursor_to_byte_index(s, 1), 2);
        assert_eq!(cursor_to_byte_index(s, 2), 5);
        assert_eq!(cursor_to_byte_index(s, 3), 6);
        assert_eq!(cursor_to_byte_index(s, 10), 6);
    }
}
