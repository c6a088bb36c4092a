pub fn excerpt(input: &str, max_chars: usize) -> String {
    let mut chars = input.chars();
    let head: String = chars
        .by_ref()
        .take(max_chars)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_untouched() {
        assert_eq!(excerpt("bonjour", 10), "bonjour");
    }

    #[test]
    fn long_input_is_truncated_on_char_boundaries() {
        assert_eq!(excerpt("héritage partagé", 8), "héritage…");
    }

    #[test]
    fn newlines_are_flattened() {
        assert_eq!(excerpt("a\nb", 10), "a b");
    }
}
