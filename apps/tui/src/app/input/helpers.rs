/// Previous index in a list of `len` items, wrapping to the end.
pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    match (len, index) {
        (0, _) => 0,
        (_, 0) => len - 1,
        _ => (index - 1) % len,
    }
}

/// Next index in a list of `len` items, wrapping to the start.
pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_both_ways() {
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_decrement(2, 3), 1);
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_increment(0, 0), 0);
        assert_eq!(wrap_decrement(0, 0), 0);
    }
}
