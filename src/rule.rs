/// Rule string written into and accepted from pattern headers.
pub const RULE: &str = "B3/S23";

/// Conway's transition: a live cell with 2 or 3 live neighbours survives,
/// a dead cell with exactly 3 is born, every other cell dies or stays dead.
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}

/// Returns `true` if `rule` names B3/S23, in either the `B3/S23` notation
/// or the older `23/3` survival/birth notation.
pub fn is_conway(rule: &[u8]) -> bool {
    rule.eq_ignore_ascii_case(RULE.as_bytes()) || rule == b"23/3"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survival() {
        assert!(next_state(true, 2));
        assert!(next_state(true, 3));
        for n in [0, 1, 4, 5, 6, 7, 8] {
            assert!(!next_state(true, n), "live cell with {} neighbours", n);
        }
    }

    #[test]
    fn test_birth() {
        assert!(next_state(false, 3));
        for n in [0, 1, 2, 4, 5, 6, 7, 8] {
            assert!(!next_state(false, n), "dead cell with {} neighbours", n);
        }
    }

    #[test]
    fn test_rule_names() {
        assert!(is_conway(b"B3/S23"));
        assert!(is_conway(b"b3/s23"));
        assert!(is_conway(b"23/3"));
        assert!(!is_conway(b"B36/S23"));
        assert!(!is_conway(b""));
    }
}
