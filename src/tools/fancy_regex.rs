/// Module containing functions based on fancy_regex
// 3rd party imports
use fancy_regex::Regex;

/// Returns the start positions of each match of the given regular expression.
/// Intended for zero width expressions like cleavage sites, where the start of a match
/// is the boundary between two characters.
/// An empty vector is returned if the regular expression fails on the given string.
///
/// # Arguments:
/// * `regex` - fancy_regex::Regex which matches the positions.
/// * `some_string` - String to search in.
///
pub fn match_positions(regex: &Regex, some_string: &str) -> Vec<usize> {
    let mut positions: Vec<usize> = Vec::new();
    for position_match in regex.find_iter(some_string) {
        match position_match {
            Ok(position_match) => positions.push(position_match.start()),
            Err(_) => return Vec::new(),
        }
    }
    positions
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_match_positions() {
        lazy_static! {
            static ref TEST_REGEX: Regex = Regex::new(r"(?<=\|)").unwrap();
        }
        const TEST_STRING: &'static str = "TEST|STRING|IS|PIPE|SEPARATED;";

        let positions = match_positions(&TEST_REGEX, TEST_STRING);
        assert_eq!(positions, vec![5, 12, 15, 20]);
        for position in positions {
            assert_eq!(&TEST_STRING[position - 1..position], "|");
        }
    }
}
