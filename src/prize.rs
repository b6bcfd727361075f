//! Fixed Powerball prize table. Pure lookup over the match outcome of a
//! play against a draw; presentation and jackpot amounts stay external.

use crate::{draws::Draw, types::Play};

// Prize
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prize {
    Jackpot,
    /// Fixed non-jackpot amount, in whole dollars.
    Fixed(u32),
}

/// How many whites matched and whether the powerball matched. The powerball
/// pools are independent, so a white ball equal to the drawn powerball does
/// not count as a powerball match.
pub fn match_counts(play: &Play, draw: &Draw) -> (u8, bool) {
    let whites = play.white().iter().filter(|w| draw.white.contains(w)).count() as u8;
    (whites, play.powerball() == draw.powerball)
}

/// The prize category for a match outcome, if any.
pub fn prize(white_matches: u8, powerball_matched: bool) -> Option<Prize> {
    match (white_matches, powerball_matched) {
        (5, true) => Some(Prize::Jackpot),
        (5, false) => Some(Prize::Fixed(1_000_000)),
        (4, true) => Some(Prize::Fixed(50_000)),
        (4, false) | (3, true) => Some(Prize::Fixed(100)),
        (3, false) | (2, true) => Some(Prize::Fixed(7)),
        (1, true) | (0, true) => Some(Prize::Fixed(4)),
        _ => None,
    }
}

/// Convenience join of [`match_counts`] and [`prize`].
pub fn check(play: &Play, draw: &Draw) -> Option<Prize> {
    let (whites, powerball) = match_counts(play, draw);
    prize(whites, powerball)
}

#[cfg(test)]
mod prize_tests {
    use test_case::test_case;

    use super::{check, match_counts, prize, Prize};
    use crate::{draws::Draw, types::Play};

    #[test_case(5, true, Some(Prize::Jackpot))]
    #[test_case(5, false, Some(Prize::Fixed(1_000_000)))]
    #[test_case(4, true, Some(Prize::Fixed(50_000)))]
    #[test_case(4, false, Some(Prize::Fixed(100)))]
    #[test_case(3, true, Some(Prize::Fixed(100)))]
    #[test_case(3, false, Some(Prize::Fixed(7)))]
    #[test_case(2, true, Some(Prize::Fixed(7)))]
    #[test_case(2, false, None)]
    #[test_case(1, true, Some(Prize::Fixed(4)))]
    #[test_case(1, false, None)]
    #[test_case(0, true, Some(Prize::Fixed(4)))]
    #[test_case(0, false, None)]
    fn test_prize_table(whites: u8, pb: bool, expected: Option<Prize>) {
        assert_eq!(prize(whites, pb), expected);
    }

    #[test]
    fn test_match_counts() {
        let play = Play::from_parts(&[7, 14, 22, 45, 61], 9).unwrap();
        let draw = Draw { white: [7, 14, 30, 45, 68], powerball: 9 };
        assert_eq!(match_counts(&play, &draw), (3, true));
    }

    #[test]
    fn test_white_equal_to_drawn_powerball_is_not_a_pb_match() {
        let play = Play::from_parts(&[9, 14, 22, 45, 61], 3).unwrap();
        let draw = Draw { white: [1, 2, 3, 4, 5], powerball: 9 };
        assert_eq!(match_counts(&play, &draw), (0, false));
    }

    #[test]
    fn test_check_joins_lookup() {
        let play = Play::from_parts(&[7, 14, 22, 45, 61], 9).unwrap();
        let draw = Draw { white: [7, 14, 22, 45, 61], powerball: 9 };
        assert_eq!(check(&play, &draw), Some(Prize::Jackpot));
    }
}
