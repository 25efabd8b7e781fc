//! Structural checks on rendered maps: exact size and a wall on every edge.
//!
//! Nothing here looks at connectivity. A map that passes is square and each
//! edge carries at least one wall tile, which is the enclosure proxy batches rely on.

use std::fmt;

use log::debug;

use crate::tiles::WALL_SYMBOL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    SizeMismatch { expected: usize, actual: usize },
    /// `(map_size + 1)^2` does not fit in a `usize`.
    SizeOverflow { map_size: usize },
    OpenEdge(Edge),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "invalid map or mapSize: expected {expected} tiles, found {actual}")
            }
            Self::SizeOverflow { map_size } => {
                write!(f, "invalid map or mapSize: map size {map_size} is unrepresentable")
            }
            Self::OpenEdge(edge) => write!(f, "no wall tile on the {edge:?} edge"),
        }
    }
}

/// Checks a rendered map against a `(map_size + 1)` square grid.
///
/// Each edge only needs a wall among its first `map_size` cells; the last
/// cell of every edge is a corner shared with the next one.
pub fn check_map(map: &str, map_size: usize) -> Result<(), Rejection> {
    let Some(expected) = map_size.checked_add(1).and_then(|side| side.checked_mul(side)) else {
        return Err(Rejection::SizeOverflow { map_size });
    };
    let side = map_size + 1;
    let cells: Vec<char> = map.chars().filter(|&c| c != '\n' && c != '\r').collect();
    if cells.len() != expected {
        return Err(Rejection::SizeMismatch { expected, actual: cells.len() });
    }

    let is_wall = |row: usize, column: usize| cells[row * side + column] == WALL_SYMBOL;
    let edges = [
        (Edge::Top, (0..map_size).any(|i| is_wall(0, i))),
        (Edge::Bottom, (0..map_size).any(|i| is_wall(side - 1, i))),
        (Edge::Left, (0..map_size).any(|i| is_wall(i, 0))),
        (Edge::Right, (0..map_size).any(|i| is_wall(i, side - 1))),
    ];
    match edges.into_iter().find(|&(_, walled)| !walled) {
        Some((edge, _)) => Err(Rejection::OpenEdge(edge)),
        None => Ok(()),
    }
}

pub fn validate(map: &str, map_size: usize) -> bool {
    match check_map(map, map_size) {
        Ok(()) => true,
        Err(rejection) => {
            debug!("rejected map for map_size={map_size}: {rejection}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn grid(side: usize, cell: impl Fn(usize, usize) -> char) -> String {
        let mut map = String::new();
        for y in 0..side {
            map.extend((0..side).map(|x| cell(y, x)));
            map.push('\n');
        }
        map
    }

    fn bordered(side: usize) -> String {
        grid(side, |y, x| {
            if y == 0 || x == 0 || y == side - 1 || x == side - 1 { '#' } else { '.' }
        })
    }

    #[test]
    fn fully_bordered_map_is_valid() {
        assert!(validate(&bordered(11), 10));
    }

    #[test]
    fn open_top_edge_is_rejected() {
        let map = grid(11, |y, x| {
            if y == 0 {
                ' '
            } else if x == 0 || x == 10 || y == 10 {
                '#'
            } else {
                '.'
            }
        });
        assert_eq!(check_map(&map, 10), Err(Rejection::OpenEdge(Edge::Top)));
        assert!(!validate(&map, 10));
    }

    #[test]
    fn each_edge_is_checked_independently() {
        let side = 9;
        let cases = [
            (Edge::Bottom, Some(side - 1), None),
            (Edge::Left, None, Some(0)),
            (Edge::Right, None, Some(side - 1)),
        ];
        for (edge, open_row, open_column) in cases {
            let map = grid(side, |y, x| {
                if open_row == Some(y) || open_column == Some(x) {
                    '.'
                } else if y == 0 || x == 0 || y == side - 1 || x == side - 1 {
                    '#'
                } else {
                    ' '
                }
            });
            assert_eq!(check_map(&map, side - 1), Err(Rejection::OpenEdge(edge)));
        }
    }

    #[test]
    fn a_single_wall_per_edge_is_enough() {
        let side = 7;
        let map = grid(side, |y, x| match (y, x) {
            (0, 3) | (6, 2) | (4, 0) | (1, 6) => '#',
            _ => '.',
        });
        assert_eq!(check_map(&map, side - 1), Ok(()));
    }

    #[test]
    fn wall_only_in_the_final_edge_cell_does_not_count() {
        let side = 7;
        let map = grid(side, |y, x| match (y, x) {
            (0, 6) => '#',
            (6, 2) | (4, 0) | (1, 6) => '#',
            _ => '.',
        });
        assert_eq!(check_map(&map, side - 1), Err(Rejection::OpenEdge(Edge::Top)));
    }

    #[test]
    fn carriage_returns_are_ignored() {
        let map = bordered(5).replace('\n', "\r\n");
        assert!(validate(&map, 4));
    }

    #[test]
    fn wrong_map_size_is_rejected() {
        assert_eq!(
            check_map(&bordered(11), 11),
            Err(Rejection::SizeMismatch { expected: 144, actual: 121 })
        );
        assert!(!validate("", 1));
    }

    #[test]
    fn unrepresentable_map_size_is_rejected() {
        assert_eq!(
            check_map("", usize::MAX),
            Err(Rejection::SizeOverflow { map_size: usize::MAX })
        );
        assert!(!validate("#", usize::MAX));
        assert!(!validate("", usize::MAX / 2));
    }

    proptest! {
        #[test]
        fn any_length_other_than_side_squared_is_rejected(
            map_size in 1_usize..40,
            delta in 1_usize..50,
            grow in any::<bool>(),
        ) {
            let side = map_size + 1;
            let expected = side * side;
            let length = if grow { expected + delta } else { expected.saturating_sub(delta) };
            prop_assume!(length != expected);

            let map = "#".repeat(length);
            prop_assert!(!validate(&map, map_size));
        }
    }
}
