use glam::{ivec2, IVec2};

/// Ascii art grid read from row strings.
///
/// Whitespace characters inside the map are treated as empty cells and are
/// skipped by [`AsciiMap::iter`].
#[derive(Clone, Default, Debug, Eq, PartialEq)]
pub struct AsciiMap {
    map: String,
}

impl AsciiMap {
    /// Build a map from separate row strings.
    ///
    /// Rows are taken as-is, blank rows or columns are not trimmed off, so
    /// cell coordinates match the row and column indices of the input.
    pub fn from_rows<S: AsRef<str>>(
        rows: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut map = String::new();
        for row in rows {
            map.push_str(row.as_ref());
            map.push('\n');
        }
        AsciiMap { map }
    }

    /// Iterate the non-whitespace points on the map.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, char)> + '_ {
        self.map.lines().enumerate().flat_map(move |(y, line)| {
            line.chars()
                .enumerate()
                .filter(|(_, c)| !c.is_whitespace())
                .map(move |(x, c)| (ivec2(x as i32, y as i32), c))
        })
    }

    /// Dimensions of the bounding box of the rows.
    pub fn size(&self) -> IVec2 {
        let w = self
            .map
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let h = self.map.lines().count();
        ivec2(w as i32, h as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_whitespace_is_skipped() {
        let map = AsciiMap::from_rows(["# #", "###"]);
        assert_eq!(map.size(), ivec2(3, 2));
        assert_eq!(map.iter().count(), 5);
    }

    #[test]
    fn rows_keep_their_margins() {
        let map = AsciiMap::from_rows(["   ", " .#"]);
        assert_eq!(map.size(), ivec2(3, 2));
        let cells: Vec<_> = map.iter().collect();
        assert_eq!(cells, vec![(ivec2(1, 1), '.'), (ivec2(2, 1), '#')]);
    }

    #[test]
    fn ragged_rows() {
        let map = AsciiMap::from_rows(["#", "###", ""]);
        assert_eq!(map.size(), ivec2(3, 3));
        assert_eq!(map.iter().count(), 4);
    }

    #[test]
    fn empty_map() {
        let map = AsciiMap::from_rows(Vec::<String>::new());
        assert_eq!(map.size(), IVec2::ZERO);
        assert_eq!(map.iter().count(), 0);
    }
}
