//! Score statistics over a batch of sessions.
use engine::Scores;
use serde::Serialize;
use util::Logos;

/// Spread of one measured quantity.
#[derive(Copy, Clone, Default, PartialEq, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl FromIterator<f64> for Summary {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let values: Vec<f64> = iter.into_iter().collect();
        if values.is_empty() {
            return Default::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Summary {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Report {
    pub map: String,
    pub seed: Logos,
    pub games: usize,
    pub turns: Summary,
    pub score: Summary,
    pub killed_monsters: Summary,
    pub opened_chests: Summary,
    pub max_combo: u32,
}

impl Report {
    pub fn new(map: impl Into<String>, seed: Logos, games: &[Scores]) -> Self {
        let stat = |f: fn(&Scores) -> u32| -> Summary {
            games.iter().map(|s| f(s) as f64).collect()
        };

        Report {
            map: map.into(),
            seed,
            games: games.len(),
            turns: stat(|s| s.turns),
            score: stat(Scores::total),
            killed_monsters: stat(|s| s.killed_monsters),
            opened_chests: stat(|s| s.opened_chests),
            max_combo: games.iter().map(|s| s.max_combo).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn summary_of_values() {
        let s: Summary = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .into_iter()
            .collect();
        assert_eq!(
            s,
            Summary {
                min: 2.0,
                max: 9.0,
                mean: 5.0,
                std_dev: 2.0
            }
        );
    }

    #[test]
    fn empty_batch() {
        let report = Report::new("empty", Logos::new("x"), &[]);
        assert_eq!(report.games, 0);
        assert_eq!(report.score, Summary::default());
        assert_eq!(report.max_combo, 0);
    }

    #[test]
    fn report_totals() {
        let games = [
            Scores {
                killed_monsters: 2,
                opened_chests: 1,
                combo_score: 2,
                max_combo: 3,
                turns: 10,
            },
            Scores {
                turns: 4,
                ..Default::default()
            },
        ];
        let report = Report::new("test", Logos::new("seed"), &games);
        assert_eq!(report.turns.min, 4.0);
        assert_eq!(report.turns.max, 10.0);
        assert_eq!(report.score.max, 15.0);
        assert_eq!(report.score.mean, 9.5);
        assert_eq!(report.max_combo, 3);
    }
}
