use anyhow::Result;
use askama::Template;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::medals::MedalTable;
use crate::participants::Participant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
}

/// Sums the claimed countries' medals per participant and ranks the result.
/// A claimed code missing from the table counts as zero medals. Rows are
/// ordered by total, then gold, then silver, all descending; rows tied on
/// the whole key keep their input order and still get distinct ranks.
pub fn compute_scores(participants: &[Participant], medals: &MedalTable) -> Vec<LeaderboardRow> {
    let mut rows = participants
        .iter()
        .map(|participant| {
            let mut row = LeaderboardRow {
                rank: 0,
                name: participant.name.clone(),
                gold: 0,
                silver: 0,
                bronze: 0,
                total: 0,
            };
            for code in &participant.countries {
                let counts = medals.get(code).copied().unwrap_or_default();
                row.gold += counts.gold;
                row.silver += counts.silver;
                row.bronze += counts.bronze;
                row.total += counts.total;
            }
            row
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| (b.total, b.gold, b.silver).cmp(&(a.total, a.gold, a.silver)));
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position + 1;
    }

    rows
}

#[derive(Debug, Template)]
#[template(path = "leaderboard.html.j2")]
pub struct LeaderboardPage {
    pub rows: Vec<LeaderboardRow>,
    pub updated: String,
    pub refresh_secs: u32,
}

impl LeaderboardPage {
    pub fn new(rows: Vec<LeaderboardRow>, refresh_secs: u32) -> Self {
        Self {
            rows,
            updated: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            refresh_secs,
        }
    }

    pub fn generate(&self) -> Result<String> {
        Ok(self.render()?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::medals::MedalCount;

    fn medals(counts: &[(&str, u32, u32, u32, u32)]) -> MedalTable {
        counts
            .iter()
            .map(|&(code, gold, silver, bronze, total)| {
                (
                    code.to_string(),
                    MedalCount {
                        gold,
                        silver,
                        bronze,
                        total,
                    },
                )
            })
            .collect()
    }

    fn participant(name: &str, countries: &[&str]) -> Participant {
        Participant {
            name: name.to_string(),
            countries: countries.iter().map(|code| code.to_string()).collect(),
        }
    }

    #[test]
    fn claimed_countries_are_summed_and_ranked() {
        let table = medals(&[("USA", 2, 1, 0, 3), ("NOR", 1, 0, 1, 2)]);
        let participants = vec![
            participant("Alice", &["USA"]),
            participant("Bob", &["NOR", "USA"]),
        ];

        let board = compute_scores(&participants, &table);

        assert_eq!(board[0].name, "Bob");
        assert_eq!((board[0].gold, board[0].silver, board[0].bronze), (3, 1, 1));
        assert_eq!(board[0].total, 5);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].name, "Alice");
        assert_eq!(board[1].total, 3);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn unknown_countries_count_as_zero() {
        let table = medals(&[("USA", 2, 1, 0, 3)]);
        let participants = vec![participant("Carol", &["ATL", "ZZX"])];

        let board = compute_scores(&participants, &table);

        assert_eq!(board.len(), 1);
        assert_eq!(
            (board[0].gold, board[0].silver, board[0].bronze, board[0].total),
            (0, 0, 0, 0)
        );
        assert_eq!(board[0].rank, 1);
    }

    #[test]
    fn ties_get_distinct_consecutive_ranks() {
        let table = medals(&[("SWE", 1, 2, 3, 6), ("FIN", 1, 2, 3, 6)]);
        let participants = vec![
            participant("Dan", &["SWE"]),
            participant("Erin", &["FIN"]),
        ];

        let board = compute_scores(&participants, &table);

        // equal (total, gold, silver) keys keep input order, no shared rank
        assert_eq!(board[0].name, "Dan");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].name, "Erin");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn silver_breaks_gold_ties() {
        let table = medals(&[("AUT", 2, 1, 3, 6), ("SUI", 2, 2, 2, 6)]);
        let participants = vec![
            participant("Frank", &["AUT"]),
            participant("Grace", &["SUI"]),
        ];

        let board = compute_scores(&participants, &table);

        assert_eq!(board[0].name, "Grace");
        assert_eq!(board[1].name, "Frank");
    }

    #[test]
    fn aggregation_is_deterministic() {
        let table = medals(&[("USA", 2, 1, 0, 3), ("NOR", 1, 0, 1, 2)]);
        let participants = vec![
            participant("Alice", &["USA"]),
            participant("Bob", &["NOR", "USA"]),
            participant("Carol", &[]),
        ];

        assert_eq!(
            compute_scores(&participants, &table),
            compute_scores(&participants, &table)
        );
    }

    #[test]
    fn no_participants_renders_an_empty_board() {
        let board = compute_scores(&[], &HashMap::new());
        assert!(board.is_empty());
    }

    #[test]
    fn render_should_carry_refresh_and_timestamp() {
        let page = LeaderboardPage {
            rows: compute_scores(
                &[participant("Mel & Ted", &["USA"])],
                &medals(&[("USA", 2, 1, 0, 3)]),
            ),
            updated: "2026-02-11 09:30 UTC".to_string(),
            refresh_secs: 300,
        };

        let html = page.generate().unwrap();

        assert!(html.contains(r#"<meta http-equiv="refresh" content="300">"#));
        assert!(html.contains("Last updated: 2026-02-11 09:30 UTC"));
        assert!(html.contains("<td>Mel &amp; Ted</td>"));
        assert!(html.contains("<td><b>3</b></td>"));
    }
}
