use crate::league::{Fixture, FixtureResult, FixtureStatus, Participant, UserId};
use serde::Serialize;
use std::collections::HashMap;

const POINTS_FOR_WIN: u32 = 3;
const POINTS_FOR_DRAW: u32 = 1;

/// One participant's derived record within a league. Never persisted
/// as a source of truth: always recomputed from fixtures and results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    pub user_id: UserId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingsRow {
    fn zeroed(participant: &Participant) -> Self {
        StandingsRow {
            user_id: participant.user_id,
            team_name: participant.team_name.clone(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn apply(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = self.goals_for as i64 - self.goals_against as i64;

        if scored > conceded {
            self.won += 1;
            self.points += POINTS_FOR_WIN;
        } else if scored < conceded {
            self.lost += 1;
        } else {
            self.drawn += 1;
            self.points += POINTS_FOR_DRAW;
        }
    }
}

/// Computes the standings table for one league from completed fixtures
/// and their results. Pure: safe to recompute on every read.
///
/// Ordering is points, then goal difference, then goals scored, all
/// descending. The sort is stable, so participants still tied after
/// all three keys keep their input-list order.
pub fn compute_standings(
    participants: &[Participant],
    fixtures: &[Fixture],
    results: &[FixtureResult],
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = participants.iter().map(StandingsRow::zeroed).collect();

    let positions: HashMap<UserId, usize> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| (row.user_id, index))
        .collect();

    let results_by_fixture: HashMap<u32, &FixtureResult> =
        results.iter().map(|r| (r.fixture_id, r)).collect();

    for fixture in fixtures
        .iter()
        .filter(|f| f.status == FixtureStatus::Completed)
    {
        let Some(result) = results_by_fixture.get(&fixture.id) else {
            continue;
        };

        if let Some(&index) = positions.get(&fixture.home_user_id) {
            rows[index].apply(result.score.home, result.score.away);
        }
        if let Some(&index) = positions.get(&fixture.away_user_id) {
            rows[index].apply(result.score.away, result.score.home);
        }
    }

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{FixtureStage, MatchScore};

    fn participants(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Participant::new(index as u32 + 1, name))
            .collect()
    }

    struct TableBuilder {
        fixtures: Vec<Fixture>,
        results: Vec<FixtureResult>,
    }

    impl TableBuilder {
        fn new() -> Self {
            TableBuilder {
                fixtures: Vec::new(),
                results: Vec::new(),
            }
        }

        fn completed(mut self, home: UserId, away: UserId, score: (u32, u32)) -> Self {
            let id = self.fixtures.len() as u32 + 1;
            self.fixtures.push(fixture(id, home, away, FixtureStatus::Completed));
            self.results.push(FixtureResult {
                id,
                fixture_id: id,
                league_id: 1,
                home_user_id: home,
                away_user_id: away,
                score: MatchScore::new(score.0, score.1),
                verified: true,
            });
            self
        }

        fn scheduled(mut self, home: UserId, away: UserId) -> Self {
            let id = self.fixtures.len() as u32 + 1;
            self.fixtures.push(fixture(id, home, away, FixtureStatus::Scheduled));
            self
        }
    }

    fn fixture(id: u32, home: UserId, away: UserId, status: FixtureStatus) -> Fixture {
        Fixture {
            id,
            league_id: 1,
            home_user_id: home,
            away_user_id: away,
            home_team: format!("Team {}", home),
            away_team: format!("Team {}", away),
            gameweek: id,
            stage: Some(FixtureStage::TablePhase),
            status,
        }
    }

    #[test]
    fn test_worked_four_team_example() {
        // A 3-1 B, C 2-2 D, A 1-0 C, B 2-2 D, A 2-2 D, B 1-0 C
        let entrants = participants(&["A", "B", "C", "D"]);
        let data = TableBuilder::new()
            .completed(1, 2, (3, 1))
            .completed(3, 4, (2, 2))
            .completed(1, 3, (1, 0))
            .completed(2, 4, (2, 2))
            .completed(1, 4, (2, 2))
            .completed(2, 3, (1, 0));

        let rows = compute_standings(&entrants, &data.fixtures, &data.results);

        let a = &rows[0];
        assert_eq!(a.team_name, "A");
        assert_eq!(
            (a.played, a.won, a.drawn, a.lost),
            (3, 2, 1, 0),
            "A: two wins and a draw"
        );
        assert_eq!(a.points, 7);
        assert_eq!((a.goals_for, a.goals_against, a.goal_difference), (6, 3, 3));

        assert_eq!(rows[1].team_name, "B");
        assert_eq!(rows[1].points, 4);
        assert_eq!(rows[1].goal_difference, -1);

        assert_eq!(rows[2].team_name, "D");
        assert_eq!(rows[2].points, 3);
        assert_eq!((rows[2].won, rows[2].drawn, rows[2].lost), (0, 3, 0));

        assert_eq!(rows[3].team_name, "C");
        assert_eq!(rows[3].points, 1);
    }

    #[test]
    fn test_scheduled_and_resultless_fixtures_are_ignored() {
        let entrants = participants(&["A", "B", "C"]);
        let mut data = TableBuilder::new()
            .completed(1, 2, (2, 0))
            .scheduled(1, 3);

        // completed status but no stored result: must not count either
        data.fixtures.push(fixture(9, 2, 3, FixtureStatus::Completed));

        let rows = compute_standings(&entrants, &data.fixtures, &data.results);

        assert_eq!(rows[0].team_name, "A");
        assert_eq!(rows[0].played, 1);
        assert_eq!(rows.iter().map(|r| r.played).sum::<u32>(), 2);
    }

    #[test]
    fn test_tie_break_order_points_gd_gf() {
        let entrants = participants(&["A", "B", "C", "D", "E", "F"]);

        // three winners on equal points: C leads on goal difference,
        // then E edges A on goals scored; the losers mirror them
        let data = TableBuilder::new()
            .completed(1, 2, (1, 0))
            .completed(3, 4, (3, 1))
            .completed(5, 6, (3, 2));

        let rows = compute_standings(&entrants, &data.fixtures, &data.results);

        let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, vec!["C", "E", "A", "F", "B", "D"]);

        // C v E split on goal difference, E v A on goals scored
        assert_eq!(rows[0].points, rows[1].points);
        assert!(rows[0].goal_difference > rows[1].goal_difference);
        assert_eq!(rows[1].goal_difference, rows[2].goal_difference);
        assert!(rows[1].goals_for > rows[2].goals_for);

        // same keys decide the winless teams
        assert_eq!(rows[3].goal_difference, rows[4].goal_difference);
        assert!(rows[3].goals_for > rows[4].goals_for);
        assert!(rows[4].goal_difference > rows[5].goal_difference);
    }

    #[test]
    fn test_full_ties_preserve_input_order() {
        let entrants = participants(&["A", "B", "C"]);

        // nobody has played: all rows identical on every tie-break key
        let rows = compute_standings(&entrants, &[], &[]);
        let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        // swapping the input order of the tied participants swaps the
        // output order too: stability, not hidden keys, decides it
        let swapped = participants(&["A", "B", "C"]);
        let swapped: Vec<Participant> = vec![
            swapped[2].clone(),
            swapped[1].clone(),
            swapped[0].clone(),
        ];
        let rows = compute_standings(&swapped, &[], &[]);
        let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_determinism_across_recomputation() {
        let entrants = participants(&["A", "B", "C", "D"]);
        let data = TableBuilder::new()
            .completed(1, 2, (1, 1))
            .completed(3, 4, (1, 1))
            .completed(1, 3, (2, 2));

        let first = compute_standings(&entrants, &data.fixtures, &data.results);
        let second = compute_standings(&entrants, &data.fixtures, &data.results);

        assert_eq!(first, second);
    }
}
