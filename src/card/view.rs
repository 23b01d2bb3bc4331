use chrono::{DateTime, Locale, TimeZone, Utc};
use fixture_api::{Fixture, TeamId};
use std::fmt::Display;

/// Dates and kickoff times are always written the Swedish way.
pub const LOCALE: Locale = Locale::sv_SE;
const DATE_FORMAT: &str = "%a %-d %B";
const TIME_FORMAT: &str = "%H:%M";

pub const FULL_TIME: &str = "FT";
pub const INVALID_DATE: &str = "Invalid Date";
pub const NO_SCORE: &str = "-";

/// Position of a fixture in the chronological order of its round. Only valid for
/// the paint that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixtureId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayGroup {
    pub date_label: String,
    pub fixtures: Vec<AnnotatedFixture>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedFixture {
    pub id: FixtureId,
    pub fixture: Fixture,
    pub time_or_result: String,
    /// Scores are hidden behind a spoiler and the row opens the entity details.
    pub is_tracked_team_match: bool,
    pub home_emphasis: bool,
    pub away_emphasis: bool,
    pub home_is_tracked: bool,
    pub away_is_tracked: bool,
}

impl AnnotatedFixture {
    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.fixture.home_team,
            Side::Away => &self.fixture.away_team,
        }
    }

    /// Logo URL, `None` when the sensor sent none or an empty one.
    pub fn logo(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => self.fixture.home_team_logo.as_deref(),
            Side::Away => self.fixture.away_team_logo.as_deref(),
        }
    }

    pub fn score_label(&self, side: Side) -> String {
        let goals = match side {
            Side::Home => self.fixture.score.home,
            Side::Away => self.fixture.score.away,
        };
        goals.map_or_else(|| NO_SCORE.to_string(), |g| g.to_string())
    }

    pub fn emphasis(&self, side: Side) -> bool {
        match side {
            Side::Home => self.home_emphasis,
            Side::Away => self.away_emphasis,
        }
    }

    pub fn is_tracked(&self, side: Side) -> bool {
        match side {
            Side::Home => self.home_is_tracked,
            Side::Away => self.away_is_tracked,
        }
    }
}

/// Build the view model for one round.
///
/// Fixtures are sorted by kickoff (stable, unparseable dates last) and grouped by
/// calendar day in `tz`. Groups keep the order in which their day first appears,
/// which after sorting is chronological.
pub fn render<Tz>(
    fixtures: &[Fixture],
    tracked_team_id: TeamId,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<DisplayGroup>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut sorted: Vec<&Fixture> = fixtures.iter().collect();
    sorted.sort_by_key(|f| (f.date.is_none(), f.date));

    let mut groups: Vec<DisplayGroup> = Vec::new();
    for (index, fixture) in sorted.into_iter().enumerate() {
        let date_label = date_label(fixture.date, tz);
        let annotated = annotate(FixtureId(index), fixture, tracked_team_id, now, tz);
        match groups.iter_mut().find(|g| g.date_label == date_label) {
            Some(group) => group.fixtures.push(annotated),
            None => groups.push(DisplayGroup { date_label, fixtures: vec![annotated] }),
        }
    }
    groups
}

/// Fixture ids in display order.
pub fn display_order(groups: &[DisplayGroup]) -> Vec<FixtureId> {
    groups
        .iter()
        .flat_map(|g| g.fixtures.iter().map(|f| f.id))
        .collect()
}

pub fn find(groups: &[DisplayGroup], id: FixtureId) -> Option<&AnnotatedFixture> {
    groups
        .iter()
        .flat_map(|g| g.fixtures.iter())
        .find(|f| f.id == id)
}

fn annotate<Tz>(
    id: FixtureId,
    fixture: &Fixture,
    tracked_team_id: TeamId,
    now: DateTime<Utc>,
    tz: &Tz,
) -> AnnotatedFixture
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    AnnotatedFixture {
        id,
        fixture: fixture.clone(),
        time_or_result: time_or_result(fixture.date, now, tz),
        is_tracked_team_match: fixture.involves(tracked_team_id),
        home_emphasis: fixture.score.home_leads(),
        away_emphasis: fixture.score.away_leads(),
        home_is_tracked: fixture.home_team_id == Some(tracked_team_id),
        away_is_tracked: fixture.away_team_id == Some(tracked_team_id),
    }
}

fn date_label<Tz>(date: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match date {
        Some(date) => date
            .with_timezone(tz)
            .format_localized(DATE_FORMAT, LOCALE)
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// "FT" once kickoff is strictly in the past, otherwise the kickoff time.
fn time_or_result<Tz>(date: Option<DateTime<Utc>>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match date {
        Some(date) if date < now => FULL_TIME.to_string(),
        Some(date) => date
            .with_timezone(tz)
            .format_localized(TIME_FORMAT, LOCALE)
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use fixture_api::Score;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn fixture(home: &str, away: &str, date: Option<DateTime<Utc>>) -> Fixture {
        Fixture {
            date,
            home_team: home.into(),
            away_team: away.into(),
            ..Default::default()
        }
    }

    fn labels(groups: &[DisplayGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.date_label.as_str()).collect()
    }

    fn homes(group: &DisplayGroup) -> Vec<&str> {
        group.fixtures.iter().map(|f| f.fixture.home_team.as_str()).collect()
    }

    #[test]
    fn groups_sorted_within_and_across_days() {
        // 2024-08-19 is a Monday.
        let fixtures = vec![
            fixture("Mon10", "X", Some(at(2024, 8, 19, 10, 0))),
            fixture("Mon09", "X", Some(at(2024, 8, 19, 9, 0))),
            fixture("Tue12", "X", Some(at(2024, 8, 20, 12, 0))),
        ];
        let now = at(2024, 8, 1, 0, 0);
        let groups = render(&fixtures, 529, now, &Utc);

        assert_eq!(labels(&groups), vec!["mån 19 augusti", "tis 20 augusti"]);
        assert_eq!(homes(&groups[0]), vec!["Mon09", "Mon10"]);
        assert_eq!(homes(&groups[1]), vec!["Tue12"]);
        assert_eq!(display_order(&groups), vec![FixtureId(0), FixtureId(1), FixtureId(2)]);
    }

    #[test]
    fn sort_is_stable_for_equal_kickoffs() {
        let kickoff = Some(at(2024, 8, 17, 19, 0));
        let fixtures = vec![
            fixture("First", "X", kickoff),
            fixture("Second", "X", kickoff),
            fixture("Third", "X", kickoff),
        ];
        let groups = render(&fixtures, 529, at(2024, 8, 1, 0, 0), &Utc);
        assert_eq!(homes(&groups[0]), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn grouping_follows_the_display_timezone() {
        // 23:30 UTC on Saturday is already Sunday in Stockholm summer time.
        let fixtures = vec![fixture("Late", "X", Some(at(2024, 8, 17, 23, 30)))];
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        let groups = render(&fixtures, 529, at(2024, 8, 1, 0, 0), &cest);
        assert_eq!(labels(&groups), vec!["sön 18 augusti"]);
        assert_eq!(groups[0].fixtures[0].time_or_result, "01:30");
    }

    #[test]
    fn time_label_boundary_around_now() {
        let now = at(2024, 8, 17, 19, 0);
        let fixtures = vec![
            fixture("Past", "X", Some(now - Duration::seconds(1))),
            fixture("Future", "X", Some(now + Duration::seconds(1))),
        ];
        let groups = render(&fixtures, 529, now, &Utc);
        let all: Vec<_> = groups.iter().flat_map(|g| g.fixtures.iter()).collect();

        assert_eq!(all[0].time_or_result, FULL_TIME);
        assert_eq!(all[1].time_or_result, "19:00");
    }

    #[test]
    fn kickoff_exactly_now_is_not_full_time() {
        let now = at(2024, 8, 17, 19, 0);
        let groups = render(&[fixture("Now", "X", Some(now))], 529, now, &Utc);
        assert_eq!(groups[0].fixtures[0].time_or_result, "19:00");
    }

    #[test]
    fn malformed_dates_degrade_to_invalid_date() {
        let fixtures = vec![
            fixture("Broken", "X", None),
            fixture("Valid", "X", Some(at(2024, 8, 17, 19, 0))),
        ];
        let groups = render(&fixtures, 529, at(2024, 8, 1, 0, 0), &Utc);

        assert_eq!(labels(&groups), vec!["lör 17 augusti", INVALID_DATE]);
        assert_eq!(groups[1].fixtures[0].time_or_result, INVALID_DATE);
        assert_eq!(groups[1].fixtures[0].id, FixtureId(1));
    }

    #[test]
    fn tracked_team_matches_on_id_only() {
        let mut home = fixture("Barcelona", "Valencia", Some(at(2024, 8, 17, 19, 0)));
        home.home_team_id = Some(529);
        home.away_team_id = Some(532);
        home.score = Score { home: Some(2), away: Some(1) };

        let mut away = fixture("Getafe", "Barça", Some(at(2024, 8, 18, 19, 0)));
        away.home_team_id = Some(546);
        away.away_team_id = Some(529);

        // Same name as the tracked team, different id.
        let mut namesake = fixture("Barcelona", "Girona", Some(at(2024, 8, 19, 19, 0)));
        namesake.home_team_id = Some(9999);
        namesake.away_team_id = Some(547);

        let groups = render(&[home, away, namesake], 529, at(2024, 8, 1, 0, 0), &Utc);
        let all: Vec<_> = groups.iter().flat_map(|g| g.fixtures.iter()).collect();

        assert!(all[0].is_tracked_team_match);
        assert!(all[0].home_is_tracked);
        assert!(!all[0].away_is_tracked);
        assert!(all[1].is_tracked_team_match);
        assert!(all[1].away_is_tracked);
        assert!(!all[2].is_tracked_team_match);
    }

    #[test]
    fn emphasis_marks_the_leading_side() {
        let mut won = fixture("A", "B", Some(at(2024, 8, 17, 19, 0)));
        won.score = Score { home: Some(2), away: Some(1) };
        let mut lost = fixture("C", "D", Some(at(2024, 8, 17, 20, 0)));
        lost.score = Score { home: Some(0), away: Some(3) };
        let unplayed = fixture("E", "F", Some(at(2024, 8, 17, 21, 0)));

        let groups = render(&[won, lost, unplayed], 529, at(2024, 8, 1, 0, 0), &Utc);
        let all = &groups[0].fixtures;

        assert!(all[0].home_emphasis && !all[0].away_emphasis);
        assert!(!all[1].home_emphasis && all[1].away_emphasis);
        assert!(!all[2].home_emphasis && !all[2].away_emphasis);
        assert_eq!(all[2].score_label(Side::Home), NO_SCORE);
        assert_eq!(all[0].score_label(Side::Away), "1");
    }

    #[test]
    fn empty_round_has_no_groups() {
        assert!(render(&[], 529, at(2024, 8, 1, 0, 0), &Utc).is_empty());
    }

    #[test]
    fn find_by_id() {
        let fixtures = vec![
            fixture("Later", "X", Some(at(2024, 8, 18, 19, 0))),
            fixture("Earlier", "X", Some(at(2024, 8, 17, 19, 0))),
        ];
        let groups = render(&fixtures, 529, at(2024, 8, 1, 0, 0), &Utc);
        assert_eq!(find(&groups, FixtureId(0)).map(|f| f.team(Side::Home)), Some("Earlier"));
        assert!(find(&groups, FixtureId(2)).is_none());
    }
}
