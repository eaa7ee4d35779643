//! Integration tests for round-robin match generation and bye rotation.

use grumble_scheduler::{
    generate_matches, generate_round_robin_matches, ByeRule, Group, MatchStatus, TeamId,
    BYE_TEAM_ID,
};
use std::collections::HashSet;

fn reference_groups() -> Vec<Group> {
    vec![
        Group::new("A", vec![1, 4, 7, 10]),
        Group::new("B", vec![2, 5, 8, 11]),
        Group::new("C", vec![3, 6, 9]),
    ]
}

fn unordered(a: TeamId, b: TeamId) -> (TeamId, TeamId) {
    (a.min(b), a.max(b))
}

#[test]
fn reference_groups_produce_eighteen_matches() {
    let matches = generate_round_robin_matches(&reference_groups(), &ByeRule::groups(["C"]));
    assert_eq!(matches.len(), 18);

    let ids: Vec<_> = matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=18).collect::<Vec<_>>());

    // A: ids 1-6, B: 7-12, C pairings: 13-15, C byes: 16-18
    assert!(matches[0..6].iter().all(|m| [1, 4, 7, 10].contains(&m.team1_id)));
    assert!(matches[6..12].iter().all(|m| [2, 5, 8, 11].contains(&m.team1_id)));
    assert!(matches[12..15].iter().all(|m| !m.is_bye()));
    let byes: Vec<_> = matches[15..18].iter().map(|m| (m.team1_id, m.team2_id)).collect();
    assert_eq!(byes, vec![(3, BYE_TEAM_ID), (6, BYE_TEAM_ID), (9, BYE_TEAM_ID)]);
}

#[test]
fn pairings_follow_listed_order() {
    let matches =
        generate_round_robin_matches(&[Group::new("A", vec![1, 4, 7, 10])], &ByeRule::None);
    let pairs: Vec<_> = matches.iter().map(|m| (m.team1_id, m.team2_id)).collect();
    assert_eq!(
        pairs,
        vec![(1, 4), (1, 7), (1, 10), (4, 7), (4, 10), (7, 10)]
    );
}

#[test]
fn every_pair_meets_exactly_once() {
    for n in 0..=9 {
        let team_ids: Vec<TeamId> = (0..n).map(|i| 100 + i).collect();
        let group = Group::new("G", team_ids.clone());
        let matches = generate_round_robin_matches(&[group], &ByeRule::None);
        let expected = (n * n.saturating_sub(1) / 2) as usize;
        assert_eq!(matches.len(), expected, "group of {}", n);

        let mut seen = HashSet::new();
        for m in &matches {
            assert_ne!(m.team1_id, m.team2_id);
            assert!(seen.insert(unordered(m.team1_id, m.team2_id)), "duplicate pair");
        }
        for (i, &a) in team_ids.iter().enumerate() {
            for &b in &team_ids[i + 1..] {
                assert!(seen.contains(&unordered(a, b)));
            }
        }
    }
}

#[test]
fn new_matches_are_upcoming_without_codes() {
    let matches = generate_round_robin_matches(&reference_groups(), &ByeRule::OddSized);
    for m in &matches {
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert!(m.tournament_codes.is_empty());
    }
}

#[test]
fn byes_only_for_designated_group() {
    let matches = generate_round_robin_matches(&reference_groups(), &ByeRule::groups(["B"]));
    let bye_teams: Vec<_> = matches.iter().filter(|m| m.is_bye()).map(|m| m.team1_id).collect();
    assert_eq!(bye_teams, vec![2, 5, 8, 11]);
    // B's byes come right after B's pairings, before C starts
    assert_eq!(matches[12].team1_id, 2);
    assert!(matches[12].is_bye());
    assert_eq!(matches[16].team1_id, 3);
}

#[test]
fn no_byes_without_rule() {
    let matches = generate_round_robin_matches(&reference_groups(), &ByeRule::None);
    assert_eq!(matches.len(), 15);
    assert!(matches.iter().all(|m| !m.is_bye()));
}

#[test]
fn odd_sized_rule_matches_reference_labels() {
    let by_label = generate_round_robin_matches(&reference_groups(), &ByeRule::groups(["C"]));
    let by_size = generate_round_robin_matches(&reference_groups(), &ByeRule::OddSized);
    assert_eq!(by_label, by_size);
}

#[test]
fn degenerate_groups_contribute_nothing_but_byes() {
    let groups = vec![
        Group::new("empty", vec![]),
        Group::new("solo", vec![42]),
        Group::new("pair", vec![1, 2]),
    ];
    let matches = generate_matches(&groups, |g| g.name == "solo" || g.name == "empty");
    assert_eq!(matches.len(), 2);
    assert!(matches[0].is_bye());
    assert_eq!(matches[0].team1_id, 42);
    assert_eq!((matches[1].id, matches[1].team1_id, matches[1].team2_id), (2, 1, 2));
}

#[test]
fn generation_is_deterministic() {
    let a = generate_round_robin_matches(&reference_groups(), &ByeRule::OddSized);
    let b = generate_round_robin_matches(&reference_groups(), &ByeRule::OddSized);
    assert_eq!(a, b);
}

#[test]
fn matches_serialize_with_camel_case_fields() {
    let matches = generate_round_robin_matches(&[Group::new("C", vec![3])], &ByeRule::OddSized);
    let json = serde_json::to_value(&matches).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "id": 1, "team1Id": 3, "team2Id": -1, "status": "upcoming", "tournamentCodes": [] }
        ])
    );
}

#[test]
fn bye_rule_deserializes_from_tagged_json() {
    let rule: ByeRule = serde_json::from_value(serde_json::json!({
        "kind": "groups",
        "names": ["C"]
    }))
    .unwrap();
    assert_eq!(rule, ByeRule::groups(["C"]));
    let rule: ByeRule = serde_json::from_value(serde_json::json!({ "kind": "odd_sized" })).unwrap();
    assert_eq!(rule, ByeRule::OddSized);
}
