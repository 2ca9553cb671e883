use std::collections::HashSet;

use longway::data::Song;
use longway::data::challenges::ChallengeKind;
use longway::data::difficulty::filter_for_act;
use longway::{GeneratorConfig, Run, build_run};

const GENRES: [&str; 4] = ["Rock", "Metal", "Pop", "Classic Rock"];

fn song(idx: usize, year: u32, seconds: u32, genre: &str, difficulty: u8) -> Song {
    Song {
        id: format!("song-{idx:03}"),
        title: format!("Track {idx}"),
        artist: format!("Artist {}", idx % 7),
        album: "Album".to_string(),
        genre: genre.to_string(),
        difficulty,
        length: format!("{}:{:02}", seconds / 60, seconds % 60),
        seconds,
        year,
        ..Song::default()
    }
}

fn wide_catalog(len: usize) -> Vec<Song> {
    (0..len)
        .map(|idx| {
            song(
                idx,
                1965 + (idx as u32 * 7) % 55,
                150 + (idx as u32 * 37) % 300,
                GENRES[idx % GENRES.len()],
                (idx % 7) as u8,
            )
        })
        .collect()
}

fn scenario_catalog() -> Vec<Song> {
    vec![
        Song {
            id: "eye".to_string(),
            title: "Eye of the Tiger".to_string(),
            artist: "Survivor".to_string(),
            year: 1982,
            seconds: 245,
            difficulty: 3,
            ..Song::default()
        },
        Song {
            id: "fire".to_string(),
            title: "Through the Fire and Flames".to_string(),
            artist: "DragonForce".to_string(),
            year: 2006,
            seconds: 444,
            difficulty: 6,
            ..Song::default()
        },
        Song {
            id: "cydonia".to_string(),
            title: "Knights of Cydonia".to_string(),
            artist: "Muse".to_string(),
            year: 2006,
            seconds: 366,
            difficulty: 5,
            ..Song::default()
        },
    ]
}

fn challenges(run: &Run) -> impl Iterator<Item = (usize, &longway::data::challenges::Challenge)> {
    run.acts
        .iter()
        .flat_map(|act| act.nodes().map(move |node| (act.index, &node.challenge)))
}

#[test]
fn same_seed_same_run() {
    let catalog = wide_catalog(60);
    for seed in [0, 1, 7, 12345, u64::MAX] {
        let first = build_run(seed, &catalog);
        let second = build_run(seed, &catalog);
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }
}

#[test]
fn different_seeds_usually_differ() {
    let catalog = wide_catalog(60);
    let runs: HashSet<String> = (0..8)
        .map(|seed| build_run(seed, &catalog).to_json().unwrap())
        .collect();
    assert!(runs.len() > 1);
}

#[test]
fn every_later_row_is_reachable() {
    let catalog = wide_catalog(40);
    for seed in 0..50 {
        let run = build_run(seed, &catalog);
        for act in &run.acts {
            for row in 1..act.rows.len() {
                for col in 0..act.width(row) {
                    assert!(
                        act.has_incoming(row, col),
                        "seed {seed} act {} row {row} col {col} unreachable",
                        act.index
                    );
                }
            }
        }
    }
}

#[test]
fn runs_have_three_acts_of_eight_rows() {
    let catalog = wide_catalog(30);
    for seed in 0..30 {
        let run = build_run(seed, &catalog);
        assert_eq!(run.seed, seed);
        assert_eq!(run.acts.len(), 3);
        for (idx, act) in run.acts.iter().enumerate() {
            assert_eq!(act.index, idx + 1);
            assert_eq!(act.rows.len(), 8);
            for row in &act.rows {
                assert!((2..=5).contains(&row.len()));
            }
            for node in act.rows.last().unwrap() {
                assert!(node.edges.is_empty());
            }
        }
    }
}

#[test]
fn decade_challenges_share_one_decade() {
    let catalog = wide_catalog(80);
    let mut seen = 0;
    for seed in 0..20 {
        let run = build_run(seed, &catalog);
        for (_, challenge) in challenges(&run) {
            if challenge.kind != ChallengeKind::Decade {
                continue;
            }
            seen += 1;
            let decade = challenge.songs[0].year / 10;
            assert!(challenge.songs.iter().all(|s| s.year / 10 == decade));
            assert_eq!(challenge.id, format!("decade-{}", decade * 10));
        }
    }
    assert!(seen > 0);
}

#[test]
fn long_song_challenges_only_hold_long_songs() {
    let catalog = wide_catalog(80);
    let mut seen = 0;
    for seed in 0..20 {
        let run = build_run(seed, &catalog);
        for (_, challenge) in challenges(&run) {
            if challenge.kind == ChallengeKind::LongSong {
                seen += 1;
                assert!(challenge.songs.iter().all(|s| s.seconds > 300));
            }
        }
    }
    assert!(seen > 0);
}

#[test]
fn challenge_sizes_respect_pool_bounds() {
    let config = GeneratorConfig::default();
    let catalog = wide_catalog(80);
    for seed in 0..20 {
        let run = build_run(seed, &catalog);
        for (act_index, challenge) in challenges(&run) {
            let bounds = config.pool_bounds_for_act(act_index);
            let eligible = filter_for_act(act_index, &catalog).len();
            assert!(!challenge.songs.is_empty());
            assert!(challenge.songs.len() <= bounds.max);
            assert!(challenge.songs.len() <= eligible);
            let ids: HashSet<&str> = challenge.songs.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids.len(), challenge.songs.len());
        }
    }
}

#[test]
fn songs_stay_in_their_act_band() {
    let mut catalog = Vec::new();
    for idx in 0..30 {
        let difficulty = [1, 3, 6][idx % 3];
        catalog.push(song(idx, 1990, 200, "Rock", difficulty));
    }
    for seed in 0..10 {
        let run = build_run(seed, &catalog);
        for (act_index, challenge) in challenges(&run) {
            for s in &challenge.songs {
                match act_index {
                    1 => assert!(s.difficulty <= 3),
                    2 => assert!(s.difficulty <= 5),
                    _ => assert!(s.difficulty >= 3),
                }
            }
        }
    }
}

#[test]
fn three_song_catalog_scenario() {
    let run = build_run(12345, &scenario_catalog());
    assert_eq!(run.acts.len(), 3);
    for act in &run.acts {
        assert_eq!(act.rows.len(), 8);
        for row in &act.rows {
            assert!(!row.is_empty());
            for node in row {
                assert!(!node.challenge.songs.is_empty());
            }
        }
    }
    for node in run.acts[0].nodes() {
        assert_eq!(node.challenge.kind, ChallengeKind::Test);
        assert_eq!(
            node.challenge.summary,
            "Play \"Eye of the Tiger\" by Survivor to push through this encounter."
        );
        let titles: Vec<&str> = node
            .challenge
            .songs
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Eye of the Tiger"]);
    }
}

#[test]
fn empty_catalog_falls_back_to_the_builtin_song() {
    let run = build_run(99, &[]);
    for (_, challenge) in challenges(&run) {
        assert_eq!(challenge.kind, ChallengeKind::Test);
        assert_eq!(challenge.songs, vec![Song::builtin()]);
    }
}
