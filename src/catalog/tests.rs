use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::error::CatalogError;

const SAMPLE: &str = "Track ID,ID,Name,Singer,File Path,Rating,Plays\r\n\
01,0,Song A,Artist X,music/SongA.mp3,0,0\r\n\
02,1,Another Day,Band Y,music/AnotherDay.mp3,4,7\r\n\
04,2,\"Hello, World\",Z,music/HelloWorld.mp3,5,2\r\n";

fn write_catalog(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

fn tuples(store: &CatalogStore) -> Vec<(String, String, String, String, u32, u32)> {
    let mut v: Vec<_> = store
        .list_all()
        .iter()
        .map(|r| {
            (
                r.track_id.clone(),
                r.name.clone(),
                r.artist.clone(),
                r.source.clone(),
                r.rating,
                r.play_count,
            )
        })
        .collect();
    v.sort();
    v
}

#[test]
fn missing_file_loads_as_empty_catalog() {
    let dir = tempdir().unwrap();
    let mut store = CatalogStore::new(dir.path().join("nope.csv"));
    assert!(store.load().is_empty());
    assert!(store.list_all().is_empty());
    assert_eq!(store.list_all_text(), "");
}

#[test]
fn loads_rows_in_file_order_with_quoted_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let store = CatalogStore::open(&path);
    let ids: Vec<&str> = store.list_all().iter().map(|r| r.track_id.as_str()).collect();
    assert_eq!(ids, vec!["01", "02", "04"]);
    assert_eq!(store.name("04"), Some("Hello, World"));
}

#[test]
fn single_record_scenario() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(
        &path,
        "Track ID,ID,Name,Singer,File Path,Rating,Plays\n01,0,Song A,Artist X,a.mp3,0,0\n",
    );

    let store = CatalogStore::open(&path);
    let record = store.get("01").unwrap();
    assert_eq!(record.name, "Song A");
    assert_eq!(record.artist, "Artist X");
    assert_eq!(store.rating("01"), Some(0));
    assert_eq!(store.rating_or_sentinel("01"), 0);
}

#[test]
fn absent_record_is_distinct_from_zero_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);
    let store = CatalogStore::open(&path);

    assert_eq!(store.rating("missing"), None);
    assert_eq!(store.play_count("missing"), None);
    assert_eq!(store.rating_or_sentinel("missing"), NOT_FOUND);
    assert_eq!(store.play_count_or_sentinel("missing"), -1);
    assert_ne!(
        store.rating_or_sentinel("missing"),
        store.rating_or_sentinel("01")
    );
    assert_eq!(store.name("missing"), None);
    assert_eq!(store.artist("missing"), None);
    assert_eq!(store.source("missing"), None);
    assert!(store.get("missing").is_none());
}

#[test]
fn duplicate_ids_keep_the_last_row_at_the_first_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(
        &path,
        "Track ID,ID,Name,Singer,File Path,Rating,Plays\n\
01,0,First,A,a.mp3,1,1\n\
02,1,Other,B,b.mp3,2,2\n\
01,2,Second,C,c.mp3,3,3\n",
    );

    let store = CatalogStore::open(&path);
    assert_eq!(store.len(), 2);
    assert_eq!(store.name("01"), Some("Second"));
    assert_eq!(store.list_all()[0].track_id, "01");
    assert_eq!(store.list_all()[1].track_id, "02");
}

#[test]
fn malformed_rows_reset_to_empty_instead_of_partial_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(
        &path,
        "Track ID,ID,Name,Singer,File Path,Rating,Plays\n\
01,0,Good,A,a.mp3,1,1\n\
02,1,Bad,B,b.mp3,five,2\n",
    );

    let mut store = CatalogStore::open(&path);
    assert!(store.is_empty());

    // A reload after a previous good load must not keep stale records.
    write_catalog(&path, SAMPLE);
    assert_eq!(store.load().len(), 3);
    write_catalog(&path, "Track ID,ID,Name\n01,0\n");
    assert!(store.load().is_empty());
}

#[test]
fn load_is_idempotent_and_replaces_memory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let mut store = CatalogStore::open(&path);
    let first = store.list_all().to_vec();
    store.increment_play_count("01");
    let second = store.load().to_vec();
    assert_eq!(first, second);
}

#[test]
fn increment_play_count_is_memory_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let mut store = CatalogStore::open(&path);
    let before = store.play_count("02").unwrap();
    assert!(store.increment_play_count("02"));
    assert_eq!(store.play_count("02"), Some(before + 1));
    assert!(!store.increment_play_count("missing"));

    let reloaded = CatalogStore::open(&path);
    assert_eq!(reloaded.play_count("02"), Some(before));
}

#[test]
fn record_play_persists_the_new_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let mut store = CatalogStore::open(&path);
    assert!(store.record_play("02").unwrap());
    assert_eq!(CatalogStore::open(&path).play_count("02"), Some(8));
    assert!(!store.record_play("missing").unwrap());
}

#[test]
fn set_rating_is_durable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let mut store = CatalogStore::open(&path);
    assert!(store.set_rating("01", 4).unwrap());
    assert_eq!(store.load().len(), 3);
    assert_eq!(store.rating("01"), Some(4));
}

#[test]
fn set_name_and_artist_are_durable_and_unknown_ids_are_no_ops() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let mut store = CatalogStore::open(&path);
    assert!(store.set_name("02", "Renamed").unwrap());
    assert!(store.set_artist("02", "New Band").unwrap());
    assert!(!store.set_name("99", "Ghost").unwrap());
    assert!(!store.set_rating("99", 3).unwrap());

    let reloaded = CatalogStore::open(&path);
    assert_eq!(reloaded.name("02"), Some("Renamed"));
    assert_eq!(reloaded.artist("02"), Some("New Band"));
    assert!(reloaded.get("99").is_none());
}

#[test]
fn persist_then_load_round_trips_every_field() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("songs.csv");
    write_catalog(&src, SAMPLE);
    let store = CatalogStore::open(&src);

    let copy_path = dir.path().join("nested").join("copy.csv");
    let mut copy = CatalogStore::new(&copy_path);
    for record in store.list_all() {
        copy.insert(record.clone()).unwrap();
    }

    let reloaded = CatalogStore::open(&copy_path);
    assert_eq!(tuples(&store), tuples(&reloaded));
    let legacy: Vec<&str> = reloaded
        .list_all()
        .iter()
        .map(|r| r.legacy_id.as_str())
        .collect();
    assert_eq!(legacy, vec!["0", "1", "2"]);
}

#[test]
fn persist_writes_the_fixed_header_even_when_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    CatalogStore::new(&path).persist().unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Track ID,ID,Name,Singer,File Path,Rating,Plays\r\n"
    );
}

#[test]
fn persist_overwrites_instead_of_appending() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let store = CatalogStore::open(&path);
    store.persist().unwrap();
    store.persist().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("Track ID").count(), 1);
    assert_eq!(text, SAMPLE);
}

#[test]
fn add_track_allocates_next_id_and_legacy_row_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);

    let mut store = CatalogStore::open(&path);
    assert_eq!(store.next_track_id(), "05");
    let added = store
        .add_track(NewTrack {
            name: "Fresh".into(),
            artist: "Channel".into(),
            source: "music/Fresh.mp3".into(),
            rating: 3,
        })
        .unwrap();
    assert_eq!(added.track_id, "05");
    assert_eq!(added.legacy_id, "3");
    assert_eq!(added.play_count, 0);

    let reloaded = CatalogStore::open(&path);
    assert_eq!(reloaded.list_all().last().unwrap().track_id, "05");
    assert!(reloaded.has_source("music/Fresh.mp3"));
}

#[test]
fn search_matches_artist_and_name_in_catalog_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);
    let store = CatalogStore::open(&path);

    let hits: Vec<&str> = store
        .search("day")
        .iter()
        .map(|r| r.track_id.as_str())
        .collect();
    assert_eq!(hits, vec!["02"]);
    assert_eq!(store.search("  ").len(), 3);
    assert!(store.search("qqq").is_empty());
}

#[test]
fn list_all_text_uses_one_block_per_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);
    let store = CatalogStore::open(&path);

    let text = store.list_all_text();
    assert!(text.starts_with("Name: Song A, Singer: Artist X, Rating: 0\n \n"));
    assert_eq!(text.matches("Name: ").count(), 3);
}

#[test]
fn search_positions_index_into_list_all() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(&path, SAMPLE);
    let store = CatalogStore::open(&path);

    assert_eq!(store.search_positions("day"), vec![1]);
    assert_eq!(store.search_positions(""), vec![0, 1, 2]);
    assert_eq!(store.list_all()[1].name, "Another Day");
}

#[test]
fn unreadable_file_is_never_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    let original = "Track ID,ID,Name,Singer,File Path,Rating,Plays\r\n\
01,0,Song A,Artist X,a.mp3,3,2\r\n\
02,1,Song B,Artist Y,b.mp3,oops,0\r\n";
    write_catalog(&path, original);

    let mut store = CatalogStore::open(&path);
    assert!(store.is_empty());
    assert!(store.load_error().is_some());

    let added = store.add_track(NewTrack {
        name: "New".into(),
        artist: "Z".into(),
        source: "n.mp3".into(),
        rating: 4,
    });
    assert!(matches!(added, Err(CatalogError::Unreadable { .. })));
    assert!(matches!(
        store.persist(),
        Err(CatalogError::Unreadable { .. })
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    // Once the file is repaired, writes go through again.
    write_catalog(&path, SAMPLE);
    assert_eq!(store.load().len(), 3);
    assert!(store.load_error().is_none());
    assert!(store.set_rating("01", 5).unwrap());
    assert_eq!(CatalogStore::open(&path).rating("01"), Some(5));
}

#[test]
fn missing_file_can_still_be_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("songs.csv");
    let mut store = CatalogStore::open(&path);
    assert!(store.load_error().is_none());

    store
        .add_track(NewTrack {
            name: "First".into(),
            artist: "A".into(),
            source: "first.mp3".into(),
            rating: 2,
        })
        .unwrap();
    assert_eq!(CatalogStore::open(&path).name("01"), Some("First"));
}

#[test]
fn whitespace_around_fields_is_tolerated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    write_catalog(
        &path,
        "Track ID,ID,Name,Singer,File Path,Rating,Plays\n01,0,Song A,X,a.mp3, 3,2 \n",
    );

    let store = CatalogStore::open(&path);
    assert_eq!(store.len(), 1);
    assert_eq!(store.rating("01"), Some(3));
    assert_eq!(store.play_count("01"), Some(2));
    assert!(store.load_error().is_none());
}
