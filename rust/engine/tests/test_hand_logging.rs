use std::fs;

use holdem_engine::cards::{Card, Rank as R, Suit as S};
use holdem_engine::engine::{apply_action, start_hand};
use holdem_engine::game::{Phase, TableConfig, TableState};
use holdem_engine::logger::{format_hand_id, ActionRecord, HandLogger, HandRecord};
use holdem_engine::player::{PlayerAction, Seat};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn empty_record(hand_id: &str) -> HandRecord {
    HandRecord {
        hand_id: hand_id.to_string(),
        seed: Some(1),
        dealer: Some(0),
        seats: vec![],
        actions: vec![ActionRecord {
            seat: 0,
            phase: Phase::PreFlop,
            action: PlayerAction::Check,
        }],
        board: vec![Card::new(R::Ace, S::Clubs)],
        result: Some("P0 wins 75".to_string()),
        ts: None,
        meta: None,
        showdown: None,
    }
}

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logs").join("hands.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");
    logger.write(&empty_record("20250102-000001")).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
}

#[test]
fn sequential_ids_increment() {
    let mut logger = HandLogger::with_seq_for_test("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
    assert_eq!(format_hand_id("20251231", 42), "20251231-000042");
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hands.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");
    let rec = empty_record("20250102-000010");
    logger.write(&rec).expect("write");
    let line = fs::read_to_string(&path).unwrap();
    assert!(line.contains("\"ts\":\""), "ts should be injected");

    let preset = "2030-01-01T00:00:00Z".to_string();
    let rec2 = HandRecord {
        ts: Some(preset.clone()),
        ..rec
    };
    logger.write(&rec2).expect("write2");
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains(&preset), "preset ts must be kept");
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn record_follows_a_played_hand() {
    let seats = (0..3).map(|i| Seat::new(i, format!("P{i}"), 1000, true)).collect();
    let table = TableState::new(TableConfig::default(), seats).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let mut state = start_hand(&table, &mut rng).unwrap();

    let mut rec = HandRecord::begin("20250102-000002".into(), Some(21), &state);
    assert_eq!(rec.seats.len(), 3);
    assert_eq!(rec.seats[1].starting_stack, 1000);
    assert_eq!(rec.seats[1].hole_cards.len(), 2);

    for action in [PlayerAction::Fold, PlayerAction::Fold] {
        let seat = state.current_seat().unwrap();
        let phase = state.phase();
        state = apply_action(&state, seat, action).unwrap();
        rec.push_action(seat, phase, action);
    }
    rec.finish(&state);

    assert_eq!(rec.result.as_deref(), Some("P2 wins 75"));
    let showdown = rec.showdown.as_ref().unwrap();
    assert_eq!(showdown.winners, vec![2]);
    assert_eq!(showdown.payouts[0].amount, 75);
    assert!(showdown.hands.is_empty());

    let json = serde_json::to_string(&rec).expect("serialize");
    let back: HandRecord = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(rec, back);
}
