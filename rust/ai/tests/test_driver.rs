use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use holdem_ai::baseline::BaselinePolicy;
use holdem_ai::driver::{DriverConfig, HandDriver, Pause};
use holdem_ai::model::{CompletionClient, ModelPolicy};
use holdem_ai::prompt::render_prompt;
use holdem_ai::{Decision, DecisionPolicy, PolicyError, TableObserver};
use holdem_engine::engine::start_hand;
use holdem_engine::game::{Phase, TableConfig, TableState};
use holdem_engine::player::{PlayerAction, Seat, SeatId};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn hand(seats: usize, seed: u64) -> TableState {
    let seats = (0..seats)
        .map(|i| Seat::new(i, format!("Bot{i}"), 2000, i != 0))
        .collect();
    let table = TableState::new(TableConfig::default(), seats).unwrap();
    start_hand(&table, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap()
}

#[derive(Default)]
struct Recorder {
    snapshots: Vec<TableState>,
    actions: Vec<(SeatId, Phase, PlayerAction)>,
}

impl TableObserver for Recorder {
    fn on_snapshot(&mut self, state: &TableState) {
        self.snapshots.push(state.clone());
    }

    fn on_action(&mut self, seat: SeatId, phase: Phase, action: PlayerAction) {
        self.actions.push((seat, phase, action));
    }
}

struct Stalling;

#[async_trait]
impl DecisionPolicy for Stalling {
    async fn decide(&self, _state: &TableState, _seat: SeatId) -> Result<Decision, PolicyError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Decision::new(PlayerAction::AllIn, "too late"))
    }

    fn name(&self) -> &str {
        "Stalling"
    }
}

struct Broken;

#[async_trait]
impl DecisionPolicy for Broken {
    async fn decide(&self, _state: &TableState, _seat: SeatId) -> Result<Decision, PolicyError> {
        Err(PolicyError::Transport("connection refused".into()))
    }

    fn name(&self) -> &str {
        "Broken"
    }
}

struct Scripted {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionClient for Scripted {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, PolicyError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_policy_times_out_into_fallback() {
    let state = hand(3, 1);
    let driver = HandDriver::new(DriverConfig {
        min_delay: Duration::ZERO,
        decision_timeout: Duration::from_millis(500),
    })
    .with_policy(0, Box::new(Stalling));

    let started = tokio::time::Instant::now();
    let decision = driver.decide(&state, 0).await;
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(started.elapsed() < Duration::from_secs(3600));
    // Facing the big blind: 50 into a pot of 75 is too expensive for the fallback.
    assert_eq!(decision.action, PlayerAction::Fold);
}

#[tokio::test(start_paused = true)]
async fn failed_policy_is_recovered_and_paced() {
    let state = hand(3, 2);
    let driver = HandDriver::new(DriverConfig::default()).with_policy(0, Box::new(Broken));

    let started = tokio::time::Instant::now();
    let decision = driver.decide(&state, 0).await;
    assert!(started.elapsed() >= Duration::from_millis(600));
    assert_eq!(decision.action, PlayerAction::Fold);
    assert!(decision.rationale.is_some());
}

#[tokio::test(start_paused = true)]
async fn model_reply_is_parsed_and_coerced() {
    let state = hand(3, 3);
    let client = Scripted {
        reply: "```json\n{\"action\": \"CHECK\", \"amount\": null, \"reasoning\": \"slowplay\"}\n```".into(),
        prompts: Mutex::new(Vec::new()),
    };
    let driver = HandDriver::new(DriverConfig::instant())
        .with_policy(0, Box::new(ModelPolicy::new(client, "Model")));

    let decision = driver.decide(&state, 0).await;
    // Checking is illegal facing the big blind, so it becomes a fold.
    assert_eq!(decision.action, PlayerAction::Fold);
    assert_eq!(decision.rationale.as_deref(), Some("slowplay"));
}

#[tokio::test]
async fn automated_seats_play_until_a_person_must_act() {
    let state = hand(3, 4);
    let driver = HandDriver::new(DriverConfig::instant())
        .with_policy(1, Box::new(BaselinePolicy::new()))
        .with_policy(2, Box::new(BaselinePolicy::new()));

    // Seat 0 is first to act preflop and has no policy.
    let mut recorder = Recorder::default();
    let (state, pause) = driver.run_until_pause(state, &mut recorder).await.unwrap();
    assert_eq!(pause, Pause::Human(0));
    assert!(recorder.snapshots.is_empty());

    let state = driver
        .submit(&state, 0, PlayerAction::Call, &mut recorder)
        .unwrap();
    let (state, pause) = driver.run_until_pause(state, &mut recorder).await.unwrap();

    assert_eq!(recorder.actions[0], (0, Phase::PreFlop, PlayerAction::Call));
    assert_eq!(recorder.snapshots.len(), recorder.actions.len());
    assert!(recorder.snapshots.iter().all(|s| s.total_chips() == 6000));
    match pause {
        Pause::HandOver => assert!(state.is_complete()),
        Pause::Human(seat) => {
            assert_eq!(seat, 0);
            assert_eq!(state.current_seat(), Some(0));
        }
    }
}

#[tokio::test]
async fn all_automated_hand_runs_to_completion() {
    for seed in 0..20 {
        let state = hand(6, seed);
        let mut driver = HandDriver::new(DriverConfig::instant());
        for seat in 0..6 {
            driver = driver.with_policy(seat, Box::new(BaselinePolicy::new()));
        }
        let mut recorder = Recorder::default();
        let (state, pause) = driver.run_until_pause(state, &mut recorder).await.unwrap();
        assert_eq!(pause, Pause::HandOver);
        assert!(state.is_complete());
        assert_eq!(state.total_chips(), 12_000);
        let last = recorder.snapshots.last().unwrap();
        assert_eq!(last, &state);
        let acted: Vec<SeatId> = recorder.actions.iter().map(|a| a.0).collect();
        for seat in acted {
            let rationale = recorder
                .snapshots
                .iter()
                .find_map(|s| s.seat(seat).and_then(|x| x.rationale.clone()));
            assert!(rationale.is_some(), "seat {seat} acted without a rationale");
        }
    }
}

#[test]
fn prompt_shows_only_the_acting_seats_cards() {
    let state = hand(3, 5);
    let prompt = render_prompt(&state, 1);
    let mine = &state.seats()[1].hole_cards;
    let theirs = &state.seats()[2].hole_cards;
    assert!(prompt.contains(&format!("- Your Hand: {}, {}", mine[0], mine[1])));
    assert!(!prompt.contains(&format!("{}, {}", theirs[0], theirs[1])));
    assert!(prompt.contains("- Cost to Call: 25"));
    assert!(prompt.contains("Bot2: Stack 1950, Bet 50, Last Action: None"));
}
