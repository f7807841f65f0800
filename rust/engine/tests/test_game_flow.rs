use holdem_engine::cards::{full_deck, Card, Rank as R, Suit as S};
use holdem_engine::deck::Deck;
use holdem_engine::engine::{apply_action, start_hand, start_hand_with_deck};
use holdem_engine::errors::GameError;
use holdem_engine::game::{Phase, TableConfig, TableState};
use holdem_engine::player::{LastAction, PlayerAction as A, Seat};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn c(s: S, r: R) -> Card {
    Card::new(r, s)
}

fn table(stacks: &[u32]) -> TableState {
    let seats = stacks
        .iter()
        .enumerate()
        .map(|(i, &stack)| Seat::new(i, format!("P{i}"), stack, i != 0))
        .collect();
    TableState::new(TableConfig::default(), seats).expect("valid table")
}

/// Deck that deals `holes` (in dealing order) and then a royal flush board.
fn royal_board_deck(holes: &[Card]) -> Deck {
    let board = [
        c(S::Spades, R::Ace),
        c(S::Spades, R::King),
        c(S::Spades, R::Queen),
        c(S::Spades, R::Jack),
        c(S::Spades, R::Ten),
    ];
    stacked_deck(holes, board)
}

/// Deck that deals `holes` (in dealing order) and then `board`, burning
/// low hearts before each street.
fn stacked_deck(holes: &[Card], board: [Card; 5]) -> Deck {
    let burn = [c(S::Hearts, R::Two), c(S::Hearts, R::Three), c(S::Hearts, R::Four)];
    let mut cards: Vec<Card> = holes.to_vec();
    cards.extend([burn[0], board[0], board[1], board[2], burn[1], board[3], burn[2], board[4]]);
    let rest: Vec<Card> = full_deck().into_iter().filter(|c| !cards.contains(c)).collect();
    cards.extend(rest);
    Deck::from_cards(cards)
}

fn act(state: &TableState, seat: usize, action: A) -> TableState {
    assert_eq!(state.current_seat(), Some(seat), "{}", state.message());
    let next = apply_action(state, seat, action).expect("legal action");
    assert_eq!(next.total_chips(), state.total_chips());
    next
}

#[test]
fn three_seat_preflop_closes_and_deals_flop() {
    let t = table(&[1000, 1000, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let s = start_hand(&t, &mut rng).unwrap();

    assert_eq!(s.phase(), Phase::PreFlop);
    assert_eq!(s.dealer(), Some(0));
    assert!(s.seats()[0].is_dealer);
    assert_eq!(s.seats()[1].current_bet, 25);
    assert_eq!(s.seats()[2].current_bet, 50);
    assert_eq!(s.pot(), 75);
    assert!(s.seats().iter().all(|seat| seat.hole_cards.len() == 2));

    let s = act(&s, 0, A::Call);
    assert_eq!(s.pot(), 125);
    let s = act(&s, 1, A::Call);
    assert_eq!(s.pot(), 150);
    let s = act(&s, 2, A::Check);

    assert_eq!(s.phase(), Phase::Flop);
    assert_eq!(s.community_cards().len(), 3);
    assert!(s.seats().iter().all(|seat| seat.current_bet == 0));
    assert!(s.seats().iter().all(|seat| seat.last_action.is_none()));
    assert_eq!(s.current_seat(), Some(1));
    assert_eq!(s.deck().remaining(), 52 - 6 - 4);
    assert_eq!(s.pot(), 150);
}

#[test]
fn big_blind_gets_the_option() {
    let t = table(&[1000, 1000, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let s = start_hand(&t, &mut rng).unwrap();
    let s = act(&s, 0, A::Call);
    let s = act(&s, 1, A::Call);
    assert_eq!(s.phase(), Phase::PreFlop);
    assert_eq!(s.current_seat(), Some(2));
    assert!(s.legal_actions(2).contains(&A::Check));
    let s = act(&s, 2, A::Raise(100));
    assert_eq!(s.phase(), Phase::PreFlop);
    assert_eq!(s.current_seat(), Some(0));
    assert_eq!(s.to_call(0), 100);
}

#[test]
fn turn_order_skips_folded_and_all_in_seats() {
    let t = table(&[1000, 1000, 200, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let s = start_hand(&t, &mut rng).unwrap();
    let s = act(&s, 3, A::Call);
    let s = act(&s, 0, A::Call);
    let s = act(&s, 1, A::Fold);
    let s = act(&s, 2, A::AllIn);
    assert!(s.seats()[2].is_all_in);
    let s = act(&s, 3, A::Call);
    let s = act(&s, 0, A::Call);

    assert_eq!(s.phase(), Phase::Flop);
    // Seat 1 folded and seat 2 is all-in: action goes 3 -> 0 -> 3.
    let s = act(&s, 3, A::Check);
    assert_eq!(s.current_seat(), Some(0));
    let s = act(&s, 0, A::Raise(50));
    assert_eq!(s.current_seat(), Some(3));
}

#[test]
fn out_of_turn_and_illegal_actions_are_rejected() {
    let t = table(&[1000, 1000, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let s = start_hand(&t, &mut rng).unwrap();

    let err = apply_action(&s, 1, A::Call).unwrap_err();
    assert_eq!(
        err,
        GameError::IllegalActor {
            seat: 1,
            expected: Some(0)
        }
    );
    assert!(matches!(
        apply_action(&s, 0, A::Check),
        Err(GameError::IllegalAction { seat: 0, .. })
    ));
    assert_eq!(apply_action(&s, 9, A::Fold), Err(GameError::UnknownSeat(9)));
    // The snapshot is untouched by rejected actions.
    assert_eq!(s.pot(), 75);
    assert_eq!(s.current_seat(), Some(0));
}

#[test]
fn minimum_raise_tracks_the_last_full_raise() {
    let t = table(&[1000, 1000, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let s = start_hand(&t, &mut rng).unwrap();
    assert_eq!(s.min_raise(), 50);

    let s = act(&s, 0, A::Raise(50));
    assert_eq!(s.seats()[0].current_bet, 100);
    assert!(apply_action(&s, 1, A::Raise(30)).is_err());
    let s = act(&s, 1, A::Raise(150));
    assert_eq!(s.seats()[1].current_bet, 250);
    assert_eq!(s.min_raise(), 150);
    assert!(apply_action(&s, 2, A::Raise(100)).is_err());
}

#[test]
fn short_all_in_does_not_reopen_the_minimum() {
    let t = table(&[1000, 1000, 170]);
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let s = start_hand(&t, &mut rng).unwrap();
    let s = act(&s, 0, A::Raise(100));
    let s = act(&s, 1, A::Call);
    let s = act(&s, 2, A::AllIn);

    assert_eq!(s.seats()[2].current_bet, 170);
    assert_eq!(s.min_raise(), 100);
    assert_eq!(s.current_seat(), Some(0));
    assert_eq!(s.to_call(0), 20);

    // Seats that already acted may only call or fold.
    assert!(!s.can_raise(0));
    assert_eq!(s.legal_actions(0), vec![A::Fold, A::Call]);
    for action in [A::Raise(100), A::Raise(500), A::AllIn] {
        assert!(matches!(
            apply_action(&s, 0, action),
            Err(GameError::IllegalAction { seat: 0, .. })
        ));
    }
    let s = act(&s, 0, A::Call);
    assert_eq!(s.legal_actions(1), vec![A::Fold, A::Call]);
    let s = act(&s, 1, A::Call);
    assert_eq!(s.phase(), Phase::Flop);
    assert_eq!(s.pot(), 170 * 3);
}

#[test]
fn full_raise_after_short_all_in_reopens_betting() {
    let t = table(&[1000, 1000, 1000, 80]);
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let s = start_hand(&t, &mut rng).unwrap();
    // Dealer 0, blinds 1 and 2: seat 3 opens short.
    let s = act(&s, 3, A::AllIn);
    assert_eq!(s.seats()[3].current_bet, 80);
    assert_eq!(s.min_raise(), 50);
    let s = act(&s, 0, A::Call);
    // The small blind has not acted yet and may still raise.
    assert!(s.can_raise(1));
    let s = act(&s, 1, A::Raise(200));
    assert_eq!(s.seats()[1].current_bet, 280);

    // Seat 0 called before the full raise, so it may raise again.
    let s = act(&s, 2, A::Fold);
    assert!(s.can_raise(0));
    assert!(s.legal_actions(0).contains(&A::Raise(200)));
    let s = act(&s, 0, A::Raise(200));
    assert_eq!(s.seats()[0].current_bet, 480);
}

#[test]
fn short_opening_bet_does_not_reopen_for_the_checker() {
    let t = table(&[1000, 1000, 130]);
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let s = start_hand(&t, &mut rng).unwrap();
    let s = act(&s, 0, A::Raise(50));
    let s = act(&s, 1, A::Call);
    let s = act(&s, 2, A::Call);
    assert_eq!(s.phase(), Phase::Flop);
    assert_eq!(s.seats()[2].stack, 30);

    // Postflop order starts left of the dealer.
    let s = act(&s, 1, A::Check);
    let s = act(&s, 2, A::AllIn);
    assert_eq!(s.min_raise(), 50);
    // Seat 0 has not acted on the flop yet.
    assert!(s.can_raise(0));
    let s = act(&s, 0, A::Call);

    assert!(!s.can_raise(1));
    assert_eq!(s.legal_actions(1), vec![A::Fold, A::Call]);
    assert!(apply_action(&s, 1, A::Raise(50)).is_err());
    let s = act(&s, 1, A::Call);
    assert_eq!(s.phase(), Phase::Turn);
}

#[test]
fn all_in_call_for_less_closes_the_street() {
    let t = table(&[1000, 1000, 120]);
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let s = start_hand(&t, &mut rng).unwrap();
    let s = act(&s, 0, A::Raise(100));
    let s = act(&s, 1, A::Call);
    let s = act(&s, 2, A::Call);

    assert!(s.seats()[2].is_all_in);
    assert_eq!(s.seats()[2].last_action, None);
    assert_eq!(s.phase(), Phase::Flop);
    assert_eq!(s.pot(), 150 + 150 + 120);
}

#[test]
fn single_survivor_wins_without_further_dealing() {
    let t = table(&[1000, 1000, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let s = start_hand(&t, &mut rng).unwrap();
    let s = act(&s, 0, A::Fold);
    assert_eq!(s.seats()[0].last_action, Some(LastAction::Fold));
    let s = apply_action(&s, 1, A::Fold).unwrap();

    assert_eq!(s.phase(), Phase::Complete);
    assert!(s.community_cards().is_empty());
    assert_eq!(s.winners(), &[2]);
    assert_eq!(s.seats()[2].stack, 1025);
    assert_eq!(s.pot(), 0);
    assert_eq!(s.message(), "P2 wins 75");
    assert_eq!(s.current_seat(), None);
    assert_eq!(apply_action(&s, 2, A::Check), Err(GameError::HandComplete));
}

#[test]
fn all_in_heads_up_runs_out_the_board() {
    let t = table(&[1000, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let s = start_hand(&t, &mut rng).unwrap();
    // Dealer 0, small blind 1, big blind 0: seat 1 acts first.
    assert_eq!(s.seats()[1].current_bet, 25);
    assert_eq!(s.seats()[0].current_bet, 50);
    let s = act(&s, 1, A::AllIn);
    let s = apply_action(&s, 0, A::Call).unwrap();

    assert_eq!(s.phase(), Phase::Complete);
    assert_eq!(s.community_cards().len(), 5);
    assert_eq!(s.total_chips(), 2000);
    assert_eq!(s.pot(), 0);
    assert!(!s.winners().is_empty());
    assert_eq!(s.revealed().len(), 2);
}

#[test]
fn lone_actor_with_nothing_owed_runs_out_the_board() {
    let t = table(&[1000, 300]);
    let mut rng = ChaCha20Rng::seed_from_u64(10);
    let s = start_hand(&t, &mut rng).unwrap();
    let s = act(&s, 1, A::AllIn);
    let s = apply_action(&s, 0, A::Call).unwrap();

    assert_eq!(s.phase(), Phase::Complete);
    assert_eq!(s.community_cards().len(), 5);
    assert_eq!(s.total_chips(), 1300);
    // Seat 0 can never lose more than the 300 it called.
    assert!(s.seats()[0].stack >= 700);
}

#[test]
fn identical_hands_split_the_pot() {
    let t = table(&[1000, 1000]);
    // Dealt from the seat after the dealer: 1, 0, 1, 0.
    let holes = [
        c(S::Clubs, R::Two),
        c(S::Clubs, R::Four),
        c(S::Diamonds, R::Three),
        c(S::Diamonds, R::Five),
    ];
    let s = start_hand_with_deck(&t, royal_board_deck(&holes)).unwrap();
    assert_eq!(s.seats()[1].hole_cards, vec![holes[0], holes[2]]);

    let s = act(&s, 1, A::Call);
    let mut s = act(&s, 0, A::Check);
    for _ in 0..3 {
        s = act(&s, 1, A::Check);
        s = act(&s, 0, A::Check);
    }

    assert_eq!(s.phase(), Phase::Complete);
    assert_eq!(s.winners(), &[0, 1]);
    assert_eq!(s.seats()[0].stack, 1000);
    assert_eq!(s.seats()[1].stack, 1000);
    assert_eq!(s.message(), "Split Pot! 2 players have Straight Flush.");
}

#[test]
fn odd_chip_goes_to_first_winner_left_of_dealer() {
    let t = table(&[1000, 1000, 1000]);
    let holes = [
        c(S::Clubs, R::Two),
        c(S::Clubs, R::Three),
        c(S::Clubs, R::Four),
        c(S::Diamonds, R::Two),
        c(S::Diamonds, R::Three),
        c(S::Diamonds, R::Four),
    ];
    let s = start_hand_with_deck(&t, royal_board_deck(&holes)).unwrap();
    let s = act(&s, 0, A::Call);
    let s = act(&s, 1, A::Fold);
    let mut s = act(&s, 2, A::Check);
    for _ in 0..3 {
        s = act(&s, 2, A::Check);
        s = act(&s, 0, A::Check);
    }

    assert_eq!(s.phase(), Phase::Complete);
    assert_eq!(s.winners(), &[0, 2]);
    // 125 split two ways: 62 each, the odd chip to seat 2.
    assert_eq!(s.seats()[0].stack, 1012);
    assert_eq!(s.seats()[2].stack, 1013);
    assert_eq!(s.seats()[1].stack, 975);
    assert_eq!(s.total_chips(), 3000);
}

#[test]
fn button_rotates_between_hands() {
    let t = table(&[1000, 1000, 1000]);
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let s = start_hand(&t, &mut rng).unwrap();
    assert_eq!(
        start_hand(&s, &mut rng).unwrap_err(),
        GameError::HandInProgress
    );
    let s = act(&s, 0, A::Fold);
    let s = act(&s, 1, A::Fold);
    let s = start_hand(&s, &mut rng).unwrap();
    assert_eq!(s.dealer(), Some(1));
    assert_eq!(s.hand_number(), 2);
    assert_eq!(s.current_seat(), Some(1));
    assert_eq!(s.seats()[2].current_bet, 25);
    assert_eq!(s.seats()[0].current_bet, 50);
}

#[test]
fn exhausted_deck_aborts_the_transition() {
    let t = table(&[1000, 1000, 1000]);
    let deck = Deck::from_cards(full_deck().into_iter().take(6).collect());
    let s = start_hand_with_deck(&t, deck).unwrap();
    let s = act(&s, 0, A::Call);
    let s = act(&s, 1, A::Call);
    let err = apply_action(&s, 2, A::Check).unwrap_err();
    assert_eq!(
        err,
        GameError::DeckExhausted {
            requested: 1,
            remaining: 0
        }
    );
    assert_eq!(s.phase(), Phase::PreFlop);
}

#[test]
fn side_pot_winners_are_named_with_their_own_hands() {
    let t = table(&[1000, 1000, 100]);
    // Dealt from the seat after the dealer: 1, 2, 0, 1, 2, 0.
    let holes = [
        c(S::Clubs, R::Three),
        c(S::Hearts, R::King),
        c(S::Hearts, R::Ace),
        c(S::Diamonds, R::Five),
        c(S::Diamonds, R::King),
        c(S::Clubs, R::Ace),
    ];
    let board = [
        c(S::Spades, R::King),
        c(S::Diamonds, R::Seven),
        c(S::Clubs, R::Two),
        c(S::Hearts, R::Nine),
        c(S::Spades, R::Four),
    ];
    let s = start_hand_with_deck(&t, stacked_deck(&holes, board)).unwrap();
    let s = act(&s, 0, A::Raise(100));
    let s = act(&s, 1, A::Call);
    let mut s = act(&s, 2, A::AllIn);
    assert_eq!(s.phase(), Phase::Flop);
    for _ in 0..3 {
        s = act(&s, 1, A::Check);
        s = act(&s, 0, A::Check);
    }

    assert_eq!(s.phase(), Phase::Complete);
    // Seat 2's kings take the main pot; seat 0's aces beat seat 1 for the side pot.
    assert_eq!(s.winners(), &[0, 2]);
    assert_eq!(s.seats()[2].stack, 300);
    assert_eq!(s.seats()[0].stack, 950);
    assert_eq!(s.seats()[1].stack, 850);
    assert_eq!(s.message(), "P0 wins with Pair; P2 wins with Three of a Kind.");
}
