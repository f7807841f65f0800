use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::{Seat, SeatId};

/// One pot and the seats that can win it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u32,
    pub eligible: Vec<SeatId>,
}

/// Chips awarded to one seat when a hand settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: SeatId,
    pub amount: u32,
}

/// Main pot plus side pots, built from what each seat committed this hand.
///
/// Each distinct commitment level among seats still in the hand closes a
/// pot; every seat that reached that level is eligible for it. Chips from
/// folded seats fill the pots but never make the folder eligible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotManager {
    pots: Vec<Pot>,
}

impl PotManager {
    /// Splits contributions indexed by seat, treating every seat as live.
    pub fn from_contributions<I>(contributions: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let entries: Vec<(u32, bool)> = contributions.into_iter().map(|c| (c, true)).collect();
        Self::build(&entries)
    }

    pub fn from_seats(seats: &[Seat]) -> Self {
        let entries: Vec<(u32, bool)> = seats.iter().map(|s| (s.committed, s.in_hand())).collect();
        Self::build(&entries)
    }

    fn build(entries: &[(u32, bool)]) -> Self {
        let mut levels: Vec<u32> = entries
            .iter()
            .filter(|(c, live)| *live && *c > 0)
            .map(|(c, _)| *c)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::with_capacity(levels.len());
        let mut floor = 0;
        for &level in &levels {
            let amount = entries
                .iter()
                .map(|(c, _)| (*c).min(level) - (*c).min(floor))
                .sum();
            let eligible = entries
                .iter()
                .enumerate()
                .filter(|(_, (c, live))| *live && *c >= level)
                .map(|(seat, _)| seat)
                .collect();
            pots.push(Pot { amount, eligible });
            floor = level;
        }

        // Folded chips above the top live level still belong to the pot.
        let total: u32 = entries.iter().map(|(c, _)| c).sum();
        let assigned: u32 = pots.iter().map(|p| p.amount).sum();
        if let Some(last) = pots.last_mut() {
            last.amount += total - assigned;
        }
        Self { pots }
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn main_pot(&self) -> u32 {
        self.pots.first().map(|p| p.amount).unwrap_or(0)
    }

    pub fn side_pots(&self) -> Vec<u32> {
        self.pots.iter().skip(1).map(|p| p.amount).collect()
    }

    pub fn total(&self) -> u32 {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// Awards every pot to its best eligible hands.
    ///
    /// `score` ranks a seat's hand, higher wins. Tied winners split a pot
    /// evenly; leftover chips go one at a time to the tied winners in
    /// `odd_chip_order`, which starts left of the dealer.
    pub fn settle<F>(&self, score: F, odd_chip_order: &[SeatId]) -> Vec<Payout>
    where
        F: Fn(SeatId) -> u32,
    {
        let mut won: BTreeMap<SeatId, u32> = BTreeMap::new();
        for pot in &self.pots {
            for (seat, amount) in Self::split(pot, &score, odd_chip_order) {
                *won.entry(seat).or_default() += amount;
            }
        }
        won.into_iter()
            .map(|(seat, amount)| Payout { seat, amount })
            .collect()
    }

    /// Seats that take a share of some pot contested by two or more seats.
    pub fn contested_winners<F>(&self, score: F) -> Vec<SeatId>
    where
        F: Fn(SeatId) -> u32,
    {
        let mut winners: Vec<SeatId> = self
            .pots
            .iter()
            .filter(|p| p.eligible.len() >= 2)
            .flat_map(|p| Self::best(p, &score))
            .collect();
        winners.sort_unstable();
        winners.dedup();
        winners
    }

    fn best<F>(pot: &Pot, score: &F) -> Vec<SeatId>
    where
        F: Fn(SeatId) -> u32,
    {
        let Some(top) = pot.eligible.iter().map(|&s| score(s)).max() else {
            return Vec::new();
        };
        pot.eligible
            .iter()
            .copied()
            .filter(|&s| score(s) == top)
            .collect()
    }

    fn split<F>(pot: &Pot, score: &F, odd_chip_order: &[SeatId]) -> Vec<(SeatId, u32)>
    where
        F: Fn(SeatId) -> u32,
    {
        let winners = Self::best(pot, score);
        if winners.is_empty() {
            return Vec::new();
        }
        let n = winners.len() as u32;
        let share = pot.amount / n;
        let mut remainder = pot.amount % n;

        let mut out: Vec<(SeatId, u32)> = winners.iter().map(|&s| (s, share)).collect();
        for seat in odd_chip_order {
            if remainder == 0 {
                break;
            }
            if let Some(entry) = out.iter_mut().find(|(s, _)| s == seat) {
                entry.1 += 1;
                remainder -= 1;
            }
        }
        // Order did not name every winner; hand out the rest in seat order.
        for entry in out.iter_mut() {
            if remainder == 0 {
                break;
            }
            entry.1 += 1;
            remainder -= 1;
        }
        out
    }
}
