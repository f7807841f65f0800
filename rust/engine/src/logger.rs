use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{Phase, TableState};
use crate::player::{PlayerAction, SeatId};
use crate::pot::Payout;

/// A single accepted action, tagged with the street it happened on.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: SeatId,
    pub phase: Phase,
    pub action: PlayerAction,
}

/// A seat as it entered the hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub seat: SeatId,
    pub name: String,
    pub starting_stack: u32,
    #[serde(default)]
    pub hole_cards: Vec<Card>,
}

/// Hands revealed at showdown and how the pot was paid.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub winners: Vec<SeatId>,
    pub payouts: Vec<Payout>,
    /// Hand name per revealed seat, e.g. `(2, "Flush")`.
    #[serde(default)]
    pub hands: Vec<(SeatId, String)>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Complete record of one hand, written as one JSONL line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    /// Seed of the shuffle, when the caller knows it.
    pub seed: Option<u64>,
    pub dealer: Option<SeatId>,
    pub seats: Vec<SeatRecord>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    /// Final status message.
    pub result: Option<String>,
    /// RFC3339, filled in on write when missing.
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

impl HandRecord {
    /// Starts a record from the first snapshot of a hand.
    pub fn begin(hand_id: String, seed: Option<u64>, state: &TableState) -> Self {
        let seats = state
            .seats()
            .iter()
            .filter(|s| s.in_hand())
            .map(|s| SeatRecord {
                seat: s.id,
                name: s.name.clone(),
                starting_stack: s.stack + s.committed,
                hole_cards: s.hole_cards.clone(),
            })
            .collect();
        Self {
            hand_id,
            seed,
            dealer: state.dealer(),
            seats,
            actions: Vec::new(),
            board: Vec::new(),
            result: None,
            ts: None,
            meta: None,
            showdown: None,
        }
    }

    pub fn push_action(&mut self, seat: SeatId, phase: Phase, action: PlayerAction) {
        self.actions.push(ActionRecord { seat, phase, action });
    }

    /// Copies the outcome from the final snapshot of the hand.
    pub fn finish(&mut self, state: &TableState) {
        self.board = state.community_cards().to_vec();
        self.result = Some(state.message().to_string());
        let hands: Vec<(SeatId, String)> = state
            .revealed()
            .iter()
            .map(|(seat, ev)| (*seat, ev.name.to_string()))
            .collect();
        let notes = (state.winners().len() > 1).then(|| "split pot".to_string());
        self.showdown = Some(ShowdownInfo {
            winners: state.winners().to_vec(),
            payouts: state.payouts().to_vec(),
            hands,
            notes,
        });
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`HandRecord`]s to a JSONL file.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// A logger that only hands out ids, for tests.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
