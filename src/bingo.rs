//! Bingo card draws for parish fundraisers.
//!
//! Each card has five columns, B I N G O, filled with five distinct numbers
//! from that column's range. The center cell is always free. Cards carry an
//! independently drawn six-digit authenticity code.

use chrono::{NaiveDate, NaiveTime};
use rand::seq::index;
use rand::Rng;
use serde::{Serialize, Serializer};

use crate::error::BingoError;

pub const LETTERS: [char; 5] = ['B', 'I', 'N', 'G', 'O'];
pub const SIZE: usize = 5;
/// Numbers available per column.
pub const COLUMN_SPAN: u8 = 15;
pub const MAX_CARDS: usize = 500;
pub const FREE_MARKER: &str = "FREE";

const CENTER: usize = SIZE / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Number(u8),
    Free,
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Number(n) => serializer.serialize_u8(*n),
            Cell::Free => serializer.serialize_str(FREE_MARKER),
        }
    }
}

/// Inclusive number range of column `col` (0 = B).
pub fn column_range(col: usize) -> std::ops::RangeInclusive<u8> {
    let low = col as u8 * COLUMN_SPAN + 1;
    low..=low + COLUMN_SPAN - 1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BingoCard {
    pub code: u32,
    /// `grid[row][col]`
    pub grid: [[Cell; SIZE]; SIZE],
}

impl BingoCard {
    pub fn column(&self, col: usize) -> [Cell; SIZE] {
        std::array::from_fn(|row| self.grid[row][col])
    }

    /// Text encoded into the card's scannable authentication image.
    pub fn auth_payload(&self, event: &BingoEvent) -> String {
        format!(
            "BINGO|{}|{}|{} {}",
            self.code,
            event.title,
            event.draw_date.format("%d/%m/%Y"),
            event.draw_time.format("%H:%M"),
        )
    }
}

/// Metadata printed on every card of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BingoEvent {
    pub title: String,
    pub prize: String,
    pub draw_date: NaiveDate,
    pub draw_time: NaiveTime,
    pub note: String,
}

pub fn generate_card<R: Rng + ?Sized>(rng: &mut R) -> BingoCard {
    let mut grid = [[Cell::Free; SIZE]; SIZE];

    for col in 0..LETTERS.len() {
        let low = *column_range(col).start();
        let picks = index::sample(rng, COLUMN_SPAN as usize, SIZE);
        for (row, offset) in picks.iter().enumerate() {
            grid[row][col] = Cell::Number(low + offset as u8);
        }
    }
    grid[CENTER][CENTER] = Cell::Free;

    BingoCard {
        code: rng.random_range(100_000..=999_999),
        grid,
    }
}

pub fn generate_cards<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Result<Vec<BingoCard>, BingoError> {
    if count == 0 || count > MAX_CARDS {
        return Err(BingoError::CardCount {
            requested: count,
            max: MAX_CARDS,
        });
    }
    tracing::debug!(count, "drawing bingo cards");
    Ok((0..count).map(|_| generate_card(rng)).collect())
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetCard {
    pub number: usize,
    #[serde(flatten)]
    pub card: BingoCard,
    pub auth: String,
}

/// Everything the card-printing collaborator needs.
#[derive(Debug, Clone, Serialize)]
pub struct BingoSheet {
    pub event: BingoEvent,
    pub cards: Vec<SheetCard>,
}

impl BingoSheet {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, event: BingoEvent, count: usize) -> Result<Self, BingoError> {
        let cards = generate_cards(rng, count)?
            .into_iter()
            .enumerate()
            .map(|(i, card)| SheetCard {
                number: i + 1,
                auth: card.auth_payload(&event),
                card,
            })
            .collect();
        Ok(Self { event, cards })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn columns_stay_in_range_without_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let card = generate_card(&mut rng);
            for col in 0..SIZE {
                let numbers: Vec<u8> = card
                    .column(col)
                    .iter()
                    .filter_map(|c| match c {
                        Cell::Number(n) => Some(*n),
                        Cell::Free => None,
                    })
                    .collect();
                let expected = if col == CENTER { SIZE - 1 } else { SIZE };
                assert_eq!(numbers.len(), expected);
                assert!(numbers.iter().all(|n| column_range(col).contains(n)));
                assert_eq!(numbers.iter().collect::<HashSet<_>>().len(), numbers.len());
            }
        }
    }

    #[test]
    fn center_is_always_free() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let card = generate_card(&mut rng);
            assert_eq!(card.grid[2][2], Cell::Free);
            let free = card.grid.iter().flatten().filter(|c| **c == Cell::Free).count();
            assert_eq!(free, 1);
        }
    }

    #[test]
    fn codes_have_six_digits_and_rarely_collide() {
        let mut rng = StdRng::seed_from_u64(2025);
        let cards = generate_cards(&mut rng, 50).unwrap();
        assert!(cards.iter().all(|c| (100_000..=999_999).contains(&c.code)));
        let codes: HashSet<u32> = cards.iter().map(|c| c.code).collect();
        // not guaranteed unique, just very unlikely to repeat
        assert!(codes.len() >= 49);
    }

    #[test]
    fn card_count_is_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_cards(&mut rng, 0),
            Err(BingoError::CardCount { requested: 0, max: MAX_CARDS })
        );
        assert!(generate_cards(&mut rng, MAX_CARDS + 1).is_err());
        assert_eq!(generate_cards(&mut rng, MAX_CARDS).unwrap().len(), MAX_CARDS);
    }

    #[test]
    fn sheet_serializes_free_marker_and_payload() {
        let mut rng = StdRng::seed_from_u64(3);
        let event = BingoEvent {
            title: "Bingo da Padroeira".into(),
            prize: "Uma bicicleta".into(),
            draw_date: NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
            draw_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            note: "Valor: R$ 5,00".into(),
        };
        let sheet = BingoSheet::generate(&mut rng, event, 2).unwrap();
        let card = &sheet.cards[1];
        assert_eq!(card.number, 2);
        assert_eq!(card.auth, format!("BINGO|{}|Bingo da Padroeira|14/09/2025 15:00", card.card.code));

        let json = serde_json::to_value(&sheet).unwrap();
        assert_eq!(json["cards"][0]["grid"][2][2], "FREE");
        assert!(json["cards"][0]["code"].is_u64());
    }
}
