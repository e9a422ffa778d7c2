// Boarding selection state and booking totals. Pure derivations over the
// currently held selection; no other state.
use crate::model::Room;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-booking boarding choices, keyed by room index. With `apply_to_all`
/// set, one selection covers every room of the booking.
#[derive(Debug, Clone, Default)]
pub struct BoardingSelection {
    choices: HashMap<usize, String>,
    pub apply_to_all: bool,
    room_count: usize,
}

impl BoardingSelection {
    pub fn new(room_count: usize) -> Self {
        Self {
            choices: HashMap::new(),
            apply_to_all: false,
            room_count,
        }
    }

    pub fn select(&mut self, room_index: usize, boarding_type: &str) {
        if self.apply_to_all {
            for index in 0..self.room_count {
                self.choices.insert(index, boarding_type.to_string());
            }
        } else {
            self.choices.insert(room_index, boarding_type.to_string());
        }
    }

    pub fn selected_for(&self, room_index: usize) -> Option<&str> {
        self.choices.get(&room_index).map(String::as_str)
    }
}

/// Nightly rate for a room under the current selection. An unknown or
/// missing selection falls back to the room's own default rate.
pub fn price_for_room(room: &Room, selection: &BoardingSelection, room_index: usize) -> f64 {
    selection
        .selected_for(room_index)
        .and_then(|chosen| {
            room.boarding_options
                .iter()
                .find(|option| option.boarding_type == chosen)
        })
        .map(|option| option.price_per_night)
        .unwrap_or(room.price_per_night)
}

/// Stay total for one room, surcharge included, rounded to the nearest
/// whole currency unit.
pub fn total_for_room(
    room: &Room,
    selection: &BoardingSelection,
    room_index: usize,
    nights: i64,
    surcharge_rate: f64,
) -> f64 {
    (price_for_room(room, selection, room_index) * nights as f64 * (1.0 + surcharge_rate)).round()
}

pub fn total_for_booking(
    rooms: &[Room],
    selection: &BoardingSelection,
    nights: i64,
    surcharge_rate: f64,
) -> f64 {
    rooms
        .iter()
        .enumerate()
        .map(|(index, room)| total_for_room(room, selection, index, nights, surcharge_rate))
        .sum()
}

/// Whole-day stay length with a floor of one night. Missing or degenerate
/// dates price as a single night; real validation happens at the API
/// boundary before pricing is reached.
pub fn nights_between(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> i64 {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => (check_out - check_in).num_days().max(1),
        _ => 1,
    }
}
