//! Room directory
//!
//! Rooms are local records for now (no backend): created newest-first and
//! persisted as one JSON blob.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::persistence;

/// Shortest accepted room name (after trimming)
pub const MIN_ROOM_NAME_CHARS: usize = 3;
const ROOM_ID_LEN: usize = 8;
const ROOM_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Form input for a new room
#[derive(Debug, Clone)]
pub struct CreateRoomInput {
    pub owner: String,
    pub room_name: String,
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub owner: String,
    pub room_name: String,
    pub is_open: bool,
    /// Wall clock at creation (ms)
    pub created_at: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomDirectory {
    rooms: Vec<Room>,
}

impl RoomDirectory {
    /// Storage key
    const STORAGE_KEY: &'static str = "coin_rush_rooms_v1";

    pub fn new() -> Self {
        Self { rooms: Vec::new() }
    }

    /// Load from storage; missing or corrupt data gives an empty directory
    pub fn load() -> Self {
        match persistence::load_json::<Self>(Self::STORAGE_KEY) {
            Ok(Some(dir)) => {
                log::info!("Loaded {} rooms", dir.rooms.len());
                dir
            }
            Ok(None) => Self::new(),
            Err(e) => {
                log::warn!("Discarding stored rooms: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        persistence::save_json(Self::STORAGE_KEY, self)
    }

    /// Validate, insert at the front and persist
    pub fn create_room<R: Rng + ?Sized>(
        &mut self,
        input: CreateRoomInput,
        now_ms: f64,
        rng: &mut R,
    ) -> Result<Room> {
        let room_name = input.room_name.trim().to_string();
        if room_name.chars().count() < MIN_ROOM_NAME_CHARS {
            return Err(GameError::InvalidRoomName {
                min: MIN_ROOM_NAME_CHARS,
                got: room_name,
            });
        }

        let mut id = generate_room_id(rng);
        while self.get(&id).is_some() {
            id = generate_room_id(rng);
        }

        let room = Room {
            id,
            owner: input.owner,
            room_name,
            is_open: input.is_open,
            created_at: now_ms,
        };
        self.rooms.insert(0, room.clone());
        self.save()?;
        log::info!("Created room {} ({})", room.id, room.room_name);
        Ok(room)
    }

    /// All rooms, newest first
    pub fn list(&self) -> &[Room] {
        &self.rooms
    }

    pub fn get(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Open rooms only
    pub fn open_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_open)
    }
}

/// Short URL-friendly id (8 base-36 characters)
pub fn generate_room_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_ID_LEN)
        .map(|_| ROOM_ID_ALPHABET[rng.random_range(0..ROOM_ID_ALPHABET.len())] as char)
        .collect()
}
