//! Tile pool: letter tiles, locations, and the weighted letter bag.

pub mod bag;
pub mod tile;

pub use bag::{letter_index, LetterBag};
pub use tile::{Tile, TileLocation};
