pub mod item;

pub use item::{seed_catalog, Item, ItemNotFound, NewItem};
