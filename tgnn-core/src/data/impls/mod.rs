//! Implementations of [`DataLoader`](super::DataLoader).

mod path;

pub use path::{load_from_paths, IdxPathLoader};
