// Adapters layer: concrete implementations of the domain ports (cache
// stores, clocks). File storage for datasets lives in `config`.

pub mod clock;
pub mod store;

pub use clock::{ManualClock, SystemClock};
pub use store::{FileStore, MemoryStore};
