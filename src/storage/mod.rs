pub mod memory;
pub mod sqlite;
pub mod trait_def;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use trait_def::Storage;
