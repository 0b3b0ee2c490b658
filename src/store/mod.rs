mod reader;
mod schema;
mod writer;

pub use reader::{ReadingStore, SqliteStore};
pub use writer::{PartitionKeys, partition_keys};
