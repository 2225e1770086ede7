pub use crate::cache::{
    AllKeysLfuCache, AllKeysLruCache, Cache, NoEvictionCache, VolatileLruCache,
};
pub use crate::error::ConfigError;
pub use crate::expire::ExpireStrategy;
pub use crate::item::Item;
pub use crate::options::Options;
pub use crate::store::Store;
