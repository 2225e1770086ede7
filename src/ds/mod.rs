pub mod arena;
pub mod frequency_ladder;
pub mod random_index;
pub mod recency_list;

pub use arena::{NodeArena, NodeId};
pub use frequency_ladder::FrequencyLadder;
pub use random_index::RandomIndex;
pub use recency_list::RecencyList;
