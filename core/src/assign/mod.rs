pub mod rank;

pub use rank::RankPartition;
