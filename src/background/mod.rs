pub mod feeds;

pub use feeds::FeedLoader;
