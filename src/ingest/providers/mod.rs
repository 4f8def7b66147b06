pub mod hn_search;
pub mod rss;
