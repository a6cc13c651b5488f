// Product review pipeline: keyword extraction, then seller and product reviews.

pub mod generator;
pub mod guide;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod writer;
