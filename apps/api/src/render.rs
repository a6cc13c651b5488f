//! Markdown result blocks shown by the frontend.

use crate::post::metrics::text_stats;
use crate::review::writer::Review;

pub fn render_post(title: &str, post: &str, hashtags: &[String]) -> String {
    let stats = text_stats(post);
    format!(
        "# {title}\n\
         | Property | Description |\n\
         | -------- | ----------- |\n\
         | Word     | {words} |\n\
         | Letter   | {letters} |\n\
         \n\
         {post}\n\
         \n\
         ## Hashtags\n\
         {hashtags}",
        words = stats.words,
        letters = stats.letters,
        hashtags = hashtags.join(" "),
    )
}

pub fn render_review(review: &Review) -> String {
    format!(
        "> Seller Review\n\
         \n\
         {seller}\n\
         \n\
         ---\n\
         \n\
         > Product Review\n\
         \n\
         # {title}\n\
         {product}",
        seller = review.seller_review.trim(),
        title = review.title.trim(),
        product = review.product_review.trim(),
    )
}
