//! Follows, ratings, agency join requests and direct chat.

mod manager;

pub use manager::{FollowUpdate, NewRating, SocialError, SocialManager, MAX_COMMENT_LEN};
