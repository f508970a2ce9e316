pub mod carddav;
pub mod text_match;
