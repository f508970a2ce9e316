pub mod carddav;
