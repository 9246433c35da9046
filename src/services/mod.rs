pub mod outfits;
pub mod ranking;
pub mod recommendations;
pub mod weather;
