pub mod keepa;
pub mod oxylabs;
