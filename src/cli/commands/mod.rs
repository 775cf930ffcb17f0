pub mod db;
pub mod serve;
pub mod token;
