pub mod favorites;
pub mod login;
pub mod search;
