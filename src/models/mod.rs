pub mod draft;
pub mod question;
pub mod score;
