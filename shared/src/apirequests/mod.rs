pub mod general;
pub mod jokes;
pub mod users;
