//! This crate contains all shared UI for the workspace.

mod about;
pub mod catch_boundary;
mod home;
mod joke_detail;
pub mod jokes;
mod jokes_index;
pub mod login;
mod new_joke;
pub mod routes;
#[cfg(test)]
mod testing;

pub use routes::Route;
