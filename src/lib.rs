pub mod bridge;
pub mod cli;
pub mod common;
pub mod error;
pub mod io;
pub mod mocks;
pub mod qubo;
pub mod register;
pub mod search;
pub mod seq;
pub mod signed;
pub mod strand;

#[macro_use]
extern crate approx;
