#![allow(unused_imports)]
#![allow(dead_code)]
pub mod client_helpers;
pub mod test_db;
pub mod test_server;

pub use client_helpers::*;
pub use test_db::*;
pub use test_server::*;
