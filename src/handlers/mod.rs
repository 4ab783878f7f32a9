// One module per resource; the route table lives in lib.rs (`app`).
pub mod auth;
pub mod contact;
pub mod employee;
pub mod supervisor;
pub mod taskforce;
