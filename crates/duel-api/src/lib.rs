pub mod auth;
pub mod challenges;
pub mod convert;
pub mod error;
pub mod images;
pub mod middleware;
pub mod profiles;
pub mod proofs;
pub mod storage;
