pub mod assistant;
pub mod load;
pub mod login;
pub mod profile;
pub mod qr;
pub mod share;
pub mod support;
