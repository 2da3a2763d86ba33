pub mod fetch;
pub mod install;
pub mod manage;
pub mod orchestrate;
pub mod provider;
pub mod resolve;
pub mod source;
pub mod summary;
