pub mod addon;
pub mod archive;
pub mod installation;
