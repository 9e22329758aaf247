pub mod arch;
pub mod args;
pub mod check;
pub mod get;
pub mod init;
pub mod set;
pub mod show;
