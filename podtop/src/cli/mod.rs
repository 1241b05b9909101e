//! Command-line interface

mod args;

pub use args::{parse_overrides, parse_source, Args, Command, ParamsArgs, TcpArgs, LOCAL_NODE};
