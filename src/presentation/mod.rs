/// Presentation layer: the `ztpboot` command line
pub mod cli;
