pub mod add_config;
pub mod init;
pub mod render;
pub mod run;

pub use add_config::AddConfigCommand;
pub use init::InitCommand;
pub use render::RenderCommand;
pub use run::RunCommand;
