//! Built-in platform probes.

pub mod github;
pub mod instagram;
pub mod twitter;

pub use github::GithubProbe;
pub use instagram::InstagramProbe;
pub use twitter::TwitterProbe;
