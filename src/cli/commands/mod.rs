//! Command execution functions.
//!
//! One module per subcommand: `install` and `release` run the packaging
//! pipeline, `check` validates the project without writing anything.

mod check;
mod install;
mod release;

pub use check::check;
pub use install::install;
pub use release::{prompt_version, release, release_with_input};
