//! Command trait for the obs2html CLI
//!
//! Every subcommand implements [`Command`], receiving a [`RuntimeContext`]
//! with the resolved configuration location.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all obs2html commands
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use crate::error::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(short, long)]
///     pub some_flag: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         let config = context.load_config()?;
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command fails. Error messages should
    /// tell the user what to do next.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
