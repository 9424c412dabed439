use tickerboard_warehouse::{FileSession, SessionProvider, UserId};

use crate::cli::SigninArgs;
use crate::error::CliError;

pub fn sign_in(args: &SigninArgs, session: &FileSession) -> Result<(), CliError> {
    let user = UserId::parse(&args.user).map_err(|e| CliError::Command(e.to_string()))?;
    session.sign_in(&user)?;
    eprintln!("signed in as {user}");
    Ok(())
}

pub fn sign_out(session: &FileSession) -> Result<(), CliError> {
    session.sign_out()?;
    eprintln!("signed out");
    Ok(())
}

/// The signed-in user, or [`CliError::NotSignedIn`].
pub fn require_user(session: &impl SessionProvider) -> Result<UserId, CliError> {
    session.current_user()?.ok_or(CliError::NotSignedIn)
}
