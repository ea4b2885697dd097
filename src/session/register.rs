use crate::core::error::SessionError;
use crate::models::user::{Sex, UserDatabase, UserRecord};
use crate::session::terminal::Terminal;
use crate::stores::user_store::UserStore;
use crate::utils::digest::{hash_password, PASSWORD_SALT};
use tracing::{error, info, instrument, warn};

/// How a completed registration ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered { username: String },
    /// Input was complete but the data file could not be written
    SaveFailed { username: String },
}

/// Interactive registration
///
/// Asks for a username that is not taken yet, a password typed twice and
/// a sex value, then stores the new user. Invalid input is answered with a
/// message and the same question again.
#[instrument(name = "register", skip_all)]
pub fn register<T: Terminal + ?Sized>(
    store: &UserStore,
    terminal: &mut T,
) -> Result<RegisterOutcome, SessionError> {
    info!("Registration started");

    terminal.say("")?;
    terminal.say(&"=".repeat(40))?;
    terminal.say(" User Registration")?;
    terminal.say(&"=".repeat(40))?;

    let (username, mut db) = ask_username(store, terminal)?;
    let password = ask_password(terminal)?;
    let sex = ask_sex(terminal)?;

    db.insert(
        username.clone(),
        UserRecord::new(hash_password(&password, PASSWORD_SALT), sex),
    );

    match store.save(&db) {
        Ok(()) => {
            terminal.say(&format!("User {} registered successfully!", username))?;
            info!(username = %username, "User registered");
            Ok(RegisterOutcome::Registered { username })
        }
        Err(e) => {
            terminal.say(&format!(
                "Registration of user {} failed! Could not save data.",
                username
            ))?;
            error!(username = %username, error = %e, "Registration failed, data not saved");
            Ok(RegisterOutcome::SaveFailed { username })
        }
    }
}

/// Returns the accepted username with the database it was checked against
fn ask_username<T: Terminal + ?Sized>(
    store: &UserStore,
    terminal: &mut T,
) -> Result<(String, UserDatabase), SessionError> {
    loop {
        let username = terminal.prompt("Enter your username: ")?;
        if username.is_empty() {
            terminal.say("Username cannot be empty, please try again!")?;
            continue;
        }

        let db = store.load();
        if db.contains(&username) {
            terminal.say(&format!(
                "Username {} already exists, please choose another one!",
                username
            ))?;
            warn!(username = %username, "Registration rejected: username already exists");
            continue;
        }

        return Ok((username, db));
    }
}

fn ask_password<T: Terminal + ?Sized>(terminal: &mut T) -> Result<String, SessionError> {
    loop {
        let password = terminal.prompt("Enter your password: ")?;
        if password.is_empty() {
            terminal.say("Password cannot be empty, please try again!")?;
            continue;
        }

        let confirmation = terminal.prompt("Confirm your password: ")?;
        if confirmation != password {
            terminal.say("The two passwords do not match, please try again!")?;
            continue;
        }

        return Ok(password);
    }
}

fn ask_sex<T: Terminal + ?Sized>(terminal: &mut T) -> Result<Sex, SessionError> {
    loop {
        let reply = terminal.prompt("Enter your sex (nan or nv): ")?;
        match reply.parse::<Sex>() {
            Ok(sex) => return Ok(sex),
            Err(()) => terminal.say("Invalid sex, please enter 'nan' or 'nv'!")?,
        }
    }
}
