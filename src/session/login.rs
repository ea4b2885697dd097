use crate::core::error::SessionError;
use crate::session::terminal::Terminal;
use crate::stores::user_store::UserStore;
use crate::utils::digest::{hash_password, PASSWORD_SALT};
use tracing::{info, instrument, warn};

/// Interactive login
///
/// Loops until a known username is entered, then keeps asking for that
/// user's password until it matches and returns the username. Empty and
/// wrong passwords stay on the same username. The data file is only read,
/// never written.
#[instrument(name = "login", skip_all)]
pub fn login<T: Terminal + ?Sized>(
    store: &UserStore,
    terminal: &mut T,
) -> Result<String, SessionError> {
    info!("Login started");

    terminal.say("")?;
    terminal.say(&"=".repeat(40))?;
    terminal.say(" User Login")?;
    terminal.say(&"=".repeat(40))?;

    let (username, stored_hash) = ask_known_user(store, terminal)?;

    loop {
        let password = terminal.prompt("Enter your password: ")?;
        if password.is_empty() {
            terminal.say("Password cannot be empty, please enter your password!")?;
            continue;
        }

        if hash_password(&password, PASSWORD_SALT) == stored_hash {
            terminal.say(&format!("User {} logged in successfully!", username))?;
            info!(username = %username, "User logged in");
            return Ok(username);
        }

        terminal.say(&format!(
            "Wrong password for user {}, please try again!",
            username
        ))?;
        warn!(username = %username, "Login failed: wrong password");
    }
}

/// Username loop; returns the username with its stored password hash
fn ask_known_user<T: Terminal + ?Sized>(
    store: &UserStore,
    terminal: &mut T,
) -> Result<(String, String), SessionError> {
    loop {
        let username = terminal.prompt("Enter your username: ")?;
        if username.is_empty() {
            terminal.say("Username cannot be empty, please enter one!")?;
            continue;
        }

        let db = store.load();
        match db.password_hash(&username) {
            None => {
                terminal.say(&format!(
                    "Username {} does not exist, please try again!",
                    username
                ))?;
                warn!(username = %username, "Login failed: unknown username");
            }
            Some(Err(source)) => return Err(SessionError::CorruptRecord { username, source }),
            Some(Ok(hash)) => return Ok((username, hash)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SessionError;
    use crate::session::terminal::ScriptedTerminal;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn store_with_alice(temp_dir: &TempDir) -> UserStore {
        let store = UserStore::new(temp_dir.path().join("data.json"));
        let data = json!({"alice": {"password": hash_password("secret", PASSWORD_SALT), "sex": "nan"}});
        fs::write(store.path(), serde_json::to_string_pretty(&data).unwrap()).unwrap();
        store
    }

    #[test]
    fn test_login_success() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_alice(&temp_dir);
        let mut terminal = ScriptedTerminal::new(&["alice", "secret"]);

        assert_eq!(login(&store, &mut terminal).unwrap(), "alice");
        assert!(terminal.saw("User alice logged in successfully!"));
    }

    #[test]
    fn test_login_wrong_password_reprompts_password_and_keeps_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_alice(&temp_dir);
        let before = fs::read_to_string(store.path()).unwrap();

        let mut terminal = ScriptedTerminal::new(&["alice", "wrong", "secret"]);

        assert_eq!(login(&store, &mut terminal).unwrap(), "alice");
        assert!(terminal.saw("Wrong password for user alice"));
        assert_eq!(terminal.count("Enter your username: "), 1);
        assert_eq!(terminal.count("Enter your password: "), 2);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_login_wrong_password_then_interrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_alice(&temp_dir);
        let mut terminal = ScriptedTerminal::new(&["alice", "wrong"]);

        let err = login(&store, &mut terminal).unwrap_err();

        assert!(err.is_interrupted());
        assert_eq!(terminal.count("Wrong password"), 1);
        assert!(!terminal.saw("logged in successfully"));
    }

    #[test]
    fn test_login_unknown_user_reprompts() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_alice(&temp_dir);
        let mut terminal = ScriptedTerminal::new(&["", "mallory", "alice", "secret"]);

        assert_eq!(login(&store, &mut terminal).unwrap(), "alice");
        assert!(terminal.saw("Username cannot be empty"));
        assert!(terminal.saw("Username mallory does not exist"));
    }

    #[test]
    fn test_login_empty_password_stays_on_username() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_alice(&temp_dir);
        let mut terminal = ScriptedTerminal::new(&["alice", "", "secret"]);

        assert_eq!(login(&store, &mut terminal).unwrap(), "alice");
        assert!(terminal.saw("Password cannot be empty"));
        assert_eq!(terminal.count("Enter your username: "), 1);
        assert_eq!(terminal.count("Enter your password: "), 2);
    }

    #[test]
    fn test_login_ignores_unexpected_sex_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::new(temp_dir.path().join("data.json"));
        let data = json!({
            "alice": {"password": hash_password("secret", PASSWORD_SALT), "sex": "male"},
            "bob": {"password": hash_password("hunter2", PASSWORD_SALT)},
        });
        fs::write(store.path(), data.to_string()).unwrap();

        let mut terminal = ScriptedTerminal::new(&["alice", "secret"]);
        assert_eq!(login(&store, &mut terminal).unwrap(), "alice");

        let mut terminal = ScriptedTerminal::new(&["bob", "hunter2"]);
        assert_eq!(login(&store, &mut terminal).unwrap(), "bob");
    }

    #[test]
    fn test_login_without_data_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::new(temp_dir.path().join("data.json"));
        let mut terminal = ScriptedTerminal::new(&["alice"]);

        assert!(login(&store, &mut terminal).unwrap_err().is_interrupted());
        assert!(terminal.saw("Username alice does not exist"));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_login_corrupt_record_is_unexpected() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::new(temp_dir.path().join("data.json"));
        let data = json!({"alice": {"sex": "nan"}, "bob": {"password": 42, "sex": "nv"}});
        fs::write(store.path(), data.to_string()).unwrap();

        for name in ["alice", "bob"] {
            let mut terminal = ScriptedTerminal::new(&[name, "secret"]);
            match login(&store, &mut terminal) {
                Err(SessionError::CorruptRecord { username, .. }) => assert_eq!(username, name),
                other => panic!("Expected CorruptRecord, got {:?}", other),
            }
            assert!(!terminal.saw("Enter your password: "));
        }
    }
}
