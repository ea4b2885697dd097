use crate::core::error::SessionError;
use crate::session::login::login;
use crate::session::register::register;
use crate::session::terminal::Terminal;
use crate::stores::user_store::UserStore;
use tracing::{error, info, instrument, warn};

/// Interactive menu states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Menu,
    Registering,
    LoggingIn,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Register,
    Login,
    Exit,
}

impl MenuChoice {
    /// Parse a trimmed menu reply; anything but `1`, `2` or `3` is `None`
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(MenuChoice::Register),
            "2" => Some(MenuChoice::Login),
            "3" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// How the menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// The user picked "Exit"
    Quit,
    /// Input ended while a question was pending
    Interrupted,
    /// An unexpected error stopped the session
    Failed,
}

/// Message shown when the user aborts the session
pub const INTERRUPTED_MESSAGE: &str = "Interrupted by user.";

/// Run the register / login / exit menu until the user leaves
///
/// Interruption and unexpected errors are reported on the terminal and in
/// the log here; the caller only learns how the loop ended.
#[instrument(name = "run_menu", skip_all)]
pub fn run_menu<T: Terminal + ?Sized>(store: &UserStore, terminal: &mut T) -> MenuExit {
    info!("User management system started");

    match drive(store, terminal) {
        Ok(()) => MenuExit::Quit,
        Err(SessionError::Interrupted) => {
            notify(terminal, &format!("\n{}", INTERRUPTED_MESSAGE));
            info!("User management system interrupted by user");
            MenuExit::Interrupted
        }
        Err(e) => {
            notify(terminal, &format!("\nFatal error: {}", e));
            let report = anyhow::Error::new(e);
            error!(critical = true, error = ?report, "User management system stopped by an unexpected error");
            MenuExit::Failed
        }
    }
}

fn drive<T: Terminal + ?Sized>(store: &UserStore, terminal: &mut T) -> Result<(), SessionError> {
    terminal.say("")?;
    terminal.say(&"=".repeat(45))?;
    terminal.say("Welcome to the user management system")?;
    terminal.say(&"=".repeat(45))?;

    let mut state = MenuState::Menu;
    loop {
        state = match state {
            MenuState::Menu => {
                terminal.say("  1. Register a new user")?;
                terminal.say("  2. Log in")?;
                terminal.say("  3. Exit")?;
                terminal.say(&"=".repeat(45))?;

                let reply = terminal.prompt("  Choose an option (1/2/3): ")?;
                match MenuChoice::parse(&reply) {
                    Some(MenuChoice::Register) => MenuState::Registering,
                    Some(MenuChoice::Login) => MenuState::LoggingIn,
                    Some(MenuChoice::Exit) => {
                        terminal.say("Thank you for using the system, goodbye!")?;
                        info!("User management system exited normally");
                        MenuState::Exited
                    }
                    None => {
                        terminal.say("Invalid choice, please enter 1, 2 or 3.")?;
                        warn!(choice = %reply, "Invalid menu choice");
                        MenuState::Menu
                    }
                }
            }
            MenuState::Registering => {
                register(store, terminal)?;
                MenuState::Menu
            }
            MenuState::LoggingIn => {
                login(store, terminal)?;
                MenuState::Menu
            }
            MenuState::Exited => return Ok(()),
        };
    }
}

/// Best-effort message on the way out; the terminal may be the thing that failed
fn notify<T: Terminal + ?Sized>(terminal: &mut T, message: &str) {
    if let Err(e) = terminal.say(message) {
        warn!(error = %e, "Failed to write to terminal");
    }
}
