//! Common types shared by the store, the engine and the input platforms

use std::fmt;

/// The account category a popup is filled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Teacher, Role::Student];

    /// Token used in storage keys, emails and account names.
    pub fn token(&self) -> &'static str {
        match self {
            Role::Teacher => "teach",
            Role::Student => "stud",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Which kind of form the autofill targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    SignUp,
    LogIn,
}

impl fmt::Display for PopupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopupKind::SignUp => f.write_str("sign-up"),
            PopupKind::LogIn => f.write_str("log-in"),
        }
    }
}

/// Symbolic keys the engine sends between pasted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Advance focus to the next input.
    Tab,
    /// Submit the form.
    Enter,
}

impl Key {
    pub fn ascii_code(&self) -> u8 {
        match self {
            Key::Tab => 9,
            Key::Enter => 13,
        }
    }
}

/// The application that receives keystrokes, resolved at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationHandle {
    /// Bundle identifier, e.g. `com.google.Chrome`.
    pub bundle_id: String,
}

/// A freshly minted account, as typed into a sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    pub display_name: String,
    pub email: String,
    pub password: String,
}
