//! Sign-up and log-in autofill over the account store

use crate::clock::{Clock, DayParts, SystemClock};
use crate::config::Config;
use crate::errors::{AutofillError, StorageError};
use crate::notify::{Notification, Notifier};
use crate::platforms::InputEngine;
use crate::store::AccountStore;
use crate::types::{AccountCredentials, Key, PopupKind, Role};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// A user-triggered action. Each one runs to completion before the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignUp(Role),
    LogIn { role: Role, email: Option<String> },
    CopyLastEmail(Role),
    ListAccounts,
    SetName(String),
    ShowPreferences,
    ClearAll,
}

/// One emitted input step.
#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    Paste(&'a str),
    Press(Key),
}

pub struct Autofill {
    store: AccountStore,
    engine: Arc<dyn InputEngine>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl Autofill {
    pub fn new(
        store: AccountStore,
        engine: Arc<dyn InputEngine>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self {
            store,
            engine,
            notifier,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Run a command and report its outcome through the notifier. Errors stop
    /// here; the return value only says whether the command succeeded.
    pub async fn execute(&mut self, command: &Command) -> bool {
        match self.dispatch(command).await {
            Ok(notification) => {
                self.notifier.notify(notification);
                true
            }
            Err(e) => {
                error!(?command, "command failed: {}", e);
                self.notifier.notify(Notification::failure(e.title(), e.detail()));
                false
            }
        }
    }

    async fn dispatch(&mut self, command: &Command) -> Result<Notification, AutofillError> {
        match command {
            Command::SignUp(role) => {
                let email = self.autofill(PopupKind::SignUp, *role, None).await?;
                Ok(Notification::success(
                    format!("Filled sign-up popup as {role}"),
                    Some(email),
                ))
            }
            Command::LogIn { role, email } => {
                let used = self.autofill(PopupKind::LogIn, *role, email.as_deref()).await?;
                Ok(Notification::success("Filled log-in popup", Some(used)))
            }
            Command::CopyLastEmail(role) => {
                let email = self.copy_last_email(*role).await?;
                Ok(Notification::success(format!("Copied {email} to clipboard"), None))
            }
            Command::ListAccounts => {
                let accounts = self.list_accounts()?;
                let title = format!("{} stored accounts", accounts.len());
                Ok(Notification::success(title, joined_lines(accounts)))
            }
            Command::SetName(value) => {
                let name = self.store.set_name(value)?;
                info!(%name, "saved name");
                Ok(Notification::success(
                    "Saved name",
                    Some(format!("Accounts will start with '{name}'")),
                ))
            }
            Command::ShowPreferences => {
                let lines = self
                    .store
                    .preferences()?
                    .into_iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect();
                Ok(Notification::success("Stored preferences", joined_lines(lines)))
            }
            Command::ClearAll => {
                self.store.clear_all()?;
                info!("cleared all stored values");
                Ok(Notification::success("Cleared all preferences", None))
            }
        }
    }

    /// Fill the popup in the frontmost application. Returns the email typed.
    #[instrument(skip(self))]
    pub async fn autofill(
        &mut self,
        popup: PopupKind,
        role: Role,
        explicit_email: Option<&str>,
    ) -> Result<String, AutofillError> {
        let name = self.require_name()?;
        match popup {
            PopupKind::LogIn => self.log_in(&name, role, explicit_email).await,
            PopupKind::SignUp => self.sign_up(&name, role).await.map(|c| c.email),
        }
    }

    async fn log_in(
        &mut self,
        name: &str,
        role: Role,
        explicit_email: Option<&str>,
    ) -> Result<String, AutofillError> {
        let email = match explicit_email {
            Some(email) => email.to_string(),
            None => self.store.last_account(role)?.ok_or_else(|| not_found(name, role))?,
        };
        let password = self.config.password.clone();
        self.emit(&[
            Step::Paste(&email),
            Step::Press(Key::Tab),
            Step::Paste(&password),
            Step::Press(Key::Enter),
        ])
        .await?;
        Ok(email)
    }

    async fn sign_up(&mut self, name: &str, role: Role) -> Result<AccountCredentials, AutofillError> {
        self.config.validate()?;
        let today = DayParts::of(self.clock.today());
        let stamp = today.stamp();
        let scope = self.config.epoch_scope;

        if self.store.date_stamp(scope, role)?.as_deref() != Some(stamp.as_str()) {
            info!(%stamp, %scope, "new day, resetting {} counter for {}", role, name);
            self.store.set_counter(name, role, 0)?;
            self.store.set_date_stamp(scope, role, &stamp)?;
        }

        let number = self
            .store
            .counter(name, role)?
            .checked_add(1)
            .ok_or_else(|| {
                StorageError::InvalidValue(format!("{name} {role} account counter is at its maximum"))
            })?;
        self.store.set_counter(name, role, number)?;

        let credentials = build_credentials(name, role, number, &today, &self.config);
        debug!(number, email = %credentials.email, "generated account");

        self.emit(&[
            Step::Paste(&credentials.display_name),
            Step::Press(Key::Tab),
            Step::Paste(&credentials.email),
            Step::Press(Key::Tab),
            Step::Paste(&credentials.password),
            Step::Press(Key::Tab),
            Step::Paste(&credentials.password),
            Step::Press(Key::Enter),
        ])
        .await?;

        self.store.append_account(role, &credentials.email)?;
        Ok(credentials)
    }

    /// Put the most recently generated email for `role` on the clipboard.
    #[instrument(skip(self))]
    pub async fn copy_last_email(&mut self, role: Role) -> Result<String, AutofillError> {
        let name = self.require_name()?;
        let email = self
            .store
            .last_account(role)?
            .ok_or_else(|| not_found(&name, role))?;
        self.engine.copy(&email).await?;
        Ok(email)
    }

    /// Every generated account, teachers first.
    pub fn list_accounts(&self) -> Result<Vec<String>, AutofillError> {
        let mut all = Vec::new();
        for role in Role::ALL {
            all.extend(self.store.accounts(role)?);
        }
        Ok(all)
    }

    fn require_name(&self) -> Result<String, AutofillError> {
        self.store.name()?.ok_or_else(|| {
            AutofillError::Precondition(
                "Use 'tutero manage set-name <NAME>' first to set your name".to_string(),
            )
        })
    }

    async fn emit(&self, steps: &[Step<'_>]) -> Result<(), AutofillError> {
        let delay = Duration::from_millis(self.config.key_delay_ms);
        for step in steps {
            match step {
                Step::Paste(text) => self.engine.paste(text).await?,
                Step::Press(key) => self.engine.press_key(*key).await?,
            }
            debug!(?step, "sent");
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(())
    }
}

/// Derive the deterministic display name and email for an account number.
pub fn build_credentials(
    name: &str,
    role: Role,
    number: u32,
    today: &DayParts,
    config: &Config,
) -> AccountCredentials {
    let display_name = format!(
        "{}{}{} {}{}.{}",
        title_case(name),
        title_case(role.token()),
        number,
        title_case(&today.month),
        today.day,
        today.year
    );
    let email = format!(
        "{}{}{}.{}{}.{}@{}",
        name.to_lowercase(),
        role.token(),
        number,
        today.month,
        today.day,
        today.year,
        config.email_domain
    );
    AccountCredentials {
        display_name,
        email,
        password: config.password.clone(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut titled: String = first.to_uppercase().collect();
    titled.push_str(&chars.as_str().to_lowercase());
    titled
}

fn not_found(name: &str, role: Role) -> AutofillError {
    AutofillError::NotFound(format!(
        "Couldn't find any signed up email for {name} {role}"
    ))
}

fn joined_lines(lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jan5() -> DayParts {
        DayParts::of(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
    }

    #[test]
    fn title_case_lowers_the_tail() {
        assert_eq!(title_case("zAC"), "Zac");
        assert_eq!(title_case("stud"), "Stud");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn credentials_follow_the_account_format() {
        let creds = build_credentials("zac", Role::Student, 1, &jan5(), &Config::default());
        assert_eq!(creds.display_name, "ZacStud1 Jan5.2026");
        assert_eq!(creds.email, "zacstud1.jan5.2026@yopmail.com");
        assert_eq!(creds.password, "123123");
    }

    #[test]
    fn credentials_use_configured_domain() {
        let config = Config {
            email_domain: "example.test".to_string(),
            ..Config::default()
        };
        let creds = build_credentials("amy", Role::Teacher, 12, &jan5(), &config);
        assert_eq!(creds.display_name, "AmyTeach12 Jan5.2026");
        assert_eq!(creds.email, "amyteach12.jan5.2026@example.test");
    }
}
