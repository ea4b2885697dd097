use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The two accepted values of the `sex` field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "nan")]
    Nan,
    #[serde(rename = "nv")]
    Nv,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Nan => "nan",
            Sex::Nv => "nv",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ();

    /// Exact match only; no trimming or case folding
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nan" => Ok(Sex::Nan),
            "nv" => Ok(Sex::Nv),
            _ => Err(()),
        }
    }
}

/// One registered user as stored in the data file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Salted MD5 of the password, 32 lowercase hex characters
    pub password: String,
    pub sex: Sex,
}

impl UserRecord {
    pub fn new(password_hash: String, sex: Sex) -> Self {
        Self {
            password: password_hash,
            sex,
        }
    }
}

#[derive(Deserialize)]
struct StoredPassword {
    password: String,
}

/// Username to record mapping backed by the raw JSON object
///
/// Records are kept as they were read so that entries this tool does not
/// understand are written back untouched. Key order follows insertion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserDatabase {
    users: Map<String, Value>,
}

impl UserDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(users: Map<String, Value>) -> Self {
        Self { users }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.users
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Stored password hash of one user
    ///
    /// Only the `password` field is read; other fields are not checked.
    /// Returns `None` if the user is absent and `Some(Err(_))` if the record
    /// has no string `password`.
    pub fn password_hash(&self, username: &str) -> Option<Result<String, serde_json::Error>> {
        self.users.get(username).map(|value| {
            StoredPassword::deserialize(value).map(|stored| stored.password)
        })
    }

    /// Add or replace a user
    pub fn insert(&mut self, username: impl Into<String>, record: UserRecord) {
        let value = serde_json::json!({
            "password": record.password,
            "sex": record.sex.as_str(),
        });
        self.users.insert(username.into(), value);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
