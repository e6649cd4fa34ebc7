use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

pub const CODE_MAX_LEN: usize = 32;
pub const NAME_MAX_LEN: usize = 120;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Standard,
    Service,
    Kit,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Standard, Kind::Service, Kind::Kit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Standard => "std",
            Kind::Service => "service",
            Kind::Kit => "kit",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Standard => write!(f, "Standard"),
            Kind::Service => write!(f, "Service"),
            Kind::Kit => write!(f, "Kit"),
        }
    }
}

impl FromStr for Kind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Inactive, Status::Discontinued];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::Discontinued => "discontinued",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "Active"),
            Status::Inactive => write!(f, "Inactive"),
            Status::Discontinued => write!(f, "Discontinued"),
        }
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL.into_iter().find(|st| st.as_str() == s).ok_or(())
    }
}

/// A catalog entry.
///
/// `kind` and `status` hold the raw submitted strings so a rejected form can
/// be rendered back exactly as the user typed it; [`Product::validate`]
/// checks them against [`Kind`] and [`Status`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub code: String,
    pub name: String,
    pub kind: String,
    pub status: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            code: String::new(),
            name: String::new(),
            kind: Kind::default().as_str().to_string(),
            status: Status::default().as_str().to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Product {
    /// A transient product: no id, default kind and status.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: ProductParams) -> Self {
        let mut product = Self::new();
        params.apply_to(&mut product);
        product
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn kind_label(&self) -> String {
        self.kind
            .parse::<Kind>()
            .map(|k| k.to_string())
            .unwrap_or_else(|_| self.kind.clone())
    }

    pub fn status_label(&self) -> String {
        self.status
            .parse::<Status>()
            .map(|s| s.to_string())
            .unwrap_or_else(|_| self.status.clone())
    }

    /// Field rules that need nothing but the product itself. Code uniqueness
    /// depends on the store and is checked by the resource handler.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if self.code.is_empty() {
            errors.add("code", "can't be blank");
        } else {
            if self.code.chars().count() > CODE_MAX_LEN {
                errors.add(
                    "code",
                    format!("is too long (maximum is {} characters)", CODE_MAX_LEN),
                );
            }
            if !self
                .code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                errors.add("code", "may only contain letters, digits, '-' and '_'");
            }
        }

        if self.name.is_empty() {
            errors.add("name", "can't be blank");
        } else if self.name.chars().count() > NAME_MAX_LEN {
            errors.add(
                "name",
                format!("is too long (maximum is {} characters)", NAME_MAX_LEN),
            );
        }

        if self.kind.parse::<Kind>().is_err() {
            errors.add("kind", "is not included in the list");
        }
        if self.status.parse::<Status>().is_err() {
            errors.add("status", "is not included in the list");
        }

        errors
    }
}

/// Submitted attributes. Absent fields leave the product untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProductParams {
    pub code: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
}

impl ProductParams {
    pub fn apply_to(self, product: &mut Product) {
        if let Some(code) = self.code {
            product.code = code.trim().to_string();
        }
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(kind) = self.kind {
            product.kind = kind.trim().to_string();
        }
        if let Some(status) = self.status {
            product.status = status.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.field.chars();
        match chars.next() {
            Some(first) => write!(
                f,
                "{}{} {}",
                first.to_ascii_uppercase(),
                chars.as_str(),
                self.message
            ),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages for one field, joined for display next to its input.
    pub fn on(&self, field: &str) -> String {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join("; "))
    }
}
