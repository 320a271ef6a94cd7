use crate::error::Error;
use facetq_macros::Code;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};

/// A closed set of values with a stable textual code, as used in URLs.
///
/// Usually derived with `#[derive(Code)]`.
pub trait Code: Sized + Copy + 'static {
    /// All variants, in declaration order.
    const VARIANTS: &'static [Self];

    fn code(&self) -> &'static str;

    fn from_code(code: &str) -> Option<Self>;
}

/// Breadth of a selection, picking which search text variant of a facet is used.
#[derive(
    Code, Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[code(rename = "n")]
    Narrow,
    #[code(rename = "s", default)]
    Normal,
    #[code(rename = "b")]
    Broad,
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Narrow => "narrow",
            Self::Normal => "normal",
            Self::Broad => "broad",
        })
    }
}

/// Bidirectional mapping between scopes and their URL codes.
///
/// Encoder and decoder of a [`crate::codec::Codec`] share one instance, so both directions
/// always agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeCodes {
    to_code: BTreeMap<Scope, String>,
    to_scope: HashMap<String, Scope>,
}

impl ScopeCodes {
    /// Create a table from explicit pairs.
    ///
    /// Every scope must appear exactly once, and codes must be unique, non-empty and free of
    /// URL or entry delimiters.
    pub fn new<I, S>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (Scope, S)>,
        S: Into<String>,
    {
        let mut to_code = BTreeMap::new();
        let mut to_scope = HashMap::new();

        for (scope, code) in pairs {
            let code = code.into();
            if code.is_empty() || ["#", ";;", "&", "="].iter().any(|d| code.contains(d)) {
                return Err(Error::ScopeCodes(format!("invalid code '{code}' for {scope}")));
            }
            if to_scope.insert(code.clone(), scope).is_some() {
                return Err(Error::ScopeCodes(format!("duplicate code '{code}'")));
            }
            if to_code.insert(scope, code).is_some() {
                return Err(Error::ScopeCodes(format!("duplicate scope {scope}")));
            }
        }

        if let Some(missing) = Scope::VARIANTS.iter().find(|s| !to_code.contains_key(*s)) {
            return Err(Error::ScopeCodes(format!("missing code for {missing}")));
        }

        Ok(Self { to_code, to_scope })
    }

    pub fn code(&self, scope: Scope) -> &str {
        self.to_code
            .get(&scope)
            .map(String::as_str)
            .unwrap_or_else(|| scope.code())
    }

    pub fn scope(&self, code: &str) -> Option<Scope> {
        self.to_scope.get(code).copied()
    }
}

impl Default for ScopeCodes {
    fn default() -> Self {
        Self {
            to_code: Scope::VARIANTS
                .iter()
                .map(|scope| (*scope, scope.code().to_string()))
                .collect(),
            to_scope: Scope::VARIANTS
                .iter()
                .map(|scope| (scope.code().to_string(), *scope))
                .collect(),
        }
    }
}
