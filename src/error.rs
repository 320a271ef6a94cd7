use crate::catalog::FacetKey;
use crate::scope::Scope;

/// Errors building the static inputs: catalogs, facet keys and scope code tables.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Invalid facet key: {0}")]
    InvalidFacetKey(String),
    #[error("Duplicate facet: {0}")]
    DuplicateFacet(FacetKey),
    #[error("Facet {child} is not a direct child of {parent}")]
    MisplacedFacet { child: FacetKey, parent: FacetKey },
    #[error("Facet {0} has no search strings for scope {1}")]
    EmptySearchStrings(FacetKey, Scope),
    #[error("Duplicate filter category: {0}")]
    DuplicateCategory(String),
    #[error("Filter category uses a reserved parameter name: {0}")]
    ReservedCategory(String),
    #[error("Invalid scope codes: {0}")]
    ScopeCodes(String),
    #[error("Invalid catalog format: {0}")]
    Format(String),
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(err.to_string())
    }
}

/// Recoverable problems found while compiling or decoding.
///
/// These never fail an operation. They are logged, and handed out by the `*_with_diagnostics`
/// variants of the operations.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    #[error("Selection '{entry}' has no search strings for scope {scope}, skipping")]
    MalformedSelectionEntry { entry: String, scope: Scope },
    #[error("Unknown token '{token}' in parameter '{parameter}', dropping entry")]
    UnresolvableUrlToken { parameter: String, token: String },
    #[error("Unknown scope code '{code}' in parameter '{parameter}', dropping entry")]
    UnknownScopeCode { parameter: String, code: String },
    #[error("Unparsable fragment '{fragment}' in parameter '{parameter}', dropping entry")]
    UnparsableUrlFragment { parameter: String, fragment: String },
    #[error("Ignoring unknown parameter '{name}'")]
    UnknownParameter { name: String },
    #[error("Invalid value '{value}' for parameter '{parameter}', using default")]
    InvalidScalar { parameter: String, value: String },
}

impl Diagnostic {
    pub(crate) fn log(&self) {
        match self {
            Self::UnknownParameter { .. } => log::debug!("{self}"),
            _ => log::warn!("{self}"),
        }
    }
}

/// Collects diagnostics, logging them as they come in.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.0.push(diagnostic);
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.0
    }
}
