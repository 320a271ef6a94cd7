use crate::model::DEFAULT_PAGE_SIZE;
use crate::scope::ScopeCodes;

/// Where the `AND` joining filter categories is placed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FilterGlue {
    /// Prefix every filter category with ` AND `, even when there is no subject before it.
    #[default]
    Unconditional,
    /// Only join filter categories to something before them.
    BetweenTerms,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompilerConfig {
    pub filter_glue: FilterGlue,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodecConfig {
    /// Name of the repeated parameter carrying one subject group each.
    pub subject_param: String,
    pub scope_codes: ScopeCodes,
    /// Separator between the entries of one parameter value.
    pub entry_separator: String,
    /// Page size used when the URL doesn't carry a valid one.
    pub default_page_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            subject_param: "subject".to_string(),
            scope_codes: ScopeCodes::default(),
            entry_separator: ";;".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
