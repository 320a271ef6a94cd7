use crate::catalog::{CategoryId, Facet, FacetKey};
use crate::scope::Scope;
use crate::Code;
use indexmap::IndexMap;
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// How results are ordered by the search backend.
#[derive(Code, Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
    #[code(rename = "relevance", default)]
    Relevance,
    #[code(rename = "date")]
    MostRecent,
    #[code(rename = "pubdate")]
    PublicationDate,
    #[code(rename = "fauth")]
    FirstAuthor,
    #[code(rename = "jour")]
    Journal,
}

/// A catalog facet, selected with a scope.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FacetSelection {
    pub facet: Arc<Facet>,
    pub scope: Scope,
}

/// A free text term entered by the user, possibly translated by an assistant.
///
/// It only carries a search text for [`Scope::Normal`], which is its name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CustomTag {
    pub name: String,
    pub scope: Scope,
    pub translated: bool,
    pub pre_translation: Option<String>,
}

impl CustomTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: Scope::Normal,
            translated: false,
            pre_translation: None,
        }
    }

    pub fn translated(name: impl Into<String>, pre_translation: impl Into<String>) -> Self {
        Self {
            translated: true,
            pre_translation: Some(pre_translation.into()),
            ..Self::new(name)
        }
    }

    pub fn search_strings(&self, scope: Scope) -> Option<&[String]> {
        match scope {
            Scope::Normal => Some(std::slice::from_ref(&self.name)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionEntry {
    Facet(FacetSelection),
    Custom(CustomTag),
}

impl SelectionEntry {
    pub fn facet(facet: Arc<Facet>, scope: Scope) -> Self {
        Self::Facet(FacetSelection { facet, scope })
    }

    pub fn custom(tag: CustomTag) -> Self {
        Self::Custom(tag)
    }

    pub fn scope(&self) -> Scope {
        match self {
            Self::Facet(selection) => selection.scope,
            Self::Custom(tag) => tag.scope,
        }
    }

    pub fn set_scope(&mut self, scope: Scope) {
        match self {
            Self::Facet(selection) => selection.scope = scope,
            Self::Custom(tag) => tag.scope = scope,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.set_scope(scope);
        self
    }

    pub fn key(&self) -> Option<&FacetKey> {
        match self {
            Self::Facet(selection) => Some(&selection.facet.key),
            Self::Custom(_) => None,
        }
    }

    /// Search text fragments for the currently selected scope.
    pub fn search_strings(&self) -> Option<&[String]> {
        match self {
            Self::Facet(selection) => selection.facet.search_strings(selection.scope),
            Self::Custom(tag) => tag.search_strings(tag.scope),
        }
    }

    /// Short human readable name, for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Facet(selection) => selection.facet.key.to_string(),
            Self::Custom(tag) => tag.name.clone(),
        }
    }
}

/// Entries combined with `OR`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubjectGroup(pub Vec<SelectionEntry>);

impl Deref for SubjectGroup {
    type Target = Vec<SelectionEntry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SubjectGroup {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<SelectionEntry> for SubjectGroup {
    fn from_iter<T: IntoIterator<Item = SelectionEntry>>(iter: T) -> Self {
        SubjectGroup(Vec::from_iter(iter))
    }
}

impl From<Vec<SelectionEntry>> for SubjectGroup {
    fn from(value: Vec<SelectionEntry>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[SelectionEntry; N]> for SubjectGroup {
    fn from(value: [SelectionEntry; N]) -> Self {
        Self(value.into())
    }
}

/// Selected filters, by category, in insertion order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterSelection(pub IndexMap<CategoryId, Vec<SelectionEntry>>);

impl Deref for FilterSelection {
    type Target = IndexMap<CategoryId, Vec<SelectionEntry>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for FilterSelection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FilterSelection {
    /// Categories which have at least one entry.
    pub fn populated(&self) -> impl Iterator<Item = (&CategoryId, &Vec<SelectionEntry>)> {
        self.0.iter().filter(|(_, entries)| !entries.is_empty())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionModel {
    pub subject_groups: Vec<SubjectGroup>,
    pub filters: FilterSelection,
    pub advanced: bool,
    pub sort: SortMethod,
    pub page: usize,
    pub page_size: usize,
    pub collapsed: bool,
    /// Article ids picked for the AI summary.
    pub ai_pmids: Vec<String>,
    /// Element to scroll to after restoring the state.
    pub anchor: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

impl Default for SelectionModel {
    fn default() -> Self {
        Self {
            subject_groups: vec![],
            filters: Default::default(),
            advanced: false,
            sort: Default::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            collapsed: false,
            ai_pmids: vec![],
            anchor: None,
        }
    }
}

impl SelectionModel {
    /// Subject groups which have at least one entry.
    pub fn populated_groups(&self) -> impl Iterator<Item = &SubjectGroup> {
        self.subject_groups.iter().filter(|group| !group.is_empty())
    }

    /// Append a new, empty subject group, returning its index.
    pub fn add_group(&mut self) -> usize {
        self.subject_groups.push(SubjectGroup::default());
        self.subject_groups.len() - 1
    }

    /// Add an entry to a subject group, creating groups up to `group` as needed.
    pub fn push_subject(&mut self, group: usize, entry: SelectionEntry) -> &mut Self {
        while self.subject_groups.len() <= group {
            self.add_group();
        }
        self.subject_groups[group].push(entry);
        self
    }

    pub fn add_filter(
        &mut self,
        category: impl Into<CategoryId>,
        entry: SelectionEntry,
    ) -> &mut Self {
        self.filters.entry(category.into()).or_default().push(entry);
        self
    }

    /// Remove a facet from a filter category, dropping the category once it is empty.
    pub fn remove_filter(&mut self, category: &str, key: &FacetKey) -> Option<SelectionEntry> {
        let entries = self.filters.get_mut(category)?;
        let index = entries.iter().position(|entry| entry.key() == Some(key))?;
        let removed = entries.remove(index);
        if entries.is_empty() {
            self.filters.shift_remove(category);
        }
        Some(removed)
    }

    /// Change the scope of a subject entry. Returns `false` if there is no such entry.
    pub fn set_scope(&mut self, group: usize, entry: usize, scope: Scope) -> bool {
        match self
            .subject_groups
            .get_mut(group)
            .and_then(|group| group.get_mut(entry))
        {
            Some(entry) => {
                entry.set_scope(scope);
                true
            }
            None => false,
        }
    }

    /// Drop all selections, keeping the view settings.
    pub fn clear(&mut self) {
        self.subject_groups.clear();
        self.filters.clear();
        self.ai_pmids.clear();
        self.page = 1;
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.populated_groups().next().is_none() && self.filters.populated().next().is_none()
    }
}
