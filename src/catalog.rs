//! The static facet catalog.
//!
//! A catalog holds the subject tree and the filter categories, each made of facets carrying
//! per-locale labels and per-scope search text. It is loaded once per locale and only read
//! afterwards. Facets are handed out as [`Arc`]s, so selections can point at them without copying.

use crate::error::Error;
use crate::scope::Scope;
use crate::tokenizer;
use chumsky::Parser;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Parameter names a filter category must not use.
pub const RESERVED_PARAMETERS: &[&str] = &[
    "subject",
    "advanced",
    "sort",
    "collapsed",
    "pageSize",
    "pmidai",
    "page",
];

/// Search text variants of a facet, by scope.
pub type SearchStrings = BTreeMap<Scope, Vec<String>>;

/// Structured facet id.
///
/// Rendered as `group[.topic[.subtopic[.subsubtopic]]]`. A finer level is only ever set when all
/// coarser levels are.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FacetKey {
    pub group: String,
    pub topic: Option<u32>,
    pub subtopic: Option<u32>,
    pub subsubtopic: Option<u32>,
}

impl FacetKey {
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            topic: None,
            subtopic: None,
            subsubtopic: None,
        }
    }

    /// The key one level below this one, `None` if this is already a leaf level.
    pub fn child(&self, index: u32) -> Option<Self> {
        let mut result = self.clone();
        match (self.topic, self.subtopic, self.subsubtopic) {
            (None, _, _) => result.topic = Some(index),
            (Some(_), None, _) => result.subtopic = Some(index),
            (Some(_), Some(_), None) => result.subsubtopic = Some(index),
            _ => return None,
        }
        Some(result)
    }

    pub fn parent(&self) -> Option<Self> {
        let mut result = self.clone();
        if result.subsubtopic.take().is_some()
            || result.subtopic.take().is_some()
            || result.topic.take().is_some()
        {
            Some(result)
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.levels().count()
    }

    fn levels(&self) -> impl Iterator<Item = u32> {
        [self.topic, self.subtopic, self.subsubtopic]
            .into_iter()
            .map_while(|level| level)
    }
}

impl Display for FacetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.group)?;
        for level in self.levels() {
            write!(f, ".{level}")?;
        }
        Ok(())
    }
}

impl FromStr for FacetKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidFacetKey(s.to_string());

        let (group, levels) = tokenizer::facet_key()
            .parse(s)
            .into_output()
            .ok_or_else(invalid)?;

        let mut levels = levels
            .into_iter()
            .map(|level| level.parse::<u32>().map_err(|_| invalid()));

        Ok(Self {
            group: group.to_string(),
            topic: levels.next().transpose()?,
            subtopic: levels.next().transpose()?,
            subsubtopic: levels.next().transpose()?,
        })
    }
}

impl TryFrom<String> for FacetKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FacetKey> for String {
    fn from(value: FacetKey) -> Self {
        value.to_string()
    }
}

/// Id of a filter category, also its URL parameter name.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CategoryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub key: FacetKey,
    pub labels: BTreeMap<String, String>,
    pub order: i32,
    pub search_strings: SearchStrings,
}

impl Facet {
    /// Label for a locale, falling back to English, then any label, then the key.
    pub fn label(&self, locale: &str) -> Cow<'_, str> {
        self.labels
            .get(locale)
            .or_else(|| self.labels.get("en"))
            .or_else(|| self.labels.values().next())
            .map(|label| Cow::Borrowed(label.as_str()))
            .unwrap_or_else(|| Cow::Owned(self.key.to_string()))
    }

    pub fn search_strings(&self, scope: Scope) -> Option<&[String]> {
        self.search_strings.get(&scope).map(Vec::as_slice)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetNode {
    pub facet: Arc<Facet>,
    pub children: Vec<FacetNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCategory {
    pub id: CategoryId,
    pub labels: BTreeMap<String, String>,
    pub order: i32,
    pub choices: Vec<FacetNode>,
    index: HashMap<FacetKey, Arc<Facet>>,
}

impl FilterCategory {
    pub fn choice(&self, key: &FacetKey) -> Option<&Arc<Facet>> {
        self.index.get(key)
    }
}

/// Definition of a facet, as found in catalog sources.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetDef {
    pub id: FacetKey,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub search_strings: SearchStrings,
    #[serde(default)]
    pub children: Vec<FacetDef>,
}

impl FacetDef {
    pub fn new(id: FacetKey) -> Self {
        Self {
            id,
            labels: Default::default(),
            order: 0,
            search_strings: Default::default(),
            children: vec![],
        }
    }

    pub fn label(mut self, locale: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(locale.into(), label.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn scope<I, S>(mut self, scope: Scope, strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_strings
            .insert(scope, strings.into_iter().map(Into::into).collect());
        self
    }

    pub fn child(mut self, child: FacetDef) -> Self {
        self.children.push(child);
        self
    }
}

/// Definition of a filter category, as found in catalog sources.
#[derive(Clone, Debug, Deserialize)]
pub struct CategoryDef {
    pub id: CategoryId,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub choices: Vec<FacetDef>,
}

impl CategoryDef {
    pub fn new(id: impl Into<CategoryId>) -> Self {
        Self {
            id: id.into(),
            labels: Default::default(),
            order: 0,
            choices: vec![],
        }
    }

    pub fn label(mut self, locale: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(locale.into(), label.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn choice(mut self, choice: FacetDef) -> Self {
        self.choices.push(choice);
        self
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogBuilder {
    #[serde(default)]
    subjects: Vec<FacetDef>,
    #[serde(default)]
    filters: Vec<CategoryDef>,
}

impl CatalogBuilder {
    pub fn subject(mut self, facet: FacetDef) -> Self {
        self.subjects.push(facet);
        self
    }

    pub fn filter(mut self, category: CategoryDef) -> Self {
        self.filters.push(category);
        self
    }

    pub fn build(self) -> Result<Catalog, Error> {
        let mut subject_index = HashMap::new();
        let subjects = build_nodes(self.subjects, None, &mut subject_index)?;

        let mut filters = self
            .filters
            .into_iter()
            .map(build_category)
            .collect::<Result<Vec<_>, _>>()?;
        filters.sort_by_key(|category| category.order);

        let mut categories = IndexMap::new();
        for category in filters {
            let id = category.id.clone();
            if categories.insert(id.clone(), category).is_some() {
                return Err(Error::DuplicateCategory(id.0));
            }
        }

        Ok(Catalog {
            subjects,
            subject_index,
            filters: categories,
        })
    }
}

fn build_category(def: CategoryDef) -> Result<FilterCategory, Error> {
    if def.id.0.is_empty() || RESERVED_PARAMETERS.contains(&def.id.0.as_str()) {
        return Err(Error::ReservedCategory(def.id.0));
    }

    let mut index = HashMap::new();
    let choices = build_nodes(def.choices, None, &mut index)?;

    Ok(FilterCategory {
        id: def.id,
        labels: def.labels,
        order: def.order,
        choices,
        index,
    })
}

fn build_nodes(
    defs: Vec<FacetDef>,
    parent: Option<&FacetKey>,
    index: &mut HashMap<FacetKey, Arc<Facet>>,
) -> Result<Vec<FacetNode>, Error> {
    let mut nodes = Vec::with_capacity(defs.len());

    for def in defs {
        if let Some(parent) = parent {
            if def.id.parent().as_ref() != Some(parent) {
                return Err(Error::MisplacedFacet {
                    child: def.id,
                    parent: parent.clone(),
                });
            }
        }

        if let Some((scope, _)) = def
            .search_strings
            .iter()
            .find(|(_, strings)| strings.is_empty())
        {
            return Err(Error::EmptySearchStrings(def.id, *scope));
        }

        let facet = Arc::new(Facet {
            key: def.id.clone(),
            labels: def.labels,
            order: def.order,
            search_strings: def.search_strings,
        });

        if index.insert(def.id.clone(), facet.clone()).is_some() {
            return Err(Error::DuplicateFacet(def.id));
        }

        let children = build_nodes(def.children, Some(&def.id), index)?;
        nodes.push(FacetNode { facet, children });
    }

    nodes.sort_by_key(|node| node.facet.order);

    Ok(nodes)
}

/// The facet catalog of one locale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    subjects: Vec<FacetNode>,
    subject_index: HashMap<FacetKey, Arc<Facet>>,
    filters: IndexMap<CategoryId, FilterCategory>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Load a catalog from its JSON source.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str::<CatalogBuilder>(json)?.build()
    }

    pub fn subjects(&self) -> &[FacetNode] {
        &self.subjects
    }

    pub fn subject(&self, key: &FacetKey) -> Option<&Arc<Facet>> {
        self.subject_index.get(key)
    }

    pub fn categories(&self) -> impl Iterator<Item = &FilterCategory> {
        self.filters.values()
    }

    pub fn category(&self, id: &str) -> Option<&FilterCategory> {
        self.filters.get(id)
    }

    pub fn filter(&self, category: &str, key: &FacetKey) -> Option<&Arc<Facet>> {
        self.category(category)?.choice(key)
    }

    pub fn is_empty(&self) -> bool {
        self.subject_index.is_empty() && self.filters.is_empty()
    }
}
