//! Serialize a selection into a shareable URL query string, and back.
//!
//! Every populated subject group becomes one `subject` parameter, every populated filter category
//! one parameter named after the category. Entries are joined by `;;` and rendered as
//! `<token>#<scope code>`, where the token is either a facet key or a custom tag in double braces.
//! Scalar settings follow, and the scroll anchor goes into the fragment.
//!
//! Decoding never fails. Anything which can't be understood is dropped on its own, logged, and
//! reported as a [`Diagnostic`].

use crate::catalog::{Catalog, FacetKey};
use crate::config::CodecConfig;
use crate::error::{Diagnostic, Diagnostics};
use crate::model::{CustomTag, SelectionEntry, SelectionModel, SortMethod, SubjectGroup};
use crate::scope::Code;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in a URL component, the same set as JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PARAM_ADVANCED: &str = "advanced";
const PARAM_SORT: &str = "sort";
const PARAM_COLLAPSED: &str = "collapsed";
const PARAM_PAGE_SIZE: &str = "pageSize";
const PARAM_AI_PMIDS: &str = "pmidai";

/// Where an entry token appears. Custom tags only carry their translated flag in subjects.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Context {
    Subject,
    Filter,
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

#[derive(Clone, Debug, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode(&self, model: &SelectionModel) -> String {
        let mut params = Vec::new();

        for group in model.populated_groups() {
            params.push(self.param(
                &self.config.subject_param,
                &self.entries(group, Context::Subject),
            ));
        }

        for (category, entries) in model.filters.populated() {
            params.push(self.param(category.as_ref(), &self.entries(entries, Context::Filter)));
        }

        params.push(self.param(PARAM_ADVANCED, &model.advanced.to_string()));
        params.push(self.param(PARAM_SORT, model.sort.code()));
        params.push(self.param(PARAM_COLLAPSED, &model.collapsed.to_string()));
        params.push(self.param(PARAM_PAGE_SIZE, &model.page_size.to_string()));
        params.push(self.param(
            PARAM_AI_PMIDS,
            &model
                .ai_pmids
                .iter()
                .filter(|pmid| !pmid.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(&self.config.entry_separator),
        ));

        let mut result = params.join("&");
        if let Some(anchor) = model.anchor.as_deref().filter(|anchor| !anchor.is_empty()) {
            result.push('#');
            result.push_str(&encode_component(anchor));
        }

        result
    }

    fn param(&self, name: &str, value: &str) -> String {
        format!("{}={}", encode_component(name), encode_component(value))
    }

    fn entries(&self, entries: &[SelectionEntry], context: Context) -> String {
        entries
            .iter()
            .map(|entry| self.entry(entry, context))
            .collect::<Vec<_>>()
            .join(&self.config.entry_separator)
    }

    fn entry(&self, entry: &SelectionEntry, context: Context) -> String {
        let token = match entry {
            SelectionEntry::Facet(selection) => selection.facet.key.to_string(),
            SelectionEntry::Custom(tag) => {
                let mut token = String::with_capacity(tag.name.len() + 6);
                token.push_str("{{");
                token.push_str(&tag.name);
                if context == Context::Subject {
                    token.push(' ');
                    token.push(if tag.translated { '1' } else { '0' });
                }
                token.push_str("}}");
                token
            }
        };

        format!("{token}#{}", self.config.scope_codes.code(entry.scope()))
    }

    pub fn decode(&self, query: &str, catalog: &Catalog) -> SelectionModel {
        self.decode_with_diagnostics(query, catalog).0
    }

    pub fn decode_with_diagnostics(
        &self,
        query: &str,
        catalog: &Catalog,
    ) -> (SelectionModel, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::default();
        let mut model = SelectionModel {
            page_size: self.config.default_page_size,
            ..Default::default()
        };

        if catalog.is_empty() {
            log::warn!("Empty catalog, ignoring URL state");
            return (model, diagnostics.into_inner());
        }

        let query = query.strip_prefix('?').unwrap_or(query);
        let query = match query.split_once('#') {
            Some((query, anchor)) => {
                if !anchor.is_empty() {
                    model.anchor = Some(decode_component(anchor));
                }
                query
            }
            None => query,
        };

        for piece in query.split('&').filter(|piece| !piece.is_empty()) {
            let (raw_name, raw_value) = piece.split_once('=').unwrap_or((piece, ""));
            let name = decode_component(raw_name);
            let value = decode_component(raw_value);

            match name.as_str() {
                name if name == self.config.subject_param => {
                    let group = SubjectGroup(self.decode_entries(
                        name,
                        &value,
                        Context::Subject,
                        catalog,
                        &mut diagnostics,
                    ));
                    if !group.is_empty() {
                        model.subject_groups.push(group);
                    }
                }
                PARAM_ADVANCED => {
                    if let Some(value) = scalar(&name, &value, parse_bool, &mut diagnostics) {
                        model.advanced = value;
                    }
                }
                PARAM_COLLAPSED => {
                    if let Some(value) = scalar(&name, &value, parse_bool, &mut diagnostics) {
                        model.collapsed = value;
                    }
                }
                PARAM_SORT => {
                    if let Some(value) =
                        scalar(&name, &value, SortMethod::from_code, &mut diagnostics)
                    {
                        model.sort = value;
                    }
                }
                PARAM_PAGE_SIZE => {
                    let page_size = |value: &str| value.parse::<usize>().ok().filter(|v| *v > 0);
                    if let Some(value) = scalar(&name, &value, page_size, &mut diagnostics) {
                        model.page_size = value;
                    }
                }
                PARAM_AI_PMIDS => {
                    model.ai_pmids = value
                        .split(self.config.entry_separator.as_str())
                        .filter(|pmid| !pmid.is_empty())
                        .map(ToString::to_string)
                        .collect();
                }
                name => match catalog.category(name) {
                    Some(category) => {
                        let entries = self.decode_entries(
                            name,
                            &value,
                            Context::Filter,
                            catalog,
                            &mut diagnostics,
                        );
                        if !entries.is_empty() {
                            model
                                .filters
                                .entry(category.id.clone())
                                .or_default()
                                .extend(entries);
                        }
                    }
                    None => diagnostics.push(Diagnostic::UnknownParameter {
                        name: name.to_string(),
                    }),
                },
            }
        }

        (model, diagnostics.into_inner())
    }

    fn decode_entries(
        &self,
        parameter: &str,
        value: &str,
        context: Context,
        catalog: &Catalog,
        diagnostics: &mut Diagnostics,
    ) -> Vec<SelectionEntry> {
        value
            .split(self.config.entry_separator.as_str())
            .filter(|fragment| !fragment.is_empty())
            .filter_map(|fragment| {
                self.decode_entry(parameter, fragment, context, catalog, diagnostics)
            })
            .collect()
    }

    fn decode_entry(
        &self,
        parameter: &str,
        fragment: &str,
        context: Context,
        catalog: &Catalog,
        diagnostics: &mut Diagnostics,
    ) -> Option<SelectionEntry> {
        let unparsable = || Diagnostic::UnparsableUrlFragment {
            parameter: parameter.to_string(),
            fragment: fragment.to_string(),
        };

        let Some((token, code)) = fragment.rsplit_once('#') else {
            diagnostics.push(unparsable());
            return None;
        };

        let Some(scope) = self.config.scope_codes.scope(code) else {
            diagnostics.push(Diagnostic::UnknownScopeCode {
                parameter: parameter.to_string(),
                code: code.to_string(),
            });
            return None;
        };

        if let Some(inner) = token
            .strip_prefix("{{")
            .and_then(|token| token.strip_suffix("}}"))
        {
            let tag = custom_tag(inner, context);
            if tag.name.is_empty() {
                diagnostics.push(unparsable());
                return None;
            }
            return Some(SelectionEntry::custom(tag).with_scope(scope));
        }

        let unresolvable = || Diagnostic::UnresolvableUrlToken {
            parameter: parameter.to_string(),
            token: token.to_string(),
        };

        let Ok(key) = token.parse::<FacetKey>() else {
            diagnostics.push(unresolvable());
            return None;
        };

        let facet = match context {
            Context::Subject => catalog.subject(&key),
            Context::Filter => catalog.filter(parameter, &key),
        };

        match facet {
            Some(facet) => Some(SelectionEntry::facet(facet.clone(), scope)),
            None => {
                diagnostics.push(unresolvable());
                None
            }
        }
    }
}

/// Parse the inside of a `{{...}}` token.
fn custom_tag(inner: &str, context: Context) -> CustomTag {
    if context == Context::Subject {
        if let Some(name) = inner.strip_suffix(" 1") {
            return CustomTag {
                translated: true,
                ..CustomTag::new(name)
            };
        }
        if let Some(name) = inner.strip_suffix(" 0") {
            return CustomTag::new(name);
        }
    }

    CustomTag::new(inner)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn scalar<T>(
    parameter: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
    diagnostics: &mut Diagnostics,
) -> Option<T> {
    let result = parse(value);
    if result.is_none() {
        diagnostics.push(Diagnostic::InvalidScalar {
            parameter: parameter.to_string(),
            value: value.to_string(),
        });
    }
    result
}

/// Encode using the default configuration.
pub fn encode(model: &SelectionModel) -> String {
    Codec::default().encode(model)
}

/// Decode using the default configuration.
pub fn decode(query: &str, catalog: &Catalog) -> SelectionModel {
    Codec::default().decode(query, catalog)
}
