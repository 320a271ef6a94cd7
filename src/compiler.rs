//! Compile a selection into boolean query text.
//!
//! Entries of a subject group are joined with `OR`, groups with `AND`. Filter categories follow
//! the same rules and are appended after the subjects, each prefixed with ` AND `. Catalog search
//! text is opaque, it is only scanned for the bare `AND`, `OR` and `NOT` keywords to decide on
//! parentheses.

use crate::config::{CompilerConfig, FilterGlue};
use crate::error::{Diagnostic, Diagnostics};
use crate::model::{SelectionEntry, SelectionModel};
use crate::tokenizer::has_operators;

#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

struct Resolved {
    text: String,
    operators: bool,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn compile(&self, model: &SelectionModel) -> String {
        self.compile_with_diagnostics(model).0
    }

    pub fn compile_with_diagnostics(&self, model: &SelectionModel) -> (String, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::default();

        let groups = model.populated_groups().collect::<Vec<_>>();
        let has_filters = model.filters.populated().next().is_some();
        let in_context = groups.len() > 1 || has_filters;

        let mut query = groups
            .into_iter()
            .filter_map(|group| self.contribution(group, in_context, &mut diagnostics))
            .collect::<Vec<_>>()
            .join(" AND ");

        for (category, entries) in model.filters.populated() {
            let Some(text) = self.contribution(entries, true, &mut diagnostics) else {
                log::trace!("Filter category {category} contributes nothing");
                continue;
            };

            match self.config.filter_glue {
                FilterGlue::Unconditional => query.push_str(" AND "),
                FilterGlue::BetweenTerms if !query.is_empty() => query.push_str(" AND "),
                FilterGlue::BetweenTerms => {}
            }
            query.push_str(&text);
        }

        (query, diagnostics.into_inner())
    }

    /// Text of one OR-combined set of entries, `None` if it degenerates to nothing.
    ///
    /// `in_context` is true when the result gets combined with other contributions, in which case
    /// operator bearing text is always wrapped.
    fn contribution(
        &self,
        entries: &[SelectionEntry],
        in_context: bool,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        let resolved = entries
            .iter()
            .filter_map(|entry| self.resolve(entry, diagnostics))
            .collect::<Vec<_>>();

        let multiple = resolved.len() > 1;

        let text = resolved
            .iter()
            .map(|resolved| match resolved.operators && multiple {
                true => format!("({})", resolved.text),
                false => resolved.text.clone(),
            })
            .collect::<Vec<_>>()
            .join(" OR ");

        let wrap = multiple || (in_context && resolved.iter().any(|r| r.operators));
        let text = match wrap {
            true => format!("({text})"),
            false => text,
        };

        match text.as_str() {
            "" | "()" => None,
            _ => Some(text),
        }
    }

    fn resolve(&self, entry: &SelectionEntry, diagnostics: &mut Diagnostics) -> Option<Resolved> {
        let fragments = entry
            .search_strings()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|fragment| !fragment.trim().is_empty())
            .collect::<Vec<_>>();

        match fragments.first() {
            Some(first) => Some(Resolved {
                operators: has_operators(first),
                text: fragments.join(" OR "),
            }),
            None => {
                diagnostics.push(Diagnostic::MalformedSelectionEntry {
                    entry: entry.describe(),
                    scope: entry.scope(),
                });
                None
            }
        }
    }
}

/// Compile using the default configuration.
pub fn compile(model: &SelectionModel) -> String {
    Compiler::default().compile(model)
}
