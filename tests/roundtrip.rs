use proptest::prelude::*;

include!("fixture.rs");

const SUBJECTS: &[&str] = &["onc", "onc.1", "dia", "a", "b"];
const LANGUAGES: &[&str] = &["lang.1", "lang.2"];

#[derive(Clone, Debug)]
enum EntrySpec {
    Facet(&'static str, Scope),
    Custom(String, bool, Scope),
}

#[derive(Clone, Debug)]
struct ModelSpec {
    groups: Vec<Vec<EntrySpec>>,
    languages: Vec<EntrySpec>,
    ages: Vec<EntrySpec>,
    advanced: bool,
    collapsed: bool,
    sort: SortMethod,
    page_size: usize,
    ai_pmids: Vec<String>,
    anchor: Option<String>,
}

impl ModelSpec {
    fn build(&self, catalog: &Catalog) -> SelectionModel {
        let mut model = SelectionModel {
            advanced: self.advanced,
            collapsed: self.collapsed,
            sort: self.sort,
            page_size: self.page_size,
            ai_pmids: self.ai_pmids.clone(),
            anchor: self.anchor.clone(),
            ..Default::default()
        };

        for (index, group) in self.groups.iter().enumerate() {
            for entry in group {
                model.push_subject(index, entry.build(|key| catalog.subject(key)));
            }
        }
        for entry in &self.languages {
            model.add_filter(
                "language",
                entry.build(|key| catalog.filter("language", key)),
            );
        }
        for entry in &self.ages {
            model.add_filter("age", entry.build(|key| catalog.filter("age", key)));
        }

        model
    }
}

impl EntrySpec {
    fn build<'c>(
        &self,
        lookup: impl Fn(&FacetKey) -> Option<&'c std::sync::Arc<Facet>>,
    ) -> SelectionEntry {
        match self {
            Self::Facet(key, scope) => {
                let facet = lookup(&key.parse().unwrap()).unwrap();
                SelectionEntry::facet(facet.clone(), *scope)
            }
            Self::Custom(name, translated, scope) => SelectionEntry::custom(CustomTag {
                translated: *translated,
                ..CustomTag::new(name.clone())
            })
            .with_scope(*scope),
        }
    }
}

fn scope() -> impl Strategy<Value = Scope> {
    prop::sample::select(Scope::VARIANTS)
}

fn tag_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 ]{0,10}[a-z]"
}

fn subject_entry() -> impl Strategy<Value = EntrySpec> {
    prop_oneof![
        (prop::sample::select(SUBJECTS), scope())
            .prop_map(|(key, scope)| EntrySpec::Facet(key, scope)),
        (tag_name(), any::<bool>(), scope())
            .prop_map(|(name, translated, scope)| EntrySpec::Custom(name, translated, scope)),
    ]
}

/// Filter tags don't carry the translated flag.
fn filter_entry(keys: &'static [&'static str]) -> impl Strategy<Value = EntrySpec> {
    prop_oneof![
        (prop::sample::select(keys), scope())
            .prop_map(|(key, scope)| EntrySpec::Facet(key, scope)),
        (tag_name(), scope()).prop_map(|(name, scope)| EntrySpec::Custom(name, false, scope)),
    ]
}

fn model_spec() -> impl Strategy<Value = ModelSpec> {
    (
        prop::collection::vec(prop::collection::vec(subject_entry(), 1..4), 0..4),
        prop::collection::vec(filter_entry(LANGUAGES), 0..3),
        prop::collection::vec(filter_entry(&["age.1"]), 0..2),
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(SortMethod::VARIANTS),
        1usize..200,
        prop::collection::vec("[0-9]{0,8}", 0..3),
        prop::option::of("[a-z0-9-]{0,10}"),
    )
        .prop_map(
            |(groups, languages, ages, advanced, collapsed, sort, page_size, ai_pmids, anchor)| {
                ModelSpec {
                    groups,
                    languages,
                    ages,
                    advanced,
                    collapsed,
                    sort,
                    page_size,
                    ai_pmids,
                    anchor,
                }
            },
        )
}

proptest! {
    #[test]
    fn test_round_trip(spec in model_spec()) {
        let catalog = catalog();
        let model = spec.build(&catalog);

        let encoded = encode(&model);
        let decoded = decode(&encoded, &catalog);

        // empty pmids and an empty anchor are not written
        let mut expected = model.clone();
        expected.ai_pmids.retain(|pmid| !pmid.is_empty());
        expected.anchor = expected.anchor.filter(|anchor| !anchor.is_empty());

        prop_assert_eq!(&decoded, &expected);
        prop_assert_eq!(encode(&decoded), encoded);
        prop_assert_eq!(compile(&decoded), compile(&model));
    }

    #[test]
    fn test_idempotent(spec in model_spec()) {
        let catalog = catalog();
        let model = spec.build(&catalog);

        prop_assert_eq!(compile(&model), compile(&model));
        prop_assert_eq!(encode(&model), encode(&model));
    }

    #[test]
    fn test_decode_never_panics(query in "[a-z=&;#%0-9{} .]{0,40}") {
        let catalog = catalog();
        let model = decode(&query, &catalog);
        let _ = compile(&model);
    }
}
