use pretty_assertions::assert_eq;

include!("fixture.rs");

#[test]
fn test_decode_empty() {
    assert_eq!(decode("", &catalog()), SelectionModel::default());
}

#[test]
fn test_encode() {
    let catalog = catalog();
    let mut model = SelectionModel {
        advanced: true,
        sort: SortMethod::MostRecent,
        page_size: 50,
        ..Default::default()
    };
    model.push_subject(0, subject(&catalog, "onc", Scope::Broad));
    model.push_subject(0, subject(&catalog, "onc.1", Scope::Normal));
    model.push_subject(1, subject(&catalog, "dia", Scope::Narrow));
    model.add_filter("language", filter(&catalog, "language", "lang.2"));

    assert_eq!(
        encode(&model),
        "subject=onc%23b%3B%3Bonc.1%23s&subject=dia%23n&language=lang.2%23s\
         &advanced=true&sort=date&collapsed=false&pageSize=50&pmidai="
    );
}

#[test]
fn test_decode() {
    let catalog = catalog();
    let model = decode(
        "?subject=onc%23b%3B%3Bonc.1%23s&subject=dia%23n&language=lang.2%23s\
         &advanced=true&sort=date&collapsed=true&pageSize=50&pmidai=1%3B%3B2",
        &catalog,
    );

    let mut expected = SelectionModel {
        advanced: true,
        collapsed: true,
        sort: SortMethod::MostRecent,
        page_size: 50,
        ai_pmids: vec!["1".into(), "2".into()],
        ..Default::default()
    };
    expected.push_subject(0, subject(&catalog, "onc", Scope::Broad));
    expected.push_subject(0, subject(&catalog, "onc.1", Scope::Normal));
    expected.push_subject(1, subject(&catalog, "dia", Scope::Narrow));
    expected.add_filter("language", filter(&catalog, "language", "lang.2"));

    assert_eq!(model, expected);
}

#[test]
fn test_unescaped_separators() {
    let catalog = catalog();
    let model = decode("subject=onc#b;;dia#s", &catalog);

    // a raw '#' starts the fragment
    assert_eq!(model.anchor.as_deref(), Some("b;;dia#s"));
    assert!(model.subject_groups.is_empty());

    let model = decode("subject=onc%23b;;dia%23s", &catalog);
    assert_eq!(model.subject_groups[0].len(), 2);
}

#[test]
fn test_custom_tag_round_trip() {
    let catalog = catalog();
    let mut model = SelectionModel::default();
    model.push_subject(0, SelectionEntry::custom(CustomTag::new("diabetes type 2")));

    let encoded = encode(&model);
    assert!(encoded.starts_with("subject=%7B%7Bdiabetes%20type%202%200%7D%7D%23s&"));

    let decoded = decode(&encoded, &catalog);
    assert_eq!(
        decoded.subject_groups[0][0],
        SelectionEntry::custom(CustomTag::new("diabetes type 2"))
    );
}

#[test]
fn test_translated_custom_tag() {
    let catalog = catalog();
    let mut model = SelectionModel::default();
    model.push_subject(
        0,
        SelectionEntry::custom(CustomTag::translated("heart attack", "hjärtinfarkt")),
    );

    let decoded = decode(&encode(&model), &catalog);
    let SelectionEntry::Custom(tag) = &decoded.subject_groups[0][0] else {
        panic!("must be a custom tag");
    };
    assert_eq!(tag.name, "heart attack");
    assert!(tag.translated);
    // only the translated text travels in the URL
    assert_eq!(tag.pre_translation, None);
}

#[test]
fn test_partial_parse() {
    let catalog = catalog();
    let (model, diagnostics) = Codec::default().decode_with_diagnostics(
        "subject=onc%23s%3B%3Bdia&subject=a%23s&advanced=true&language=lang.1%23s",
        &catalog,
    );

    let mut expected = SelectionModel {
        advanced: true,
        ..Default::default()
    };
    expected.push_subject(0, subject(&catalog, "onc", Scope::Normal));
    expected.push_subject(1, subject(&catalog, "a", Scope::Normal));
    expected.add_filter("language", filter(&catalog, "language", "lang.1"));

    assert_eq!(model, expected);
    assert_eq!(
        diagnostics,
        vec![Diagnostic::UnparsableUrlFragment {
            parameter: "subject".into(),
            fragment: "dia".into(),
        }]
    );
}

#[test]
fn test_stale_id() {
    let catalog = catalog();
    let (model, diagnostics) = Codec::default()
        .decode_with_diagnostics("subject=onc.9%23s%3B%3Ba%23s&subject=xyz%23s", &catalog);

    let mut expected = SelectionModel::default();
    expected.push_subject(0, subject(&catalog, "a", Scope::Normal));

    assert_eq!(model, expected);
    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::UnresolvableUrlToken {
                parameter: "subject".into(),
                token: "onc.9".into(),
            },
            Diagnostic::UnresolvableUrlToken {
                parameter: "subject".into(),
                token: "xyz".into(),
            },
        ]
    );
}

#[test]
fn test_unknown_parameters_ignored() {
    let catalog = catalog();
    let model = decode("fbclid=abc&species=human%23s&sort=pubdate", &catalog);

    assert_eq!(
        model,
        SelectionModel {
            sort: SortMethod::PublicationDate,
            ..Default::default()
        }
    );
}

#[test]
fn test_encode_idempotent() {
    let catalog = catalog();
    let mut model = SelectionModel::default();
    model.push_subject(0, subject(&catalog, "onc", Scope::Broad));
    model.add_filter("age", filter(&catalog, "age", "age.1"));

    assert_eq!(encode(&model), encode(&model));
}

#[test]
fn test_repeated_filter_parameter_appends() {
    let catalog = catalog();
    let model = decode("language=lang.1%23s&advanced=true&language=lang.2%23s", &catalog);

    let mut expected = SelectionModel {
        advanced: true,
        ..Default::default()
    };
    expected.add_filter("language", filter(&catalog, "language", "lang.1"));
    expected.add_filter("language", filter(&catalog, "language", "lang.2"));

    assert_eq!(model, expected);
    assert_eq!(model.filters.len(), 1);
    assert_eq!(
        encode(&model),
        "language=lang.1%23s%3B%3Blang.2%23s&advanced=true&sort=relevance&collapsed=false\
         &pageSize=10&pmidai="
    );
}

#[test]
fn test_empty_anchor_and_pmids_round_trip() {
    let model = SelectionModel {
        ai_pmids: vec!["".into(), "1".into()],
        anchor: Some("".into()),
        ..Default::default()
    };

    let encoded = encode(&model);
    assert_eq!(
        encoded,
        "advanced=false&sort=relevance&collapsed=false&pageSize=10&pmidai=1"
    );
    assert_eq!(encode(&decode(&encoded, &catalog())), encoded);
}
