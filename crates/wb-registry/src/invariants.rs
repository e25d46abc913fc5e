//! Property tests for the diff/patch laws, run against every built-in type
//! through the registry.

use std::sync::Arc;

use proptest::prelude::*;
use proptest::sample::select;
use wb_diff::PatchMode;
use wb_model::{
    DataValue, EntityDocument, Item, OneString, PhraseDocument, Property, Rank, SiteLink, Snak,
    Statement,
};
use wb_types::{Fingerprint, ItemId, PropertyId};

use crate::registry::EntityTypeRegistry;
use crate::services::{EntityDiffer, EntityPatcher};

static LANGUAGES: [&str; 3] = ["en", "de", "fr"];
static SITES: [&str; 3] = ["enwiki", "dewiki", "frwiki"];

fn fingerprint() -> impl Strategy<Value = Fingerprint> {
    let terms = || prop::collection::btree_map(select(&LANGUAGES[..]), "[a-c]{0,2}", 0..3);
    let aliases = prop::collection::btree_map(
        select(&LANGUAGES[..]),
        prop::collection::vec("[a-c]{1,2}", 0..3),
        0..3,
    );
    (terms(), terms(), aliases).prop_map(|(labels, descriptions, aliases)| {
        let mut fingerprint = Fingerprint::default();
        for (language, text) in labels {
            fingerprint.set_label(language, &text).unwrap();
        }
        for (language, text) in descriptions {
            fingerprint.set_description(language, &text).unwrap();
        }
        for (language, group) in aliases {
            fingerprint.set_aliases(language, group).unwrap();
        }
        fingerprint
    })
}

fn statements() -> impl Strategy<Value = Vec<Statement>> {
    let ranks = vec![Rank::Deprecated, Rank::Normal, Rank::Preferred];
    let keyed = prop::collection::btree_map("[A-D]", (1u64..4, "[a-c]{1,2}", select(ranks)), 0..4)
        .prop_map(|by_guid| {
            by_guid
                .into_iter()
                .map(|(guid, (property, value, rank))| {
                    value_statement(property, value)
                        .with_guid(format!("Q1${guid}"))
                        .with_rank(rank)
                })
                .collect::<Vec<_>>()
        });
    // Distinct within one entity, so a statement kept on both sides matches itself.
    let unkeyed = prop::collection::btree_set((1u64..4, "[a-c]{1,2}"), 0..3).prop_map(|set| {
        set.into_iter()
            .map(|(property, value)| value_statement(property, value))
            .collect::<Vec<_>>()
    });
    (keyed, unkeyed).prop_map(|(mut keyed, unkeyed)| {
        keyed.extend(unkeyed);
        keyed
    })
}

fn value_statement(property: u64, value: String) -> Statement {
    Statement::new(Snak::Value {
        property: PropertyId::new(property).unwrap(),
        datavalue: DataValue::string(value),
    })
}

fn sitelinks() -> impl Strategy<Value = Vec<SiteLink>> {
    prop::collection::btree_map(
        select(&SITES[..]),
        ("[A-C][a-c]{0,2}", prop::collection::vec(1u64..4, 0..3)),
        0..3,
    )
    .prop_map(|links| {
        links
            .into_iter()
            .map(|(site, (page, badges))| {
                SiteLink::new(site, page, badges.into_iter().map(|n| ItemId::new(n).unwrap()))
                    .unwrap()
            })
            .collect()
    })
}

fn item() -> impl Strategy<Value = Item> {
    (fingerprint(), statements(), sitelinks()).prop_map(|(fingerprint, statements, sitelinks)| {
        let mut item = Item::default();
        item.fingerprint = fingerprint;
        item.statements = statements.into_iter().collect();
        item.sitelinks = sitelinks.into_iter().collect();
        item
    })
}

fn property() -> impl Strategy<Value = Property> {
    (fingerprint(), statements(), select(vec!["string", "url"])).prop_map(
        |(fingerprint, statements, data_type)| {
            let mut property = Property::new(None, data_type);
            property.fingerprint = fingerprint;
            property.statements = statements.into_iter().collect();
            property
        },
    )
}

fn one_string() -> impl Strategy<Value = OneString> {
    ("[a-c]{0,3}", fingerprint()).prop_map(|(content, fingerprint)| {
        let mut entity = OneString::new(None, content);
        entity.fingerprint = fingerprint;
        entity
    })
}

fn phrase() -> impl Strategy<Value = PhraseDocument> {
    (select(&LANGUAGES[..]), "[a-c]{0,3}")
        .prop_map(|(language, phrase)| PhraseDocument::new(None, language, phrase).unwrap())
}

fn check_laws(a: &dyn EntityDocument, b: &dyn EntityDocument) -> Result<(), TestCaseError> {
    let registry = Arc::new(EntityTypeRegistry::with_builtin_types());
    let differ = EntityDiffer::new(registry.clone());
    let patcher = EntityPatcher::new(registry.clone());

    prop_assert!(differ.diff_entities(a, a).unwrap().is_empty());

    let diff = differ.diff_entities(a, b).unwrap();
    prop_assert_eq!(diff.is_empty(), a.equals(b));

    let patched = patcher.apply(a, &diff, PatchMode::Strict).unwrap();
    prop_assert!(patched.equals(b), "strict patch of {:?} gave {:?}", a, patched);

    let forced = patcher.apply(b, &diff, PatchMode::Force).unwrap();
    prop_assert!(forced.equals(b), "force patch is not idempotent: {:?}", forced);

    let once = patcher.apply(a, &diff, PatchMode::Force).unwrap();
    let twice = patcher.apply(once.as_ref(), &diff, PatchMode::Force).unwrap();
    prop_assert!(once.equals(b), "force patch of {:?} gave {:?}", a, once);
    prop_assert!(twice.equals(once.as_ref()), "second force patch gave {:?}", twice);

    let empty = registry.new_document(b.entity_type()).unwrap();
    prop_assert_eq!(
        differ.construction_diff(b).unwrap(),
        differ.diff_entities(empty.as_ref(), b).unwrap()
    );

    let round_trip = registry.deserialize(&registry.serialize(b).unwrap()).unwrap();
    prop_assert!(round_trip.equals(b));

    if !b.is_empty() {
        let destruction = differ.destruction_diff(b).unwrap();
        let destroyed = patcher.apply(b, &destruction, PatchMode::Strict).unwrap();
        prop_assert!(destroyed.is_empty());
        prop_assert!(patcher
            .apply(destroyed.as_ref(), &destruction, PatchMode::Strict)
            .is_err());
    }
    Ok(())
}

proptest! {
    #[test]
    fn item_laws(a in item(), b in item()) {
        check_laws(&a, &b)?;
    }

    #[test]
    fn property_laws(a in property(), b in property()) {
        check_laws(&a, &b)?;
    }

    #[test]
    fn one_string_laws(a in one_string(), b in one_string()) {
        check_laws(&a, &b)?;
    }

    #[test]
    fn phrase_laws(a in phrase(), b in phrase()) {
        check_laws(&a, &b)?;
    }
}
