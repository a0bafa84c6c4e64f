//! Property tests for data entry and collection editing.

use std::sync::Arc;

use hospnet_model::{CollectionItem, FieldKind, FieldModel, FieldValue};
use hospnet_wizard::{StepDefinition, WizardDefinition, WizardEngine};
use proptest::prelude::*;

const FIELDS: [&str; 4] = ["a", "b", "c", "d"];

fn definition() -> Arc<WizardDefinition> {
    let step = FIELDS.iter().fold(StepDefinition::new(0, "only"), |step, name| {
        step.field(FieldModel::optional(*name, FieldKind::Text).unwrap())
    });
    Arc::new(
        WizardDefinition::builder("props")
            .step(step.field(FieldModel::optional("items", FieldKind::Collection).unwrap()))
            .build()
            .unwrap(),
    )
}

fn keys() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-e]", 0..5).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #[test]
    fn distinct_fields_commute(
        i in 0usize..4,
        j in 0usize..4,
        x in "[a-z]{0,6}",
        y in "[a-z]{0,6}",
    ) {
        prop_assume!(i != j);
        let definition = definition();
        let mut first = WizardEngine::new(definition.clone());
        first.set_field(FIELDS[i], x.as_str()).unwrap();
        first.set_field(FIELDS[j], y.as_str()).unwrap();

        let mut second = WizardEngine::new(definition);
        second.set_field(FIELDS[j], y.as_str()).unwrap();
        second.set_field(FIELDS[i], x.as_str()).unwrap();

        prop_assert_eq!(first.data(), second.data());
    }

    #[test]
    fn duplicate_add_leaves_collection_unchanged(keys in keys(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!keys.is_empty());
        let mut engine = WizardEngine::new(definition());
        engine.with_collection("items", |editor| {
            for key in &keys {
                editor.add(CollectionItem::new(key.as_str()).with("n", "1"));
            }
        }).unwrap();
        let before = engine.data().items("items").to_vec();

        let duplicate = pick.get(&keys).clone();
        let added = engine
            .with_collection("items", |editor| editor.add(CollectionItem::new(duplicate).with("n", "2")))
            .unwrap();

        prop_assert!(!added);
        prop_assert_eq!(engine.data().items("items"), before.as_slice());
    }

    #[test]
    fn non_permutation_reorder_is_rejected(keys in keys(), order in prop::collection::vec("[a-f]", 0..6)) {
        let mut sorted = order.clone();
        sorted.sort();
        let mut current = keys.clone();
        current.sort();
        prop_assume!(sorted != current);

        let mut engine = WizardEngine::new(definition());
        let reordered = engine.with_collection("items", |editor| {
            for key in &keys {
                editor.add(CollectionItem::new(key.as_str()));
            }
            editor.reorder(order.as_slice())
        }).unwrap();

        prop_assert!(!reordered);
        let stored: Vec<&str> = engine.data().items("items").iter().map(|i| i.key.as_str()).collect();
        prop_assert_eq!(stored, keys.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert!(matches!(engine.data().get("a"), Some(FieldValue::Text(_))));
    }
}
