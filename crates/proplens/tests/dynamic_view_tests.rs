//! End-to-end tests for dictionary-style views.
//!
//! Exercises the whole pipeline: descriptor enumeration, accessor
//! compilation, per-type table caching, zero-value substitution, and the
//! DynamicView/TypedView facades.
//!
//! # Running Tests
//! ```bash
//! cargo test --test dynamic_view_tests
//! ```

use std::any::TypeId;
use std::sync::Arc;

use proplens::{
    reflectable, DynamicView, TypeAccessorCache, TypedView, ViewError,
};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: i32,
}

reflectable! {
    Person {
        name: String,
        age: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Grade {
    points: u8,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}pt", self.points)
    }
}

struct Report {
    title: String,
    grade: Grade,
    published: bool,
}

reflectable! {
    Report {
        title: String,
        grade: Grade,
        published: bool,
    }
}

fn ada() -> Person {
    Person {
        name: "Ada".to_string(),
        age: 36,
    }
}

// ===== Table caching =====

#[test]
fn table_count_matches_property_count() {
    let cache = TypeAccessorCache::new();
    let table = cache.table_for(&ada()).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.type_id(), TypeId::of::<Person>());
}

#[test]
fn repeated_lookups_share_one_table() {
    let cache = TypeAccessorCache::new();

    let first = cache.table_for(&ada()).unwrap();
    let second = cache.table_for(&ada()).unwrap();
    let third = cache
        .table_for(&Person {
            name: "Grace".to_string(),
            age: 49,
        })
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(cache.len(), 1);
}

#[test]
fn concurrent_first_use_publishes_a_single_table() {
    let cache = Arc::new(TypeAccessorCache::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                let view = DynamicView::wrap_in(&cache, ada(), true).unwrap();
                assert_eq!(view.get_as::<i32>("age").unwrap(), 36);
                Arc::as_ptr(&cache.table_for(&ada()).unwrap()) as usize
            })
        })
        .collect();

    let pointers: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(pointers.iter().all(|&p| p == pointers[0]));
    assert_eq!(cache.len(), 1);
}

#[test]
fn views_of_distinct_types_get_distinct_tables() {
    let cache = TypeAccessorCache::new();

    cache.table_for(&ada()).unwrap();
    cache
        .table_for(&Report {
            title: "Thesis".to_string(),
            grade: Grade { points: 97 },
            published: false,
        })
        .unwrap();

    assert_eq!(cache.len(), 2);
}

// ===== Throwing policy =====

#[test]
fn throwing_view_names_the_missing_member() {
    let cache = TypeAccessorCache::new();
    let view = DynamicView::wrap_in(&cache, ada(), true).unwrap();

    assert_eq!(view.get_as::<String>("name").unwrap(), "Ada");
    assert_eq!(view.get_as::<i32>("age").unwrap(), 36);

    let Err(err) = view.get("Missing") else {
        panic!("expected a missing-member failure");
    };
    match err {
        ViewError::MissingMember { member, .. } => assert_eq!(member, "Missing"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lenient_view_absorbs_missing_members() {
    let cache = TypeAccessorCache::new();
    let mut view = DynamicView::wrap_in(&cache, ada(), false).unwrap();

    assert!(view.get("Missing").unwrap().is_none());
    view.set("Missing", Some(Box::new(1i32))).unwrap();

    view.set("age", None).unwrap();
    assert_eq!(view.get_as::<i32>("age").unwrap(), 0);
}

#[test]
fn absent_assignment_uses_registered_zero_values() {
    let cache = TypeAccessorCache::new();
    let report = Report {
        title: "Thesis".to_string(),
        grade: Grade { points: 97 },
        published: true,
    };
    let mut view = DynamicView::wrap_in(&cache, report, true).unwrap();

    // Grade is not a well-known primitive; its factory was captured during
    // the table build.
    view.set("grade", None).unwrap();
    view.set("published", None).unwrap();

    assert_eq!(view.get_as::<Grade>("grade").unwrap(), Grade::default());
    assert!(!view.get_as::<bool>("published").unwrap());
    assert_eq!(cache.defaults().registered(), 1);
}

// ===== Positional access =====

#[test]
fn positional_access_matches_name_access() {
    let cache = TypeAccessorCache::new();
    let view = DynamicView::wrap_in(&cache, ada(), true).unwrap();

    let keys: Vec<_> = view.keys().collect();
    for (position, key) in keys.iter().enumerate() {
        let (name, _) = view.at(position).unwrap().unwrap();
        assert_eq!(name, *key);
    }

    let (name, value) = view.at(0).unwrap().unwrap();
    assert_eq!(name, "name");
    assert_eq!(*value.unwrap().downcast::<String>().unwrap(), "Ada");

    let (name, value) = view.at(1).unwrap().unwrap();
    assert_eq!(name, "age");
    assert_eq!(*value.unwrap().downcast::<i32>().unwrap(), 36);
}

#[test]
fn positional_access_out_of_range() {
    let cache = TypeAccessorCache::new();
    let view = DynamicView::wrap_in(&cache, ada(), true).unwrap();
    let Err(err) = view.at(99) else {
        panic!("expected an out-of-range failure");
    };
    assert!(matches!(err, ViewError::IndexOutOfRange { index: 99, len: 2, .. }));

    let view = DynamicView::wrap_in(&cache, ada(), false).unwrap();
    assert!(view.at(99).unwrap().is_none());
}

// ===== Wrap invariants =====

#[test]
fn wrapping_a_view_always_fails() {
    let cache = TypeAccessorCache::new();

    let strict = DynamicView::wrap_in(&cache, ada(), true).unwrap();
    let Err(err) = DynamicView::wrap(strict) else {
        panic!("expected AlreadyWrapped");
    };
    assert_eq!(err, ViewError::AlreadyWrapped);

    let lenient = DynamicView::wrap_in(&cache, ada(), false).unwrap();
    let Err(err) = DynamicView::wrap_with(lenient, false) else {
        panic!("expected AlreadyWrapped");
    };
    assert_eq!(err, ViewError::AlreadyWrapped);

    let typed = TypedView::wrap_in(&cache, ada(), true).unwrap();
    let Err(err) = DynamicView::wrap(typed) else {
        panic!("expected AlreadyWrapped");
    };
    assert_eq!(err, ViewError::AlreadyWrapped);
}

// ===== Rendering =====

#[test]
fn render_lists_type_name_then_each_property() {
    let cache = TypeAccessorCache::new();
    let view = DynamicView::wrap_in(&cache, ada(), true).unwrap();
    let rendered = view.render();

    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines[0], "Person");
    assert!(lines.contains(&"name: Ada"));
    assert!(lines.contains(&"age: 36"));
}

#[test]
fn render_uses_display_for_custom_value_types() {
    let cache = TypeAccessorCache::new();
    let report = Report {
        title: "Thesis".to_string(),
        grade: Grade { points: 97 },
        published: true,
    };
    let view = DynamicView::wrap_in(&cache, report, true).unwrap();

    let rendered = view.render();
    assert!(rendered.contains("grade: 97pt"));
    assert!(rendered.contains("published: true"));
}

// ===== Typed views =====

#[test]
fn typed_view_unwraps_to_static_type() {
    let cache = TypeAccessorCache::new();
    let mut typed = TypedView::wrap_in(&cache, ada(), true).unwrap();

    typed.set_as::<i32>("age", Some(37)).unwrap();
    typed.set("name", Some(Box::new("Lovelace".to_string()))).unwrap();

    let person = typed.into_instance();
    assert_eq!(
        person,
        Person {
            name: "Lovelace".to_string(),
            age: 37,
        }
    );
}

#[test]
fn typed_view_exposes_dynamic_operations() {
    let cache = TypeAccessorCache::new();
    let typed = TypedView::wrap_in(&cache, ada(), true).unwrap();

    assert_eq!(typed.len(), 2);
    assert!(typed.contains_key("name"));
    assert_eq!(typed.typed_ref().age, 36);

    let entries: Vec<_> = typed.iter().map(|(name, _)| name).collect();
    assert_eq!(entries, vec!["name", "age"]);
}
