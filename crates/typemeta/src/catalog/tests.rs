// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::error::{CatalogError, Result};
use crate::model::{FieldDef, MethodBody, MethodDef, Tag, TagTargets, TypeDefBuilder, Visibility};
use crate::object::DynamicObject;
use crate::registry::HashMapTypeRegistry;
use crate::types::{RawType, TypeExpr};
use crate::value::Value;
use std::sync::Arc;

fn label(text: &str) -> Tag {
    Tag::new("Label").with("text", text)
}

fn label_text(property: &PropertyDescriptor) -> Option<String> {
    property
        .tag(&"Label".into())
        .and_then(|t| t.get("text"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn base_registry() -> HashMapTypeRegistry {
    let mut reg = HashMapTypeRegistry::with_builtins();
    let member = TagTargets::FIELD | TagTargets::METHOD;
    reg.register(TypeDefBuilder::tag_type("Label", member).build());
    reg.register(TypeDefBuilder::tag_type("NotBlank", member).build());
    reg.register(TypeDefBuilder::tag_type("Internal", member).build());
    reg.register(
        TypeDefBuilder::tag_type("Name", member)
            .tag(Tag::new("NotBlank"))
            .tag(Tag::new("Internal"))
            .build(),
    );
    reg.register(TypeDefBuilder::tag_type("Entity", TagTargets::TYPE).build());
    reg
}

fn scanner_for(reg: HashMapTypeRegistry) -> TypeScanner {
    TypeScanner::new(Arc::new(reg))
}

fn stored_setter(name: &str, field: &str, param: impl Into<TypeExpr>) -> MethodDef {
    MethodDef::setter(name, param, MethodBody::write_stored(field))
}

#[test]
fn test_bean_property_is_readable_and_writable() {
    let mut reg = base_registry();
    reg.register(TypeDefBuilder::class("Person").bean_property("name", "String").build());
    let scanner = scanner_for(reg);

    let person = scanner.descriptor(&"Person".into()).unwrap();
    assert_eq!(person.len(), 1);
    let name = person.property("name").unwrap();
    assert!(name.is_readable());
    assert!(name.is_writable());
    assert!(name.field().is_some());
    assert_eq!(name.accessor().map(|m| &*m.name), Some("getName"));
    assert_eq!(name.mutator().map(|m| &*m.name), Some("setName"));
    assert_eq!(name.declared_type(), &RawType::named("String"));
    assert_eq!(name.owner(), &RawType::named("Person"));
}

#[test]
fn test_tag_priority_field_accessor_mutator() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Tagged")
            .field(FieldDef::stored("code", "String").tag(label("field")))
            .method(
                MethodDef::getter("getCode", "String", MethodBody::read_stored("code"))
                    .tag(label("getter")),
            )
            .method(stored_setter("setCode", "code", "String").tag(label("setter")))
            .method(MethodDef::getter("getTitle", "String", MethodBody::Opaque).tag(label("getter")))
            .method(MethodDef::setter("setTitle", "String", MethodBody::Opaque).tag(label("setter")))
            .method(MethodDef::setter("setNote", "String", MethodBody::Opaque).tag(label("setter")))
            .build(),
    );
    let scanner = scanner_for(reg);
    let tagged = scanner.descriptor(&"Tagged".into()).unwrap();

    assert_eq!(label_text(tagged.property("code").unwrap()).as_deref(), Some("field"));
    assert_eq!(label_text(tagged.property("title").unwrap()).as_deref(), Some("getter"));
    assert_eq!(label_text(tagged.property("note").unwrap()).as_deref(), Some("setter"));
}

#[test]
fn test_meta_tags_merged_into_property() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Account")
            .field(FieldDef::stored("owner", "String").public().tag(Tag::new("Name")))
            .build(),
    );
    let scanner = scanner_for(reg);
    let owner = Arc::clone(scanner.descriptor(&"Account".into()).unwrap().property("owner").unwrap());

    let tags: Vec<String> = owner.tags().map(|t| t.tag_type().to_string()).collect();
    assert_eq!(tags, vec!["Name", "NotBlank", "Internal"]);
    assert!(scanner.merge_cache().len() >= 1);
}

#[test]
fn test_tag_filter_policy() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Account")
            .field(FieldDef::stored("owner", "String").public().tag(Tag::new("Name")))
            .build(),
    );
    let config = ScannerConfig::default().with_policy(
        PredicatePolicy::new().with_tag_filter(|_, candidate| candidate.name() != "Internal"),
    );
    let scanner = TypeScanner::with_config(Arc::new(reg), config);
    let account = scanner.descriptor(&"Account".into()).unwrap();
    let owner = account.property("owner").unwrap();

    assert!(owner.has_tag(&"Name".into()));
    assert!(owner.has_tag(&"NotBlank".into()));
    assert!(!owner.has_tag(&"Internal".into()));
}

#[test]
fn test_unknown_tag_type_fails_scan() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Broken")
            .method(MethodDef::getter("getX", "i32", MethodBody::Opaque).tag(Tag::new("Ghost")))
            .build(),
    );
    let scanner = scanner_for(reg);

    let err = scanner.descriptor(&"Broken".into()).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownType(_)));
    assert!(scanner.is_empty());
}

#[test]
fn test_overload_matching_field_type() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Wallet")
            .field(FieldDef::stored("amount", "i64"))
            .method(MethodDef::getter("getAmount", "i64", MethodBody::read_stored("amount")))
            .method(stored_setter("setAmount", "amount", "i32"))
            .method(stored_setter("setAmount", "amount", "i64"))
            .method(stored_setter("setAmount", "amount", "f64"))
            .build(),
    );
    let scanner = scanner_for(reg);
    let amount = Arc::clone(scanner.descriptor(&"Wallet".into()).unwrap().property("amount").unwrap());

    let canonical = amount.mutator().unwrap();
    assert_eq!(canonical.params, vec![TypeExpr::raw("i64")]);
    let keys: Vec<String> = amount.candidate_mutators().keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["f64", "i32", "i64"]);

    let mut wallet = DynamicObject::new("Wallet");
    amount.set(&mut wallet, 250i64).unwrap();
    assert_eq!(amount.get::<i64>(&wallet).unwrap(), 250);
}

#[test]
fn test_overload_matching_accessor_type() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Dial")
            .method(MethodDef::getter("getLevel", "i32", MethodBody::Opaque))
            .method(MethodDef::setter("setLevel", "f64", MethodBody::Opaque))
            .method(MethodDef::setter("setLevel", "i32", MethodBody::Opaque))
            .build(),
    );
    let scanner = scanner_for(reg);
    let dial = scanner.descriptor(&"Dial".into()).unwrap();
    let level = dial.property("level").unwrap();

    assert_eq!(level.mutator().unwrap().params, vec![TypeExpr::raw("i32")]);
    assert_eq!(level.declared_type(), &RawType::named("i32"));
    assert_eq!(level.candidate_mutators().len(), 2);
}

#[test]
fn test_ambiguous_overloads_leave_property_read_only() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Sink")
            .method(MethodDef::setter("setValue", "i32", MethodBody::Opaque))
            .method(MethodDef::setter("setValue", "String", MethodBody::Opaque))
            .method(MethodDef::setter("setOnly", "String", MethodBody::Opaque))
            .build(),
    );
    let scanner = scanner_for(reg);
    let sink = scanner.descriptor(&"Sink".into()).unwrap();

    let value = sink.property("value").unwrap();
    assert!(value.mutator().is_none());
    assert!(!value.is_writable());
    assert!(!value.is_readable());
    assert_eq!(value.candidate_mutators().len(), 2);

    let only = sink.property("only").unwrap();
    assert!(only.is_writable());
    assert!(!only.is_readable());
    assert_eq!(only.declared_type(), &RawType::named("String"));
}

#[test]
fn test_member_filtering() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Guarded")
            .field(FieldDef::stored("secret", "String"))
            .field(FieldDef::stored("COUNT", "i32").public().static_field())
            .field(FieldDef::stored("open", "i32").protected())
            .method(
                MethodDef::getter("getHidden", "String", MethodBody::Opaque)
                    .with_visibility(Visibility::Private),
            )
            .method(MethodDef::getter("getShared", "String", MethodBody::Opaque).static_method())
            .method(MethodDef::getter("size", "i32", MethodBody::Opaque))
            .build(),
    );
    let scanner = scanner_for(reg);
    let guarded = scanner.descriptor(&"Guarded".into()).unwrap();

    assert!(guarded.is_empty(), "{:?}", guarded);
}

#[test]
fn test_public_field_only_property() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Point")
            .field(FieldDef::stored("x", "i32").public())
            .field(FieldDef::stored("_cache", "i32").public())
            .build(),
    );
    let config = ScannerConfig::default()
        .with_policy(PredicatePolicy::new().with_property_filter(|p| !p.name().starts_with('_')));
    let scanner = TypeScanner::with_config(Arc::new(reg), config);
    let point = scanner.descriptor(&"Point".into()).unwrap();

    assert_eq!(point.property_names().collect::<Vec<_>>(), vec!["x"]);
    let x = point.property("x").unwrap();
    assert!(x.accessor().is_none() && x.mutator().is_none());

    let mut p = DynamicObject::new("Point");
    x.set(&mut p, 3i32).unwrap();
    assert_eq!(x.get::<i32>(&p).unwrap(), 3);
}

#[test]
fn test_property_filter_sees_field_tags() {
    let mut reg = base_registry();
    reg.register(TypeDefBuilder::tag_type("Transient", TagTargets::FIELD).build());
    reg.register(
        TypeDefBuilder::class("Session")
            .field(FieldDef::stored("cache", "String").public().tag(Tag::new("Transient")))
            .field(FieldDef::stored("keep", "String").public().tag(Tag::new("Name")))
            .build(),
    );
    let config = ScannerConfig::default().with_policy(
        PredicatePolicy::new().with_property_filter(|p| !p.has_tag(&"Transient".into())),
    );
    let scanner = TypeScanner::with_config(Arc::new(reg), config);
    let session = scanner.descriptor(&"Session".into()).unwrap();

    assert_eq!(session.property_names().collect::<Vec<_>>(), vec!["keep"]);
    let keep = session.property("keep").unwrap();
    assert!(keep.has_tag(&"Name".into()));
    assert!(keep.has_tag(&"NotBlank".into()));
}

#[test]
fn test_not_readable_not_writable() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Sealed")
            .field(FieldDef::stored("token", "String"))
            .method(MethodDef::getter("getToken", "String", MethodBody::read_stored("token")))
            .method(MethodDef::setter("setCode", "String", MethodBody::Opaque))
            .build(),
    );
    let scanner = scanner_for(reg);
    let sealed = scanner.descriptor(&"Sealed".into()).unwrap();
    let mut obj = DynamicObject::new("Sealed").with("token", "abc");

    let token = sealed.property("token").unwrap();
    assert_eq!(token.get::<String>(&obj).unwrap(), "abc");
    assert!(matches!(
        token.set(&mut obj, "x"),
        Err(CatalogError::NotWritable { .. })
    ));

    let code = sealed.property("code").unwrap();
    assert!(matches!(code.get_value(&obj), Err(CatalogError::NotReadable { .. })));
    // Opaque bodies describe metadata only.
    assert!(matches!(
        code.set(&mut obj, "x"),
        Err(CatalogError::NotInvocable { .. })
    ));
}

#[test]
fn test_inherited_properties_are_shared() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Base")
            .field(FieldDef::stored("id", "i64").public())
            .bean_property("name", "String")
            .build(),
    );
    reg.register(TypeDefBuilder::class("Derived").extends("Base").build());
    let scanner = scanner_for(reg);

    let base = scanner.descriptor(&"Base".into()).unwrap();
    let derived = scanner.descriptor(&"Derived".into()).unwrap();
    assert_eq!(derived.len(), 2);
    assert!(Arc::ptr_eq(derived.parent().unwrap(), &base));

    let id = derived.property("id").unwrap();
    assert!(Arc::ptr_eq(id, base.property("id").unwrap()));
    assert!(id.accessor().is_none() && id.mutator().is_none());
    assert!(id.is_readable() && id.is_writable());

    let name = derived.property("name").unwrap();
    assert!(Arc::ptr_eq(name, base.property("name").unwrap()));
    assert!(name.accessor().is_some() && name.mutator().is_some());

    let mut obj = DynamicObject::new("Derived");
    id.set(&mut obj, 7i64).unwrap();
    name.set(&mut obj, "seven").unwrap();
    assert_eq!(id.get::<i64>(&obj).unwrap(), 7);
    assert_eq!(name.get::<String>(&obj).unwrap(), "seven");
}

#[test]
fn test_child_overriding_mutator_keeps_parent_accessor() {
    let mut reg = base_registry();
    reg.register(TypeDefBuilder::class("Parent").bean_property("name", "String").build());
    reg.register(
        TypeDefBuilder::class("Child")
            .extends("Parent")
            .method(stored_setter("setName", "name", "String").tag(label("child")))
            .build(),
    );
    reg.register(
        TypeDefBuilder::class("Reader")
            .extends("Parent")
            .method(MethodDef::getter("getName", "String", MethodBody::read_stored("name")))
            .build(),
    );
    let scanner = scanner_for(reg);
    let parent = scanner.descriptor(&"Parent".into()).unwrap();
    let parent_name = parent.property("name").unwrap();

    let child = scanner.descriptor(&"Child".into()).unwrap();
    let name = child.property("name").unwrap();
    assert!(!Arc::ptr_eq(name, parent_name));
    assert!(Arc::ptr_eq(name.accessor().unwrap(), parent_name.accessor().unwrap()));
    assert_eq!(name.mutator().unwrap().declared_by, RawType::named("Child"));
    assert_eq!(name.owner(), &RawType::named("Child"));
    assert_eq!(label_text(name).as_deref(), Some("child"));

    let reader = scanner.descriptor(&"Reader".into()).unwrap();
    let name = reader.property("name").unwrap();
    assert_eq!(name.accessor().unwrap().declared_by, RawType::named("Reader"));
    assert!(Arc::ptr_eq(name.mutator().unwrap(), parent_name.mutator().unwrap()));
}

#[test]
fn test_generic_inherited_property_is_rehomed() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Box")
            .type_param("T")
            .bean_property("content", TypeExpr::var("T", "Box"))
            .bean_property("label", "String")
            .build(),
    );
    reg.register(
        TypeDefBuilder::class("StringBox")
            .extends(TypeExpr::parameterized("Box", vec![TypeExpr::raw("String")]))
            .build(),
    );
    let registry: Arc<HashMapTypeRegistry> = Arc::new(reg);
    let scanner = TypeScanner::new(Arc::<HashMapTypeRegistry>::clone(&registry));

    let generic = scanner.descriptor(&"Box".into()).unwrap();
    let concrete = scanner.descriptor(&"StringBox".into()).unwrap();

    let base_content = generic.property("content").unwrap();
    let content = concrete.property("content").unwrap();
    assert!(!Arc::ptr_eq(content, base_content));
    assert_eq!(content.owner(), &RawType::named("StringBox"));
    assert_eq!(content.declared_type(), &RawType::object());
    assert_eq!(content.candidate_mutators().len(), 1);

    let resolved = content.resolved_type(&*registry);
    assert_eq!(resolved.expr(), &TypeExpr::raw("String"));
    assert!(Arc::ptr_eq(resolved.annotated().unwrap(), content));
    assert_eq!(
        base_content.resolved_type(&*registry).expr(),
        &TypeExpr::var("T", "Box")
    );

    assert!(Arc::ptr_eq(
        concrete.property("label").unwrap(),
        generic.property("label").unwrap()
    ));
}

#[test]
fn test_use_parent_false_detaches() {
    let mut reg = base_registry();
    reg.register(TypeDefBuilder::class("Base").bean_property("name", "String").build());
    reg.register(
        TypeDefBuilder::class("Derived")
            .extends("Base")
            .bean_property("extra", "i32")
            .build(),
    );
    let config = ScannerConfig::default()
        .with_policy(PredicatePolicy::new().with_parent_filter(|p| p.raw_type().name() != "Base"));
    let scanner = TypeScanner::with_config(Arc::new(reg), config);

    let derived = scanner.descriptor(&"Derived".into()).unwrap();
    assert!(derived.parent().is_none());
    assert_eq!(derived.property_names().collect::<Vec<_>>(), vec!["extra"]);
}

#[test]
fn test_round_trip_scalars() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Sample")
            .bean_property("count", "i32")
            .bean_property("active", "bool")
            .bean_property("ratio", "f64")
            .build(),
    );
    let scanner = scanner_for(reg);
    let sample = scanner.descriptor(&"Sample".into()).unwrap();
    let mut obj = DynamicObject::new("Sample");

    let active = sample.property("active").unwrap();
    assert_eq!(active.accessor().map(|m| &*m.name), Some("isActive"));

    sample.property("count").unwrap().set(&mut obj, -12i32).unwrap();
    active.set(&mut obj, true).unwrap();
    sample.property("ratio").unwrap().set(&mut obj, 0.25f64).unwrap();

    assert_eq!(sample.property("count").unwrap().get::<i32>(&obj).unwrap(), -12);
    assert!(active.get::<bool>(&obj).unwrap());
    assert_eq!(sample.property("ratio").unwrap().get::<f64>(&obj).unwrap(), 0.25);
}

#[test]
fn test_rust_struct_through_closures() {
    struct Counter {
        hits: u64,
    }

    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Counter")
            .method(MethodDef::getter(
                "getHits",
                "u64",
                MethodBody::read(|c: &Counter| Value::from(c.hits)),
            ))
            .method(MethodDef::setter(
                "setHits",
                "u64",
                MethodBody::write(|c: &mut Counter, v: Value| {
                    c.hits = v.as_u64().ok_or(CatalogError::TypeMismatch {
                        expected: "u64".into(),
                        got: v.kind_name().into(),
                    })?;
                    Ok(())
                }),
            ))
            .build(),
    );
    let scanner = scanner_for(reg);
    let hits = Arc::clone(scanner.descriptor(&"Counter".into()).unwrap().property("hits").unwrap());

    let mut counter = Counter { hits: 1 };
    hits.set(&mut counter, 41u64).unwrap();
    assert_eq!(counter.hits, 41);
    assert_eq!(hits.get::<u64>(&counter).unwrap(), 41);

    let mut wrong = DynamicObject::new("Counter");
    assert!(matches!(
        hits.set(&mut wrong, 1u64),
        Err(CatalogError::InstanceMismatch { .. })
    ));
}

#[test]
fn test_property_expecting() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Team")
            .bean_property("members", TypeExpr::parameterized("List", vec![TypeExpr::raw("String")]))
            .build(),
    );
    let registry = Arc::new(reg);
    let scanner = TypeScanner::new(Arc::<HashMapTypeRegistry>::clone(&registry));
    let team = scanner.descriptor(&"Team".into()).unwrap();

    let members = team
        .property_expecting(&*registry, "members", &"Collection".into())
        .unwrap()
        .unwrap();
    assert!(members.is_collection(&*registry));
    assert!(members.is_iterable(&*registry));
    assert!(!members.is_mapping(&*registry));

    assert!(team.property_expecting(&*registry, "ghost", &"String".into()).unwrap().is_none());
    assert!(matches!(
        team.property_expecting(&*registry, "members", &"Set".into()),
        Err(CatalogError::NotAssignable { .. })
    ));
}

fn address_registry() -> HashMapTypeRegistry {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Address")
            .bean_property("city", "String")
            .bean_property("zip", "i32")
            .build(),
    );
    reg.register(
        TypeDefBuilder::class("Person")
            .bean_property("name", "String")
            .bean_property("address", "Address")
            .bean_property("tags", TypeExpr::array_of(TypeExpr::raw("String")))
            .tag(Tag::new("Entity").with("table", "people"))
            .build(),
    );
    reg
}

#[test]
fn test_property_by_path() {
    let scanner = scanner_for(address_registry());
    let person = scanner.descriptor(&"Person".into()).unwrap();

    let city = person.property_by_path(&scanner, &["address", "city"]).unwrap().unwrap();
    assert_eq!(city.owner(), &RawType::named("Address"));
    assert!(person.property_by_path(&scanner, &["address", "street"]).unwrap().is_none());
    assert!(person.property_by_path(&scanner, &["name", "length"]).unwrap().is_none());
    assert!(person.property_by_path(&scanner, &["tags", "x"]).unwrap().is_none());
    assert!(matches!(
        person.property_by_path(&scanner, &[]),
        Err(CatalogError::EmptyPath)
    ));

    assert!(person
        .property_by_path_expecting(&scanner, &["address", "zip"], &"i32".into())
        .unwrap()
        .is_some());
    assert!(matches!(
        person.property_by_path_expecting(&scanner, &["address", "zip"], &"String".into()),
        Err(CatalogError::NotAssignable { .. })
    ));
}

#[test]
fn test_require_path() {
    let scanner = scanner_for(address_registry());
    let person = scanner.descriptor(&"Person".into()).unwrap();

    let zip = person.require_path(&scanner, &["address", "zip"]).unwrap();
    assert_eq!(zip.name(), "zip");

    match person.require_path(&scanner, &["address", "street"]) {
        Err(CatalogError::UnresolvedPathSegment { owner, segment }) => {
            assert_eq!(owner, RawType::named("Address"));
            assert_eq!(segment, "street");
        }
        other => panic!("unexpected {:?}", other),
    }
    match person.require_path(&scanner, &["name", "length"]) {
        Err(CatalogError::UnresolvedPathSegment { owner, segment }) => {
            assert_eq!(owner, RawType::named("String"));
            assert_eq!(segment, "length");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_nested_descriptors() {
    let scanner = scanner_for(address_registry());
    let person = scanner.descriptor(&"Person".into()).unwrap();

    let address = person.property("address").unwrap().nested(&scanner).unwrap().unwrap();
    assert_eq!(address.raw_type(), &RawType::named("Address"));
    assert!(Arc::ptr_eq(&address, &scanner.descriptor(&"Address".into()).unwrap()));
    assert!(person.property("name").unwrap().nested(&scanner).unwrap().is_none());
    assert!(person.property("tags").unwrap().nested(&scanner).unwrap().is_none());
}

#[test]
fn test_type_level_tags() {
    let scanner = scanner_for(address_registry());
    let person = scanner.descriptor(&"Person".into()).unwrap();

    assert!(person.has_tag(&"Entity".into()));
    assert_eq!(
        person.tag(&"Entity".into()).and_then(|t| t.get("table")).and_then(|v| v.as_str()),
        Some("people")
    );
    assert_eq!(person.tags().len(), 1);
}

#[test]
fn test_descriptor_cache() {
    let scanner = scanner_for(address_registry());

    let a = scanner.descriptor(&"Person".into()).unwrap();
    let b = scanner.descriptor(&"Person".into()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(scanner.len(), 1);
    assert_eq!(scanner.stats().misses, 1);
    assert!(scanner.stats().hits >= 1);

    let fresh = scanner.descriptor_uncached(&"Person".into()).unwrap();
    assert_eq!(fresh.len(), a.len());
    assert_eq!(scanner.len(), 1);

    assert!(matches!(
        scanner.descriptor(&"Ghost".into()),
        Err(CatalogError::UnknownType(_))
    ));
}

#[test]
fn test_inheritance_cycle_is_fatal() {
    let mut reg = base_registry();
    reg.register(TypeDefBuilder::class("A").extends("B").build());
    reg.register(TypeDefBuilder::class("B").extends("A").build());
    let scanner = scanner_for(reg);

    assert!(matches!(
        scanner.descriptor(&"A".into()),
        Err(CatalogError::InheritanceCycle(_))
    ));
    assert!(scanner.is_empty());
}

#[test]
fn test_scan_time_and_lazy_indexes() {
    let mut reg = base_registry();
    reg.register(
        TypeDefBuilder::class("Form")
            .field(FieldDef::stored("first", "String").tag(label("First")))
            .field(FieldDef::stored("last", "String").tag(label("Last")))
            .method(MethodDef::getter("getFirst", "String", MethodBody::read_stored("first")))
            .method(MethodDef::getter("getLast", "String", MethodBody::read_stored("last")))
            .method(MethodDef::getter("getAge", "i32", MethodBody::Opaque))
            .build(),
    );
    let config = ScannerConfig::default()
        .with_index::<PropertyByTagIndex>()
        .with_index::<PropertyByTagIndex>();
    assert_eq!(config.indexes.len(), 1);
    let scanner = TypeScanner::with_config(Arc::new(reg), config);
    let form = scanner.descriptor(&"Form".into()).unwrap();

    let by_tag = form.index::<PropertyByTagIndex>().unwrap();
    let names: Vec<&str> = by_tag.by_tag(&"Label".into()).iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["first", "last"]);
    assert!(by_tag.by_tag(&"Ghost".into()).is_empty());

    let by_type = form.index::<PropertyByTypeIndex>().unwrap();
    assert_eq!(by_type.by_type(&"String".into()).len(), 2);
    assert_eq!(by_type.by_type(&"i32".into()).len(), 1);
    assert!(Arc::ptr_eq(&by_type, &form.index::<PropertyByTypeIndex>().unwrap()));
}

#[derive(Debug)]
struct Unbuildable;

impl CatalogIndex for Unbuildable {
    fn create() -> Result<Self> {
        Err(CatalogError::IndexInstantiation {
            index: "Unbuildable",
            reason: "no backing store".to_string(),
        })
    }
}

#[derive(Debug, Default)]
struct TypeCount {
    properties: usize,
    finished: bool,
}

impl CatalogIndex for TypeCount {
    fn create() -> Result<Self> {
        Ok(Self::default())
    }

    fn index_property(&mut self, _owner: &TypeDescriptor, _property: &Arc<PropertyDescriptor>) {
        assert!(!self.finished);
        self.properties += 1;
    }

    fn index_type(&mut self, owner: &TypeDescriptor) {
        assert_eq!(self.properties, owner.len());
        self.finished = true;
    }
}

#[test]
fn test_index_hooks_order() {
    let scanner = TypeScanner::with_config(
        Arc::new(address_registry()),
        ScannerConfig::default().with_index::<TypeCount>(),
    );
    let person = scanner.descriptor(&"Person".into()).unwrap();
    let count = person.index::<TypeCount>().unwrap();
    assert!(count.finished);
    assert_eq!(count.properties, 3);
}

#[test]
fn test_index_failure_aborts_scan() {
    let scanner = TypeScanner::with_config(
        Arc::new(address_registry()),
        ScannerConfig::default().with_index::<Unbuildable>(),
    );
    assert!(matches!(
        scanner.descriptor(&"Person".into()),
        Err(CatalogError::IndexInstantiation { .. })
    ));
    assert!(scanner.is_empty());

    let plain = scanner_for(address_registry());
    let person = plain.descriptor(&"Person".into()).unwrap();
    assert!(person.index::<Unbuildable>().is_err());
}

#[test]
fn test_new_instance_through_scanner() {
    let scanner = scanner_for(address_registry());
    let person = scanner.descriptor(&"Person".into()).unwrap();
    let address = person.property("address").unwrap();

    let value = scanner
        .new_instance(address.declared_type(), Some(address))
        .unwrap();
    let obj = value.as_object::<DynamicObject>().unwrap();
    assert_eq!(obj.type_name(), &RawType::named("Address"));
}
