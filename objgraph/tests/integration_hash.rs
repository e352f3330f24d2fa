//! End-to-end tests for content hashing.
//!
//! These tests exercise:
//! - determinism and map-order independence,
//! - type identity and private fields in the digest, and
//! - rejection of opaque values.

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap, HashSet},
    rc::Rc,
    sync::mpsc,
};

use objgraph::{hash, Error, HashBuilder, Kind, Mode, Object, ObjectExt};
use proptest::prelude::*;
use sha2::Sha256;

#[derive(Object)]
struct S0 {
    a: i64,
}

#[derive(Object)]
struct S1 {
    a: i64,
}

#[derive(Object)]
struct Point {
    pub x: i32,
    pub y: i32,
}

#[test]
fn test_repeated_hash_is_identical() {
    let value = Point { x: 1, y: 2 };
    assert_eq!(value.content_hash().unwrap(), value.content_hash().unwrap());
    assert_eq!(objgraph::hash!(value).unwrap(), hash(&[&value]).unwrap());
}

#[test]
fn test_digest_is_composite_width() {
    let digest = hash(&[&1_u8]).unwrap();
    assert_eq!(digest.len(), 128);
    assert_eq!(digest.to_hex().len(), 256);
}

#[test]
fn test_type_identity_is_part_of_digest() {
    let first = hash(&[&S0 { a: 1 }]).unwrap();
    let second = hash(&[&S0 { a: 1 }]).unwrap();
    let other_type = hash(&[&S1 { a: 1 }]).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other_type);
}

#[test]
fn test_same_bits_different_width_differ() {
    assert_ne!(hash(&[&1_u32]).unwrap(), hash(&[&1_u64]).unwrap());
    assert_ne!(hash(&[&1_i8]).unwrap(), hash(&[&1_u8]).unwrap());
}

#[test]
fn test_private_fields_change_digest_only_when_included() {
    let default = HashBuilder::stable();
    let a = default.reset_and_hash(&[&S0 { a: 1 }]).unwrap();
    let b = default.reset_and_hash(&[&S0 { a: 2 }]).unwrap();
    assert_eq!(a, b);

    let private = HashBuilder::stable().with_private_fields(true);
    let a_private = private.reset_and_hash(&[&S0 { a: 1 }]).unwrap();
    let b_private = private.reset_and_hash(&[&S0 { a: 2 }]).unwrap();
    assert_ne!(a_private, b_private);
    assert_ne!(a, a_private);
}

#[test]
fn test_map_insertion_order_does_not_matter() {
    let mut forward = HashMap::new();
    let mut backward = HashMap::new();
    for i in 0..64_u32 {
        forward.insert(format!("key-{i}"), i);
    }
    for i in (0..64_u32).rev() {
        backward.insert(format!("key-{i}"), i);
    }
    assert_eq!(hash(&[&forward]).unwrap(), hash(&[&backward]).unwrap());

    backward.insert("key-0".into(), 1000);
    assert_ne!(hash(&[&forward]).unwrap(), hash(&[&backward]).unwrap());
}

#[test]
fn test_map_keys_are_hashed() {
    let a = HashMap::from([("a".to_owned(), 1_u8)]);
    let b = HashMap::from([("b".to_owned(), 1_u8)]);
    assert_ne!(hash(&[&a]).unwrap(), hash(&[&b]).unwrap());
}

#[test]
fn test_sets_are_canonical() {
    let hashed: HashSet<u16> = (0..100).collect();
    let reversed: HashSet<u16> = (0..100).rev().collect();
    assert_eq!(hash(&[&hashed]).unwrap(), hash(&[&reversed]).unwrap());

    let ordered: BTreeSet<u16> = (0..100).collect();
    let fewer: BTreeSet<u16> = (0..99).collect();
    assert_ne!(hash(&[&ordered]).unwrap(), hash(&[&fewer]).unwrap());
}

#[test]
fn test_sequence_order_matters() {
    assert_ne!(
        hash(&[&vec![1_u8, 2]]).unwrap(),
        hash(&[&vec![2_u8, 1]]).unwrap()
    );
}

#[test]
fn test_variant_is_part_of_digest() {
    let ok: Result<u8, u8> = Ok(1);
    let err: Result<u8, u8> = Err(1);
    assert_ne!(hash(&[&ok]).unwrap(), hash(&[&err]).unwrap());

    let some: Option<u8> = Some(0);
    let none: Option<u8> = None;
    assert_ne!(hash(&[&some]).unwrap(), hash(&[&none]).unwrap());
}

#[test]
fn test_cycle_hashes_finitely() {
    #[derive(Object)]
    struct Node {
        pub id: u8,
        pub next: Option<Rc<RefCell<Node>>>,
    }

    let build = || {
        let node = Rc::new(RefCell::new(Node { id: 3, next: None }));
        node.borrow_mut().next = Some(Rc::clone(&node));
        node
    };
    let first = build();
    let second = build();
    assert_eq!(hash(&[&first]).unwrap(), hash(&[&second]).unwrap());

    first.borrow_mut().next = None;
    second.borrow_mut().next = None;
}

#[test]
fn test_function_fields_are_rejected() {
    #[derive(Object)]
    struct Callback {
        pub name: String,
        pub run: fn() -> u8,
    }

    fn seven() -> u8 {
        7
    }

    let value = Callback {
        name: "seven".into(),
        run: seven,
    };
    let err = hash(&[&value]).unwrap_err();
    match &err {
        Error::Argument { index, source, .. } => {
            assert_eq!(*index, 0);
            assert!(matches!(
                **source,
                Error::UnsupportedCategory {
                    kind: Kind::Opaque(_),
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.path(), Some(".run"));
}

#[test]
fn test_channels_are_rejected() {
    let (sender, _receiver) = mpsc::channel::<u8>();
    let err = hash(&[&1_u8, &sender]).unwrap_err();
    assert!(matches!(err, Error::Argument { index: 1, .. }));
}

#[derive(Object)]
struct Wrapper<T> {
    pub inner: T,
}

#[test]
fn test_stable_names_do_not_come_from_the_compiler() {
    assert_eq!(Point::stable_name(), "integration_hash::Point");
    assert_eq!(
        <Wrapper<Vec<u8>>>::stable_name(),
        "integration_hash::Wrapper<Vec<u8>>"
    );
    let node: &dyn Object = &Wrapper { inner: (1_u8, "x") };
    assert_eq!(node.stable_name(), "integration_hash::Wrapper<(u8, &str)>");
}

#[test]
fn test_stable_digest_is_pinned() {
    let builder = HashBuilder::stable_with(Sha256::default());
    let digest = builder
        .reset_and_hash(&[&Point { x: 1, y: -2 }, &vec![(7_u16, "seven")]])
        .unwrap();
    assert_eq!(
        digest.to_hex(),
        "a326515b4b6f45d5901d22f3aa6b45005dd01b487b7cb73fecda7659a4f9495b"
    );
}

#[test]
fn test_hash_macro_accepts_temporaries() {
    let digest = objgraph::hash!(String::from("x"), vec![1_u8]).unwrap();
    assert_eq!(digest, hash(&[&String::from("x"), &vec![1_u8]]).unwrap());
}

#[test]
fn test_modes_differ_but_are_each_deterministic() {
    let stable = HashBuilder::stable();
    let unstable = HashBuilder::unstable();
    assert_eq!(stable.mode(), Mode::Stable);
    assert_eq!(unstable.mode(), Mode::Unstable);

    let value = Point { x: 5, y: 6 };
    let s = stable.reset_and_hash(&[&value]).unwrap();
    let u = unstable.reset_and_hash(&[&value]).unwrap();
    assert_ne!(s, u);
    assert_eq!(u, unstable.reset_and_hash(&[&value]).unwrap());
}

#[test]
fn test_writes_accumulate_until_reset() {
    let builder = HashBuilder::default();
    builder.write(&[&1_u8]).unwrap();
    let after_one = builder.result();
    builder.write(&[&2_u8]).unwrap();
    let after_two = builder.result();
    assert_ne!(after_one, after_two);
    assert_eq!(after_two, hash(&[&1_u8, &2_u8]).unwrap());

    builder.reset();
    builder.write(&[&1_u8]).unwrap();
    assert_eq!(builder.result(), after_one);
}

#[test]
fn test_session_is_exclusive_sequence() {
    let builder = HashBuilder::stable();
    let digest = {
        let mut session = builder.lock();
        session.reset();
        session.write(&[&"a"]).unwrap();
        session.write(&[&"b"]).unwrap();
        session.result()
    };
    assert_eq!(digest, hash(&[&"a", &"b"]).unwrap());
}

proptest! {
    #[test]
    fn prop_hash_map_order_independent(
        entries in proptest::collection::hash_map(".{0,8}", any::<u32>(), 0..32)
    ) {
        let mut pairs: Vec<(String, u32)> = entries.clone().into_iter().collect();
        pairs.sort();
        pairs.reverse();
        let rebuilt: HashMap<String, u32> = pairs.into_iter().collect();
        prop_assert_eq!(hash(&[&entries]).unwrap(), hash(&[&rebuilt]).unwrap());
    }

    #[test]
    fn prop_distinct_scalars_distinct_digests(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(a != b);
        prop_assert_ne!(hash(&[&a]).unwrap(), hash(&[&b]).unwrap());
    }
}
