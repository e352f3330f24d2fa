use std::{
    rc::Rc,
    sync::{Arc, RwLock},
};

use objgraph::{deep_copy, Object};

#[derive(Object)]
struct Pair {
    pub a: Rc<String>,
    pub b: Rc<String>,
    pub t: (u8, String),
}

#[derive(Object)]
enum Slot<T> {
    Local(Rc<T>),
    Remote(Arc<T>, Arc<RwLock<Vec<T>>>),
}

fn main() {
    let shared = Rc::new(String::from("x"));
    let pair = deep_copy(&Pair {
        a: Rc::clone(&shared),
        b: shared,
        t: (1, "one".into()),
    });
    assert!(Rc::ptr_eq(&pair.a, &pair.b));
    assert_eq!(pair.t.1, "one");

    let slot = deep_copy(&Slot::Remote(Arc::new(2_u8), Arc::new(RwLock::new(vec![3]))));
    match slot {
        Slot::Remote(value, list) => {
            assert_eq!(*value, 2);
            assert_eq!(*list.read().unwrap(), [3]);
        }
        Slot::Local(_) => unreachable!(),
    }
    assert!(<Slot<u8>>::stable_name().ends_with("::Slot<u8>"));
}
