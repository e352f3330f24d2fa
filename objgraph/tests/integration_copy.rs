//! End-to-end tests for deep copies.
//!
//! These tests exercise:
//! - independence of the copy from the source,
//! - aliasing and cycles surviving the copy, and
//! - private fields, skipped fields and copy hooks.

use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc, sync::Mutex};

use objgraph::{
    copy_fn, deep_copy, deep_copy_with, CopyHook, Error, Field, Flow, Object, ObjectExt, Options,
    ProcContext,
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Cache(Vec<u8>);

#[derive(Debug, Object)]
struct Document {
    pub title: String,
    pub pages: Vec<Page>,
    pub meta: HashMap<String, String>,
    pub attachment: Option<Box<Document>>,
    #[object(skip)]
    pub cache: Cache,
    revision: u32,
}

#[derive(Debug, Object)]
struct Page(pub u16, pub String);

fn document() -> Document {
    Document {
        title: "Manual".into(),
        pages: vec![Page(1, "intro".into()), Page(2, "usage".into())],
        meta: HashMap::from([("lang".to_owned(), "en".to_owned())]),
        attachment: Some(Box::new(Document {
            title: "Appendix".into(),
            pages: Vec::new(),
            meta: HashMap::new(),
            attachment: None,
            cache: Cache::default(),
            revision: 1,
        })),
        cache: Cache(vec![9, 9]),
        revision: 7,
    }
}

#[test]
fn test_copy_preserves_public_content() {
    let source = document();
    let copy = deep_copy(&source);

    assert_eq!(copy.title, "Manual");
    assert_eq!(copy.pages.len(), 2);
    assert_eq!(copy.pages[1].0, 2);
    assert_eq!(copy.pages[1].1, "usage");
    assert_eq!(copy.meta["lang"], "en");
    assert_eq!(copy.attachment.as_ref().unwrap().title, "Appendix");
}

#[test]
fn test_private_fields_zeroed_unless_opted_in() {
    let source = document();

    let copy = deep_copy(&source);
    assert_eq!(copy.revision, 0);

    let copy = deep_copy_with(&source, Options::new().with_private_fields(true)).unwrap();
    assert_eq!(copy.revision, 7);
    assert_eq!(copy.attachment.unwrap().revision, 1);
}

#[test]
fn test_skipped_field_is_cloned() {
    let source = document();
    let copy = deep_copy(&source);
    assert_eq!(copy.cache, Cache(vec![9, 9]));
}

#[test]
fn test_copy_is_independent() {
    let mut source = document();
    let copy = source.deep_copy();

    source.title.push_str(" v2");
    source.pages.clear();
    source.meta.insert("lang".into(), "fr".into());

    assert_eq!(copy.title, "Manual");
    assert_eq!(copy.pages.len(), 2);
    assert_eq!(copy.meta["lang"], "en");
}

#[test]
fn test_aliasing_survives_copy() {
    #[derive(Object)]
    struct Team {
        pub lead: Rc<RefCell<String>>,
        pub members: Vec<Rc<RefCell<String>>>,
    }

    let ada = Rc::new(RefCell::new("Ada".to_owned()));
    let source = Team {
        lead: Rc::clone(&ada),
        members: vec![Rc::clone(&ada), Rc::new(RefCell::new("Alan".to_owned()))],
    };
    let copy = deep_copy(&source);

    assert!(Rc::ptr_eq(&copy.lead, &copy.members[0]));
    assert!(!Rc::ptr_eq(&copy.lead, &ada));
    assert!(!Rc::ptr_eq(&copy.members[0], &copy.members[1]));

    copy.lead.borrow_mut().push('!');
    assert_eq!(*copy.members[0].borrow(), "Ada!");
    assert_eq!(*ada.borrow(), "Ada");
}

#[test]
fn test_cycle_is_reproduced() {
    #[derive(Object)]
    struct Node {
        pub value: i32,
        pub next: Option<Rc<RefCell<Node>>>,
    }

    let first = Rc::new(RefCell::new(Node {
        value: 1,
        next: None,
    }));
    let second = Rc::new(RefCell::new(Node {
        value: 2,
        next: Some(Rc::clone(&first)),
    }));
    first.borrow_mut().next = Some(Rc::clone(&second));

    let copy = deep_copy(&first);
    let copy_second = copy.borrow().next.clone().unwrap();
    let back = copy_second.borrow().next.clone().unwrap();

    assert_eq!(copy.borrow().value, 1);
    assert_eq!(copy_second.borrow().value, 2);
    assert!(Rc::ptr_eq(&back, &copy));
    assert!(!Rc::ptr_eq(&copy, &first));

    // break both cycles so everything is freed
    first.borrow_mut().next = None;
    copy.borrow_mut().next = None;
}

#[test]
fn test_mutex_shared_across_vec() {
    let shared = Arc::new(Mutex::new(1_u64));
    let source = vec![Arc::clone(&shared), shared];
    let copy = deep_copy(&source);
    assert!(Arc::ptr_eq(&copy[0], &copy[1]));
    *copy[0].lock().unwrap() = 5;
    assert_eq!(*copy[1].lock().unwrap(), 5);
    assert_eq!(*source[0].lock().unwrap(), 1);
}

#[test]
fn test_borrowed_refcell_fails() {
    let source = Rc::new(RefCell::new(String::from("busy")));
    let _guard = source.borrow_mut();
    let err = deep_copy_with(&source, Options::new()).unwrap_err();
    assert!(matches!(err, Error::Borrowed { .. }));
}

#[test]
fn test_after_hook_rewrites_copy() {
    let source = document();
    let mut upper = copy_fn(|_ctx, copy, field| {
        if field.is_some_and(|field| field.name() == "title") {
            let title = copy
                .downcast_ref::<String>()
                .map(|title| title.to_uppercase())
                .unwrap_or_default();
            copy.replace(title)?;
        }
        Ok(())
    });
    let copy = deep_copy_with(&source, Options::new().with_hook(&mut upper)).unwrap();
    assert_eq!(copy.title, "MANUAL");
    assert_eq!(copy.attachment.unwrap().title, "APPENDIX");
    assert_eq!(source.title, "Manual");
}

#[test]
fn test_before_hook_skips_subtree() {
    struct NoPages {
        after_calls: usize,
    }

    impl CopyHook for NoPages {
        fn before(
            &mut self,
            _ctx: &mut ProcContext<'_>,
            _source: &dyn Object,
            field: Option<&Field>,
        ) -> Result<Flow, Error> {
            Ok(match field {
                Some(field) if field.name() == "pages" => Flow::Skip,
                _ => Flow::Descend,
            })
        }

        fn after(
            &mut self,
            _ctx: &mut ProcContext<'_>,
            copy: &mut dyn Object,
            _field: Option<&Field>,
        ) -> Result<(), Error> {
            assert!(!copy.is::<Page>());
            self.after_calls += 1;
            Ok(())
        }
    }

    let source = document();
    let mut hook = NoPages { after_calls: 0 };
    let copy = deep_copy_with(&source, Options::new().with_hook(&mut hook)).unwrap();
    assert!(copy.pages.is_empty());
    assert!(hook.after_calls > 0);
}

#[test]
fn test_hook_type_mismatch_is_reported() {
    let mut wrong = copy_fn(|ctx, copy, _field| {
        if ctx.depth() == 1 {
            copy.replace(1_u64)?;
        }
        Ok(())
    });
    let err = deep_copy_with(&vec![1_u8], Options::new().with_hook(&mut wrong)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_hook_error_carries_path() {
    let mut failing = copy_fn(|ctx, _copy, _field| {
        if ctx.path() == ".[1]" {
            return Err(Error::visitor("refused"));
        }
        Ok(())
    });
    let err =
        deep_copy_with(&vec![1_u8, 2], Options::new().with_hook(&mut failing)).unwrap_err();
    assert_eq!(err.path(), Some(".[1]"));
}

#[test]
fn test_enum_copy_keeps_variant() {
    #[derive(Debug, PartialEq, Object)]
    enum Shape {
        Circle { radius: f64 },
        Rect(u32, u32),
        Empty,
    }

    assert_eq!(
        deep_copy(&Shape::Circle { radius: 1.5 }),
        Shape::Circle { radius: 1.5 }
    );
    assert_eq!(deep_copy(&Shape::Rect(2, 3)), Shape::Rect(2, 3));
    assert_eq!(deep_copy(&Shape::Empty), Shape::Empty);
    assert_eq!(
        <Shape as Object>::zeroed(),
        Shape::Circle { radius: 0.0 }
    );
}

#[test]
fn test_boxed_trait_object_copies_dynamic_type() {
    let source: Vec<Box<dyn Object>> = vec![Box::new(3_i8), Box::new(String::from("x"))];
    let copy = deep_copy(&source);
    assert_eq!(copy[0].downcast_ref::<i8>(), Some(&3));
    assert_eq!(copy[1].downcast_ref::<String>().map(String::as_str), Some("x"));
}

#[derive(Debug, Object)]
struct Pair {
    pub a: Rc<String>,
    pub b: Rc<String>,
    pub t: (u8, String),
}

#[test]
fn test_plain_rc_aliasing_survives_copy() {
    let shared = Rc::new(String::from("x"));
    let source = Pair {
        a: Rc::clone(&shared),
        b: Rc::clone(&shared),
        t: (1, "one".into()),
    };
    let copy = deep_copy(&source);

    assert!(Rc::ptr_eq(&copy.a, &copy.b));
    assert!(!Rc::ptr_eq(&copy.a, &shared));
    assert_eq!(*copy.a, "x");
    assert_eq!(copy.t, (1, "one".to_owned()));
    assert_eq!(Rc::strong_count(&shared), 3);
}

#[test]
fn test_plain_arc_aliasing_survives_copy() {
    let shared = Arc::new(vec![1_u8, 2]);
    let source = (Arc::clone(&shared), vec![Arc::clone(&shared)]);
    let copy = deep_copy(&source);

    assert!(Arc::ptr_eq(&copy.0, &copy.1[0]));
    assert!(!Arc::ptr_eq(&copy.0, &shared));
    assert_eq!(*copy.0, [1, 2]);
}

#[test]
fn test_tuple_fields_follow_hooks() {
    let source = (String::from("keep"), String::from("drop"));
    let mut second = copy_fn(|ctx, copy, field| {
        if field.map(Field::name) == Some("1") {
            assert_eq!(ctx.path(), ".1");
            copy.zero();
        }
        Ok(())
    });
    let copy = deep_copy_with(&source, Options::new().with_hook(&mut second)).unwrap();
    assert_eq!(copy, ("keep".to_owned(), String::new()));
}
