use std::sync::atomic::{AtomicUsize, Ordering};

use objgraph::{deep_copy, Object};

#[derive(Default)]
struct Counter(AtomicUsize);

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self(AtomicUsize::new(self.0.load(Ordering::Relaxed)))
    }
}

#[derive(Object)]
struct Service<C> {
    pub name: String,
    #[object(skip)]
    pub hits: Counter,
    #[object(skip)]
    pub config: C,
}

#[derive(Clone, Default, PartialEq, Debug)]
struct Config {
    retries: u8,
}

fn main() {
    let service = Service {
        name: "api".into(),
        hits: Counter(AtomicUsize::new(3)),
        config: Config { retries: 2 },
    };
    assert_eq!(service.fields().len(), 1);

    let copy = deep_copy(&service);
    assert_eq!(copy.name, "api");
    assert_eq!(copy.hits.0.load(Ordering::Relaxed), 3);
    assert_eq!(copy.config, Config { retries: 2 });
}
