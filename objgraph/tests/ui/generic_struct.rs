use std::marker::PhantomData;

use objgraph::{deep_copy, hash, Object};

struct Marker;

#[derive(Object)]
struct Wrapper<T, const N: usize> {
    pub items: [T; N],
    pub extra: Option<Vec<T>>,
    pub _marker: PhantomData<Marker>,
}

#[derive(Object)]
struct TypedId<T> {
    pub id: String,
    pub _kind: PhantomData<T>,
}

fn main() {
    let value = Wrapper {
        items: [1_u8, 2, 3],
        extra: Some(vec![4]),
        _marker: PhantomData,
    };
    let copy = deep_copy(&value);
    assert_eq!(copy.items, [1, 2, 3]);
    assert_eq!(copy.extra, Some(vec![4]));
    assert_eq!(hash(&[&value]).unwrap(), hash(&[&copy]).unwrap());

    let id: TypedId<Marker> = TypedId {
        id: "a".into(),
        _kind: PhantomData,
    };
    assert_eq!(deep_copy(&id).id, "a");
}
