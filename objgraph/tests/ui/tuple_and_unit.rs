use objgraph::{deep_copy, Kind, Object};

#[derive(Object)]
struct Meters(pub f64);

#[derive(Object)]
struct Pair(pub String, u32);

#[derive(Object)]
struct Unit;

fn main() {
    assert_eq!(deep_copy(&Meters(2.5)).0, 2.5);

    let pair = deep_copy(&Pair("x".into(), 7));
    assert_eq!(pair.0, "x");
    assert_eq!(pair.1, 0);

    let unit = Unit;
    assert_eq!(unit.kind(), Kind::Record);
    assert!(unit.fields().is_empty());
    let _ = deep_copy(&unit);

    let fields = Pair("y".into(), 1).fields();
    assert_eq!(fields[0].name(), "0");
    assert!(fields[0].is_public());
    assert!(!fields[1].is_public());
}
