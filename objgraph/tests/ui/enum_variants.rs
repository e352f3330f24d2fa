use objgraph::{deep_copy, Kind, Object};

#[derive(Debug, PartialEq, Object)]
enum Event<T> {
    Started,
    Progress(u8, T),
    Finished {
        code: i32,
        #[object(secret)]
        detail: String,
    },
}

fn main() {
    let event: Event<String> = Event::Progress(50, "half".into());
    assert_eq!(event.kind(), Kind::Any);
    assert_eq!(event.variant(), Some("Progress"));
    assert_eq!(event.fields().len(), 2);
    assert_eq!(deep_copy(&event), event);

    let finished: Event<String> = Event::Finished {
        code: 1,
        detail: "boom".into(),
    };
    assert!(finished.fields()[1].is_secret());
    assert_eq!(
        objgraph::deep_copy_redacted(&finished),
        Event::Finished {
            code: 1,
            detail: String::new()
        }
    );

    assert_eq!(<Event<String> as Object>::zeroed(), Event::Started);
}
