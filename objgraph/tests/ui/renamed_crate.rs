use objgraph as graph;

#[derive(graph::Object)]
struct Settings {
    pub name: String,
    #[object(role = "ops")]
    pub level: u8,
}

fn main() {
    let settings = Settings {
        name: "prod".into(),
        level: 3,
    };
    let fields = graph::Object::fields(&settings);
    assert_eq!(fields[1].tag("role"), Some("ops"));
    assert_eq!(fields[1].type_name(), "u8");
    assert!(graph::hash!(settings).is_ok());
}
