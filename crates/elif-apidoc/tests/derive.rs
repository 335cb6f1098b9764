use elif_apidoc::{Describe, PrimitiveKind, TypeDescriptor, TypeKind};

#[allow(dead_code)]
#[derive(Describe)]
struct Account {
    id: u64,
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(skip)]
    password_hash: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    email: Option<String>,
}

#[allow(dead_code)]
#[derive(Describe)]
#[serde(rename_all = "camelCase")]
struct Profile {
    first_name: String,
    #[serde(rename = "surname")]
    last_name: String,
    r#type: String,
    #[serde(flatten)]
    audit: Audit,
}

#[allow(dead_code)]
#[derive(Describe)]
#[serde(rename_all(serialize = "SCREAMING_SNAKE_CASE", deserialize = "snake_case"))]
struct Audit {
    created_by: String,
    #[serde(rename(serialize = "rev", deserialize = "revision"))]
    revision: u32,
}

#[allow(dead_code)]
#[derive(Describe)]
struct UserId(i64);

#[allow(dead_code)]
#[derive(Describe)]
#[serde(transparent)]
struct Tags {
    values: Vec<String>,
}

#[allow(dead_code, non_camel_case_types)]
#[derive(Describe)]
struct r#match {
    score: u32,
}

fn fields(descriptor: &TypeDescriptor) -> Vec<(String, &'static str, bool, bool)> {
    match &descriptor.kind {
        TypeKind::Struct(fields) => fields
            .iter()
            .map(|field| {
                (
                    field.exposed_name().to_string(),
                    field.ty.resolve().kind_name(),
                    field.visible,
                    field.embedded,
                )
            })
            .collect(),
        other => panic!("expected a struct descriptor, got {:?}", other),
    }
}

#[test]
fn test_struct_identity_uses_module_path() {
    let descriptor = Account::describe();
    assert_eq!(descriptor.identity.path, module_path!());
    assert_eq!(descriptor.identity.name, "Account");
}

#[test]
fn test_field_attributes() {
    assert_eq!(
        fields(&Account::describe()),
        vec![
            ("id".to_string(), "primitive", true, false),
            ("displayName".to_string(), "primitive", true, false),
            ("password_hash".to_string(), "opaque", false, false),
            ("email".to_string(), "pointer", true, false),
        ]
    );
}

#[test]
fn test_rename_all_and_flatten() {
    assert_eq!(
        fields(&Profile::describe()),
        vec![
            ("firstName".to_string(), "primitive", true, false),
            ("surname".to_string(), "primitive", true, false),
            ("type".to_string(), "primitive", true, false),
            ("audit".to_string(), "struct", true, true),
        ]
    );
}

#[test]
fn test_serialize_side_of_split_renames() {
    assert_eq!(
        fields(&Audit::describe()),
        vec![
            ("CREATED_BY".to_string(), "primitive", true, false),
            ("rev".to_string(), "primitive", true, false),
        ]
    );
}

#[test]
fn test_newtypes_are_transparent() {
    let descriptor = UserId::describe();
    assert!(matches!(
        descriptor.kind,
        TypeKind::Primitive(PrimitiveKind::Integer)
    ));
    assert_eq!(descriptor.identity.name, "i64");

    assert_eq!(Tags::describe().kind_name(), "sequence");
}

#[test]
fn test_raw_struct_identifier_drops_prefix() {
    let descriptor = r#match::describe();
    assert_eq!(descriptor.identity.name, "match");
}
