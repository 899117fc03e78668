use std::path::PathBuf;

use serde_json::json;

use apidoc_core::SpecStore;
use apidoc_core::ir::{HttpMethod, Location, merge_documents};
use apidoc_core::parse;
use apidoc_core::transform;

const WIDGETS: &str = include_str!("fixtures/widgets.yaml");
const ACCOUNTS: &str = include_str!("fixtures/accounts.json");

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn transform_widgets_groups() {
    let doc = parse::from_yaml(WIDGETS).unwrap();
    let groups = transform::transform_document(&doc).unwrap();

    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Widgets", "default"]);

    let widgets = &groups[0];
    assert_eq!(widgets.path, "widgets");
    assert_eq!(widgets.description, "Manage the widget catalogue");

    let ids: Vec<&str> = widgets.methods.iter().map(|m| m.operation_id.as_str()).collect();
    assert_eq!(
        ids,
        ["widgets-createWidget", "widgets-getWidget", "widgets-listWidgets"]
    );

    let health = &groups[1].methods[0];
    assert_eq!(health.name, "health");
    assert_eq!(health.url, "/health");
    assert_eq!(health.http_verb, HttpMethod::Get);
}

#[test]
fn transform_widgets_request_body() {
    let doc = parse::from_yaml(WIDGETS).unwrap();
    let groups = transform::transform_document(&doc).unwrap();
    let create = &groups[0].methods[0];

    assert_eq!(create.name, "Create widget");
    assert_eq!(create.path, "create-widget");
    assert_eq!(create.description, "Adds a widget to the catalogue.");

    let body = create.request_body.as_ref().expect("request body");
    assert!(body.required);
    assert_eq!(body.content_type, "application/json");

    let fields: Vec<(&str, bool)> = body
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.required))
        .collect();
    assert_eq!(
        fields,
        [("dimensions", false), ("name", true), ("size", false)]
    );

    let dimensions = body.properties[0].nested("properties").unwrap();
    assert_eq!(dimensions[0].name, "height");
    assert!(!dimensions[0].required);
    assert_eq!(dimensions[1].name, "width");
    assert!(dimensions[1].required);

    // Body fields are also listed as attributes located in the body.
    assert_eq!(create.attributes.len(), 3);
    assert!(
        create
            .attributes
            .iter()
            .all(|a| a.location == Some(Location::Body))
    );
    assert_eq!(create.attributes[2].value("minimum"), Some(&json!(1)));
}

#[test]
fn transform_widgets_responses() {
    let doc = parse::from_yaml(WIDGETS).unwrap();
    let groups = transform::transform_document(&doc).unwrap();
    let create = &groups[0].methods[0];

    let statuses: Vec<&str> = create.responses.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, ["201", "400"]);
    let created = &create.responses[0];
    assert_eq!(created.content_type.as_deref(), Some("application/json"));
    assert_eq!(created.properties.as_ref().unwrap().len(), 3);
    assert!(create.responses[1].properties.is_none());

    let list = &groups[0].methods[2];
    let page = &list.responses[0];
    let items = page.items.as_ref().expect("array items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_type, Some(json!("object")));
    let names: Vec<&str> = items[0].properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["dimensions", "name", "size"]);
}

#[test]
fn transform_widgets_parameters() {
    let doc = parse::from_yaml(WIDGETS).unwrap();
    let groups = transform::transform_document(&doc).unwrap();

    let list = &groups[0].methods[2];
    assert_eq!(list.attributes.len(), 1);
    let limit = &list.attributes[0];
    assert_eq!(limit.name, "limit");
    assert_eq!(limit.location, Some(Location::Query));
    assert!(!limit.required);
    assert_eq!(limit.value("type"), Some(&json!("integer")));
    assert_eq!(limit.value("maximum"), Some(&json!(100)));
    assert_eq!(limit.value("description"), Some(&json!("Page size")));

    let get = &groups[0].methods[1];
    assert_eq!(get.attributes[0].name, "id");
    assert_eq!(get.attributes[0].location, Some(Location::Path));
    assert!(get.attributes[0].required);
}

#[test]
fn transform_serializes_portal_field_names() {
    let doc = parse::from_yaml(WIDGETS).unwrap();
    let groups = transform::transform_document(&doc).unwrap();
    let value = serde_json::to_value(&groups).unwrap();

    let method = &value[0]["methods"][2];
    assert_eq!(method["type"], "get");
    assert_eq!(method["operationId"], "widgets-listWidgets");
    assert_eq!(method["url"], "/api/widgets");
    assert_eq!(method["attributes"][0]["in"], "query");
    assert_eq!(method["responses"][0]["items"][0]["type"], "object");

    let create = &value[0]["methods"][0];
    assert_eq!(create["requestBody"]["contentType"], "application/json");
    assert_eq!(create["requestBody"]["type"], "object");
    assert_eq!(create["attributes"][1]["in"], "body");
}

#[test]
fn transform_accounts_referenced_and_multipart_bodies() {
    let doc = parse::from_json(ACCOUNTS).unwrap();
    let groups = transform::transform_document(&doc).unwrap();

    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Users", "Accounts"]);
    assert_eq!(groups[0].description, "");

    let accounts = &groups[1];
    let open = &accounts.methods[0];
    assert_eq!(open.operation_id, "accounts-openAccount");
    let body = open.request_body.as_ref().unwrap();
    assert!(body.required);
    let fields: Vec<(&str, bool)> = body
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.required))
        .collect();
    assert_eq!(fields, [("email", true), ("plan", true)]);
    assert_eq!(body.properties[1].value("enum"), Some(&json!(["free", "pro"])));

    let upload = &accounts.methods[1];
    let body = upload.request_body.as_ref().unwrap();
    assert_eq!(body.content_type, "multipart/form-data");
    assert_eq!(body.properties[0].name, "file");
    assert_eq!(body.properties[0].value("format"), Some(&json!("binary")));
}

#[test]
fn transform_through_store_and_merge() {
    let store = SpecStore::new();
    let widgets = transform::transform(&store, &fixture("widgets.yaml")).unwrap();
    let accounts = transform::transform(&store, &fixture("accounts.json")).unwrap();

    let merged = merge_documents(vec![widgets.clone(), accounts.clone()]);
    assert_eq!(merged.len(), widgets.len() + accounts.len());
    let names: Vec<&str> = merged.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Widgets", "default", "Users", "Accounts"]);
}

#[test]
fn transform_ignores_source_key_order() {
    let forward = r#"{
        "paths": {
            "/b": {
                "get": {"tags": ["Beta"], "operationId": "listB", "responses": {"200": {"description": "ok"}, "404": {"description": "missing"}}},
                "post": {"tags": ["Alpha"], "operationId": "createB"}
            },
            "/a": {
                "delete": {"tags": ["Alpha"], "operationId": "deleteA"},
                "get": {"tags": ["Beta"], "operationId": "getA"}
            }
        }
    }"#;
    let reversed = r#"{
        "paths": {
            "/a": {
                "get": {"operationId": "getA", "tags": ["Beta"]},
                "delete": {"operationId": "deleteA", "tags": ["Alpha"]}
            },
            "/b": {
                "post": {"operationId": "createB", "tags": ["Alpha"]},
                "get": {"responses": {"404": {"description": "missing"}, "200": {"description": "ok"}}, "operationId": "listB", "tags": ["Beta"]}
            }
        }
    }"#;

    let first = transform::transform_document(&parse::from_json(forward).unwrap()).unwrap();
    let second = transform::transform_document(&parse::from_json(reversed).unwrap()).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let names: Vec<&str> = first.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Beta", "Alpha"]);
    let ids: Vec<&str> = first[1].methods.iter().map(|m| m.operation_id.as_str()).collect();
    assert_eq!(ids, ["createB", "deleteA"]);
}

#[test]
fn transform_missing_file_is_load_error() {
    let store = SpecStore::new();
    let err = transform::transform(&store, &fixture("absent.yaml")).unwrap_err();
    assert!(matches!(err, apidoc_core::error::TransformError::Load(_)));
}
