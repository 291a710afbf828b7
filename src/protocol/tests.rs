use serde_json::json;

use super::*;

#[test]
fn request_parsing() {
    let request: Request = serde_json::from_str(r#"{"method":"add","params":[[1,2,3]]}"#).unwrap();

    assert_eq!(request.method, "add");
    assert_eq!(request.params, vec![json!([1, 2, 3])]);
    assert!(request.id.is_none());
}

#[test]
fn request_id_is_preserved() {
    let request: Request =
        serde_json::from_str(r#"{"method":"add","params":[[10]],"id":42}"#).unwrap();

    assert_eq!(request.id, Some(json!(42)));
}

#[test]
fn request_params_default_to_empty() {
    let request: Request = serde_json::from_str(r#"{"method":"status"}"#).unwrap();

    assert_eq!(request.method, "status");
    assert!(request.params.is_empty());
}

#[test]
fn success_response_serialization() {
    let response = Response::success(Some(json!(7)), json!(6));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value, json!({"id": 7, "result": 6}));
}

#[test]
fn error_response_serialization() {
    let response = Response::failure(None, &RpcError::MethodNotFound("multiply".into()));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["id"], json!(null));
    assert_eq!(value["error"]["code"], json!(METHOD_NOT_FOUND));
    assert!(value["error"]["message"]
        .as_str()
        .unwrap()
        .contains("multiply"));
    assert!(value.get("result").is_none());
}

#[test]
fn invalid_params_error_code() {
    let error = ErrorObject::from(&RpcError::InvalidParams("not a number".into()));

    assert_eq!(error.code, INVALID_PARAMS);
    assert!(error.message.contains("not a number"));
}
