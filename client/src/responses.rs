use xmlrpc::Value;

/// Decoded result of one API call, paired with the wire method name that
/// produced it.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    method: String,
    response: Value,
}

impl ApiResponse {
    pub(crate) fn new(method: String, response: Value) -> Self {
        Self { method, response }
    }

    /// Wire method name, after first-letter capitalization.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The full decoded response value.
    pub fn value(&self) -> &Value {
        &self.response
    }

    /// Consume the wrapper, keeping only the decoded response value.
    pub fn into_value(self) -> Value {
        self.response
    }

    /// Look up a top-level member of a struct response.
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.response
            .as_struct()
            .and_then(|members| members.get(member))
    }

    /// The `status` member, when present.
    pub fn status(&self) -> Option<&str> {
        self.get("status").and_then(Value::as_str)
    }

    /// The `data` member as an array, when present.
    pub fn data(&self) -> Option<&[Value]> {
        self.get("data").and_then(Value::as_array)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn sample() -> ApiResponse {
        let mut members = BTreeMap::new();
        members.insert("status".to_string(), Value::String("200 OK".to_string()));
        members.insert(
            "data".to_string(),
            Value::Array(vec![Value::String("first".to_string())]),
        );
        ApiResponse::new("SearchSubtitles".to_string(), Value::Struct(members))
    }

    #[test]
    fn exposes_method_and_members() {
        let response = sample();
        assert_eq!(response.method(), "SearchSubtitles");
        assert_eq!(response.status(), Some("200 OK"));
        assert_eq!(response.data().unwrap().len(), 1);
        assert!(response.get("token").is_none());
    }

    #[test]
    fn non_struct_payload_has_no_members() {
        let response = ApiResponse::new("ServerInfo".to_string(), Value::Int(1));
        assert!(response.get("status").is_none());
        assert!(response.status().is_none());
        assert!(response.data().is_none());
        assert_eq!(response.value(), &Value::Int(1));
    }

    #[test]
    fn into_value_keeps_the_payload() {
        let value = sample().into_value();
        assert!(value.as_struct().is_some());
    }
}
