use uuid::Uuid;

/// A fresh client-side identifier in the server's format (32 lowercase hex digits).
pub fn new_identifier() -> String {
    Uuid::new_v4().simple().to_string()
}
