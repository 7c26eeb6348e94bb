//! Wire schema for meal-planning calendar operations.
//!
//! These messages mirror the server's protobuf definitions field for field.
//! Tags and scalar types are part of the wire contract: changing either breaks
//! compatibility with the server.

/// A calendar label as stored on the server.
#[derive(Clone, PartialEq, prost::Message)]
pub struct PBCalendarLabel {
    #[prost(string, required, tag = "1")]
    pub identifier: String,
    #[prost(int64, optional, tag = "2")]
    pub logical_timestamp: Option<i64>,
    #[prost(string, optional, tag = "3")]
    pub calendar_id: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub hex_color: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub name: Option<String>,
    #[prost(int32, optional, tag = "6")]
    pub sort_index: Option<i32>,
}

/// Metadata attached to every submitted operation.
#[derive(Clone, PartialEq, prost::Message)]
pub struct PBOperationMetadata {
    #[prost(string, optional, tag = "1")]
    pub operation_id: Option<String>,
    /// Tells the server which handler processes the operation (e.g. `new-label`).
    #[prost(string, optional, tag = "2")]
    pub handler_id: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub user_id: Option<String>,
}

/// A single calendar operation. Only the label-related fields are modelled.
#[derive(Clone, PartialEq, prost::Message)]
pub struct PBCalendarOperation {
    #[prost(message, optional, tag = "1")]
    pub metadata: Option<PBOperationMetadata>,
    #[prost(string, optional, tag = "2")]
    pub calendar_id: Option<String>,
    #[prost(message, optional, tag = "5")]
    pub updated_label: Option<PBCalendarLabel>,
}

/// Batch of operations submitted in one request.
#[derive(Clone, PartialEq, prost::Message)]
pub struct PBCalendarOperationList {
    #[prost(message, repeated, tag = "1")]
    pub operations: Vec<PBCalendarOperation>,
}
