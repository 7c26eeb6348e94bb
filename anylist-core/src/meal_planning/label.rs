//! Meal-planning calendar event labels.
//!
//! A label is a named, colored tag that calendar entries can carry. Every
//! change is sent to the server as a single-operation batch containing the
//! label's full current state.

use std::fmt;
use std::sync::Arc;

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::client::Transport;
use crate::error::AnyListResult;
use crate::meal_planning::{OPERATIONS_FIELD, UPDATE_PATH};
use crate::protobuf::{
    PBCalendarLabel, PBCalendarOperation, PBCalendarOperationList, PBOperationMetadata,
};
use crate::utils::new_identifier;

/// The kind of label operation, dispatched by the server on its handler id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOperation {
    New,
    Update,
    Delete,
}

impl LabelOperation {
    pub fn handler_id(self) -> &'static str {
        match self {
            LabelOperation::New => "new-label",
            LabelOperation::Update => "update-label",
            LabelOperation::Delete => "delete-label",
        }
    }
}

impl fmt::Display for LabelOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handler_id())
    }
}

/// Label fields as received from the server or supplied by the caller.
/// Every field is optional; missing ones are filled in on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCalendarLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<i32>,
}

impl From<PBCalendarLabel> for RawCalendarLabel {
    fn from(label: PBCalendarLabel) -> Self {
        RawCalendarLabel {
            identifier: Some(label.identifier),
            calendar_id: label.calendar_id,
            hex_color: label.hex_color,
            logical_timestamp: label.logical_timestamp,
            name: label.name,
            sort_index: label.sort_index,
        }
    }
}

/// Everything a label needs to talk to the server.
#[derive(Clone)]
pub struct LabelContext {
    pub client: Arc<dyn Transport>,
    /// Acting user, recorded in every operation's metadata.
    pub uid: String,
    /// Calendar used when the raw label carries none.
    pub calendar_id: String,
}

impl LabelContext {
    pub fn new(
        client: Arc<dyn Transport>,
        uid: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Self {
        LabelContext {
            client,
            uid: uid.into(),
            calendar_id: calendar_id.into(),
        }
    }
}

/// A meal-planning calendar event label.
///
/// `identifier` and `calendar_id` are fixed at construction. The remaining
/// fields are plain data the owner may change before calling [`save`].
///
/// [`save`]: CalendarEventLabel::save
pub struct CalendarEventLabel {
    identifier: String,
    calendar_id: String,
    pub hex_color: Option<String>,
    pub logical_timestamp: Option<i64>,
    pub name: Option<String>,
    pub sort_index: Option<i32>,

    client: Arc<dyn Transport>,
    uid: String,
    is_new: bool,
}

impl fmt::Debug for CalendarEventLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarEventLabel")
            .field("identifier", &self.identifier)
            .field("calendar_id", &self.calendar_id)
            .field("hex_color", &self.hex_color)
            .field("logical_timestamp", &self.logical_timestamp)
            .field("name", &self.name)
            .field("sort_index", &self.sort_index)
            .field("is_new", &self.is_new)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CalendarEventLabel {
    /// Build a label from raw fields. A label without an identifier is new and
    /// gets a generated one; it is created on the server by its first save.
    pub fn new(label: RawCalendarLabel, ctx: &LabelContext) -> Self {
        let identifier = non_empty(label.identifier);
        let is_new = identifier.is_none();

        CalendarEventLabel {
            identifier: identifier.unwrap_or_else(new_identifier),
            calendar_id: non_empty(label.calendar_id).unwrap_or_else(|| ctx.calendar_id.clone()),
            hex_color: label.hex_color,
            logical_timestamp: label.logical_timestamp,
            name: label.name,
            sort_index: label.sort_index,
            client: Arc::clone(&ctx.client),
            uid: ctx.uid.clone(),
            is_new,
        }
    }

    /// Hydrate an existing label from an encoded `PBCalendarLabel`.
    pub fn from_bytes(bytes: &[u8], ctx: &LabelContext) -> AnyListResult<Self> {
        let label = PBCalendarLabel::decode(bytes)?;
        Ok(Self::new(label.into(), ctx))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// True until the first successful save.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Save local changes: creates the label on first save, updates it afterwards.
    ///
    /// A failed save leaves the label new, so the next attempt creates it again.
    pub async fn save(&mut self) -> AnyListResult<()> {
        let operation = if self.is_new {
            LabelOperation::New
        } else {
            LabelOperation::Update
        };

        self.perform_operation(operation).await?;
        self.is_new = false;
        Ok(())
    }

    /// Delete the label on the server. Local state is untouched; the caller
    /// drops the label once this succeeds.
    pub async fn delete(&self) -> AnyListResult<()> {
        self.perform_operation(LabelOperation::Delete).await
    }

    fn encode(&self) -> PBCalendarLabel {
        PBCalendarLabel {
            identifier: self.identifier.clone(),
            logical_timestamp: self.logical_timestamp,
            calendar_id: Some(self.calendar_id.clone()),
            hex_color: self.hex_color.clone(),
            name: self.name.clone(),
            sort_index: self.sort_index,
        }
    }

    fn operation_list(
        &self,
        operation: LabelOperation,
        operation_id: String,
    ) -> PBCalendarOperationList {
        PBCalendarOperationList {
            operations: vec![PBCalendarOperation {
                metadata: Some(PBOperationMetadata {
                    operation_id: Some(operation_id),
                    handler_id: Some(operation.handler_id().to_string()),
                    user_id: Some(self.uid.clone()),
                }),
                calendar_id: Some(self.calendar_id.clone()),
                updated_label: Some(self.encode()),
            }],
        }
    }

    async fn perform_operation(&self, operation: LabelOperation) -> AnyListResult<()> {
        let operation_id = new_identifier();

        tracing::debug!(
            handler_id = operation.handler_id(),
            calendar_id = %self.calendar_id,
            label_id = %self.identifier,
            %operation_id,
            "submitting label operation"
        );

        let payload = self.operation_list(operation, operation_id).encode_to_vec();
        self.client
            .post_form(UPDATE_PATH, OPERATIONS_FIELD, payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnyListError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Records every submitted form and optionally rejects them.
    #[derive(Default)]
    struct RecordingTransport {
        posts: Mutex<Vec<(String, String, Vec<u8>)>>,
        fail: AtomicBool,
    }

    impl RecordingTransport {
        fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn operations(&self) -> Vec<PBCalendarOperation> {
            self.posts
                .lock()
                .unwrap()
                .iter()
                .flat_map(|(_, _, payload)| {
                    PBCalendarOperationList::decode(payload.as_slice())
                        .unwrap()
                        .operations
                })
                .collect()
        }

        fn handler_ids(&self) -> Vec<String> {
            self.operations()
                .into_iter()
                .map(|op| op.metadata.unwrap().handler_id.unwrap())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post_form(&self, path: &str, field: &str, payload: Vec<u8>) -> AnyListResult<()> {
            self.posts
                .lock()
                .unwrap()
                .push((path.to_string(), field.to_string(), payload));

            if self.fail.load(Ordering::SeqCst) {
                return Err(AnyListError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    fn make_context() -> (Arc<RecordingTransport>, LabelContext) {
        let transport = Arc::new(RecordingTransport::default());
        let ctx = LabelContext::new(transport.clone(), "user-9", "cal-1");
        (transport, ctx)
    }

    fn dinner() -> RawCalendarLabel {
        RawCalendarLabel {
            name: Some("Dinner".to_string()),
            hex_color: Some("#FF0000".to_string()),
            sort_index: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_label_gets_generated_identifier() {
        let (_, ctx) = make_context();
        let label = CalendarEventLabel::new(dinner(), &ctx);

        assert!(!label.identifier().is_empty());
        assert!(label.is_new());

        let other = CalendarEventLabel::new(dinner(), &ctx);
        assert_ne!(label.identifier(), other.identifier());
    }

    #[test]
    fn test_existing_identifier_is_preserved() {
        let (_, ctx) = make_context();
        let raw = RawCalendarLabel {
            identifier: Some("label-42".to_string()),
            ..dinner()
        };
        let label = CalendarEventLabel::new(raw, &ctx);

        assert_eq!(label.identifier(), "label-42");
        assert!(!label.is_new());
    }

    #[test]
    fn test_empty_identifier_counts_as_missing() {
        let (_, ctx) = make_context();
        let raw = RawCalendarLabel {
            identifier: Some(String::new()),
            ..dinner()
        };
        let label = CalendarEventLabel::new(raw, &ctx);

        assert!(!label.identifier().is_empty());
        assert!(label.is_new());
    }

    #[test]
    fn test_calendar_id_resolution() {
        let (_, ctx) = make_context();

        let label = CalendarEventLabel::new(dinner(), &ctx);
        assert_eq!(label.calendar_id(), "cal-1");

        let raw = RawCalendarLabel {
            calendar_id: Some("cal-2".to_string()),
            ..dinner()
        };
        let label = CalendarEventLabel::new(raw, &ctx);
        assert_eq!(label.calendar_id(), "cal-2");
    }

    #[test]
    fn test_encode_round_trip() {
        let (_, ctx) = make_context();
        let raw = RawCalendarLabel {
            identifier: Some("label-42".to_string()),
            calendar_id: Some("cal-1".to_string()),
            hex_color: Some("#00FF00".to_string()),
            logical_timestamp: Some(17),
            name: Some("Lunch".to_string()),
            sort_index: Some(5),
        };
        let label = CalendarEventLabel::new(raw.clone(), &ctx);

        let bytes = label.encode().encode_to_vec();
        let decoded = CalendarEventLabel::from_bytes(&bytes, &ctx).unwrap();

        assert_eq!(decoded.identifier(), "label-42");
        assert_eq!(decoded.calendar_id(), "cal-1");
        assert_eq!(decoded.hex_color, raw.hex_color);
        assert_eq!(decoded.logical_timestamp, Some(17));
        assert_eq!(decoded.name, raw.name);
        assert_eq!(decoded.sort_index, Some(5));
        assert!(!decoded.is_new());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let (_, ctx) = make_context();
        let err = CalendarEventLabel::from_bytes(&[0xff, 0xff, 0xff], &ctx).unwrap_err();
        assert!(matches!(err, AnyListError::Decode(_)));
    }

    #[test]
    fn test_raw_label_from_json() {
        let raw: RawCalendarLabel = serde_json::from_str(
            r##"{"identifier":"abc","hexColor":"#123456","logicalTimestamp":3,"name":"Snack","sortIndex":1}"##,
        )
        .unwrap();

        assert_eq!(raw.identifier.as_deref(), Some("abc"));
        assert_eq!(raw.calendar_id, None);
        assert_eq!(raw.hex_color.as_deref(), Some("#123456"));
        assert_eq!(raw.logical_timestamp, Some(3));
        assert_eq!(raw.sort_index, Some(1));
    }

    #[tokio::test]
    async fn test_save_creates_then_updates() {
        let (transport, ctx) = make_context();
        let mut label = CalendarEventLabel::new(dinner(), &ctx);

        label.save().await.unwrap();
        assert!(!label.is_new());

        label.name = Some("Supper".to_string());
        label.save().await.unwrap();

        assert_eq!(transport.handler_ids(), vec!["new-label", "update-label"]);
        let ops = transport.operations();
        assert_eq!(
            ops[1].updated_label.as_ref().unwrap().name.as_deref(),
            Some("Supper")
        );
    }

    #[tokio::test]
    async fn test_failed_save_keeps_label_new() {
        let (transport, ctx) = make_context();
        let mut label = CalendarEventLabel::new(dinner(), &ctx);

        transport.set_failing(true);
        let err = label.save().await.unwrap_err();
        assert!(matches!(err, AnyListError::Status { status: 503, .. }));
        assert!(label.is_new());

        transport.set_failing(false);
        label.save().await.unwrap();
        assert!(!label.is_new());

        assert_eq!(transport.handler_ids(), vec!["new-label", "new-label"]);
    }

    #[tokio::test]
    async fn test_delete_always_uses_delete_handler() {
        let (transport, ctx) = make_context();

        let new_label = CalendarEventLabel::new(dinner(), &ctx);
        new_label.delete().await.unwrap();
        assert!(new_label.is_new());

        let existing = CalendarEventLabel::new(
            RawCalendarLabel {
                identifier: Some("label-42".to_string()),
                ..dinner()
            },
            &ctx,
        );
        existing.delete().await.unwrap();
        assert!(!existing.is_new());

        assert_eq!(transport.handler_ids(), vec!["delete-label", "delete-label"]);
    }

    #[tokio::test]
    async fn test_failed_delete_propagates() {
        let (transport, ctx) = make_context();
        transport.set_failing(true);

        let label = CalendarEventLabel::new(dinner(), &ctx);
        assert!(label.delete().await.is_err());
        assert!(label.is_new());
    }

    #[tokio::test]
    async fn test_save_posts_dinner_scenario() {
        let (transport, ctx) = make_context();
        let mut label = CalendarEventLabel::new(dinner(), &ctx);

        assert_eq!(label.calendar_id(), "cal-1");
        assert!(label.is_new());

        label.save().await.unwrap();
        assert!(!label.is_new());

        let posts = transport.posts.lock().unwrap().clone();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "data/meal-planning-calendar/update");
        assert_eq!(posts[0].1, "operations");

        let list = PBCalendarOperationList::decode(posts[0].2.as_slice()).unwrap();
        assert_eq!(list.operations.len(), 1);

        let op = &list.operations[0];
        let metadata = op.metadata.as_ref().unwrap();
        assert_eq!(metadata.handler_id.as_deref(), Some("new-label"));
        assert_eq!(metadata.user_id.as_deref(), Some("user-9"));
        assert_eq!(metadata.operation_id.as_ref().map(String::len), Some(32));
        assert_eq!(op.calendar_id.as_deref(), Some("cal-1"));

        let sent = op.updated_label.as_ref().unwrap();
        assert_eq!(sent.identifier, label.identifier());
        assert_eq!(sent.calendar_id.as_deref(), Some("cal-1"));
        assert_eq!(sent.name.as_deref(), Some("Dinner"));
        assert_eq!(sent.hex_color.as_deref(), Some("#FF0000"));
        assert_eq!(sent.sort_index, Some(2));
        assert_eq!(sent.logical_timestamp, None);
    }

    #[tokio::test]
    async fn test_label_calendar_overrides_context_on_the_wire() {
        let transport = Arc::new(RecordingTransport::default());
        let ctx = LabelContext::new(transport.clone(), "user-9", "ctx-cal");
        let mut label = CalendarEventLabel::new(
            RawCalendarLabel {
                calendar_id: Some("label-cal".to_string()),
                ..dinner()
            },
            &ctx,
        );

        label.save().await.unwrap();

        let ops = transport.operations();
        assert_eq!(ops[0].calendar_id.as_deref(), Some("label-cal"));
        assert_eq!(
            ops[0].updated_label.as_ref().unwrap().calendar_id.as_deref(),
            Some("label-cal")
        );
    }

    #[tokio::test]
    async fn test_each_operation_gets_fresh_operation_id() {
        let (transport, ctx) = make_context();
        let mut label = CalendarEventLabel::new(dinner(), &ctx);

        label.save().await.unwrap();
        label.save().await.unwrap();

        let ids: Vec<_> = transport
            .operations()
            .into_iter()
            .map(|op| op.metadata.unwrap().operation_id.unwrap())
            .collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_handler_ids() {
        assert_eq!(LabelOperation::New.handler_id(), "new-label");
        assert_eq!(LabelOperation::Update.handler_id(), "update-label");
        assert_eq!(LabelOperation::Delete.to_string(), "delete-label");
    }
}
