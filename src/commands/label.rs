use std::sync::Arc;

use anyhow::{Context, Result};
use anylist_core::{AnyListConfig, CalendarEventLabel, Client, LabelContext, RawCalendarLabel};
use owo_colors::OwoColorize;

/// Label fields settable from the command line.
pub struct LabelFields {
    pub name: Option<String>,
    pub color: Option<String>,
    pub sort_index: Option<i32>,
    pub logical_timestamp: Option<i64>,
}

fn label_context(calendar: Option<String>) -> Result<LabelContext> {
    let config = AnyListConfig::load()?;
    let client = Client::from_config(&config)?;
    let uid = config.require_user_id()?.to_string();

    let calendar_id = calendar.or(config.calendar_id).context(
        "No calendar given. Pass --calendar or set calendar_id in the config \
        (see `anylist config init`)",
    )?;

    Ok(LabelContext::new(Arc::new(client), uid, calendar_id))
}

pub async fn create(
    name: String,
    color: Option<String>,
    sort_index: Option<i32>,
    calendar: Option<String>,
) -> Result<()> {
    let ctx = label_context(calendar)?;
    let raw = RawCalendarLabel {
        name: Some(name),
        hex_color: color,
        sort_index,
        ..Default::default()
    };

    let mut label = CalendarEventLabel::new(raw, &ctx);
    label.save().await.context("Failed to create label")?;

    println!(
        "{} {} in {}",
        "Created".green(),
        label.identifier(),
        label.calendar_id()
    );
    Ok(())
}

pub async fn update(id: String, fields: LabelFields, calendar: Option<String>) -> Result<()> {
    let ctx = label_context(calendar)?;
    let raw = RawCalendarLabel {
        identifier: Some(id),
        hex_color: fields.color,
        logical_timestamp: fields.logical_timestamp,
        name: fields.name,
        sort_index: fields.sort_index,
        ..Default::default()
    };

    let mut label = CalendarEventLabel::new(raw, &ctx);
    let id = label.identifier().to_string();
    label
        .save()
        .await
        .with_context(|| format!("Failed to update label {id}"))?;

    println!("{} {id}", "Updated".green());
    Ok(())
}

pub async fn delete(id: String, calendar: Option<String>) -> Result<()> {
    let ctx = label_context(calendar)?;
    let raw = RawCalendarLabel {
        identifier: Some(id),
        ..Default::default()
    };

    let label = CalendarEventLabel::new(raw, &ctx);
    label
        .delete()
        .await
        .with_context(|| format!("Failed to delete label {}", label.identifier()))?;

    println!("{} {}", "Deleted".red(), label.identifier());
    Ok(())
}
