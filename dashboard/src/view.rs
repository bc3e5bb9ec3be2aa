use crate::model::{Device, DeviceKind, DeviceStatus};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Rows shown in the recent-activity table.
pub const RECENT_LIMIT: usize = 10;

/// Card markup for the three fixed category containers, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub lighting: Vec<String>,
    pub locks: Vec<String>,
    pub irrigation: Vec<String>,
}

/// One full-replace payload for every display region, projected from a
/// single snapshot so the categorized view and the recent table never skew.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub lighting: String,
    pub locks: String,
    pub irrigation: String,
    pub recent: String,
}

pub fn page_view(snapshot: &[Device]) -> PageView {
    let buckets = categorized(snapshot);
    PageView {
        lighting: buckets.lighting.concat(),
        locks: buckets.locks.concat(),
        irrigation: buckets.irrigation.concat(),
        recent: recent_rows(snapshot, RECENT_LIMIT).concat(),
    }
}

/// Partitions a snapshot into the three fixed category buckets. Each
/// recognized device lands in exactly one bucket; unrecognized kinds are
/// dropped from the view (the record still exists in storage).
pub fn categorized(snapshot: &[Device]) -> Buckets {
    let mut buckets = Buckets::default();

    for device in snapshot {
        let card = device_card(device);
        match &device.kind {
            DeviceKind::Lighting => buckets.lighting.push(card),
            DeviceKind::Lock => buckets.locks.push(card),
            DeviceKind::Irrigation => buckets.irrigation.push(card),
            DeviceKind::Other(kind) => {
                debug!("Skipping device {} with unknown kind {:?}", device.id, kind);
            }
        }
    }

    buckets
}

/// One device card: image from the fixed (kind, status) table, status
/// label, and toggle/edit/delete controls carrying the current field values
/// as data attributes for form pre-fill.
pub fn device_card(device: &Device) -> String {
    let image = image_for(&device.kind, device.status);
    let (toggle_label, toggle_class) = match device.status {
        DeviceStatus::On => ("Turn off", "btn-danger"),
        DeviceStatus::Off => ("Turn on", "btn-success"),
    };

    format!(
        concat!(
            r#"<div class="col">"#,
            r#"<div class="card h-100 shadow-sm device-card" data-id="{id}">"#,
            r#"<img src="{image}" class="card-img-top device-img mt-3" alt="{name} {status_label}">"#,
            r#"<div class="card-body text-center">"#,
            r#"<h5 class="card-title">{name}</h5>"#,
            r#"<p class="card-text mb-1"><small class="text-muted">Location: {location}</small></p>"#,
            r#"<p class="card-text mb-2"><small class="text-muted">Status: <span class="fw-bold">{status_label}</span></small></p>"#,
            r#"<p class="card-text mb-3"><small class="text-muted">Last update: {timestamp}</small></p>"#,
            r#"<button class="btn {toggle_class} btn-toggle-status" data-id="{id}" data-current-status="{status}">{toggle_label}</button>"#,
            r#"<button class="btn btn-outline-secondary btn-edit-device" data-id="{id}" data-name="{name}" data-type="{kind}" data-location="{location}">Edit</button>"#,
            r#"<button class="btn btn-outline-danger btn-delete-device" data-id="{id}">Delete</button>"#,
            r#"</div></div></div>"#,
        ),
        id = escape(&device.id),
        image = image,
        name = escape(&device.name),
        kind = escape(device.kind.as_str()),
        location = escape(&device.location),
        status = device.status.as_str(),
        status_label = device.status.label(),
        toggle_class = toggle_class,
        toggle_label = toggle_label,
        timestamp = format_timestamp(device.last_update),
    )
}

/// The most recently updated devices: stable sort by `last_update`
/// descending (ties keep snapshot order), truncated to `limit`.
pub fn recent_rows(snapshot: &[Device], limit: usize) -> Vec<String> {
    let mut sorted: Vec<&Device> = snapshot.iter().collect();
    sorted.sort_by(|a, b| b.last_update.cmp(&a.last_update));
    sorted.into_iter().take(limit).map(recent_row).collect()
}

fn recent_row(device: &Device) -> String {
    let badge = match device.status {
        DeviceStatus::On => "bg-success",
        DeviceStatus::Off => "bg-secondary",
    };

    format!(
        concat!(
            "<tr>",
            "<td>{name}</td>",
            "<td>{kind}</td>",
            r#"<td><span class="badge {badge}">{status_label}</span></td>"#,
            "<td>{location}</td>",
            "<td>{timestamp}</td>",
            "</tr>",
        ),
        name = escape(&device.name),
        kind = escape(device.kind.as_str()),
        badge = badge,
        status_label = device.status.label(),
        location = escape(&device.location),
        timestamp = format_timestamp(device.last_update),
    )
}

/// Transient notices for the add-device form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    MissingFields,
    Saving,
    Added(String),
    AddFailed,
}

pub fn notice_markup(notice: &FormNotice) -> String {
    let (class, text) = match notice {
        FormNotice::MissingFields => {
            ("alert-warning", "Please fill in every field.".to_string())
        }
        FormNotice::Saving => ("alert-info", "Adding device...".to_string()),
        FormNotice::Added(name) => (
            "alert-success",
            format!("Device \"{}\" added.", escape(name)),
        ),
        FormNotice::AddFailed => ("alert-danger", "Could not add the device.".to_string()),
    };

    format!(
        r#"<div class="alert {}" role="alert">{}</div>"#,
        class, text
    )
}

/// Fixed six-entry image table. An unmapped combination yields an empty
/// path, not an error.
fn image_for(kind: &DeviceKind, status: DeviceStatus) -> &'static str {
    match (kind, status) {
        (DeviceKind::Lighting, DeviceStatus::On) => "assets/on/bulb.gif",
        (DeviceKind::Lighting, DeviceStatus::Off) => "assets/off/bulb.png",
        (DeviceKind::Lock, DeviceStatus::On) => "assets/on/padlock.gif",
        (DeviceKind::Lock, DeviceStatus::Off) => "assets/off/padlock.png",
        (DeviceKind::Irrigation, DeviceStatus::On) => "assets/on/sprinkler.gif",
        (DeviceKind::Irrigation, DeviceStatus::Off) => "assets/off/sprinkler.png",
        (DeviceKind::Other(_), _) => "",
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
