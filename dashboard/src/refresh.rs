use crate::api::DeviceApi;
use crate::model::{Device, DeviceDraft, DeviceKind, DeviceStatus};
use crate::surface::Regions;
use crate::view::{self, FormNotice};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

/// What happened to an add-device submission. The host clears the form only
/// on `Created`; on `Failed` the form keeps its contents for retry.
#[derive(Debug)]
pub enum CreateOutcome {
    MissingFields,
    Created(Device),
    Failed,
}

/// Drives when snapshots are fetched and projected, and binds user actions
/// to mutations followed by a re-projection.
pub struct Dashboard<R: Regions> {
    api: DeviceApi,
    regions: R,
}

impl<R: Regions> Dashboard<R> {
    pub fn new(api: DeviceApi, regions: R) -> Self {
        Self { api, regions }
    }

    pub fn regions(&self) -> &R {
        &self.regions
    }

    /// One fetch, both projections. The categorized view and the recent
    /// table always reflect the same snapshot.
    pub async fn refresh_all(&mut self) {
        let snapshot = self.api.list_devices().await;
        self.regions.render(&view::page_view(&snapshot));
    }

    /// Flips a device to the opposite status, then refreshes. A failed
    /// toggle is logged only; the next refresh reconciles the view.
    pub async fn toggle_status(&mut self, id: &str, current: DeviceStatus) {
        if self.api.set_status(id, current.toggled()).await.is_none() {
            warn!("Toggle of device {} did not stick", id);
        }
        self.refresh_all().await;
    }

    /// Deletes a device after the host has asked the user. Declining makes
    /// no network call and no refresh.
    pub async fn remove_device(&mut self, id: &str, confirmed: bool) {
        if !confirmed {
            debug!("Delete of device {} cancelled", id);
            return;
        }
        self.api.delete_device(id).await;
        self.refresh_all().await;
    }

    /// Applies an edit-form submission. Returns whether the update stuck so
    /// the host can close the form either way.
    pub async fn submit_edit(&mut self, id: &str, draft: &DeviceDraft) -> bool {
        let updated = self
            .api
            .update_fields(
                id,
                &draft.name,
                DeviceKind::from(draft.kind.as_str()),
                &draft.location,
            )
            .await
            .is_some();

        self.refresh_all().await;
        updated
    }

    /// Applies an add-form submission. An incomplete draft short-circuits
    /// with a warning notice and never touches the network.
    pub async fn submit_new_device(&mut self, draft: &DeviceDraft) -> CreateOutcome {
        if !draft.is_complete() {
            self.regions
                .set_add_notice(view::notice_markup(&FormNotice::MissingFields));
            return CreateOutcome::MissingFields;
        }

        self.regions
            .set_add_notice(view::notice_markup(&FormNotice::Saving));

        match self
            .api
            .create_device(
                &draft.name,
                DeviceKind::from(draft.kind.as_str()),
                &draft.location,
            )
            .await
        {
            Some(device) => {
                self.regions
                    .set_add_notice(view::notice_markup(&FormNotice::Added(
                        device.name.clone(),
                    )));
                self.refresh_all().await;
                CreateOutcome::Created(device)
            }
            None => {
                self.regions
                    .set_add_notice(view::notice_markup(&FormNotice::AddFailed));
                CreateOutcome::Failed
            }
        }
    }
}

/// Handle to the background poll task. The hosting page calls `stop` on
/// teardown instead of leaking a process-wide repeating timer.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(self) {
        self.task.abort();
    }
}

/// Runs `refresh_all` once immediately, then on every tick of `period`,
/// until the returned handle is stopped. No backoff, no pause-on-failure.
pub fn start_polling<R>(dashboard: Arc<Mutex<Dashboard<R>>>, period: Duration) -> PollHandle
where
    R: Regions + Send + 'static,
{
    info!("Polling device directory every {:?}", period);

    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            dashboard.lock().await.refresh_all().await;
        }
    });

    PollHandle { task }
}
