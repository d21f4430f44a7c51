//! Event handling for the MinIO charm.
//!
//! Every lifecycle event funnels through [`MinioCharm::dispatch`]. Handlers
//! hold no state between events: configuration comes with the event and
//! everything else is re-read from the [`ModelStore`].

mod credentials;
mod error;
mod publisher;


pub use credentials::{generate_secret_key, resolve_credentials, Credentials};
pub use error::CharmError;
pub use publisher::{publish_all, publish_to_relation, retract, Fanout, PublishOutcome};

use anyhow::Result;
use shared_types::{
    DispatchReport, EventContext, LifecycleEvent, ObjectStorageData, RelationRef, StatusRecord,
    UnitStatus,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{CharmConfig, MinioMode};
use crate::owasp;
use crate::storage::{ModelStore, RelationRecord, StoredState};
use crate::workload::render_plan;

pub struct MinioCharm {
    store: Arc<dyn ModelStore>,
    app_name: String,
    model_name: Option<String>,
    /// Events are handled strictly one at a time.
    dispatch_lock: Mutex<()>,
}

impl MinioCharm {
    pub fn new(
        store: Arc<dyn ModelStore>,
        app_name: impl Into<String>,
        model_name: Option<String>,
    ) -> Self {
        Self {
            store,
            app_name: app_name.into(),
            model_name,
            dispatch_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn ModelStore> {
        &self.store
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Handle one lifecycle event. Configuration and connectivity problems
    /// end up in the returned status; only failures of the model store are
    /// returned as errors, for the framework to redeliver the event.
    #[instrument(skip_all, fields(event = %event))]
    pub async fn dispatch(
        &self,
        event: &LifecycleEvent,
        ctx: &EventContext,
    ) -> Result<DispatchReport> {
        let _guard = self.dispatch_lock.lock().await;

        let mut report = DispatchReport {
            event_id: Uuid::new_v4().to_string(),
            event: event.name().to_string(),
            status: UnitStatus::Maintenance(String::new()),
            published: Vec::new(),
            retracted: Vec::new(),
        };
        info!(event_id = %report.event_id, "Handling event");

        let outcome = match event {
            LifecycleEvent::Remove => self.on_remove(ctx, &mut report).await,
            LifecycleEvent::RelationJoined { relation } => {
                self.on_relation_joined(event, relation, ctx, &mut report).await
            }
            LifecycleEvent::RelationChanged { relation } => {
                self.record_relation(relation).await?;
                self.main(event, ctx, &mut report).await
            }
            LifecycleEvent::RelationBroken { relation_id } => {
                if self.store.remove_relation(*relation_id).await? {
                    info!(relation_id, "Forgot broken relation");
                }
                self.main(event, ctx, &mut report).await
            }
            LifecycleEvent::UpgradeCharm => {
                self.set_status(UnitStatus::Maintenance("Upgrading MinIO".to_string()))
                    .await?;
                self.main(event, ctx, &mut report).await
            }
            LifecycleEvent::Install
            | LifecycleEvent::ConfigChanged
            | LifecycleEvent::LeaderElected => self.main(event, ctx, &mut report).await,
        };

        let status = match outcome {
            Ok(status) => status,
            Err(CharmError::Store(e)) => return Err(e),
            Err(e) => {
                warn!(error = %e, "Event left the unit degraded");
                e.status().unwrap_or_else(|| UnitStatus::Blocked(e.to_string()))
            }
        };

        self.set_status(status.clone()).await?;
        report.status = status;
        Ok(report)
    }

    /// Validate the mode-related options. Errors block the unit until the
    /// next config change.
    pub fn on_install_or_upgrade(&self, config: &CharmConfig) -> Result<MinioMode, CharmError> {
        let mode = config.validate()?;
        info!(?mode, "Configuration valid");
        Ok(mode)
    }

    /// Register a new consumer and publish to it straight away.
    async fn on_relation_joined(
        &self,
        event: &LifecycleEvent,
        relation: &RelationRef,
        ctx: &EventContext,
        report: &mut DispatchReport,
    ) -> Result<UnitStatus, CharmError> {
        self.record_relation(relation).await?;
        self.main(event, ctx, report).await
    }

    async fn on_remove(
        &self,
        ctx: &EventContext,
        report: &mut DispatchReport,
    ) -> Result<UnitStatus, CharmError> {
        if ctx.is_leader {
            for mut relation in self.store.list_relations().await? {
                if retract(self.store.as_ref(), &mut relation).await? {
                    report.retracted.push(relation.id);
                }
            }
        }
        Ok(UnitStatus::Maintenance("Removing MinIO".to_string()))
    }

    /// Store the consumer side of a relation, keeping anything already
    /// published on our side.
    async fn record_relation(&self, relation: &RelationRef) -> Result<(), CharmError> {
        let record = match self.store.get_relation(relation.id).await? {
            Some(mut existing) => {
                existing.remote_app.clone_from(&relation.remote_app);
                existing.remote_data.clone_from(&relation.remote_data);
                existing.updated_at = chrono::Utc::now();
                existing
            }
            None => RelationRecord::from_ref(relation),
        };
        self.store.put_relation(&record).await?;
        Ok(())
    }

    /// Full evaluation shared by every event.
    async fn main(
        &self,
        event: &LifecycleEvent,
        ctx: &EventContext,
        report: &mut DispatchReport,
    ) -> Result<UnitStatus, CharmError> {
        if !ctx.is_leader {
            info!("Not a leader, skipping");
            return Ok(UnitStatus::Waiting("Waiting for leadership".to_string()));
        }

        let config = CharmConfig::from_snapshot(&ctx.config)?;
        let mut state = self.load_state().await?;

        if matches!(event, LifecycleEvent::ConfigChanged)
            && owasp::audit_secret_key_change(&config, &mut state).is_some()
        {
            self.store.save_state(&state).await?;
        }

        let mode = self.on_install_or_upgrade(&config)?;
        let credentials = resolve_credentials(&config, &mode, &state)?;

        let record = ObjectStorageData {
            access_key: credentials.access_key.clone(),
            secret_key: credentials.secret_key.clone(),
            port: config.port,
            secure: false,
            service: self.app_name.clone(),
            namespace: self.model_name.clone(),
        };
        let fanout = publish_all(self.store.as_ref(), &record).await?;
        report.published = fanout.published;
        let incompatible = (!fanout.incompatible.is_empty()).then(|| {
            CharmError::IncompatibleVersions {
                apps: fanout.incompatible,
            }
        });

        if !ctx.container_ready {
            // Blocked outranks waiting.
            return Err(incompatible.unwrap_or_else(|| {
                CharmError::UpstreamUnavailable("Waiting for MinIO container".to_string())
            }));
        }

        self.set_status(UnitStatus::Maintenance("Configuring MinIO workload".to_string()))
            .await?;
        let plan = render_plan(&self.app_name, &mode, &config, &credentials);
        self.store.put_plan(&plan).await?;
        info!(args = %plan.args.join(" "), "Workload plan pushed");

        if let Some(e) = incompatible {
            return Err(e);
        }

        Ok(UnitStatus::Active(String::new()))
    }

    /// Stored state, generating the secret key on first use.
    async fn load_state(&self) -> Result<StoredState, CharmError> {
        if let Some(state) = self.store.load_state().await? {
            return Ok(state);
        }
        let state = StoredState::with_secret(generate_secret_key());
        self.store.save_state(&state).await?;
        info!("Generated initial secret-key");
        Ok(state)
    }

    async fn set_status(&self, status: UnitStatus) -> Result<(), CharmError> {
        self.store.put_status(&StatusRecord::now(status)).await?;
        Ok(())
    }
}
