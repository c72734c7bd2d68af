use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use goalsync_core::deadlines::{deadline_status, format_deadline};
use goalsync_core::events::{DomainEvent, DomainEventSink};
use goalsync_core::reminders::{PermissionStatus, ReminderScheduler};
use goalsync_core::utils::observable::Observable;
use goalsync_core::{
    GoalSyncServiceTrait, NewGoal, SessionManager, SharedIdentity, SyncEngine, SyncState,
};
use goalsync_storage_memory::{MemoryAuthProvider, MemoryDocumentStore, MemoryNotificationCenter};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Forwards domain events to the tracing output.
struct TracingEventSink;

impl DomainEventSink for TracingEventSink {
    fn emit(&self, event: DomainEvent) {
        tracing::info!(?event, "domain event");
    }
}

pub struct App {
    pub store: MemoryDocumentStore,
    pub notifications: MemoryNotificationCenter,
    pub session: SessionManager,
}

pub async fn build_app(config: &Config) -> App {
    let store = MemoryDocumentStore::new();
    let auth = MemoryAuthProvider::new();
    let notifications = MemoryNotificationCenter::new(PermissionStatus::Granted);

    let reminders = ReminderScheduler::new(Arc::new(notifications.clone()), &config.sync);
    let permission = reminders.initialize().await;
    tracing::info!("Reminder permission: {:?}", permission);

    let identity: SharedIdentity = Arc::new(Observable::new(None));
    let engine = SyncEngine::builder(Arc::new(store.clone()), identity.clone(), &config.sync)
        .with_reminders(Arc::new(reminders))
        .with_event_sink(Arc::new(TracingEventSink))
        .build();
    engine.on_change(Box::new(|state: &SyncState| {
        tracing::debug!(
            goals = state.goals.len(),
            loading = state.is_loading,
            "sync state changed"
        );
    }));

    let session = SessionManager::new(Arc::new(auth), engine, identity);
    session.attach();

    App {
        store,
        notifications,
        session,
    }
}

fn print_goals(app: &App, config: &Config) {
    let now = Utc::now();
    let state = app.session.engine().snapshot();
    println!("{} goal(s):", state.goals.len());
    for goal in &state.goals {
        println!(
            "  [{}] {:<24} due {:<14} {:?}",
            if goal.is_completed { "x" } else { " " },
            goal.name,
            format_deadline(goal.deadline, config.sync.time_zone),
            deadline_status(goal.deadline, now, config.sync.time_zone),
        );
    }
    if let Some(error) = &state.last_error {
        println!("  last error: {}", error);
    }
}

/// Scripted session: sign up, add, toggle, delete, sign out.
pub async fn run_demo(config: &Config) -> anyhow::Result<()> {
    let app = build_app(config).await;
    let engine = app.session.engine().clone();

    let identity = app.session.sign_up("demo@example.com", "demo-password").await?;
    tracing::info!("Signed up as {}", identity.uid);

    let now = Utc::now();
    engine
        .add(NewGoal::new("Renew passport", "", now - Duration::days(1)))
        .await?;
    engine
        .add(NewGoal::new("Submit report", "Quarterly numbers", now + Duration::days(1)))
        .await?;
    engine
        .add(NewGoal::new("Run a half marathon", "", now + Duration::days(30)))
        .await?;
    print_goals(&app, config);

    let goals = engine.snapshot().goals;
    if let Some(report) = goals.iter().find(|goal| goal.name == "Submit report") {
        engine.toggle_completion(report).await?;
    }
    if let Some(expired) = goals.iter().find(|goal| goal.name == "Renew passport") {
        engine.delete(expired).await?;
    }
    print_goals(&app, config);

    for reminder in app.notifications.pending() {
        println!(
            "reminder '{}' at {}: {}",
            reminder.title, reminder.fire_at, reminder.body
        );
    }

    app.session.sign_out().await?;
    println!(
        "signed out: {} visible goal(s), {} stored",
        engine.snapshot().goals.len(),
        app.store.len(&config.sync.collection)
    );
    Ok(())
}
