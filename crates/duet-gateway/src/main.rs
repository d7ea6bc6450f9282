use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

mod app;
mod http;
mod queue_transport;

use duet_batch::BatchRegistry;
use duet_core::config::Config;
use duet_core::types::ChatId;
use duet_gating::GatingLayer;
use duet_llm::{AnthropicClient, LlmClient, OpenAiClient};
use duet_orchestrator::Orchestrator;
use duet_memory::ConversationStore;
use duet_roster::{open_connection, LogStore, WorkerRoster};
use duet_tools::ToolRegistry;
use duet_transport::Transport;
use duet_worker::WorkerRuntime;

use crate::queue_transport::QueueTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duet_gateway=info,tower_http=debug".into()),
        )
        .init();

    let config_path = std::env::var("DUET_CONFIG").ok();
    let config = Config::load(config_path.as_deref())?;

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let llm = build_llm_client(&config)?;

    let conn = open_connection(&config.database.path)?;
    let roster = Arc::new(WorkerRoster::new(LogStore::new(conn)?));

    // Workers currently run with no registered tools beyond what a future
    // deployment wires in; `reminder` needs a per-conversation ChatId fixed
    // at construction (duet-tools::reminder::ReminderTool::new), which can't
    // be satisfied by this single, globally-shared ToolRegistry without
    // conversation-scoping the whole Worker Runtime. Left unwired here.
    let worker_tools = Arc::new(ToolRegistry::new());

    let worker_runtime = Arc::new(WorkerRuntime::new(
        Arc::clone(&llm),
        worker_tools,
        Arc::clone(&roster),
        config.llm.model.clone(),
        config.llm.response_max_tokens,
    ));

    spawn_log_pruner(Arc::clone(&roster), config.batch.max_entries_per_worker);

    let (worker_result_tx, mut worker_result_rx) =
        tokio::sync::mpsc::unbounded_channel::<(ChatId, String)>();
    let on_batch_complete = Arc::new(move |chat_id: ChatId, payload: String| {
        let _ = worker_result_tx.send((chat_id, payload));
    });

    let batch_registry = Arc::new(BatchRegistry::new(
        worker_runtime,
        config.batch.timeout_seconds,
        on_batch_complete,
    ));

    let memory = Arc::new(ConversationStore::new());
    let transport = Arc::new(QueueTransport::new());

    let orchestrator = Arc::new(
        Orchestrator::new(
            Arc::clone(&llm),
            Arc::clone(&transport) as Arc<dyn Transport>,
            Arc::clone(&memory),
            batch_registry,
            config.llm.model.clone(),
            config.llm.response_max_tokens,
        )
        .with_max_tool_iterations(config.orchestrator.max_tool_iterations as usize),
    );

    let gating = Arc::new(GatingLayer::new(
        memory,
        Arc::clone(&transport) as Arc<dyn Transport>,
        orchestrator,
        config.gating.clone(),
    ));

    let gating_for_results = Arc::clone(&gating);
    tokio::spawn(async move {
        while let Some((chat_id, payload)) = worker_result_rx.recv().await {
            gating_for_results.on_worker_result(&chat_id, payload).await;
        }
    });

    let state = Arc::new(app::AppState {
        config,
        gating,
        transport,
    });
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    info!("duet gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// How often the Log Store is pruned down to `max_entries_per_worker`
/// (spec.md §4.4: "pruning runs periodically, bounding growth"). Not
/// exposed as config — tune `config.batch.max_entries_per_worker` instead.
const PRUNE_INTERVAL_SECONDS: u64 = 3600;

/// Mirrors `SchedulerEngine::run`'s tick-loop shape (duet-scheduler), but
/// against the Log Store instead of the job table.
fn spawn_log_pruner(roster: Arc<WorkerRoster>, max_entries_per_worker: usize) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(PRUNE_INTERVAL_SECONDS));
        loop {
            interval.tick().await;
            if let Err(e) = roster.log_store().prune(max_entries_per_worker) {
                warn!(error = %e, "log store prune failed");
            }
        }
    });
}

fn build_llm_client(config: &Config) -> anyhow::Result<Arc<dyn LlmClient>> {
    if let Some(anthropic) = &config.llm.anthropic {
        return Ok(Arc::new(AnthropicClient::new(
            anthropic.api_key.clone(),
            Some(anthropic.base_url.clone()),
            config.llm.enable_web_search.then_some(config.llm.web_search_max_uses),
        )));
    }
    if let Some(openai) = &config.llm.openai {
        return Ok(Arc::new(OpenAiClient::new(
            openai.api_key.clone(),
            Some(openai.base_url.clone()),
        )));
    }
    anyhow::bail!("config.llm needs an [llm.anthropic] or [llm.openai] table")
}
