//! Verdict HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use verdict::config::Config;
use verdict::embedding::{Embedder, RemoteEmbedder, STUB_EMBEDDING_DIM, StubEmbedder};
use verdict::lexical::LexicalIndexCache;
use verdict::pipeline::AskPipeline;
use verdict::policy::{InMemoryPolicyStore, PolicyRecord};
use verdict::rerank::{CrossEncoderReranker, RelevanceScorer, RemoteScorer, StubScorer};
use verdict::retrieval::{HybridRetriever, RetrieverConfig};
use verdict::rules::{InMemoryRulesEngine, RuleEntry};
use verdict::synthesis::{AnswerSynthesizer, ExtractiveSynthesizer, LlmSynthesizer};
use verdict::ticket::{LocalTicketer, Ticketer, WebhookTicketer};
use verdict::vectordb::QdrantSearchClient;
use verdict_server::gateway::{HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
██╗   ██╗███████╗██████╗ ██████╗ ██╗ ██████╗████████╗
██║   ██║██╔════╝██╔══██╗██╔══██╗██║██╔════╝╚══██╔══╝
██║   ██║█████╗  ██████╔╝██║  ██║██║██║        ██║
╚██╗ ██╔╝██╔══╝  ██╔══██╗██║  ██║██║██║        ██║
 ╚████╔╝ ███████╗██║  ██║██████╔╝██║╚██████╗   ██║
  ╚═══╝  ╚══════╝╚═╝  ╚═╝╚═════╝ ╚═╝ ╚═════╝   ╚═╝

        RETRIEVE. VALIDATE. ANSWER.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        collection = %config.collection_name,
        "Verdict starting"
    );

    let qdrant = QdrantSearchClient::new(&config.qdrant_url).await?;
    if let Err(e) = qdrant.health_check().await {
        tracing::warn!("Qdrant health check failed: {}. Continuing anyway.", e);
    }

    let embedder: Arc<dyn Embedder> = match std::env::var("VERDICT_EMBED_URL") {
        Ok(url) => {
            let dim = std::env::var("VERDICT_EMBED_DIM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(STUB_EMBEDDING_DIM);
            tracing::info!(url = %url, dim, "Using remote embedder");
            Arc::new(RemoteEmbedder::new(url, dim))
        }
        Err(_) => {
            tracing::warn!("No VERDICT_EMBED_URL configured, running embedder in stub mode");
            Arc::new(StubEmbedder::default())
        }
    };

    if let Err(e) = qdrant
        .ensure_collection(&config.collection_name, embedder.dim() as u64)
        .await
    {
        tracing::warn!("Could not ensure collection: {}. Continuing anyway.", e);
    }

    let retriever = HybridRetriever::new(
        qdrant,
        Arc::clone(&embedder),
        LexicalIndexCache::new(config.lexical_cache_capacity),
        RetrieverConfig::from_config(&config),
    );

    let scorer: Arc<dyn RelevanceScorer> = match std::env::var("VERDICT_RERANK_URL") {
        Ok(url) => {
            tracing::info!(url = %url, "Using remote cross-encoder scorer");
            Arc::new(RemoteScorer::new(url))
        }
        Err(_) => {
            tracing::warn!("No VERDICT_RERANK_URL configured, running scorer in stub mode");
            Arc::new(StubScorer)
        }
    };

    let synthesizer: Arc<dyn AnswerSynthesizer> = match std::env::var("VERDICT_LLM_MODEL") {
        Ok(model) => {
            tracing::info!(model = %model, "Using LLM answer synthesis");
            Arc::new(LlmSynthesizer::new(model))
        }
        Err(_) => {
            tracing::info!("No VERDICT_LLM_MODEL configured, using extractive synthesis");
            Arc::new(ExtractiveSynthesizer)
        }
    };

    let ticketer: Arc<dyn Ticketer> = match std::env::var("VERDICT_TICKET_WEBHOOK") {
        Ok(url) => {
            tracing::info!(url = %url, "Using webhook ticketer");
            Arc::new(WebhookTicketer::new(url))
        }
        Err(_) => Arc::new(LocalTicketer),
    };

    let policy_store = Arc::new(load_policies()?);
    let rules = Arc::new(load_rules()?);

    let pipeline = AskPipeline::new(
        retriever,
        CrossEncoderReranker::new(scorer),
        synthesizer,
        rules,
        policy_store,
        ticketer,
        &config,
    );

    let app = create_router_with_state(HandlerState::new(pipeline));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Verdict shutdown complete");
    Ok(())
}

/// Seeds the policy table from `VERDICT_POLICY_FILE` (JSON array of records).
fn load_policies() -> anyhow::Result<InMemoryPolicyStore> {
    match std::env::var("VERDICT_POLICY_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let records: Vec<PolicyRecord> = serde_json::from_str(&raw)?;
            tracing::info!(path = %path, count = records.len(), "Loaded policy records");
            Ok(InMemoryPolicyStore::with_records(records))
        }
        Err(_) => {
            tracing::warn!("No VERDICT_POLICY_FILE configured, policy table starts empty");
            Ok(InMemoryPolicyStore::new())
        }
    }
}

/// Seeds the rules table from `VERDICT_RULES_FILE` (JSON array of entries).
fn load_rules() -> anyhow::Result<InMemoryRulesEngine> {
    match std::env::var("VERDICT_RULES_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let entries: Vec<RuleEntry> = serde_json::from_str(&raw)?;
            tracing::info!(path = %path, count = entries.len(), "Loaded rule entries");
            Ok(InMemoryRulesEngine::with_entries(entries))
        }
        Err(_) => {
            tracing::warn!("No VERDICT_RULES_FILE configured, rules table starts empty");
            Ok(InMemoryRulesEngine::new())
        }
    }
}

fn run_health_check() -> i32 {
    let port = std::env::var("VERDICT_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/health", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
