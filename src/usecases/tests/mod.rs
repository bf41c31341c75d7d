//! Unit tests for the usecase facade
//!
//! Usecases run over a temp-dir model repository and an in-test backend.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::services::downloads::DownloadManager;
use async_trait::async_trait;
use tempfile::TempDir;

use super::{
    ChatDependencies, ChatUsecases, LocalChatUsecases, LocalModelUsecases, ModelUsecases,
    UsecaseError,
};
use crate::{
    platform::Platform,
    services::{
        BackendError, ChatBackend, ChatMessage, DownloadState, EventBus, FileModelRepository,
        InMemoryDownloadManager, ModelEntry, ModelRepository, Role, StaticExtensionRegistry,
    },
    wizard::{RunMode, RuntimeConfiguration},
};

struct EchoBackend {
    healthy: bool,
    loads: AtomicUsize,
}

impl EchoBackend {
    fn new(healthy: bool) -> Arc<Self> {
        Arc::new(Self {
            healthy,
            loads: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn health(&self) -> Result<(), BackendError> {
        if self.healthy {
            Ok(())
        } else {
            Err(BackendError::Unavailable {
                url: "http://127.0.0.1:3928".to_string(),
                details: "connection refused".to_string(),
            })
        }
    }

    async fn load_model(&self, _model_id: &str, _engine: &str) -> Result<(), BackendError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn complete(
        &self,
        _model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatMessage, BackendError> {
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(ChatMessage {
            role: Role::Assistant,
            content: format!("echo ({}): {last}", messages.len()),
        })
    }
}

struct Fixture {
    temp: TempDir,
    models_dir: std::path::PathBuf,
    repository: Arc<FileModelRepository>,
    downloads: Arc<InMemoryDownloadManager>,
    events: EventBus,
}

impl Fixture {
    async fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let models_dir = temp.path().join("models");
        let repository = Arc::new(FileModelRepository::new(&models_dir));

        let model_dir = models_dir.join("tinyllama");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("model.gguf"), b"weights").unwrap();
        repository
            .add(ModelEntry::new("tinyllama", "llamacpp", &model_dir))
            .await
            .unwrap();

        Self {
            temp,
            models_dir,
            repository,
            downloads: Arc::new(InMemoryDownloadManager::new()),
            events: EventBus::new(),
        }
    }

    fn model_usecases(&self) -> LocalModelUsecases {
        LocalModelUsecases::new(
            self.repository.clone(),
            self.downloads.clone(),
            Arc::new(StaticExtensionRegistry::with_builtin_engines()),
            self.events.clone(),
        )
    }

    fn chat_usecases(
        &self,
        platform: Platform,
        runtime: RuntimeConfiguration,
        backend: Arc<EchoBackend>,
    ) -> LocalChatUsecases {
        LocalChatUsecases::new(
            platform,
            runtime,
            ChatDependencies {
                models: self.repository.clone(),
                downloads: self.downloads.clone(),
                extensions: Arc::new(StaticExtensionRegistry::with_builtin_engines()),
                backend,
                events: self.events.clone(),
            },
        )
    }
}

fn cpu_runtime() -> RuntimeConfiguration {
    RuntimeConfiguration {
        run_mode: Some(RunMode::Cpu),
        ..RuntimeConfiguration::default()
    }
}

#[tokio::test]
async fn remove_deletes_files_entry_and_emits_event() {
    let fixture = Fixture::new().await;
    let mut events = fixture.events.subscribe("model.*").await.unwrap();
    let usecases = fixture.model_usecases();

    let message = usecases.remove_model("tinyllama").await.unwrap();

    assert_eq!(message, "The model tinyllama was deleted");
    assert!(!fixture.models_dir.join("tinyllama").exists());
    assert!(fixture.repository.list().await.unwrap().is_empty());

    let event = events.recv().await.unwrap();
    assert_eq!(event.name, "model.removed");
    assert_eq!(event.payload["id"], "tinyllama");
}

#[tokio::test]
async fn removing_twice_is_not_found() {
    let fixture = Fixture::new().await;
    let usecases = fixture.model_usecases();

    usecases.remove_model("tinyllama").await.unwrap();
    let second = usecases.remove_model("tinyllama").await;

    assert_eq!(second, Err(UsecaseError::NotFound("tinyllama".to_string())));
}

#[tokio::test]
async fn remove_aborts_active_download() {
    let fixture = Fixture::new().await;
    fixture
        .downloads
        .track(DownloadState {
            model_id: "tinyllama".to_string(),
            downloaded: 10,
            total: None,
        })
        .await;

    fixture.model_usecases().remove_model("tinyllama").await.unwrap();

    assert!(!fixture.downloads.is_downloading("tinyllama").await);
}

#[tokio::test]
async fn alias_resolves_and_conflicts_are_rejected() {
    let fixture = Fixture::new().await;
    fixture
        .repository
        .add(ModelEntry::new("llama3", "llamacpp", "/srv/llama3.gguf"))
        .await
        .unwrap();
    let usecases = fixture.model_usecases();

    let updated = usecases.set_alias("tinyllama", "tiny").await.unwrap();
    assert_eq!(updated.alias.as_deref(), Some("tiny"));
    assert_eq!(usecases.get_model("tiny").await.unwrap().id, "tinyllama");

    let conflict = usecases.set_alias("llama3", "tiny").await;
    assert!(matches!(conflict, Err(UsecaseError::Conflict(_))));

    let blank = usecases.set_alias("llama3", "  ").await;
    assert!(matches!(blank, Err(UsecaseError::Conflict(_))));
}

#[tokio::test]
async fn chat_requires_configured_runtime_off_apple() {
    let fixture = Fixture::new().await;
    let chat = fixture.chat_usecases(
        Platform::Linux,
        RuntimeConfiguration::default(),
        EchoBackend::new(true),
    );

    let result = chat.start_chat("tinyllama").await;

    assert!(matches!(result, Err(UsecaseError::Configuration(_))));
}

#[tokio::test]
async fn chat_on_apple_needs_no_runtime_record() {
    let fixture = Fixture::new().await;
    let backend = EchoBackend::new(true);
    let chat = fixture.chat_usecases(
        Platform::MacOs,
        RuntimeConfiguration::default(),
        backend.clone(),
    );

    let session = chat.start_chat("tinyllama").await.unwrap();

    assert_eq!(session.engine, "llamacpp");
    assert_eq!(backend.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn chat_with_unknown_model_is_not_found() {
    let fixture = Fixture::new().await;
    let chat = fixture.chat_usecases(Platform::Linux, cpu_runtime(), EchoBackend::new(true));

    let result = chat.start_chat("mistral").await;

    assert_eq!(result.err(), Some(UsecaseError::NotFound("mistral".to_string())));
}

#[tokio::test]
async fn chat_with_unregistered_engine_is_configuration_error() {
    let fixture = Fixture::new().await;
    fixture
        .repository
        .add(ModelEntry::new("whisper", "mlx", "/srv/whisper"))
        .await
        .unwrap();
    let chat = fixture.chat_usecases(Platform::Linux, cpu_runtime(), EchoBackend::new(true));

    let result = chat.start_chat("whisper").await;

    assert!(matches!(result, Err(UsecaseError::Configuration(msg)) if msg.contains("mlx")));
}

#[tokio::test]
async fn chat_reports_unavailable_backend() {
    let fixture = Fixture::new().await;
    let chat = fixture.chat_usecases(Platform::Linux, cpu_runtime(), EchoBackend::new(false));

    let result = chat.start_chat("tinyllama").await;

    assert!(matches!(result, Err(UsecaseError::BackendUnavailable(_))));
}

#[tokio::test]
async fn send_keeps_conversation_history() {
    let fixture = Fixture::new().await;
    let chat = fixture.chat_usecases(Platform::Linux, cpu_runtime(), EchoBackend::new(true));
    let session = chat.start_chat("tinyllama").await.unwrap();

    assert_eq!(chat.send(&session, "hello").await.unwrap(), "echo (1): hello");
    assert_eq!(chat.send(&session, "again").await.unwrap(), "echo (3): again");
    assert_eq!(session.history().await.len(), 4);
}

#[tokio::test]
async fn import_registers_existing_files_in_place() {
    let fixture = Fixture::new().await;
    let external = fixture.temp.path().join("shared").join("llama3.gguf");
    std::fs::create_dir_all(external.parent().unwrap()).unwrap();
    std::fs::write(&external, b"weights").unwrap();
    let mut events = fixture.events.subscribe("model.*").await.unwrap();

    let usecases = fixture.model_usecases();
    let imported = usecases.import_model("llama3", &external, None).await.unwrap();

    assert_eq!(imported.engine, "llamacpp");
    assert!(imported.path.is_absolute());
    assert_eq!(usecases.get_model("llama3").await.unwrap(), imported);

    let event = events.recv().await.unwrap();
    assert_eq!(event.name, "model.imported");

    usecases.remove_model("llama3").await.unwrap();
    assert!(external.exists());
}

#[tokio::test]
async fn import_rejects_duplicates_missing_paths_and_unknown_engines() {
    let fixture = Fixture::new().await;
    let usecases = fixture.model_usecases();
    let existing = fixture.models_dir.join("tinyllama");

    let duplicate = usecases.import_model("tinyllama", &existing, None).await;
    assert!(matches!(duplicate, Err(UsecaseError::Conflict(message)) if message.contains("already exists")));

    let missing = usecases
        .import_model("ghost", &fixture.models_dir.join("ghost.gguf"), None)
        .await;
    assert!(matches!(missing, Err(UsecaseError::Io(_))));

    let engine = usecases
        .import_model("other", &existing, Some("vllm"))
        .await;
    assert_eq!(
        engine,
        Err(UsecaseError::Configuration("Engine vllm is not registered".to_string()))
    );
    assert!(usecases.get_model("ghost").await.is_err());
}
